//! Axis-aware access to a grid surface.
//!
//! Every algorithm in this crate is written for panes stacked along rows.
//! The same code handles stacking along columns by addressing the surface
//! through [`Axis::Columns`], which swaps row and column on every call. This
//! module is the only place that swap happens.

use tessera_core::{Axis, GridError, GridSurface, PaneId, Position};

use crate::error::TilingError;

/// Oriented view of any [`GridSurface`].
pub trait AxisAddressing: GridSurface {
    /// Pane at an oriented cell.
    fn pane_at_along(&self, axis: Axis, row: usize, col: usize) -> Result<Option<PaneId>, GridError> {
        let (row, col) = axis.point(row, col);
        self.pane_at(row, col)
    }

    /// Oriented rectangle owned by `pane`.
    fn position_along(&self, axis: Axis, pane: PaneId) -> Result<Position, GridError> {
        self.position_of(pane).map(|position| axis.orient(position))
    }

    /// Place `pane` over an oriented rectangle.
    fn place_along(&mut self, axis: Axis, pane: PaneId, position: Position) -> Result<(), GridError> {
        self.place(pane, axis.orient(position))
    }

    /// Row count as seen along `axis`.
    fn row_count_along(&self, axis: Axis) -> usize {
        match axis {
            Axis::Rows => self.row_count(),
            Axis::Columns => self.column_count(),
        }
    }

    /// Column count as seen along `axis`.
    fn column_count_along(&self, axis: Axis) -> usize {
        match axis {
            Axis::Rows => self.column_count(),
            Axis::Columns => self.row_count(),
        }
    }
}

impl<S: GridSurface + ?Sized> AxisAddressing for S {}

/// Pane and oriented rectangle covering a cell that must be occupied.
pub(crate) fn occupant<S: GridSurface + ?Sized>(
    surface: &S,
    axis: Axis,
    row: usize,
    col: usize,
) -> Result<(PaneId, Position), TilingError> {
    let pane = surface
        .pane_at_along(axis, row, col)?
        .ok_or(TilingError::EmptyCell { row, col })?;
    Ok((pane, surface.position_along(axis, pane)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{grid, ids};
    use tessera_core::CellGrid;

    // 0 1 1 1
    // 0 2 3 3
    // 4 4 3 3
    // 4 4 3 3
    fn sample() -> (CellGrid, Vec<PaneId>) {
        let ws = ids(5);
        let grid = grid(
            4,
            &[
                (ws[0], Position::new(0, 0, 2, 1)),
                (ws[1], Position::new(0, 1, 1, 3)),
                (ws[2], Position::new(1, 1, 1, 1)),
                (ws[3], Position::new(1, 2, 3, 2)),
                (ws[4], Position::new(2, 0, 2, 2)),
            ],
        );
        (grid, ws)
    }

    #[test]
    fn columns_axis_swaps_cell_lookups() {
        let (grid, ws) = sample();
        assert_eq!(grid.pane_at_along(Axis::Rows, 0, 1), Ok(Some(ws[1])));
        assert_eq!(grid.pane_at_along(Axis::Columns, 0, 1), Ok(Some(ws[0])));
        assert_eq!(grid.pane_at_along(Axis::Columns, 1, 0), Ok(Some(ws[1])));
        assert_eq!(grid.pane_at_along(Axis::Columns, 2, 1), Ok(Some(ws[3])));
        assert!(matches!(
            grid.pane_at_along(Axis::Columns, 4, 0),
            Err(GridError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn columns_axis_swaps_positions() {
        let (grid, ws) = sample();
        assert_eq!(grid.position_along(Axis::Columns, ws[0]), Ok(Position::new(0, 0, 1, 2)));
        assert_eq!(grid.position_along(Axis::Columns, ws[1]), Ok(Position::new(1, 0, 3, 1)));
        assert_eq!(grid.position_along(Axis::Columns, ws[3]), Ok(Position::new(2, 1, 2, 3)));
        assert_eq!(grid.position_along(Axis::Rows, ws[3]), Ok(Position::new(1, 2, 3, 2)));
    }

    #[test]
    fn place_along_columns_stores_native_rectangle() {
        let mut grid = CellGrid::new(4);
        let ws = ids(1);
        grid.place_along(Axis::Columns, ws[0], Position::new(1, 0, 2, 3))
            .expect("place transposed");
        assert_eq!(grid.position_of(ws[0]), Ok(Position::new(0, 1, 3, 2)));
        assert_eq!(grid.row_count_along(Axis::Columns), 4);
        assert_eq!(grid.column_count_along(Axis::Rows), 4);
    }

    #[test]
    fn occupant_reports_empty_cells() {
        let mut grid = CellGrid::new(2);
        let ws = ids(1);
        grid.place(ws[0], Position::new(0, 0, 1, 2)).expect("place");
        assert_eq!(
            occupant(&grid, Axis::Columns, 1, 0).map(|(pane, _)| pane),
            Ok(ws[0])
        );
        assert_eq!(
            occupant(&grid, Axis::Rows, 1, 0),
            Err(TilingError::EmptyCell { row: 1, col: 0 })
        );
    }
}
