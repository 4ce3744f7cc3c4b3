//! Grid surfaces: the cell map the tiling engine reads and writes.
//!
//! A surface is an `N x N` space of cells where `N` is its `max_span`. Every
//! occupied cell maps to exactly one pane, and every placed pane owns exactly
//! one rectangle. Surfaces do not enforce full coverage; keeping the grid
//! gapless is the engine's job.

use crate::error::GridError;
use crate::geometry::Position;
use crate::pane::PaneId;

/// Host-provided cell map.
///
/// All coordinates here are native (untransposed). The engine layers its
/// axis-aware addressing on top of these primitives.
pub trait GridSurface {
    /// Side length of the square grid.
    fn max_span(&self) -> usize;

    /// Number of rows. Equal to [`GridSurface::max_span`] for square grids.
    fn row_count(&self) -> usize {
        self.max_span()
    }

    /// Number of columns. Equal to [`GridSurface::max_span`] for square grids.
    fn column_count(&self) -> usize {
        self.max_span()
    }

    /// Pane covering a cell, if any.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] when the cell lies outside the grid.
    fn pane_at(&self, row: usize, col: usize) -> Result<Option<PaneId>, GridError>;

    /// Rectangle currently owned by `pane`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::NotFound`] when the pane is not placed.
    fn position_of(&self, pane: PaneId) -> Result<Position, GridError>;

    /// Place `pane` over `position`.
    ///
    /// On error the surface is left untouched.
    fn place(&mut self, pane: PaneId, position: Position) -> Result<(), GridError>;

    /// Remove `pane`, returning the rectangle it owned.
    fn remove(&mut self, pane: PaneId) -> Option<Position>;

    /// Every placed pane, oldest placement first.
    fn placements(&self) -> Vec<(PaneId, Position)>;

    /// Remove every pane.
    fn clear(&mut self);

    /// Number of placed panes.
    fn len(&self) -> usize;

    /// Check if no pane is placed.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Dense in-memory surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellGrid {
    max_span: usize,
    cells: Vec<Option<PaneId>>,
    placements: Vec<(PaneId, Position)>,
}

impl CellGrid {
    /// Empty `max_span x max_span` grid.
    #[must_use]
    pub fn new(max_span: usize) -> Self {
        Self {
            max_span,
            cells: vec![None; max_span.saturating_mul(max_span)],
            placements: Vec::new(),
        }
    }

    /// Grid fully covered by a single pane.
    pub fn with_pane(max_span: usize, pane: PaneId) -> Result<Self, GridError> {
        let mut grid = Self::new(max_span);
        grid.place(pane, Position::new(0, 0, max_span, max_span))?;
        Ok(grid)
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        row * self.max_span + col
    }

    fn check_cell(&self, row: usize, col: usize) -> Result<(), GridError> {
        if row >= self.max_span || col >= self.max_span {
            return Err(GridError::OutOfBounds {
                row,
                col,
                max_span: self.max_span,
            });
        }
        Ok(())
    }

    fn fill(&mut self, position: Position, value: Option<PaneId>) {
        for (row, col) in position.cells() {
            let idx = self.index(row, col);
            self.cells[idx] = value;
        }
    }
}

impl GridSurface for CellGrid {
    fn max_span(&self) -> usize {
        self.max_span
    }

    fn pane_at(&self, row: usize, col: usize) -> Result<Option<PaneId>, GridError> {
        self.check_cell(row, col)?;
        Ok(self.cells[self.index(row, col)])
    }

    fn position_of(&self, pane: PaneId) -> Result<Position, GridError> {
        self.placements
            .iter()
            .find(|(id, _)| *id == pane)
            .map(|(_, position)| *position)
            .ok_or(GridError::NotFound { pane })
    }

    fn place(&mut self, pane: PaneId, position: Position) -> Result<(), GridError> {
        if position.is_empty() {
            return Err(GridError::InvalidSpan { pane, position });
        }
        let (Some(end_row), Some(end_col)) = (
            position.row.checked_add(position.rowspan),
            position.col.checked_add(position.colspan),
        ) else {
            return Err(GridError::OutOfBounds {
                row: position.row,
                col: position.col,
                max_span: self.max_span,
            });
        };
        self.check_cell(position.row, position.col)?;
        self.check_cell(end_row - 1, end_col - 1)?;

        if let Some(existing) = self.placements.iter().find(|(id, _)| *id == pane) {
            return Err(GridError::AlreadyPlaced {
                pane,
                position: existing.1,
            });
        }
        for (row, col) in position.cells() {
            if let Some(occupant) = self.cells[self.index(row, col)] {
                return Err(GridError::Overlap {
                    pane,
                    row,
                    col,
                    occupant,
                });
            }
        }

        self.fill(position, Some(pane));
        self.placements.push((pane, position));
        Ok(())
    }

    fn remove(&mut self, pane: PaneId) -> Option<Position> {
        let idx = self.placements.iter().position(|(id, _)| *id == pane)?;
        let (_, position) = self.placements.remove(idx);
        self.fill(position, None);
        Some(position)
    }

    fn placements(&self) -> Vec<(PaneId, Position)> {
        self.placements.clone()
    }

    fn clear(&mut self) {
        self.cells.iter_mut().for_each(|cell| *cell = None);
        self.placements.clear();
    }

    fn len(&self) -> usize {
        self.placements.len()
    }
}
