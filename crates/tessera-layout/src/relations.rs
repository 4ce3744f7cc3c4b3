//! Relationship queries between panes: independent blocks, supporters and
//! neighbours.

use std::collections::BTreeSet;

use tessera_core::{Axis, GridError, GridSurface, PaneId, Position};

use crate::addressing::{AxisAddressing, occupant};
use crate::block::CriticalBlock;
use crate::error::TilingError;

/// Scan a column from row 0, summing the heights of the panes that satisfy
/// `flush`. Stops at the first pane that does not, or at full height.
fn flush_height<S, F>(
    surface: &S,
    axis: Axis,
    col: usize,
    flush: F,
) -> Result<(usize, Position), TilingError>
where
    S: GridSurface + ?Sized,
    F: Fn(&Position) -> bool,
{
    let span = surface.row_count_along(axis);
    let mut height = 0;
    loop {
        let (_, probe) = occupant(surface, axis, height, col)?;
        if !flush(&probe) {
            return Ok((height, probe));
        }
        height += probe.rowspan.max(1);
        if height >= span {
            return Ok((height, probe));
        }
    }
}

/// Smallest full-height critical block of columns containing `pane`.
///
/// Starting from the pane's own columns, each side is pushed outward until
/// the panes stacked along the boundary column line up with it all the way
/// down. Splitting or removing `pane` can only affect panes inside the
/// result.
///
/// # Errors
///
/// [`TilingError::EmptyCell`] when the grid has a gap on a probed column,
/// or a grid error when `pane` is not placed.
pub fn independent_block<S: GridSurface + ?Sized>(
    surface: &S,
    pane: PaneId,
    axis: Axis,
) -> Result<CriticalBlock, TilingError> {
    let span = surface.row_count_along(axis);
    let position = surface.position_along(axis, pane)?;

    let mut left = position.col;
    loop {
        let (height, probe) = flush_height(surface, axis, left, |p| p.col == left)?;
        if height >= span {
            break;
        }
        // The probe straddles `left`, so its own left edge is the next limit.
        left = probe.col;
    }

    let mut right = position.end_col();
    loop {
        let (height, probe) = flush_height(surface, axis, right - 1, |p| p.end_col() == right)?;
        if height >= span {
            break;
        }
        right = probe.end_col();
    }

    Ok(CriticalBlock::new(surface, axis, 0, left, span, right - left)?)
}

/// Which side of a pane a supporter closure is computed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupportDirection {
    /// Toward row 0.
    Before,
    /// Away from row 0.
    After,
}

/// Every pane transitively touching `pane`'s edge in `direction`.
///
/// A pane's direct supporters are those covering the row just past its
/// edge, anywhere across its columns. Empty cells on that row are skipped.
pub fn supporters<S: GridSurface + ?Sized>(
    surface: &S,
    pane: PaneId,
    axis: Axis,
    direction: SupportDirection,
) -> Result<BTreeSet<PaneId>, TilingError> {
    let span = surface.row_count_along(axis);
    let mut found = BTreeSet::new();
    let mut pending = vec![pane];
    while let Some(current) = pending.pop() {
        let position = surface.position_along(axis, current)?;
        let pivot = match direction {
            SupportDirection::Before => position.row.checked_sub(1),
            SupportDirection::After => Some(position.end_row()).filter(|&row| row < span),
        };
        let Some(pivot) = pivot else {
            continue;
        };
        for col in position.col..position.end_col() {
            let Some(next) = surface.pane_at_along(axis, pivot, col)? else {
                continue;
            };
            if found.insert(next) {
                pending.push(next);
            }
        }
    }
    Ok(found)
}

/// Side of a pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Top,
    Right,
    Bottom,
}

impl Side {
    pub const ALL: [Self; 4] = [Self::Left, Self::Top, Self::Right, Self::Bottom];

    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Top => Self::Bottom,
            Self::Right => Self::Left,
            Self::Bottom => Self::Top,
        }
    }

    /// Left/right are looked up natively, top/bottom on the transposed grid.
    const fn axis(self) -> Axis {
        match self {
            Self::Left | Self::Right => Axis::Rows,
            Self::Top | Self::Bottom => Axis::Columns,
        }
    }

    const fn is_before(self) -> bool {
        matches!(self, Self::Left | Self::Top)
    }
}

/// Pane sharing the longest contiguous stretch of `pane`'s edge on `side`.
///
/// Ties go to the stretch nearest the start of the edge. Returns `None` when
/// the edge lies on the grid boundary.
///
/// # Errors
///
/// [`GridError::NotFound`] when `pane` is not placed.
pub fn neighbour<S: GridSurface + ?Sized>(
    surface: &S,
    pane: PaneId,
    side: Side,
) -> Result<Option<PaneId>, GridError> {
    let axis = side.axis();
    let position = surface.position_along(axis, pane)?;
    let pivot = if side.is_before() {
        position.col.checked_sub(1)
    } else {
        Some(position.end_col())
    };
    let Some(pivot) = pivot.filter(|&col| col < surface.column_count_along(axis)) else {
        return Ok(None);
    };

    let mut best = None;
    let mut best_contact = 0;
    let mut last = None;
    let mut contact = 0;
    for row in position.row..position.end_row() {
        let Some(candidate) = surface.pane_at_along(axis, row, pivot)? else {
            last = None;
            contact = 0;
            continue;
        };
        if last == Some(candidate) {
            contact += 1;
        } else {
            last = Some(candidate);
            contact = 1;
        }
        if contact > best_contact {
            best_contact = contact;
            best = last;
        }
    }
    Ok(best)
}
