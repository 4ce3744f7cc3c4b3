//! Critical-block search.
//!
//! Given a point and a width, find the tallest gap-free block of exactly that
//! width that starts (or ends) at the point. Candidates come from the rows
//! where panes flush with the left boundary column end, intersected with the
//! same rows on the right boundary column. Candidates that turn out not to
//! be rectangular or to contain a gap are skipped.

use std::collections::BTreeSet;

use tessera_core::{Axis, GridSurface, Position};

use crate::addressing::AxisAddressing;
use crate::block::CriticalBlock;
use crate::error::TilingError;

/// Which way a critical block extends from its anchor row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchDirection {
    /// The block ends just above the anchor row.
    Up,
    /// The block starts at the anchor row.
    Down,
}

/// Rows where a run of panes flush with `col` ends, walking away from `i`.
///
/// Up collects the top rows of the panes above `i`; down collects the bottom
/// edges of the panes from `i` on. The walk stops at the first empty cell or
/// the first pane that is not flush.
fn edge_boundaries<S, F>(
    surface: &S,
    axis: Axis,
    i: usize,
    col: usize,
    direction: SearchDirection,
    flush: F,
) -> Result<BTreeSet<usize>, TilingError>
where
    S: GridSurface + ?Sized,
    F: Fn(&Position) -> bool,
{
    let span = surface.row_count_along(axis);
    let mut boundaries = BTreeSet::new();
    let mut row = match direction {
        SearchDirection::Up => i.checked_sub(1),
        SearchDirection::Down => Some(i).filter(|&row| row < span),
    };
    while let Some(current) = row {
        let Some(pane) = surface.pane_at_along(axis, current, col)? else {
            break;
        };
        let position = surface.position_along(axis, pane)?;
        if !flush(&position) {
            break;
        }
        row = match direction {
            SearchDirection::Up => {
                boundaries.insert(position.row);
                position.row.checked_sub(1)
            }
            SearchDirection::Down => {
                boundaries.insert(position.end_row());
                Some(position.end_row()).filter(|&row| row < span)
            }
        };
    }
    Ok(boundaries)
}

/// Tallest critical block of width `colspan` anchored at row `i`, column `j`.
///
/// # Errors
///
/// [`TilingError::NoCriticalBlock`] when no candidate yields a valid block.
/// Other block and grid failures are returned as is.
pub fn build_from_point<S: GridSurface + ?Sized>(
    surface: &S,
    axis: Axis,
    i: usize,
    j: usize,
    colspan: usize,
    direction: SearchDirection,
) -> Result<CriticalBlock, TilingError> {
    let not_found = TilingError::NoCriticalBlock {
        row: i,
        col: j,
        colspan,
    };
    let Some(end_col) = j.checked_add(colspan).filter(|_| colspan > 0) else {
        return Err(not_found);
    };

    let left = edge_boundaries(surface, axis, i, j, direction, |p| p.col == j)?;
    let right = edge_boundaries(surface, axis, i, end_col - 1, direction, |p| {
        p.end_col() == end_col
    })?;

    let mut candidates: Vec<usize> = left.intersection(&right).copied().collect();
    if direction == SearchDirection::Down {
        candidates.reverse();
    }

    for row in candidates {
        let (top, rowspan) = match direction {
            SearchDirection::Up => (row, i - row),
            SearchDirection::Down => (i, row - i),
        };
        match CriticalBlock::new(surface, axis, top, j, rowspan, colspan) {
            Ok(block) => {
                #[cfg(feature = "tracing")]
                tracing::trace!(top, col = j, rowspan, colspan, "critical block found");
                return Ok(block);
            }
            Err(err) if err.is_candidate_rejection() => continue,
            Err(err) => return Err(err.into()),
        }
    }
    Err(not_found)
}
