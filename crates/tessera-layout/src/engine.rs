//! Rearrange, compact, grow and fill: the pipeline that restores a gapless
//! tiling inside a domain after panes were inserted or removed.
//!
//! All functions work on oriented coordinates along the domain's axis.

use tessera_core::{Axis, GridError, GridSurface, PaneId, Position};

use crate::addressing::AxisAddressing;
use crate::block::{Block, EmptyBlock, RecBlock, signed};
use crate::error::{BlockError, TilingError};
use crate::relations::{SupportDirection, supporters};
use crate::search::{SearchDirection, build_from_point};

/// Re-tile `panes` inside `domain`.
///
/// The panes are removed, then dropped one by one into single-row slots in
/// list order, each landing just below whatever already occupies its
/// columns. Hanging panes are compacted, the stacked rows are stretched back
/// to full height and remaining holes are filled.
///
/// # Errors
///
/// [`TilingError::CapacityExceeded`] when a pane would land below the last
/// row. The surface is left mid-way on any error; callers roll back.
pub fn rearrange<S: GridSurface + ?Sized>(
    surface: &mut S,
    panes: &[(PaneId, Position)],
    domain: &Block,
) -> Result<(), TilingError> {
    let axis = domain.axis();
    let span = surface.row_count_along(axis);
    let mut offsets = vec![0usize; surface.column_count_along(axis)];

    for (pane, _) in panes {
        surface.remove(*pane);
    }
    for &(pane, previous) in panes {
        let columns = previous.col..previous.end_col();
        let Some(slots) = offsets.get_mut(columns) else {
            return Err(GridError::OutOfBounds {
                row: previous.row,
                col: previous.end_col(),
                max_span: surface.max_span(),
            }
            .into());
        };
        let row = slots.iter().copied().max().unwrap_or(0);
        if row >= span {
            #[cfg(feature = "tracing")]
            tracing::debug!(pane = pane.get(), ?axis, "no row left for pane");
            return Err(TilingError::CapacityExceeded { axis });
        }
        slots.fill(row + 1);
        surface.place_along(axis, pane, Position::new(row, previous.col, 1, previous.colspan))?;
    }

    drop_hanging_panes(surface, domain)?;

    let mut block_height = 0;
    for (pane, _) in panes {
        block_height = block_height.max(surface.position_along(axis, *pane)?.row + 1);
    }
    if block_height > 0 {
        let mut stacked = RecBlock::new(
            &*surface,
            axis,
            domain.i(),
            domain.j(),
            block_height,
            domain.colspan(),
        )?;
        stacked.displace_and_resize(surface, 0, signed(span) - signed(block_height))?;
    }

    fill_spaces(surface, domain)
}

/// Move panes with empty space beside them down until that space closes.
///
/// A pane qualifies when the cell next to it is empty and, further down that
/// column, the first pane met lines up with the pane's edge. The pane moves
/// down together with every pane below it; the move is abandoned when the
/// group would collide or leave the grid.
pub fn drop_hanging_panes<S: GridSurface + ?Sized>(
    surface: &mut S,
    domain: &Block,
) -> Result<(), TilingError> {
    let axis = domain.axis();
    'scan: loop {
        for (pane, position) in domain.panes(&*surface)? {
            let Some(displacement) = hanging_displacement(&*surface, domain, position)? else {
                continue;
            };
            if try_drop(surface, axis, pane, position, displacement)? {
                #[cfg(feature = "tracing")]
                tracing::trace!(pane = pane.get(), displacement, "dropped hanging pane");
                continue 'scan;
            }
        }
        return Ok(());
    }
}

fn hanging_displacement<S: GridSurface + ?Sized>(
    surface: &S,
    domain: &Block,
    position: Position,
) -> Result<Option<usize>, TilingError> {
    let axis = domain.axis();

    let left = if position.col > domain.j()
        && surface.pane_at_along(axis, position.row, position.col - 1)?.is_none()
    {
        drop_distance(surface, domain, position, position.col - 1, |found| {
            found.end_col() == position.col
        })?
    } else {
        None
    };

    let right = if position.end_col() < domain.end_col()
        && surface.pane_at_along(axis, position.row, position.end_col())?.is_none()
    {
        drop_distance(surface, domain, position, position.end_col(), |found| {
            found.col == position.end_col()
        })?
    } else {
        None
    };

    Ok(match (left, right) {
        (Some(left), Some(right)) => Some(left.min(right)),
        (left, right) => left.or(right),
    })
}

/// Rows to drop so the pane lines up with the first pane met in `col`.
fn drop_distance<S, F>(
    surface: &S,
    domain: &Block,
    position: Position,
    col: usize,
    fits: F,
) -> Result<Option<usize>, TilingError>
where
    S: GridSurface + ?Sized,
    F: Fn(&Position) -> bool,
{
    let axis = domain.axis();
    let mut height = 1;
    for row in position.row + 1..domain.end_row() {
        match surface.pane_at_along(axis, row, col)? {
            Some(pane) => {
                let found = surface.position_along(axis, pane)?;
                return Ok(fits(&found).then_some(height));
            }
            None => height += 1,
        }
    }
    Ok(None)
}

fn try_drop<S: GridSurface + ?Sized>(
    surface: &mut S,
    axis: Axis,
    pane: PaneId,
    position: Position,
    displacement: usize,
) -> Result<bool, TilingError> {
    let mut group = vec![(pane, position)];
    for supporter in supporters(&*surface, pane, axis, SupportDirection::After)? {
        group.push((supporter, surface.position_along(axis, supporter)?));
    }
    for (member, _) in &group {
        surface.remove(*member);
    }

    let mut fits = true;
    for (_, previous) in &group {
        match EmptyBlock::new(
            &*surface,
            axis,
            previous.row + displacement,
            previous.col,
            previous.rowspan,
            previous.colspan,
        ) {
            Ok(_) => {}
            Err(BlockError::InvalidRegion { .. } | BlockError::NotEmpty { .. }) => {
                fits = false;
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    for &(member, previous) in &group {
        let target = if fits {
            Position {
                row: previous.row + displacement,
                ..previous
            }
        } else {
            previous
        };
        surface.place_along(axis, member, target)?;
    }
    Ok(fits)
}

/// Fill every empty block inside `domain`.
///
/// Each hole is absorbed by stretching the critical block right above it.
/// When there is none, a pane beside the hole that starts on the hole's top
/// row and is no taller than it is widened across the hole.
///
/// # Errors
///
/// [`TilingError::NoSuitableFill`] when a hole can be closed neither way.
pub fn fill_spaces<S: GridSurface + ?Sized>(
    surface: &mut S,
    domain: &Block,
) -> Result<(), TilingError> {
    let axis = domain.axis();
    while let Some(hole) = EmptyBlock::find_in(&*surface, domain)? {
        match build_from_point(
            &*surface,
            axis,
            hole.i(),
            hole.j(),
            hole.colspan(),
            SearchDirection::Up,
        ) {
            Ok(mut above) => {
                #[cfg(feature = "tracing")]
                tracing::trace!(hole = %hole.position(), above = %above.position(), "stretching block over hole");
                above.displace_and_resize(surface, 0, signed(hole.rowspan()))?;
            }
            Err(TilingError::NoCriticalBlock { .. }) => widen_neighbour(surface, domain, &hole)?,
            Err(err) => return Err(err),
        }
    }
    Ok(())
}

fn lateral<S: GridSurface + ?Sized>(
    surface: &S,
    axis: Axis,
    row: usize,
    col: usize,
) -> Result<Option<(PaneId, Position)>, TilingError> {
    let Some(pane) = surface.pane_at_along(axis, row, col)? else {
        return Ok(None);
    };
    Ok(Some((pane, surface.position_along(axis, pane)?)))
}

fn widen_neighbour<S: GridSurface + ?Sized>(
    surface: &mut S,
    domain: &Block,
    hole: &EmptyBlock,
) -> Result<(), TilingError> {
    let axis = domain.axis();
    let fits = |position: &Position| position.row == hole.i() && position.rowspan <= hole.rowspan();

    let left = if hole.j() > domain.j() {
        lateral(&*surface, axis, hole.i(), hole.j() - 1)?.filter(|(_, p)| fits(p))
    } else {
        None
    };
    if let Some((pane, position)) = left {
        #[cfg(feature = "tracing")]
        tracing::trace!(pane = pane.get(), hole = %hole.position(), "widening left neighbour");
        surface.remove(pane);
        surface.place_along(
            axis,
            pane,
            Position {
                colspan: position.colspan + hole.colspan(),
                ..position
            },
        )?;
        return Ok(());
    }

    let right = if hole.end_col() < domain.end_col() {
        lateral(&*surface, axis, hole.i(), hole.end_col())?.filter(|(_, p)| fits(p))
    } else {
        None
    };
    if let Some((pane, position)) = right {
        #[cfg(feature = "tracing")]
        tracing::trace!(pane = pane.get(), hole = %hole.position(), "widening right neighbour");
        surface.remove(pane);
        surface.place_along(
            axis,
            pane,
            Position {
                col: position.col - hole.colspan(),
                colspan: position.colspan + hole.colspan(),
                ..position
            },
        )?;
        return Ok(());
    }

    Err(TilingError::NoSuitableFill {
        hole: hole.position(),
    })
}
