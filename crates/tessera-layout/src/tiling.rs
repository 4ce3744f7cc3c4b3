//! The public tiling engine.

use tessera_core::{Axis, CellGrid, GridError, GridSurface, PaneId, Position};

use crate::addressing::AxisAddressing;
use crate::block::CriticalBlock;
use crate::config::{ConfigError, DEFAULT_MAX_SPAN, TilingConfig};
use crate::debug::{TilingReport, tiling_report};
use crate::engine::rearrange;
use crate::error::{OperationFailure, TilingError, TilingOperation};
use crate::relations::{Side, independent_block, neighbour};
use crate::snapshot::LayoutSnapshot;

/// Where the new pane goes relative to the pane being split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PanePlacement {
    /// Below (hsplit) or to the right (vsplit).
    #[default]
    After,
    /// Above (hsplit) or to the left (vsplit).
    Before,
}

/// Square grid of panes that always stays fully tiled.
///
/// Every split and removal rearranges only the panes inside the smallest
/// independent block around the target, then restores a gapless tiling.
/// When an operation fails the previous layout is restored before the error
/// is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilingLayout<S: GridSurface = CellGrid> {
    surface: S,
}

impl TilingLayout<CellGrid> {
    /// Empty `max_span x max_span` layout.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] when `max_span` is zero or above
    /// [`MAX_SPAN_LIMIT`](crate::config::MAX_SPAN_LIMIT).
    pub fn new(max_span: usize) -> Result<Self, ConfigError> {
        Self::from_config(&TilingConfig::new(max_span)?)
    }

    /// Layout with `pane` covering the whole grid.
    pub fn with_initial_pane(max_span: usize, pane: PaneId) -> Result<Self, TilingError> {
        let mut layout = Self::new(max_span)?;
        layout.surface.place(pane, Position::new(0, 0, max_span, max_span))?;
        Ok(layout)
    }

    pub fn from_config(config: &TilingConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            surface: CellGrid::new(config.max_span),
        })
    }
}

impl Default for TilingLayout<CellGrid> {
    fn default() -> Self {
        Self {
            surface: CellGrid::new(DEFAULT_MAX_SPAN),
        }
    }
}

impl<S: GridSurface> TilingLayout<S> {
    /// Drive an existing surface. Its placements are taken as they are.
    pub fn from_surface(surface: S) -> Self {
        Self { surface }
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    #[must_use]
    pub fn max_span(&self) -> usize {
        self.surface.max_span()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.surface.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.surface.is_empty()
    }

    /// Placed panes, oldest placement first.
    #[must_use]
    pub fn panes(&self) -> Vec<PaneId> {
        self.surface
            .placements()
            .into_iter()
            .map(|(pane, _)| pane)
            .collect()
    }

    pub fn position_of(&self, pane: PaneId) -> Result<Position, GridError> {
        self.surface.position_of(pane)
    }

    /// Pane sharing the most contiguous cells with `pane`'s `side`.
    ///
    /// `None` when `pane` touches the grid border on that side.
    pub fn neighbour(&self, pane: PaneId, side: Side) -> Result<Option<PaneId>, GridError> {
        neighbour(&self.surface, pane, side)
    }

    pub fn left_neighbour(&self, pane: PaneId) -> Result<Option<PaneId>, GridError> {
        self.neighbour(pane, Side::Left)
    }

    pub fn top_neighbour(&self, pane: PaneId) -> Result<Option<PaneId>, GridError> {
        self.neighbour(pane, Side::Top)
    }

    pub fn right_neighbour(&self, pane: PaneId) -> Result<Option<PaneId>, GridError> {
        self.neighbour(pane, Side::Right)
    }

    pub fn bottom_neighbour(&self, pane: PaneId) -> Result<Option<PaneId>, GridError> {
        self.neighbour(pane, Side::Bottom)
    }

    #[must_use]
    pub fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot::capture(&self.surface)
    }

    /// Replace every placement with the ones in `snapshot`, in its order.
    ///
    /// The snapshot is checked on a scratch grid first, so a snapshot that
    /// cannot be placed leaves the surface as it was.
    ///
    /// # Errors
    ///
    /// - [`TilingError::SpanMismatch`] when the snapshot comes from a grid of
    ///   another size.
    /// - [`TilingError::Grid`] when an entry is out of bounds, has no area,
    ///   repeats a pane or overlaps an earlier entry.
    pub fn restore(&mut self, snapshot: &LayoutSnapshot) -> Result<(), TilingError> {
        let expected = self.surface.max_span();
        if snapshot.max_span() != expected {
            return Err(TilingError::SpanMismatch {
                expected,
                found: snapshot.max_span(),
            });
        }
        let mut scratch = CellGrid::new(expected);
        for (pane, position) in snapshot.iter() {
            scratch.place(pane, position)?;
        }

        let previous = self.surface.placements();
        if let Err(err) = self.replace_placements(snapshot.iter()) {
            // The surface refused an entry the scratch grid accepted.
            let _ = self.replace_placements(previous.into_iter());
            return Err(err.into());
        }
        Ok(())
    }

    fn replace_placements(
        &mut self,
        placements: impl Iterator<Item = (PaneId, Position)>,
    ) -> Result<(), GridError> {
        self.surface.clear();
        for (pane, position) in placements {
            self.surface.place(pane, position)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn invariant_report(&self) -> TilingReport {
        tiling_report(&self.surface)
    }

    /// Split `old` horizontally, giving `new` the space below it.
    ///
    /// Use [`split`](Self::split) with [`PanePlacement::Before`] to put `new`
    /// above `old` instead.
    pub fn hsplit(&mut self, old: PaneId, new: PaneId) -> Result<(), TilingError> {
        self.split(old, new, Axis::Rows, PanePlacement::After)
    }

    /// Split `old` vertically, giving `new` the space to its right.
    ///
    /// Use [`split`](Self::split) with [`PanePlacement::Before`] to put `new`
    /// left of `old` instead.
    pub fn vsplit(&mut self, old: PaneId, new: PaneId) -> Result<(), TilingError> {
        self.split(old, new, Axis::Columns, PanePlacement::After)
    }

    /// Insert `new` next to `old` along `axis` and re-tile the independent
    /// block around `old`.
    ///
    /// # Errors
    ///
    /// - [`TilingError::Grid`] with `NotFound` when `old` is not placed, or
    ///   `AlreadyPlaced` when `new` is. Nothing changes in either case.
    /// - [`TilingError::CapacityExceeded`] when the block has no row left for
    ///   `new`. The layout is restored.
    /// - [`TilingError::OperationFailed`] for anything else.
    pub fn split(
        &mut self,
        old: PaneId,
        new: PaneId,
        axis: Axis,
        placement: PanePlacement,
    ) -> Result<(), TilingError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "tiling.split",
            old = old.get(),
            new = new.get(),
            ?axis,
            ?placement
        )
        .entered();

        let old_position = self.surface.position_of(old)?;
        if let Ok(position) = self.surface.position_of(new) {
            return Err(GridError::AlreadyPlaced { pane: new, position }.into());
        }

        let snapshot = self.snapshot();
        let result = self.split_unguarded(old, new, axis, placement);
        self.settle(
            result,
            &snapshot,
            TilingOperation::split(axis),
            Some(old_position),
        )
    }

    fn split_unguarded(
        &mut self,
        old: PaneId,
        new: PaneId,
        axis: Axis,
        placement: PanePlacement,
    ) -> Result<(), TilingError> {
        let old_position = self.surface.position_along(axis, old)?;
        let block = independent_block(&self.surface, old, axis)?;
        let mut panes = block.panes(&self.surface)?;
        let index = panes
            .iter()
            .position(|(pane, _)| *pane == old)
            .ok_or(GridError::NotFound { pane: old })?;
        let at = match placement {
            PanePlacement::Before => index,
            PanePlacement::After => index + 1,
        };
        panes.insert(at, (new, old_position));
        rearrange(&mut self.surface, &panes, &block)
    }

    /// Remove `pane` and let its neighbours take over the space.
    ///
    /// Removing the last pane leaves an empty grid.
    ///
    /// # Errors
    ///
    /// [`TilingError::Grid`] with `NotFound` when `pane` is not placed.
    /// Any failure while re-tiling is reported as
    /// [`TilingError::OperationFailed`] after the layout is restored.
    pub fn remove_pane(&mut self, pane: PaneId) -> Result<(), TilingError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("tiling.remove", pane = pane.get()).entered();

        let position = self.surface.position_of(pane)?;
        if self.surface.len() == 1 {
            self.surface.remove(pane);
            return Ok(());
        }

        let snapshot = self.snapshot();
        let result = self.remove_unguarded(pane, position);
        self.settle(result, &snapshot, TilingOperation::Remove, Some(position))
    }

    fn remove_unguarded(&mut self, pane: PaneId, position: Position) -> Result<(), TilingError> {
        // Tall panes are removed across columns.
        let axis = if position.colspan < position.rowspan {
            Axis::Columns
        } else {
            Axis::Rows
        };
        let block = independent_block(&self.surface, pane, axis)?;
        self.surface.remove(pane);
        let panes = block.panes(&self.surface)?;
        rearrange(&mut self.surface, &panes, &block)?;

        // A second pass across the other axis evens out the space the first
        // pass handed to single neighbours.
        let span = self.surface.max_span();
        let whole = CriticalBlock::new(&self.surface, axis.flip(), 0, 0, span, span)?;
        let panes = whole.panes(&self.surface)?;
        rearrange(&mut self.surface, &panes, &whole)
    }

    /// Roll back a failed operation and shape the error returned to callers.
    fn settle(
        &mut self,
        result: Result<(), TilingError>,
        snapshot: &LayoutSnapshot,
        operation: TilingOperation,
        pane_position: Option<Position>,
    ) -> Result<(), TilingError> {
        let Err(source) = result else {
            return Ok(());
        };
        let rolled_back = self.restore(snapshot).is_ok();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "tiling.rollback",
            operation = operation.as_str(),
            rolled_back,
            error = %source
        );

        if rolled_back && source.is_capacity_exceeded() {
            return Err(source);
        }
        Err(TilingError::OperationFailed(Box::new(OperationFailure {
            operation,
            positions: snapshot.positions(),
            pane_position,
            rolled_back,
            source,
        })))
    }
}
