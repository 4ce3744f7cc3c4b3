#![forbid(unsafe_code)]

//! Tessera public facade crate.
//!
//! Re-exports the stable surface of the internal crates and offers a small
//! prelude for hosts that only split, remove and query panes.

// --- Core re-exports -------------------------------------------------------

pub use tessera_core::{Axis, CellGrid, GridError, GridSurface, PaneId, Position};

// --- Layout re-exports -----------------------------------------------------

pub use tessera_layout::{
    LayoutSnapshot, OperationFailure, PanePlacement, Side, TilingConfig, TilingError,
    TilingLayout, TilingOperation, TilingReport,
};

/// Standard result type for tiling operations.
pub type Result<T> = std::result::Result<T, TilingError>;

pub mod prelude {
    pub use crate::{
        Axis, CellGrid, GridSurface, PaneId, PanePlacement, Position, Result, Side, TilingConfig,
        TilingError, TilingLayout,
    };

    pub use crate::{core, layout};
}

pub use tessera_core as core;
pub use tessera_layout as layout;
