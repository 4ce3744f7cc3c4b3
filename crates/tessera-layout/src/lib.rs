#![forbid(unsafe_code)]

//! Tiling engine: split and remove panes on a square grid with no gaps.
//!
//! # Role in Tessera
//! `tessera-layout` keeps a [`GridSurface`](tessera_core::GridSurface)
//! fully tiled while panes come and go. Splitting a pane gives part of its
//! space to a new pane; removing a pane hands its space back to its
//! neighbours. Only the smallest independent column block around the target
//! is rearranged, so panes elsewhere never move.
//!
//! # How it works
//! Every operation runs in oriented coordinates ([`Axis`](tessera_core::Axis)):
//! the panes of the independent block are stacked into single rows, panes
//! left hanging over empty space are dropped down, the stack is stretched
//! back to full height and remaining holes are filled either by growing the
//! block above them or by widening a neighbour.
//!
//! # Failure handling
//! [`TilingLayout`] snapshots the grid before each operation and restores it
//! on any error. Running out of rows surfaces as
//! [`TilingError::CapacityExceeded`]; everything else is wrapped in
//! [`TilingError::OperationFailed`] with the pre-operation positions.

pub mod addressing;
pub mod block;
pub mod config;
pub mod debug;
pub mod engine;
pub mod error;
pub mod relations;
pub mod search;
pub mod snapshot;
pub mod tiling;

pub use addressing::AxisAddressing;
pub use block::{Block, CriticalBlock, EmptyBlock, RecBlock, VirtualBlock};
pub use config::{ConfigError, DEFAULT_MAX_SPAN, TilingConfig};
pub use debug::{TilingIssue, TilingIssueCode, TilingReport, render_cell_map, tiling_report};
pub use error::{BlockError, OperationFailure, TilingError, TilingOperation};
pub use relations::{Side, SupportDirection, independent_block, neighbour, supporters};
pub use search::{SearchDirection, build_from_point};
pub use snapshot::{LayoutSnapshot, SnapshotEntry};
pub use tiling::{PanePlacement, TilingLayout};
