#![forbid(unsafe_code)]

//! Core: pane handles, cell geometry, and the host grid surface.
//!
//! # Role in Tessera
//! `tessera-core` owns the pieces a host application provides to the tiling
//! engine: stable [`PaneId`] handles, [`Position`] rectangles measured in grid
//! cells, and the [`GridSurface`] trait through which the engine reads and
//! writes placements. [`CellGrid`] is the reference in-memory surface.
//!
//! # How it fits in the system
//! `tessera-layout` is written purely against [`GridSurface`]. Hosts that
//! already keep their own cell map (a terminal multiplexer, a widget grid)
//! implement the trait and hand their surface to the engine; everyone else
//! uses [`CellGrid`].

pub mod error;
pub mod geometry;
pub mod pane;
pub mod surface;

pub use error::GridError;
pub use geometry::{Axis, Position};
pub use pane::PaneId;
pub use surface::{CellGrid, GridSurface};
