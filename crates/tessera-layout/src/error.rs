//! Error types for blocks and tiling operations.

use std::fmt;

use tessera_core::{Axis, GridError, PaneId, Position};

use crate::config::ConfigError;

/// A candidate block failed its structural guarantee.
///
/// `NonRectangular`, `HasGap` and `NotEmpty` are expected outcomes while
/// searching; callers use them to move on to the next candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockError {
    /// Rectangle has no area or does not fit inside the grid.
    InvalidRegion {
        i: isize,
        j: isize,
        rowspan: usize,
        colspan: usize,
    },
    /// A pane on the border crosses the block boundary.
    NonRectangular { pane: PaneId },
    /// A cell inside a critical block is empty.
    HasGap { row: usize, col: usize },
    /// A cell inside an empty block is occupied.
    NotEmpty { row: usize, col: usize },
    Grid(GridError),
}

impl BlockError {
    /// Whether a critical-block search should try its next candidate.
    #[must_use]
    pub const fn is_candidate_rejection(&self) -> bool {
        matches!(self, Self::NonRectangular { .. } | Self::HasGap { .. })
    }
}

impl fmt::Display for BlockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRegion {
                i,
                j,
                rowspan,
                colspan,
            } => write!(
                f,
                "block ({i}, {j}, {rowspan}, {colspan}) has no area or leaves the grid"
            ),
            Self::NonRectangular { pane } => {
                write!(f, "pane {pane} crosses the block boundary")
            }
            Self::HasGap { row, col } => write!(f, "critical block has a gap at ({row}, {col})"),
            Self::NotEmpty { row, col } => {
                write!(f, "empty block is occupied at ({row}, {col})")
            }
            Self::Grid(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for BlockError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Grid(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GridError> for BlockError {
    fn from(err: GridError) -> Self {
        Self::Grid(err)
    }
}

/// Public operation that was running when a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TilingOperation {
    Hsplit,
    Vsplit,
    Remove,
}

impl TilingOperation {
    /// Split operation for an axis.
    #[must_use]
    pub const fn split(axis: Axis) -> Self {
        match axis {
            Axis::Rows => Self::Hsplit,
            Axis::Columns => Self::Vsplit,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hsplit => "hsplit",
            Self::Vsplit => "vsplit",
            Self::Remove => "remove",
        }
    }
}

impl fmt::Display for TilingOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagnostic record for an unexpected failure inside split or remove.
///
/// Unless `rolled_back` is false, the layout has already been restored to
/// `positions` when this is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationFailure {
    pub operation: TilingOperation,
    /// Every pane position before the operation, in placement order.
    pub positions: Vec<Position>,
    /// Position of the pane the operation targeted, if it was placed.
    pub pane_position: Option<Position>,
    /// False when restoring the pre-operation layout failed as well.
    pub rolled_back: bool,
    pub source: TilingError,
}

impl fmt::Display for OperationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failure while performing a \"{}\" operation of the pane positioned at ",
            self.operation
        )?;
        match self.pane_position {
            Some(position) => write!(f, "{position}")?,
            None => f.write_str("<unplaced>")?,
        }
        f.write_str(".\nPositions:")?;
        for position in &self.positions {
            write!(f, "\n{position}")?;
        }
        if !self.rolled_back {
            f.write_str("\nThe layout could not be restored.")?;
        }
        Ok(())
    }
}

/// Failure of a tiling operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TilingError {
    /// Grid side rejected by [`TilingConfig::validate`](crate::TilingConfig::validate).
    Config(ConfigError),
    Grid(GridError),
    Block(BlockError),
    /// A cell expected to be covered is empty (oriented coordinates).
    EmptyCell { row: usize, col: usize },
    /// No critical block of the requested width could be built from a point.
    NoCriticalBlock { row: usize, col: usize, colspan: usize },
    /// Neither a critical block nor a lateral neighbour can absorb a hole.
    NoSuitableFill { hole: Position },
    /// The grid is too dense along `axis` for the requested change.
    CapacityExceeded { axis: Axis },
    /// A snapshot taken on a grid of another size.
    SpanMismatch { expected: usize, found: usize },
    OperationFailed(Box<OperationFailure>),
}

impl TilingError {
    /// Whether the grid simply has no room left for the change.
    #[must_use]
    pub const fn is_capacity_exceeded(&self) -> bool {
        matches!(self, Self::CapacityExceeded { .. })
    }

    /// Diagnostic record when this is an [`TilingError::OperationFailed`].
    #[must_use]
    pub fn failure(&self) -> Option<&OperationFailure> {
        match self {
            Self::OperationFailed(failure) => Some(failure),
            _ => None,
        }
    }
}

impl fmt::Display for TilingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Grid(err) => write!(f, "{err}"),
            Self::Block(err) => write!(f, "{err}"),
            Self::EmptyCell { row, col } => write!(f, "cell ({row}, {col}) is empty"),
            Self::NoCriticalBlock { row, col, colspan } => write!(
                f,
                "no critical block of width {colspan} can be built from ({row}, {col})"
            ),
            Self::NoSuitableFill { hole } => {
                write!(f, "no block or neighbour can fill the hole at {hole}")
            }
            Self::CapacityExceeded { axis } => {
                let along = match axis {
                    Axis::Rows => "rows",
                    Axis::Columns => "columns",
                };
                write!(f, "no room left to split along {along}")
            }
            Self::SpanMismatch { expected, found } => write!(
                f,
                "snapshot of a {found}x{found} grid cannot restore a {expected}x{expected} grid"
            ),
            Self::OperationFailed(failure) => write!(f, "{failure}"),
        }
    }
}

impl std::error::Error for TilingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Grid(err) => Some(err),
            Self::Block(err) => Some(err),
            Self::OperationFailed(failure) => Some(&failure.source),
            _ => None,
        }
    }
}

impl From<ConfigError> for TilingError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<GridError> for TilingError {
    fn from(err: GridError) -> Self {
        Self::Grid(err)
    }
}

impl From<BlockError> for TilingError {
    fn from(err: BlockError) -> Self {
        match err {
            BlockError::Grid(err) => Self::Grid(err),
            other => Self::Block(other),
        }
    }
}
