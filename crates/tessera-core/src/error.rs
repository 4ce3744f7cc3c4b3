//! Grid surface errors.

use std::fmt;

use crate::geometry::Position;
use crate::pane::PaneId;

/// Failure of a grid surface primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    ZeroPaneId,
    PaneIdOverflow {
        current: PaneId,
    },
    OutOfBounds {
        row: usize,
        col: usize,
        max_span: usize,
    },
    NotFound {
        pane: PaneId,
    },
    Overlap {
        pane: PaneId,
        row: usize,
        col: usize,
        occupant: PaneId,
    },
    AlreadyPlaced {
        pane: PaneId,
        position: Position,
    },
    InvalidSpan {
        pane: PaneId,
        position: Position,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroPaneId => write!(f, "pane id 0 is invalid"),
            Self::PaneIdOverflow { current } => {
                write!(f, "pane id overflow after {current}")
            }
            Self::OutOfBounds { row, col, max_span } => write!(
                f,
                "cell ({row}, {col}) lies outside the {max_span}x{max_span} grid"
            ),
            Self::NotFound { pane } => write!(f, "pane {pane} is not placed on the grid"),
            Self::Overlap {
                pane,
                row,
                col,
                occupant,
            } => write!(
                f,
                "pane {pane} overlaps pane {occupant} at cell ({row}, {col})"
            ),
            Self::AlreadyPlaced { pane, position } => {
                write!(f, "pane {pane} is already placed at {position}")
            }
            Self::InvalidSpan { pane, position } => write!(
                f,
                "pane {pane} cannot be placed at {position}: spans must be > 0"
            ),
        }
    }
}

impl std::error::Error for GridError {}
