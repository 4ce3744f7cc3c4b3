//! Cell rectangles and axis orientation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A rectangle of grid cells.
///
/// Addressed by its top-left cell and its spans, the same tuple a grid layout
/// reports for a placed item: `(row, col, rowspan, colspan)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    /// Top row (inclusive).
    pub row: usize,
    /// Left column (inclusive).
    pub col: usize,
    /// Height in cells.
    pub rowspan: usize,
    /// Width in cells.
    pub colspan: usize,
}

impl Position {
    /// Create a new position.
    #[inline]
    pub const fn new(row: usize, col: usize, rowspan: usize, colspan: usize) -> Self {
        Self {
            row,
            col,
            rowspan,
            colspan,
        }
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn end_row(&self) -> usize {
        self.row.saturating_add(self.rowspan)
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn end_col(&self) -> usize {
        self.col.saturating_add(self.colspan)
    }

    /// Number of cells covered.
    #[inline]
    pub const fn area(&self) -> usize {
        self.rowspan.saturating_mul(self.colspan)
    }

    /// Check if the rectangle covers no cell.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.rowspan == 0 || self.colspan == 0
    }

    /// Check if a cell lies inside the rectangle.
    #[inline]
    pub const fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.row && row < self.end_row() && col >= self.col && col < self.end_col()
    }

    /// The same rectangle with rows and columns swapped.
    #[inline]
    #[must_use]
    pub const fn transposed(self) -> Self {
        Self::new(self.col, self.row, self.colspan, self.rowspan)
    }

    /// Iterate over covered cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (self.row..self.end_row()).flat_map(move |row| (self.col..self.end_col()).map(move |col| (row, col)))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.row, self.col, self.rowspan, self.colspan
        )
    }
}

/// Orientation in which a grid is addressed.
///
/// Algorithms are written once for [`Axis::Rows`], where panes stack top to
/// bottom. Running them along [`Axis::Columns`] swaps row and column on every
/// coordinate going in and every position coming out, which turns "stack
/// vertically" into "stack horizontally".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Native orientation.
    #[default]
    Rows,
    /// Transposed orientation.
    Columns,
}

impl Axis {
    /// Whether coordinates are swapped for this axis.
    #[inline]
    pub const fn is_transposed(self) -> bool {
        matches!(self, Self::Columns)
    }

    /// The other axis.
    #[inline]
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::Rows => Self::Columns,
            Self::Columns => Self::Rows,
        }
    }

    /// Map a cell between oriented and native coordinates.
    ///
    /// Swapping is its own inverse, so the same call works in both directions.
    #[inline]
    pub const fn point(self, row: usize, col: usize) -> (usize, usize) {
        match self {
            Self::Rows => (row, col),
            Self::Columns => (col, row),
        }
    }

    /// Map a rectangle between oriented and native coordinates.
    #[inline]
    pub const fn orient(self, position: Position) -> Position {
        match self {
            Self::Rows => position,
            Self::Columns => position.transposed(),
        }
    }
}
