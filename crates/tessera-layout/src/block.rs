//! Block hierarchy: rectangles with progressively stronger guarantees.
//!
//! - [`Block`]: any rectangle with area that lies inside the grid.
//! - [`RecBlock`]: no pane crosses its border, so it can be moved or
//!   resized as a unit.
//! - [`CriticalBlock`]: a `RecBlock` without empty cells.
//! - [`EmptyBlock`]: a `Block` without any pane.
//!
//! Blocks are cheap values derived from the current surface state. They hold
//! no reference to the surface, so every query takes it as an argument; a
//! block is only meaningful against the surface state it was built from.

use std::fmt;
use std::ops::{Deref, DerefMut};

use rustc_hash::{FxHashMap, FxHashSet};
use tessera_core::{Axis, GridSurface, PaneId, Position};

use crate::addressing::AxisAddressing;
use crate::error::{BlockError, TilingError};

pub(crate) fn signed(value: usize) -> isize {
    isize::try_from(value).unwrap_or(isize::MAX)
}

/// Rectangle of cells addressed along an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Block {
    axis: Axis,
    i: usize,
    j: usize,
    rowspan: usize,
    colspan: usize,
}

impl Block {
    /// Validate a rectangle against the grid.
    ///
    /// # Errors
    ///
    /// [`BlockError::InvalidRegion`] when a span is zero or the rectangle
    /// leaves the grid.
    pub fn new<S: GridSurface + ?Sized>(
        surface: &S,
        axis: Axis,
        i: usize,
        j: usize,
        rowspan: usize,
        colspan: usize,
    ) -> Result<Self, BlockError> {
        let rows = surface.row_count_along(axis);
        let cols = surface.column_count_along(axis);
        let fits = rowspan > 0
            && colspan > 0
            && i.checked_add(rowspan).is_some_and(|end| end <= rows)
            && j.checked_add(colspan).is_some_and(|end| end <= cols);
        if !fits {
            return Err(BlockError::InvalidRegion {
                i: signed(i),
                j: signed(j),
                rowspan,
                colspan,
            });
        }
        Ok(Self {
            axis,
            i,
            j,
            rowspan,
            colspan,
        })
    }

    #[inline]
    pub const fn axis(&self) -> Axis {
        self.axis
    }

    #[inline]
    pub const fn i(&self) -> usize {
        self.i
    }

    #[inline]
    pub const fn j(&self) -> usize {
        self.j
    }

    #[inline]
    pub const fn rowspan(&self) -> usize {
        self.rowspan
    }

    #[inline]
    pub const fn colspan(&self) -> usize {
        self.colspan
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn end_row(&self) -> usize {
        self.i + self.rowspan
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn end_col(&self) -> usize {
        self.j + self.colspan
    }

    /// The block as an oriented rectangle.
    #[inline]
    pub const fn position(&self) -> Position {
        Position::new(self.i, self.j, self.rowspan, self.colspan)
    }

    /// Panes met by a row-major scan, each reported once with its oriented
    /// position.
    ///
    /// Within a row the scan jumps over the full width of every pane it
    /// meets, so a pane is listed at the first row where the scan lands on it.
    pub fn panes<S: GridSurface + ?Sized>(
        &self,
        surface: &S,
    ) -> Result<Vec<(PaneId, Position)>, BlockError> {
        let mut seen = FxHashSet::default();
        let mut panes = Vec::new();
        for row in self.i..self.end_row() {
            let mut col = self.j;
            while col < self.end_col() {
                match surface.pane_at_along(self.axis, row, col)? {
                    Some(pane) => {
                        let position = surface.position_along(self.axis, pane)?;
                        if seen.insert(pane) {
                            panes.push((pane, position));
                        }
                        col += position.colspan.max(1);
                    }
                    None => col += 1,
                }
            }
        }
        Ok(panes)
    }

    /// Cell matrix of the block.
    pub fn virtualize<S: GridSurface + ?Sized>(
        &self,
        surface: &S,
    ) -> Result<VirtualBlock, BlockError> {
        let mut rows = Vec::with_capacity(self.rowspan);
        for row in self.i..self.end_row() {
            let cells = (self.j..self.end_col())
                .map(|col| surface.pane_at_along(self.axis, row, col))
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(cells);
        }
        Ok(VirtualBlock { rows })
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}",
            self.i, self.j, self.rowspan, self.colspan
        )
    }
}

#[derive(Debug, Clone, Copy)]
enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    const ALL: [Self; 4] = [Self::Left, Self::Right, Self::Top, Self::Bottom];
}

/// Walk one border line and require every pane on it to be flush with it.
fn check_edge<S: GridSurface + ?Sized>(
    surface: &S,
    block: &Block,
    edge: Edge,
) -> Result<(), BlockError> {
    let (start, end) = match edge {
        Edge::Left | Edge::Right => (block.i, block.end_row()),
        Edge::Top | Edge::Bottom => (block.j, block.end_col()),
    };
    let mut index = start;
    while index < end {
        let (row, col) = match edge {
            Edge::Left => (index, block.j),
            Edge::Right => (index, block.end_col() - 1),
            Edge::Top => (block.i, index),
            Edge::Bottom => (block.end_row() - 1, index),
        };
        let Some(pane) = surface.pane_at_along(block.axis, row, col)? else {
            index += 1;
            continue;
        };
        let position = surface.position_along(block.axis, pane)?;
        let flush = match edge {
            Edge::Left => position.col == block.j,
            Edge::Right => position.end_col() == block.end_col(),
            Edge::Top => position.row == block.i,
            Edge::Bottom => position.end_row() == block.end_row(),
        };
        if !flush {
            return Err(BlockError::NonRectangular { pane });
        }
        index += match edge {
            Edge::Left | Edge::Right => position.rowspan,
            Edge::Top | Edge::Bottom => position.colspan,
        }
        .max(1);
    }
    Ok(())
}

/// Block whose border no pane crosses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecBlock(Block);

impl RecBlock {
    pub fn new<S: GridSurface + ?Sized>(
        surface: &S,
        axis: Axis,
        i: usize,
        j: usize,
        rowspan: usize,
        colspan: usize,
    ) -> Result<Self, BlockError> {
        Self::from_block(surface, Block::new(surface, axis, i, j, rowspan, colspan)?)
    }

    /// Check the four border lines of an existing block.
    ///
    /// # Errors
    ///
    /// [`BlockError::NonRectangular`] naming the first pane found straddling
    /// a border.
    pub fn from_block<S: GridSurface + ?Sized>(surface: &S, block: Block) -> Result<Self, BlockError> {
        for edge in Edge::ALL {
            check_edge(surface, &block, edge)?;
        }
        Ok(Self(block))
    }

    #[inline]
    pub const fn block(&self) -> &Block {
        &self.0
    }

    /// Move the block `displacement` rows and stretch it by `growth` rows.
    ///
    /// Resizing is proportional: see [`VirtualBlock::resized`]. Every pane
    /// inside the block is removed and placed again at its new rectangle.
    /// Afterwards the block describes the rows it now covers.
    ///
    /// # Errors
    ///
    /// [`TilingError::CapacityExceeded`] when shrinking would collapse a pane
    /// below one row, or a grid error when a new rectangle collides with a
    /// pane outside the block.
    pub fn displace_and_resize<S: GridSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        displacement: isize,
        growth: isize,
    ) -> Result<(), TilingError> {
        let axis = self.0.axis;
        let mut virtual_block = self.0.virtualize(&*surface)?;
        if growth != 0 {
            virtual_block = virtual_block.resized(growth, axis)?;
        }
        let top = signed(self.0.i) + displacement;
        let placements = virtual_block.materialize(top, self.0.j)?;
        for (pane, _) in &placements {
            surface.remove(*pane);
        }
        for &(pane, position) in &placements {
            surface.place_along(axis, pane, position)?;
        }
        self.0.i = usize::try_from(top).unwrap_or(0);
        self.0.rowspan = self.0.rowspan.saturating_add_signed(growth);
        Ok(())
    }
}

impl Deref for RecBlock {
    type Target = Block;

    fn deref(&self) -> &Block {
        &self.0
    }
}

/// Gap-free `RecBlock`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CriticalBlock(RecBlock);

impl CriticalBlock {
    pub fn new<S: GridSurface + ?Sized>(
        surface: &S,
        axis: Axis,
        i: usize,
        j: usize,
        rowspan: usize,
        colspan: usize,
    ) -> Result<Self, BlockError> {
        let rec = RecBlock::new(surface, axis, i, j, rowspan, colspan)?;
        Self::from_rec(surface, rec)
    }

    /// Require every cell of `rec` to be covered.
    ///
    /// # Errors
    ///
    /// [`BlockError::HasGap`] with the first empty cell found.
    pub fn from_rec<S: GridSurface + ?Sized>(surface: &S, rec: RecBlock) -> Result<Self, BlockError> {
        let block = rec.block();
        for row in block.i..block.end_row() {
            let mut col = block.j;
            while col < block.end_col() {
                let Some(pane) = surface.pane_at_along(block.axis, row, col)? else {
                    return Err(BlockError::HasGap { row, col });
                };
                col += surface.position_along(block.axis, pane)?.colspan.max(1);
            }
        }
        Ok(Self(rec))
    }

    #[inline]
    pub const fn into_rec(self) -> RecBlock {
        self.0
    }
}

impl Deref for CriticalBlock {
    type Target = RecBlock;

    fn deref(&self) -> &RecBlock {
        &self.0
    }
}

impl DerefMut for CriticalBlock {
    fn deref_mut(&mut self) -> &mut RecBlock {
        &mut self.0
    }
}

/// Block without any pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EmptyBlock(Block);

impl EmptyBlock {
    /// # Errors
    ///
    /// [`BlockError::NotEmpty`] with the first occupied cell in row-major
    /// order.
    pub fn new<S: GridSurface + ?Sized>(
        surface: &S,
        axis: Axis,
        i: usize,
        j: usize,
        rowspan: usize,
        colspan: usize,
    ) -> Result<Self, BlockError> {
        let block = Block::new(surface, axis, i, j, rowspan, colspan)?;
        for row in block.i..block.end_row() {
            for col in block.j..block.end_col() {
                if surface.pane_at_along(axis, row, col)?.is_some() {
                    return Err(BlockError::NotEmpty { row, col });
                }
            }
        }
        Ok(Self(block))
    }

    /// First empty block inside `domain`, anchored at its first empty cell in
    /// row-major order.
    pub fn find_in<S: GridSurface + ?Sized>(
        surface: &S,
        domain: &Block,
    ) -> Result<Option<Self>, BlockError> {
        for row in domain.i..domain.end_row() {
            for col in domain.j..domain.end_col() {
                if surface.pane_at_along(domain.axis, row, col)?.is_none() {
                    return Self::build_from_point(surface, domain, row, col).map(Some);
                }
            }
        }
        Ok(None)
    }

    /// Grow an empty block down and right from an empty cell, staying inside
    /// `domain`.
    ///
    /// Height and width are measured independently along the first column
    /// and first row. When the space is not rectangular the block is cut just
    /// above the first row that holds a pane.
    pub fn build_from_point<S: GridSurface + ?Sized>(
        surface: &S,
        domain: &Block,
        i: usize,
        j: usize,
    ) -> Result<Self, BlockError> {
        let axis = domain.axis;
        let mut rowspan = 0;
        while i + rowspan < domain.end_row() && surface.pane_at_along(axis, i + rowspan, j)?.is_none() {
            rowspan += 1;
        }
        let mut colspan = 0;
        while j + colspan < domain.end_col() && surface.pane_at_along(axis, i, j + colspan)?.is_none() {
            colspan += 1;
        }

        match Self::new(surface, axis, i, j, rowspan, colspan) {
            Err(BlockError::NotEmpty { row, .. }) if row > i => {
                Self::new(surface, axis, i, j, row - i, colspan)
            }
            other => other,
        }
    }
}

impl Deref for EmptyBlock {
    type Target = Block;

    fn deref(&self) -> &Block {
        &self.0
    }
}

type Row = Vec<Option<PaneId>>;

/// Row-major cell matrix of a block.
///
/// Each cell holds the pane covering it or `None` when empty. Used to resize
/// a block without reasoning about individual rectangles.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VirtualBlock {
    rows: Vec<Row>,
}

impl VirtualBlock {
    #[must_use]
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Stretch (`growth > 0`) or squash (`growth < 0`) the matrix by
    /// duplicating or dropping whole rows.
    ///
    /// Consecutive identical rows form runs. One row at a time, the shortest
    /// run grows or the tallest run shrinks; ties go to the earliest run when
    /// growing and the latest when shrinking.
    ///
    /// # Errors
    ///
    /// [`TilingError::CapacityExceeded`] when the tallest remaining run is a
    /// single row and rows still need to be dropped.
    pub fn resized(&self, growth: isize, axis: Axis) -> Result<Self, TilingError> {
        if growth == 0 || self.rows.is_empty() {
            return Ok(self.clone());
        }

        // (height, start row)
        let mut runs: Vec<(usize, usize)> = Vec::new();
        let mut start = 0;
        for index in 1..=self.rows.len() {
            if index == self.rows.len() || self.rows[index] != self.rows[index - 1] {
                runs.push((index - start, start));
                start = index;
            }
        }

        let shrinking = growth < 0;
        let mut marks: FxHashMap<&[Option<PaneId>], usize> = FxHashMap::default();
        for _ in 0..growth.unsigned_abs() {
            let picked = if shrinking {
                runs.iter_mut().max()
            } else {
                runs.iter_mut().min()
            };
            let Some(run) = picked else {
                break;
            };
            if shrinking && run.0 == 1 {
                return Err(TilingError::CapacityExceeded { axis });
            }
            *marks.entry(self.rows[run.1].as_slice()).or_insert(0) += 1;
            if shrinking {
                run.0 -= 1;
            } else {
                run.0 += 1;
            }
        }

        let mut rows = Vec::with_capacity(self.rows.len().saturating_add_signed(growth));
        for row in &self.rows {
            let key = row.as_slice();
            let Some(&count) = marks.get(&key) else {
                rows.push(row.clone());
                continue;
            };
            if shrinking {
                if count == 1 {
                    marks.remove(&key);
                } else {
                    marks.insert(key, count - 1);
                }
            } else {
                rows.extend(std::iter::repeat_n(row.clone(), count + 1));
                marks.remove(&key);
            }
        }
        Ok(Self { rows })
    }

    /// Coalesce cells into one rectangle per pane, with the matrix's top-left
    /// cell at `(top, left)`.
    ///
    /// Panes are listed in order of first appearance. `top` may be negative
    /// as long as every pane lands on a non-negative row.
    ///
    /// # Errors
    ///
    /// [`BlockError::InvalidRegion`] when a pane would start above row 0,
    /// [`BlockError::NonRectangular`] when a pane's cells do not form a
    /// rectangle that grows right and down.
    pub fn materialize(
        &self,
        top: isize,
        left: usize,
    ) -> Result<Vec<(PaneId, Position)>, BlockError> {
        let mut placements: Vec<(PaneId, Position)> = Vec::new();
        let mut slots: FxHashMap<PaneId, usize> = FxHashMap::default();
        for (r, cells) in self.rows.iter().enumerate() {
            let signed_row = top + signed(r);
            for (c, cell) in cells.iter().enumerate() {
                let Some(pane) = *cell else {
                    continue;
                };
                let col = left + c;
                let Ok(row) = usize::try_from(signed_row) else {
                    return Err(BlockError::InvalidRegion {
                        i: signed_row,
                        j: signed(col),
                        rowspan: 1,
                        colspan: 1,
                    });
                };
                match slots.get(&pane) {
                    Some(&slot) => {
                        let position = &mut placements[slot].1;
                        let (Some(rows_down), Some(cols_right)) =
                            (row.checked_sub(position.row), col.checked_sub(position.col))
                        else {
                            return Err(BlockError::NonRectangular { pane });
                        };
                        position.rowspan = rows_down + 1;
                        position.colspan = cols_right + 1;
                    }
                    None => {
                        slots.insert(pane, placements.len());
                        placements.push((pane, Position::new(row, col, 1, 1)));
                    }
                }
            }
        }
        Ok(placements)
    }
}
