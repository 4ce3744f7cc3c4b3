//! Tiling diagnostics.
//!
//! - [`render_cell_map`] prints the cell map as rows of pane ids.
//! - [`tiling_report`] checks that placements cover the grid exactly once
//!   and agree with the cell map.
//!
//! Both only read the surface and work with any [`GridSurface`].

use std::fmt::Write as _;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tessera_core::{GridSurface, PaneId, Position};

use crate::snapshot::LayoutSnapshot;

/// Cell map as text, one grid row per line, `.` for empty cells.
///
/// Columns are padded to the widest pane id so rows stay aligned.
#[must_use]
pub fn render_cell_map<S: GridSurface + ?Sized>(surface: &S) -> String {
    let rows = surface.row_count();
    let cols = surface.column_count();
    let width = surface
        .placements()
        .iter()
        .map(|(pane, _)| pane.get().to_string().len())
        .max()
        .unwrap_or(1);

    let mut out = String::new();
    for row in 0..rows {
        for col in 0..cols {
            if col > 0 {
                out.push(' ');
            }
            match surface.pane_at(row, col).ok().flatten() {
                Some(pane) => {
                    let _ = write!(out, "{:>width$}", pane.get());
                }
                None => {
                    let _ = write!(out, "{:>width$}", ".");
                }
            }
        }
        out.push('\n');
    }
    out
}

/// Stable code for tiling findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TilingIssueCode {
    /// A cell no pane covers.
    UncoveredCell,
    /// A placement reaches past the last row or column.
    OutOfGrid,
    /// The cell map and a placement record disagree about a cell.
    CellOwnerMismatch,
    /// A pane is recorded more than once.
    DuplicatePane,
    /// A placement with a zero row or column span.
    EmptySpan,
}

/// One tiling finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilingIssue {
    pub code: TilingIssueCode,
    pub pane: Option<PaneId>,
    /// `(row, col)` of the offending cell, when the finding is about one.
    pub cell: Option<(usize, usize)>,
    pub message: String,
}

/// Structured tiling check over a surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilingReport {
    pub snapshot_hash: u64,
    pub issues: Vec<TilingIssue>,
}

impl TilingReport {
    /// True when every cell is covered by exactly the pane recorded there.
    #[must_use]
    pub fn is_tiled(&self) -> bool {
        self.issues.is_empty()
    }

    #[must_use]
    pub fn has(&self, code: TilingIssueCode) -> bool {
        self.issues.iter().any(|issue| issue.code == code)
    }
}

fn push_issue(
    issues: &mut Vec<TilingIssue>,
    code: TilingIssueCode,
    pane: Option<PaneId>,
    cell: Option<(usize, usize)>,
    message: impl Into<String>,
) {
    issues.push(TilingIssue {
        code,
        pane,
        cell,
        message: message.into(),
    });
}

/// Check the tiling invariant on `surface`.
///
/// An empty surface is trivially tiled.
#[must_use]
pub fn tiling_report<S: GridSurface + ?Sized>(surface: &S) -> TilingReport {
    let mut issues = Vec::new();
    let rows = surface.row_count();
    let cols = surface.column_count();
    let placements = surface.placements();

    let mut seen = FxHashSet::default();
    for &(pane, position) in &placements {
        if !seen.insert(pane) {
            push_issue(
                &mut issues,
                TilingIssueCode::DuplicatePane,
                Some(pane),
                None,
                format!("pane {pane} is recorded more than once"),
            );
            continue;
        }
        if position.is_empty() {
            push_issue(
                &mut issues,
                TilingIssueCode::EmptySpan,
                Some(pane),
                None,
                format!("pane {pane} has empty placement {position}"),
            );
            continue;
        }
        if position.end_row() > rows || position.end_col() > cols {
            push_issue(
                &mut issues,
                TilingIssueCode::OutOfGrid,
                Some(pane),
                None,
                format!("pane {pane} at {position} leaves the {rows}x{cols} grid"),
            );
            continue;
        }
        check_owned_cells(surface, pane, position, &mut issues);
    }

    if !placements.is_empty() {
        for row in 0..rows {
            for col in 0..cols {
                let Some(owner) = surface.pane_at(row, col).ok().flatten() else {
                    push_issue(
                        &mut issues,
                        TilingIssueCode::UncoveredCell,
                        None,
                        Some((row, col)),
                        format!("cell ({row}, {col}) is not covered"),
                    );
                    continue;
                };
                let recorded = surface.position_of(owner).ok();
                if !recorded.is_some_and(|p| p.contains(row, col)) {
                    push_issue(
                        &mut issues,
                        TilingIssueCode::CellOwnerMismatch,
                        Some(owner),
                        Some((row, col)),
                        format!("cell ({row}, {col}) names pane {owner} outside its placement"),
                    );
                }
            }
        }
    }

    TilingReport {
        snapshot_hash: LayoutSnapshot::capture(surface).state_hash(),
        issues,
    }
}

fn check_owned_cells<S: GridSurface + ?Sized>(
    surface: &S,
    pane: PaneId,
    position: Position,
    issues: &mut Vec<TilingIssue>,
) {
    for (row, col) in position.cells() {
        let owner = surface.pane_at(row, col).ok().flatten();
        if owner != Some(pane) {
            let found = owner.map_or_else(|| "nothing".to_owned(), |o| format!("pane {o}"));
            push_issue(
                issues,
                TilingIssueCode::CellOwnerMismatch,
                Some(pane),
                Some((row, col)),
                format!("pane {pane} is placed at {position} but cell ({row}, {col}) holds {found}"),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{grid, ids};
    use tessera_core::{CellGrid, GridError};

    /// Surface whose cell map and placement list can be set independently.
    struct Skewed {
        span: usize,
        cells: Vec<Option<PaneId>>,
        placements: Vec<(PaneId, Position)>,
    }

    impl GridSurface for Skewed {
        fn max_span(&self) -> usize {
            self.span
        }

        fn pane_at(&self, row: usize, col: usize) -> Result<Option<PaneId>, GridError> {
            Ok(self.cells.get(row * self.span + col).copied().flatten())
        }

        fn position_of(&self, pane: PaneId) -> Result<Position, GridError> {
            self.placements
                .iter()
                .find(|(p, _)| *p == pane)
                .map(|(_, position)| *position)
                .ok_or(GridError::NotFound { pane })
        }

        fn place(&mut self, pane: PaneId, position: Position) -> Result<(), GridError> {
            self.placements.push((pane, position));
            Ok(())
        }

        fn remove(&mut self, _pane: PaneId) -> Option<Position> {
            None
        }

        fn placements(&self) -> Vec<(PaneId, Position)> {
            self.placements.clone()
        }

        fn clear(&mut self) {
            self.placements.clear();
        }

        fn len(&self) -> usize {
            self.placements.len()
        }
    }

    #[test]
    fn renders_cell_map() {
        let ws = ids(3);
        let grid = grid(
            2,
            &[
                (ws[0], Position::new(0, 0, 2, 1)),
                (ws[2], Position::new(0, 1, 1, 1)),
            ],
        );
        assert_eq!(render_cell_map(&grid), "1 3\n1 .\n");
    }

    #[test]
    fn empty_grid_is_tiled() {
        let report = tiling_report(&CellGrid::new(4));
        assert!(report.is_tiled());
    }

    #[test]
    fn reports_uncovered_cells() {
        let ws = ids(1);
        let grid = grid(2, &[(ws[0], Position::new(0, 0, 2, 1))]);
        let report = tiling_report(&grid);
        assert!(!report.is_tiled());
        let cells: Vec<_> = report
            .issues
            .iter()
            .filter(|issue| issue.code == TilingIssueCode::UncoveredCell)
            .filter_map(|issue| issue.cell)
            .collect();
        assert_eq!(cells, vec![(0, 1), (1, 1)]);
    }

    #[test]
    fn full_cover_is_tiled() {
        let ws = ids(2);
        let grid = grid(
            2,
            &[
                (ws[0], Position::new(0, 0, 2, 1)),
                (ws[1], Position::new(0, 1, 2, 1)),
            ],
        );
        let report = tiling_report(&grid);
        assert!(report.is_tiled(), "{:?}", report.issues);
        assert_eq!(report.snapshot_hash, LayoutSnapshot::capture(&grid).state_hash());
    }

    #[test]
    fn reports_disagreeing_records() {
        let ws = ids(2);
        let surface = Skewed {
            span: 2,
            cells: vec![Some(ws[0]), Some(ws[1]), Some(ws[0]), Some(ws[0])],
            placements: vec![
                (ws[0], Position::new(0, 0, 2, 1)),
                (ws[1], Position::new(0, 1, 2, 1)),
                (ws[1], Position::new(0, 1, 2, 1)),
            ],
        };
        let report = tiling_report(&surface);
        assert!(report.has(TilingIssueCode::DuplicatePane));
        assert!(report.has(TilingIssueCode::CellOwnerMismatch));
        assert!(!report.has(TilingIssueCode::UncoveredCell));
        let mismatch = report
            .issues
            .iter()
            .find(|issue| issue.code == TilingIssueCode::CellOwnerMismatch)
            .expect("mismatch issue");
        assert_eq!(mismatch.pane, Some(ws[1]));
        assert_eq!(mismatch.cell, Some((1, 1)));
    }

    #[test]
    fn reports_bad_extents() {
        let ws = ids(2);
        let surface = Skewed {
            span: 2,
            cells: vec![Some(ws[0]); 4],
            placements: vec![
                (ws[0], Position::new(0, 0, 2, 2)),
                (ws[1], Position::new(1, 1, 0, 1)),
            ],
        };
        let report = tiling_report(&surface);
        assert!(report.has(TilingIssueCode::EmptySpan));

        let surface = Skewed {
            span: 2,
            cells: vec![Some(ws[0]); 4],
            placements: vec![(ws[0], Position::new(0, 0, 2, 3))],
        };
        let report = tiling_report(&surface);
        assert!(report.has(TilingIssueCode::OutOfGrid));
        let json = serde_json::to_string(&report).expect("serialize");
        assert!(json.contains("\"out_of_grid\""));
    }
}
