//! Property/fuzz-style invariants for random split/remove streams.
//!
//! Every operation either succeeds and leaves the grid fully tiled, or fails
//! and leaves the grid exactly as it was. Replaying the same stream yields
//! the same layout. Neighbour lookups agree from both sides, and removing a
//! freshly split pane gives back the previous pane set.

use proptest::prelude::*;
use tessera_core::{Axis, GridSurface, PaneId};
use tessera_layout::{PanePlacement, Side, TilingError, TilingLayout, render_cell_map};

#[derive(Debug, Clone)]
struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Self {
            state: seed ^ 0x9E37_79B9_7F4A_7C15,
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        self.state
    }

    fn choose_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        (self.next_u64() % len as u64) as usize
    }

    fn choose_bool(&mut self) -> bool {
        (self.next_u64() & 1) == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Split {
        target: PaneId,
        new: PaneId,
        axis: Axis,
        placement: PanePlacement,
    },
    Remove {
        target: PaneId,
    },
}

fn random_operation(layout: &TilingLayout, rng: &mut Lcg, next_id: &mut PaneId) -> Operation {
    let panes = layout.panes();
    let target = panes[rng.choose_index(panes.len())];
    // Keep at least one pane so every stream can keep splitting.
    if panes.len() > 1 && rng.choose_index(3) == 0 {
        return Operation::Remove { target };
    }
    let new = *next_id;
    *next_id = next_id.checked_next().expect("pane ids stay small");
    Operation::Split {
        target,
        new,
        axis: if rng.choose_bool() {
            Axis::Rows
        } else {
            Axis::Columns
        },
        placement: if rng.choose_bool() {
            PanePlacement::After
        } else {
            PanePlacement::Before
        },
    }
}

fn apply(layout: &mut TilingLayout, operation: Operation) -> Result<(), TilingError> {
    match operation {
        Operation::Split {
            target,
            new,
            axis,
            placement,
        } => layout.split(target, new, axis, placement),
        Operation::Remove { target } => layout.remove_pane(target),
    }
}

fn assert_tiled(layout: &TilingLayout, context: &str) {
    let report = layout.invariant_report();
    assert!(
        report.is_tiled(),
        "{context}: {:?}\n{}",
        report.issues,
        render_cell_map(layout.surface())
    );
}

/// Longest contiguous run of `other` along `pane`'s `side`.
fn contact(layout: &TilingLayout, pane: PaneId, side: Side, other: PaneId) -> usize {
    let position = layout.position_of(pane).expect("placed pane");
    let span = layout.max_span();
    let edge: Vec<(usize, usize)> = match side {
        Side::Left if position.col > 0 => (position.row..position.end_row())
            .map(|row| (row, position.col - 1))
            .collect(),
        Side::Right if position.end_col() < span => (position.row..position.end_row())
            .map(|row| (row, position.end_col()))
            .collect(),
        Side::Top if position.row > 0 => (position.col..position.end_col())
            .map(|col| (position.row - 1, col))
            .collect(),
        Side::Bottom if position.end_row() < span => (position.col..position.end_col())
            .map(|col| (position.end_row(), col))
            .collect(),
        _ => Vec::new(),
    };

    let mut best = 0;
    let mut run = 0;
    for (row, col) in edge {
        if layout.surface().pane_at(row, col).expect("edge cell in grid") == Some(other) {
            run += 1;
            best = best.max(run);
        } else {
            run = 0;
        }
    }
    best
}

/// If `q` is `p`'s neighbour on `side`, looking back from `q` finds `p` or a
/// pane touching `q` at least as much as `p` does.
fn assert_neighbours_symmetric(layout: &TilingLayout, context: &str) {
    for pane in layout.panes() {
        for side in Side::ALL {
            let Some(other) = layout.neighbour(pane, side).expect("placed pane") else {
                continue;
            };
            let back_side = side.opposite();
            let back = layout
                .neighbour(other, back_side)
                .expect("placed pane")
                .unwrap_or_else(|| panic!("{context}: {other} has no {back_side:?} neighbour"));
            if back != pane {
                assert!(
                    contact(layout, other, back_side, back)
                        >= contact(layout, other, back_side, pane),
                    "{context}: {pane} sees {other} on {side:?}, but {other} prefers {back}\n{}",
                    render_cell_map(layout.surface())
                );
            }
        }
    }
}

fn sorted_panes(layout: &TilingLayout) -> Vec<PaneId> {
    let mut panes = layout.panes();
    panes.sort_unstable();
    panes
}

fn run_sequence(seed: u64, max_span: usize, steps: usize) -> (TilingLayout, Vec<Operation>) {
    let root = PaneId::MIN;
    let mut layout = TilingLayout::with_initial_pane(max_span, root).expect("initial pane");
    let mut next_id = root.checked_next().expect("second id");
    let mut rng = Lcg::new(seed);
    let mut applied = Vec::with_capacity(steps);

    for step in 0..steps {
        let operation = random_operation(&layout, &mut rng, &mut next_id);
        let before = layout.snapshot();
        match apply(&mut layout, operation) {
            Ok(()) => {
                let expected = match operation {
                    Operation::Split { .. } => before.len() + 1,
                    Operation::Remove { .. } => before.len() - 1,
                };
                assert_eq!(layout.len(), expected, "step {step}, seed={seed}, op={operation:?}");
            }
            Err(err) => {
                if let Some(failure) = err.failure() {
                    assert!(failure.rolled_back, "step {step}, seed={seed}: {err}");
                } else {
                    assert!(
                        err.is_capacity_exceeded(),
                        "step {step}, seed={seed}, op={operation:?}, err={err:?}"
                    );
                }
                assert_eq!(layout.snapshot(), before, "step {step}, seed={seed}: not rolled back");
            }
        }
        let context = format!("step {step}, seed={seed}, op={operation:?}");
        assert_tiled(&layout, &context);
        assert_neighbours_symmetric(&layout, &context);
        applied.push(operation);
    }

    (layout, applied)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn random_streams_keep_grid_tiled(
        seed in any::<u64>(),
        max_span in 2usize..10,
        steps in 10usize..80,
    ) {
        let (layout, _) = run_sequence(seed, max_span, steps);
        assert_tiled(&layout, "final layout");
    }

    #[test]
    fn random_streams_replay_deterministically(
        seed in any::<u64>(),
        max_span in 2usize..10,
        steps in 10usize..60,
    ) {
        let (final_layout, operations) = run_sequence(seed, max_span, steps);

        let mut replay = TilingLayout::with_initial_pane(max_span, PaneId::MIN)
            .expect("initial pane");
        for operation in operations {
            let _ = apply(&mut replay, operation);
        }

        assert_eq!(
            replay.snapshot().state_hash(),
            final_layout.snapshot().state_hash(),
            "same operation stream should produce identical state hash"
        );
        assert_eq!(replay.snapshot(), final_layout.snapshot());
    }
}

/// Split-only stream; after every successful split, removing the new pane
/// from a copy must give back the previous pane set on a tiled grid.
fn run_split_inverse(seed: u64, max_span: usize, splits: usize) {
    let root = PaneId::MIN;
    let mut layout = TilingLayout::with_initial_pane(max_span, root).expect("initial pane");
    let mut next_id = root.checked_next().expect("second id");
    let mut rng = Lcg::new(seed);

    for step in 0..splits {
        let panes = layout.panes();
        let target = panes[rng.choose_index(panes.len())];
        let new = next_id;
        next_id = next_id.checked_next().expect("pane ids stay small");
        let axis = if rng.choose_bool() {
            Axis::Rows
        } else {
            Axis::Columns
        };
        let placement = if rng.choose_bool() {
            PanePlacement::After
        } else {
            PanePlacement::Before
        };

        let before = sorted_panes(&layout);
        if layout.split(target, new, axis, placement).is_err() {
            continue;
        }

        let context = format!("step {step}, seed={seed}, split {target} -> {new} {axis:?}");
        let mut undone = layout.clone();
        undone
            .remove_pane(new)
            .unwrap_or_else(|err| panic!("{context}: remove failed: {err}"));
        assert_eq!(sorted_panes(&undone), before, "{context}");
        assert_tiled(&undone, &context);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn removing_a_split_pane_restores_pane_set(
        seed in any::<u64>(),
        max_span in 2usize..10,
        splits in 1usize..30,
    ) {
        run_split_inverse(seed, max_span, splits);
    }
}

#[test]
fn seed_corpus_keeps_grid_tiled() {
    let seeds = [0_u64, 1, 2, 3, 5, 8, 13, 21, 34, 55, 89, 144, u64::MAX];
    for seed in seeds {
        let (layout, _) = run_sequence(seed, 9, 150);
        assert!(!layout.is_empty());
    }
}
