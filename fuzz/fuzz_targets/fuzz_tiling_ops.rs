#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tessera_core::{Axis, PaneId};
use tessera_layout::{PanePlacement, TilingLayout};

#[derive(Debug, Arbitrary)]
enum Op {
    Split {
        target: u8,
        columns: bool,
        before: bool,
    },
    Remove {
        target: u8,
    },
}

#[derive(Debug, Arbitrary)]
struct Input {
    span: u8,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let span = usize::from(input.span % 15) + 2; // 2..=16
    let Ok(mut layout) = TilingLayout::with_initial_pane(span, PaneId::MIN) else {
        return;
    };
    let mut next = PaneId::MIN;

    for op in input.ops.into_iter().take(256) {
        let panes = layout.panes();
        if panes.is_empty() {
            break;
        }
        let before = layout.snapshot();
        let result = match op {
            Op::Split {
                target,
                columns,
                before: put_before,
            } => {
                let Ok(new) = next.checked_next() else {
                    break;
                };
                next = new;
                let target = panes[usize::from(target) % panes.len()];
                let axis = if columns { Axis::Columns } else { Axis::Rows };
                let placement = if put_before {
                    PanePlacement::Before
                } else {
                    PanePlacement::After
                };
                layout.split(target, new, axis, placement)
            }
            Op::Remove { target } => {
                if panes.len() == 1 {
                    continue;
                }
                layout.remove_pane(panes[usize::from(target) % panes.len()])
            }
        };

        if let Err(err) = result {
            // Failed operations must leave the grid untouched.
            assert_eq!(layout.snapshot(), before, "not rolled back after {err}");
        }
        let report = layout.invariant_report();
        assert!(report.is_tiled(), "grid not tiled: {:?}", report.issues);
    }
});
