//! Benchmarks for split, remove and the tiling check.
//!
//! Run with: cargo bench -p tessera-layout

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tessera_core::PaneId;
use tessera_layout::{TilingLayout, tiling_report};

/// Alternate hsplit/vsplit on the newest pane until `count` panes exist or
/// the grid runs out of room.
fn make_layout(max_span: usize, count: usize) -> (TilingLayout, Vec<PaneId>) {
    let mut panes = vec![PaneId::MIN];
    let mut layout =
        TilingLayout::with_initial_pane(max_span, PaneId::MIN).expect("initial pane");
    let mut next = PaneId::MIN;
    for step in 0..count.saturating_sub(1) {
        next = next.checked_next().expect("pane id");
        let target = panes[(step / 2).min(panes.len() - 1)];
        let result = if step % 2 == 0 {
            layout.hsplit(target, next)
        } else {
            layout.vsplit(target, next)
        };
        if result.is_ok() {
            panes.push(next);
        }
    }
    (layout, panes)
}

fn bench_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("tiling/split");

    for (max_span, count) in [(12, 4), (12, 16), (24, 32)] {
        let (layout, panes) = make_layout(max_span, count);
        let target = panes[panes.len() / 2];
        let new = PaneId::new(u64::MAX).expect("pane id");
        group.bench_with_input(
            BenchmarkId::new(format!("hsplit/{max_span}"), panes.len()),
            &layout,
            |b, layout| {
                b.iter_batched(
                    || layout.clone(),
                    |mut layout| black_box(layout.hsplit(target, new)),
                    BatchSize::SmallInput,
                )
            },
        );
    }

    group.finish();
}

fn bench_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("tiling/remove");

    for (max_span, count) in [(12, 4), (12, 16), (24, 32)] {
        let (layout, panes) = make_layout(max_span, count);
        let target = panes[panes.len() / 2];
        group.bench_with_input(
            BenchmarkId::new(format!("remove/{max_span}"), panes.len()),
            &layout,
            |b, layout| {
                b.iter_batched(
                    || layout.clone(),
                    |mut layout| black_box(layout.remove_pane(target)),
                    BatchSize::SmallInput,
                )
            },
        );
    }

    group.finish();
}

fn bench_report(c: &mut Criterion) {
    let mut group = c.benchmark_group("tiling/report");

    for max_span in [12, 48] {
        let (layout, _) = make_layout(max_span, 24);
        group.bench_with_input(BenchmarkId::new("tiling_report", max_span), &layout, |b, layout| {
            b.iter(|| black_box(tiling_report(layout.surface())))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_split, bench_remove, bench_report);
criterion_main!(benches);
