use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tc_core::{ActivationMap, CellGrid, TilePos};
use tc_trace::{ChainTracer, filter_chains};

fn synthetic_activation(height: usize, width: usize) -> ActivationMap {
    let mut map = ActivationMap::new(height, width);

    for row in (8..height.saturating_sub(8)).step_by(24) {
        for col in 16..width.saturating_sub(16) {
            let _ = map.set(TilePos::new(row, col), true);
        }
    }

    for col in (32..width.saturating_sub(32)).step_by(40) {
        for row in 8..height.saturating_sub(8) {
            if row % 6 != 0 {
                let _ = map.set(TilePos::new(row, col), true);
            }
        }
    }

    // hollow rectangles
    for top in (20..height.saturating_sub(20)).step_by(48) {
        for left in (20..width.saturating_sub(20)).step_by(64) {
            for k in 0..12 {
                for pos in [
                    TilePos::new(top, left + k),
                    TilePos::new(top + 11, left + k),
                    TilePos::new(top + k, left),
                    TilePos::new(top + k, left + 11),
                ] {
                    let _ = map.set(pos, true);
                }
            }
        }
    }

    map
}

fn bench_trace_grid(c: &mut Criterion) {
    let map = synthetic_activation(240, 320);
    let mut tracer = ChainTracer::new();

    c.bench_function("tc_trace_trace_grid_240x320", |b| {
        b.iter(|| {
            let mut grid = CellGrid::from_activation(black_box(&map));
            let chains = tracer.trace(&mut grid).expect("fresh grid");
            black_box(chains.len());
        });
    });

    c.bench_function("tc_trace_trace_and_filter_240x320", |b| {
        b.iter(|| {
            let mut grid = CellGrid::from_activation(black_box(&map));
            let chains = tracer.trace(&mut grid).expect("fresh grid");
            let kept = filter_chains(chains, 240, 320, 3).expect("well formed");
            black_box(kept.len());
        });
    });
}

criterion_group!(benches, bench_trace_grid);
criterion_main!(benches);
