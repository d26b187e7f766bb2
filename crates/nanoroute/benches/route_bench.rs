//! Criterion benches for the routing stages and the trial search.
//!
//! - single attempt on random graphs of growing size,
//! - full search on a random graph, sequential vs. rayon batches.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use nanoroute::routing::{route, run_trial, RouteCfg};
use nanoroute::shapes;

fn bench_attempt(c: &mut Criterion) {
    let mut group = c.benchmark_group("attempt");
    for n in [50usize, 200, 800] {
        let g = shapes::random_graph(42, n, n).unwrap();
        let mut seed = 0u64;
        group.bench_function(BenchmarkId::new("run_trial", n), |b| {
            b.iter_batched(
                || {
                    seed = seed.wrapping_add(1);
                    seed
                },
                |s| {
                    let _ = run_trial(&g, s).unwrap();
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    let g = shapes::random_graph(7, 300, 300).unwrap();
    for parallel in [false, true] {
        let cfg = RouteCfg {
            trials: 256,
            early_exit_scores: vec![],
            parallel,
            ..RouteCfg::default()
        };
        let label = if parallel { "rayon" } else { "sequential" };
        group.bench_function(BenchmarkId::new("route_256", label), |b| {
            b.iter(|| route(&g, &cfg).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_attempt, bench_search);
criterion_main!(benches);
