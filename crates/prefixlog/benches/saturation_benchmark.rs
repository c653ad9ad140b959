//! Saturation throughput on the built-in edge/path transitive-closure
//! program, the same shape the reference engine benchmarks its
//! sparse-matrix fast path against.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use prefixlog::driver::{run, SolverConfig};
use prefixlog::programs;

fn bench_edge_path(c: &mut Criterion) {
    c.bench_function("edge_path saturation", |b| {
        b.iter(|| {
            let program = programs::edge_path();
            let models = run(&program, &SolverConfig::unbounded(), None).unwrap();
            black_box(models);
        });
    });
}

criterion_group!(benches, bench_edge_path);
criterion_main!(benches);
