//! Benchmarks for DOK indexing.
//!
//! Measures scalar reads/writes, slice reads (both the cell walk and the store
//! walk) and broadcasting slice writes on square arrays of growing size.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;
use tensorlogic_dok::{Dok, Scalar, Slice};

/// Square `n x n` float64 array with about `density * n * n` entries.
fn create_dok(n: usize, density: f64) -> Dok {
    let mut rng = StdRng::seed_from_u64(7);
    let mut dok = Dok::new((n, n));
    let nnz = (density * (n * n) as f64) as usize;
    for _ in 0..nnz {
        let coords = [rng.gen_range(0..n), rng.gen_range(0..n)];
        dok.set_at(&coords, Scalar::F64(rng.gen_range(0.1..1.0)))
            .unwrap();
    }
    dok
}

fn bench_point_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("point_get");

    for n in [16, 128, 1024] {
        let dok = create_dok(n, 0.05);
        group.bench_with_input(BenchmarkId::from_parameter(n), &dok, |b, dok| {
            let mut i = 0usize;
            b.iter(|| {
                i = (i + 7) % n;
                black_box(dok.get((i, n - 1 - i)).unwrap())
            })
        });
    }

    group.finish();
}

fn bench_point_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("point_set");

    for n in [16, 128, 1024] {
        let mut dok = create_dok(n, 0.05);
        group.bench_function(BenchmarkId::from_parameter(n), |b| {
            let mut i = 0usize;
            b.iter(|| {
                i = (i + 13) % n;
                dok.set((i, i), black_box(1.5)).unwrap();
            })
        });
    }

    group.finish();
}

fn bench_slice_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("slice_get");

    for n in [128, 1024] {
        let dok = create_dok(n, 0.01);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("row", n), &dok, |b, dok| {
            b.iter(|| black_box(dok.get((n / 2, Slice::full())).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("strided_block", n), &dok, |b, dok| {
            b.iter(|| {
                black_box(
                    dok.get((Slice::new(None, None, 2), Slice::new(None, None, -3)))
                        .unwrap(),
                )
            })
        });
    }

    group.finish();
}

fn bench_slice_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("slice_set");

    for n in [128, 1024] {
        let mut dok = create_dok(n, 0.01);
        let row: Vec<f64> = (0..n).map(|k| (k % 3) as f64).collect();
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(BenchmarkId::from_parameter(n), |b| {
            b.iter(|| dok.set((.., n / 3), row.clone()).unwrap())
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_point_get,
    bench_point_set,
    bench_slice_get,
    bench_slice_set
);
criterion_main!(benches);
