use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::{DMat3, DVec3};
use rigid_linalg::{svd, to_orthogonal3};
use std::hint::black_box;

fn bench_svd3(c: &mut Criterion) {
    let mut group = c.benchmark_group("svd3");
    let a = DMat3 {
        x_axis: DVec3::new(1.0, 0.0, 0.0),
        y_axis: DVec3::new(0.0, 2.0, 0.0),
        z_axis: DVec3::new(0.0, 0.0, 3.0),
    };

    group.bench_function(BenchmarkId::new("svd3", ""), |b| {
        b.iter(|| black_box(svd::svd3(black_box(&a))))
    });
}

fn bench_to_orthogonal(c: &mut Criterion) {
    let mut group = c.benchmark_group("to_orthogonal");
    let mut drifted = DMat3::IDENTITY;
    drifted.y_axis.x = 1e-3;
    drifted.z_axis.y = -2e-3;

    group.bench_function(BenchmarkId::new("to_orthogonal3", ""), |b| {
        b.iter(|| black_box(to_orthogonal3(black_box(&drifted))))
    });
}

criterion_group!(benches, bench_svd3, bench_to_orthogonal);
criterion_main!(benches);
