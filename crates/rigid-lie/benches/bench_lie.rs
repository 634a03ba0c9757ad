use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::DVec3;
use rand::Rng;
use rigid_lie::poses::{invert_poses, transform_points_by_poses};
use rigid_lie::{SE3, SO3};
use std::hint::black_box;

fn bench_so3(c: &mut Criterion) {
    let mut group = c.benchmark_group("so3");

    let data_size = 1000;
    let omegas: Vec<DVec3> = (0..data_size)
        .map(|_| {
            let mut rng = rand::rng();
            DVec3::new(rng.random(), rng.random(), rng.random())
        })
        .collect();
    let rots: Vec<SO3> = omegas.iter().map(|&v| SO3::exp(v)).collect();

    group.bench_function(BenchmarkId::new("exp", ""), |b| {
        b.iter(|| {
            for omega in omegas.iter() {
                black_box(SO3::exp(black_box(*omega)));
            }
        })
    });

    group.bench_function(BenchmarkId::new("log", ""), |b| {
        b.iter(|| {
            for rot in rots.iter() {
                black_box(black_box(*rot).log());
            }
        })
    });

    group.bench_function(BenchmarkId::new("compose", ""), |b| {
        b.iter(|| {
            for pair in rots.windows(2) {
                black_box(black_box(pair[0]) * black_box(pair[1]));
            }
        })
    });

    group.finish();
}

fn bench_se3(c: &mut Criterion) {
    let mut group = c.benchmark_group("se3");

    let poses: Vec<SE3> = (0..1000).map(|_| SE3::from_random()).collect();
    let tangents: Vec<[f64; 6]> = poses.iter().map(|p| p.log()).collect();

    group.bench_function(BenchmarkId::new("exp", ""), |b| {
        b.iter(|| {
            for v in tangents.iter() {
                black_box(SE3::exp(black_box(*v)));
            }
        })
    });

    group.bench_function(BenchmarkId::new("log", ""), |b| {
        b.iter(|| {
            for pose in poses.iter() {
                black_box(black_box(*pose).log());
            }
        })
    });

    group.finish();
}

fn bench_poses(c: &mut Criterion) {
    let mut group = c.benchmark_group("poses");
    let mut rng = rand::rng();

    let points: Vec<[f64; 3]> = (0..1000)
        .map(|_| [rng.random(), rng.random(), rng.random()])
        .collect();

    for num_poses in [1, 100, 1000] {
        let rows: Vec<[f64; 12]> = (0..num_poses)
            .map(|_| SE3::from_random().to_pose_row())
            .collect();

        group.bench_with_input(
            BenchmarkId::new("transform_points_by_poses", num_poses),
            &rows,
            |b, rows| b.iter(|| black_box(transform_points_by_poses(rows, &points, false))),
        );

        group.bench_with_input(
            BenchmarkId::new("invert_poses", num_poses),
            &rows,
            |b, rows| b.iter(|| black_box(invert_poses(rows))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_so3, bench_se3, bench_poses);
criterion_main!(benches);
