//! Performance benchmarks for the parallel mapper
//! Measures sequential baseline against parallel map across worker counts

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use parmap::mapper::partition;
use parmap::transforms::{brighten, pixel_label, sample_pixels, square};
use parmap::ParallelMapper;
use std::hint::black_box;
use std::time::Duration;

const WORKER_COUNTS: [usize; 4] = [1, 2, 4, 8];

fn bench_brighten(c: &mut Criterion) {
    let mut group = c.benchmark_group("brighten");
    group.measurement_time(Duration::from_secs(5));

    for size in [10_000usize, 1_000_000] {
        let pixels = sample_pixels(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("sequential", size), &pixels, |b, pixels| {
            b.iter(|| black_box(pixels.iter().map(brighten).collect::<Vec<_>>()))
        });

        for workers in WORKER_COUNTS {
            let mapper = ParallelMapper::with_workers(workers);
            group.bench_with_input(
                BenchmarkId::new(format!("parallel-{workers}"), size),
                &pixels,
                |b, pixels| b.iter(|| black_box(mapper.map(pixels, brighten))),
            );
        }
    }

    group.finish();
}

fn bench_allocating_transforms(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocating_transforms");
    let pixels = sample_pixels(200_000);
    let mapper = ParallelMapper::with_workers(4);

    group.bench_function("pixel_label", |b| {
        b.iter(|| black_box(mapper.map(&pixels, pixel_label)))
    });
    group.bench_function("square", |b| b.iter(|| black_box(mapper.map(&pixels, square))));

    group.finish();
}

fn bench_partitioning(c: &mut Criterion) {
    let mut group = c.benchmark_group("partitioning");

    for workers in [4usize, 64, 1_024] {
        group.bench_with_input(
            BenchmarkId::from_parameter(workers),
            &workers,
            |b, &workers| b.iter(|| black_box(partition(black_box(1_000_000), workers))),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_brighten,
    bench_allocating_transforms,
    bench_partitioning
);

criterion_main!(benches);
