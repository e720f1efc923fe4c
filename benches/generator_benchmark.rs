#![allow(clippy::expect_used, clippy::unwrap_used, missing_docs)]
//! Benchmark for sample generation and window maintenance.

use binwatch::prelude::*;
use chrono::{Local, TimeDelta};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn generator_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("generator_next");

    for total in [100u32, 830, 100_000] {
        let generator = SampleGenerator::new(total);
        let seed = FillLevelSample::proportional(total);
        let mut rng = SeededRandom::new(42);

        group.bench_with_input(BenchmarkId::from_parameter(total), &total, |b, _| {
            b.iter(|| generator.next(black_box(&seed), &mut rng));
        });
    }

    group.finish();
}

fn window_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("window_append_project");

    for window in [10usize, 100, 1_000] {
        let now = Local::now();
        let mut buffer = TimeSeriesBuffer::initialize(
            FillLevelSample::proportional(830),
            IntervalSeconds::DEFAULT,
            window,
            SimulatedSource::new(830, SeededRandom::new(7)),
            now,
        )
        .expect("valid window");
        let mut step = 0i64;

        group.bench_with_input(BenchmarkId::from_parameter(window), &window, |b, _| {
            b.iter(|| {
                step += 1;
                buffer.append(now + TimeDelta::seconds(step));
                black_box(buffer.project())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, generator_benchmark, window_benchmark);
criterion_main!(benches);
