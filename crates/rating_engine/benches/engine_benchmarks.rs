//! Criterion benchmarks for the downgrade engine.
//!
//! Benchmarks cover:
//! - Single-path generation and detection
//! - Scenario throughput with varying trial counts
//! - A full severity sweep on the default grid

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rating_core::params::SimulationParameters;
use rating_engine::{linspace, run_scenario, run_sweep, simulate_trial};

fn bench_single_trial(c: &mut Criterion) {
    let params = SimulationParameters::default();
    c.bench_function("simulate_trial_5y", |b| {
        let mut trial = 0usize;
        b.iter(|| {
            trial = trial.wrapping_add(1);
            black_box(simulate_trial(black_box(&params), trial))
        })
    });
}

fn bench_scenario(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenario");
    for n_trials in [1_000usize, 10_000, 100_000] {
        let params = SimulationParameters::builder()
            .n_trials(n_trials)
            .build()
            .expect("valid parameters");
        group.bench_with_input(BenchmarkId::from_parameter(n_trials), &params, |b, p| {
            b.iter(|| black_box(run_scenario(p)))
        });
    }
    group.finish();
}

fn bench_sweep(c: &mut Criterion) {
    let params = SimulationParameters::builder()
        .n_trials(1_500)
        .build()
        .expect("valid parameters");
    let severities = linspace(0.05, 0.35, 7);
    c.bench_function("severity_sweep_7x1500", |b| {
        b.iter(|| black_box(run_sweep(&params, &severities).expect("valid sweep")))
    });
}

criterion_group!(benches, bench_single_trial, bench_scenario, bench_sweep);
criterion_main!(benches);
