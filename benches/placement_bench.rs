//! Benchmark suite for danci-placement
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use danci_placement::{
    compute_posterior, level_confidence, simulate_cohort, simulate_session, CefrLevel,
    EstimatorConfig, ItemFormat, PlacementEngine, Response, SimulatedCandidate,
};

fn sample_responses(count: usize) -> Vec<Response> {
    (0..count)
        .map(|i| {
            let format = if i % 2 == 0 {
                ItemFormat::GapFill
            } else {
                ItemFormat::MultipleChoice
            };
            Response::new(format!("topic_{}", i), i % 3 != 0, -2.0 + i as f64 * 0.6, format)
        })
        .collect()
}

fn bench_compute_posterior(c: &mut Criterion) {
    let config = EstimatorConfig::default();
    let mut group = c.benchmark_group("compute_posterior");

    for count in [1, 6, 10] {
        let responses = sample_responses(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &responses, |b, responses| {
            b.iter(|| compute_posterior(black_box(&config), 0.0, 1.5, black_box(responses)))
        });
    }
    group.finish();
}

fn bench_level_confidence(c: &mut Criterion) {
    let config = EstimatorConfig::default();
    c.bench_function("level_confidence", |b| {
        b.iter(|| level_confidence(black_box(0.7), black_box(0.45), CefrLevel::B1, &config))
    });
}

fn bench_full_session(c: &mut Criterion) {
    let engine = PlacementEngine::standard();
    let candidate = SimulatedCandidate::new(1.2, 42);

    c.bench_function("simulated_session", |b| {
        b.iter(|| simulate_session(&engine, black_box(&candidate)))
    });
}

fn bench_cohort(c: &mut Criterion) {
    let engine = PlacementEngine::standard();
    let cohort: Vec<SimulatedCandidate> = (0..100u64)
        .map(|seed| SimulatedCandidate::new(-1.75 + seed as f64 * 0.055, seed))
        .collect();

    c.bench_function("simulated_cohort_100", |b| {
        b.iter(|| simulate_cohort(&engine, black_box(&cohort)))
    });
}

criterion_group!(
    benches,
    bench_compute_posterior,
    bench_level_confidence,
    bench_full_session,
    bench_cohort
);
criterion_main!(benches);
