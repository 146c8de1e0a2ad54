//! Criterion benchmarks for the timing-series reducer.
//!
//! Run with:
//!   cargo bench --bench stats
//!
//! The reducer runs once per phase per run, so this only guards against
//! accidental quadratic behaviour at large sample counts.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pingperf::sampling::SampleSeries;

fn synthetic_latencies(n: usize) -> Vec<f64> {
    // Deterministic spread around 2ms with an occasional slow outlier.
    (0..n)
        .map(|i| 2.0 + (i % 17) as f64 * 0.05 + if i % 97 == 0 { 40.0 } else { 0.0 })
        .collect()
}

fn bench_summarize(c: &mut Criterion) {
    let mut group = c.benchmark_group("summarize");
    for n in [10usize, 1_000, 100_000] {
        let values = synthetic_latencies(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &values, |b, values| {
            b.iter(|| {
                let series: SampleSeries = black_box(values).iter().copied().collect();
                black_box(series.summarize())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_summarize);
criterion_main!(benches);
