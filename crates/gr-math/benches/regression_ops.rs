//! Criterion benchmarks for `gr-math`.
//!
//! Focus on the kernels that run once per candidate Mc in the
//! goodness-of-fit search.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gr_math::{ols, peak_curvature};

fn bench_regression_kernels(c: &mut Criterion) {
    let mut group = c.benchmark_group("regression");

    // Typical MFD lengths for 0.1 bins over 2-5 magnitude units.
    for n in [20usize, 40, 80] {
        let xs: Vec<f64> = (0..n).map(|i| 2.0 + i as f64 * 0.1).collect();
        let ys: Vec<f64> = xs.iter().map(|m| 6.0 - m).collect();
        let counts: Vec<f64> = ys.iter().map(|y| 10f64.powf(*y)).collect();

        group.bench_with_input(BenchmarkId::new("ols", n), &(xs, ys), |b, (xs, ys)| {
            b.iter(|| black_box(ols(black_box(xs), black_box(ys))));
        });

        group.bench_with_input(BenchmarkId::new("peak_curvature", n), &counts, |b, counts| {
            b.iter(|| black_box(peak_curvature(black_box(counts))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_regression_kernels);
criterion_main!(benches);
