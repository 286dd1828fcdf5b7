//! Criterion benchmarks for the full analysis pipeline.
//!
//! Catalog sizes span a regional selection up to a global catalog.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gr_common::{BoundingBox, Region, TimeRange};
use gr_config::{AnalysisConfig, McMethod};
use gr_core::analyze;
use gr_core::synthetic::{catalog_from_magnitudes, gr_magnitudes, incomplete_tail};

fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");
    let region: Region = BoundingBox {
        west: 0.0,
        south: 0.0,
        east: 10.0,
        north: 10.0,
    }
    .into();

    for n in [1_000usize, 10_000, 50_000] {
        let mut mags = gr_magnitudes(n, 3.0, 1.0, 0.1);
        mags.extend(incomplete_tail(n / 5, 2.5, 5, 0.1));
        let catalog = catalog_from_magnitudes(&mags).expect("synthetic catalog");

        for (name, config) in [
            ("max_curvature", AnalysisConfig::default()),
            (
                "goodness_of_fit",
                AnalysisConfig::default().with_mc_method(McMethod::GoodnessOfFit),
            ),
        ] {
            group.bench_with_input(BenchmarkId::new(name, n), &catalog, |b, catalog| {
                b.iter(|| {
                    black_box(analyze(
                        black_box(catalog),
                        &region,
                        &TimeRange::unbounded(),
                        0.1,
                        &config,
                    ))
                });
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_analyze);
criterion_main!(benches);
