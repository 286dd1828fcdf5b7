//! Fuzz target for catalog CSV parsing followed by a full analysis.
//!
//! Any catalog that parses must analyze without panicking.

#![no_main]

use gr_common::{BoundingBox, Region, TimeRange};
use gr_config::AnalysisConfig;
use gr_core::{analyze, parse_catalog};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let Ok((catalog, _stats)) = parse_catalog(data) else {
        return;
    };
    let region: Region = catalog
        .extent()
        .map(|extent| extent.expanded(0.01))
        .unwrap_or(BoundingBox {
            west: -180.0,
            south: -90.0,
            east: 180.0,
            north: 90.0,
        })
        .into();
    let _ = analyze(
        &catalog,
        &region,
        &TimeRange::unbounded(),
        0.1,
        &AnalysisConfig::default(),
    );
});
