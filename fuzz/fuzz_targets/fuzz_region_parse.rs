//! Fuzz target for `--bbox` and `--polygon` argument parsing.

#![no_main]

use arbitrary::Arbitrary;
use gr_common::{BoundingBox, Polygon};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    spec: &'a str,
    lat: f64,
    lon: f64,
}

fuzz_target!(|input: Input<'_>| {
    if let Ok(bbox) = input.spec.parse::<BoundingBox>() {
        let _ = bbox.contains(input.lat, input.lon);
    }
    if let Ok(polygon) = input.spec.parse::<Polygon>() {
        let _ = polygon.contains(input.lat, input.lon);
    }
});
