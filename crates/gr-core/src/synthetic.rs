//! Deterministic synthetic catalogs.
//!
//! Used by the `synth` subcommand, the integration tests and benchmarks.
//! No randomness: magnitudes are placed at the quantiles of the target
//! distribution so the same arguments always yield the same catalog.

use chrono::{DateTime, Duration, TimeZone, Utc};
use gr_common::{Event, EventCatalog, Result};
use gr_math::{snap, GRID_DECIMALS};

/// Magnitudes following a GR law of slope `b` above `mc`, binned down to
/// the grid `mc + k·bin_width`.
///
/// Event `i` sits at the `(i + 0.5) / n` quantile of the exponential
/// magnitude distribution.
pub fn gr_magnitudes(n: usize, mc: f64, b: f64, bin_width: f64) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let q = (i as f64 + 0.5) / n as f64;
            let m = mc - (1.0 - q).log10() / b;
            let k = ((m - mc) / bin_width + 1e-9).floor();
            snap(mc + k * bin_width, GRID_DECIMALS)
        })
        .collect()
}

/// A flat tail of `n` magnitudes cycling through `bins` bins from `lo`.
pub fn incomplete_tail(n: usize, lo: f64, bins: usize, bin_width: f64) -> Vec<f64> {
    let bins = bins.max(1);
    (0..n)
        .map(|j| snap(lo + (j % bins) as f64 * bin_width, GRID_DECIMALS))
        .collect()
}

/// First origin time of synthetic catalogs.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Spread magnitudes over a 10° x 10° square at the origin, one event per day.
pub fn catalog_from_magnitudes(magnitudes: &[f64]) -> Result<EventCatalog> {
    let start = epoch();
    let events = magnitudes
        .iter()
        .enumerate()
        .map(|(i, &m)| {
            let lat = (i % 10) as f64 + 0.5;
            let lon = ((i / 10) % 10) as f64 + 0.5;
            Event::new(lat, lon, start + Duration::days(i as i64), m)
        })
        .collect();
    EventCatalog::new(events)
}

/// 100 GR events (b = 1, Mc = 3.0) plus 20 under-reported events in 2.5..2.9.
pub fn scenario_magnitudes() -> Vec<f64> {
    let mut mags = gr_magnitudes(100, 3.0, 1.0, 0.1);
    mags.extend(incomplete_tail(20, 2.5, 5, 0.1));
    mags
}

pub fn scenario_catalog() -> Result<EventCatalog> {
    catalog_from_magnitudes(&scenario_magnitudes())
}
