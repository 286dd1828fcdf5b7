//! Magnitude-frequency distribution.
//!
//! Bins run from the smallest to the largest observed magnitude inclusive,
//! spaced by the bin width. The cumulative count at bin `m` is the number
//! of events with magnitude `>= m`; the incremental count is the number in
//! `[m, m + bin_width)`.

use crate::logging::{event_names, Stage};
use crate::select::Subset;
use gr_common::{Error, Result};
use gr_math::{ge_tol, grid_len, grid_tolerance, grid_value};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Most bins a single distribution may span.
pub const MAX_BINS: usize = 100_000;

/// One bin of the distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MfdPoint {
    pub magnitude_bin: f64,
    /// Events with magnitude at or above `magnitude_bin`.
    pub cumulative_count: u64,
    /// Events in `[magnitude_bin, magnitude_bin + bin_width)`.
    pub incremental_count: u64,
    /// `cumulative_count` per year of observation, when rates are reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_rate: Option<f64>,
}

/// A binned distribution, ascending by magnitude.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mfd {
    pub bin_width: f64,
    pub points: Vec<MfdPoint>,
}

impl Mfd {
    /// Bin raw magnitudes. Non-finite magnitudes are ignored.
    pub fn from_magnitudes(magnitudes: &[f64], bin_width: f64) -> Result<Self> {
        if !bin_width.is_finite() || bin_width <= 0.0 {
            return Err(Error::invalid_parameter(
                "bin_width",
                format!("must be positive and finite, got {}", bin_width),
            ));
        }

        let mut sorted: Vec<f64> = magnitudes.iter().copied().filter(|m| m.is_finite()).collect();
        sorted.sort_by(f64::total_cmp);

        let (Some(&lo), Some(&hi)) = (sorted.first(), sorted.last()) else {
            return Ok(Mfd {
                bin_width,
                points: Vec::new(),
            });
        };

        let bins = grid_len(lo, hi, bin_width);
        if bins > MAX_BINS {
            return Err(Error::invalid_parameter(
                "bin_width",
                format!(
                    "magnitudes {} to {} need {} bins, more than {}",
                    lo, hi, bins, MAX_BINS
                ),
            ));
        }

        let tol = grid_tolerance(bin_width);
        let total = sorted.len() as u64;
        let cumulative: Vec<(f64, u64)> = (0..bins)
            .map(|k| {
                let m = grid_value(lo, bin_width, k);
                let below = sorted.partition_point(|&x| !ge_tol(x, m, tol));
                (m, total - below as u64)
            })
            .collect();

        let points = cumulative
            .iter()
            .enumerate()
            .map(|(i, &(m, count))| {
                let next = cumulative.get(i + 1).map_or(0, |&(_, c)| c);
                MfdPoint {
                    magnitude_bin: m,
                    cumulative_count: count,
                    incremental_count: count - next,
                    annual_rate: None,
                }
            })
            .collect();

        Ok(Mfd { bin_width, points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Comparison tolerance for magnitudes on this grid.
    pub fn tolerance(&self) -> f64 {
        grid_tolerance(self.bin_width)
    }

    /// Points with `magnitude_bin >= mc` (within grid tolerance).
    pub fn at_or_above(&self, mc: f64) -> &[MfdPoint] {
        let tol = self.tolerance();
        let start = self
            .points
            .partition_point(|p| !ge_tol(p.magnitude_bin, mc, tol));
        &self.points[start..]
    }

    /// Fill `annual_rate` by dividing cumulative counts by `years`.
    pub fn with_annual_rates(mut self, years: f64) -> Self {
        if years.is_finite() && years > 0.0 {
            for point in &mut self.points {
                point.annual_rate = Some(point.cumulative_count as f64 / years);
            }
        }
        self
    }
}

/// Build the cumulative magnitude-frequency distribution of a subset.
///
/// An empty subset yields an empty distribution. Fails with
/// `InvalidParameter` when `bin_width` is not positive.
pub fn compute_mfd(subset: &Subset<'_>, bin_width: f64) -> Result<Mfd> {
    let mfd = Mfd::from_magnitudes(&subset.magnitudes(), bin_width)?;

    tracing::debug!(
        event = event_names::MFD_FINISHED,
        stage = %Stage::Mfd,
        events = subset.len(),
        bins = mfd.len(),
        bin_width,
        "magnitude-frequency distribution built"
    );

    Ok(mfd)
}
