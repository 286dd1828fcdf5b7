//! Magnitude of completeness (Mc) estimation.

use crate::fit::fit;
use crate::logging::{event_names, Stage};
use crate::mfd::Mfd;
use gr_common::{Error, Result};
use gr_config::{AnalysisConfig, McMethod};
use gr_math::{all_equal, argmax_first, peak_curvature};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Fewest MFD bins a curvature can be measured on.
pub const MIN_MFD_POINTS: usize = 3;

/// An accepted Mc with the evidence behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct McEstimate {
    /// The chosen magnitude of completeness (an MFD bin).
    pub mc: f64,
    /// Method that produced `mc`. A goodness-of-fit run that found no
    /// qualifying candidate reports `max-curvature` here.
    pub method: McMethod,
    /// Maximum-curvature estimate, always computed.
    pub max_curvature_mc: f64,
    /// Fit quality `R` of the accepted goodness-of-fit candidate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gft_quality: Option<f64>,
}

/// Estimate Mc from the distribution using the configured method.
///
/// Fails with `InsufficientData` for fewer than three bins and with
/// `DegenerateDistribution` when the incremental counts show no rolloff.
pub fn estimate_mc(mfd: &Mfd, config: &AnalysisConfig) -> Result<McEstimate> {
    let max_curvature_mc = max_curvature(mfd)?;

    let estimate = match config.mc_method {
        McMethod::MaxCurvature => McEstimate {
            mc: max_curvature_mc,
            method: McMethod::MaxCurvature,
            max_curvature_mc,
            gft_quality: None,
        },
        McMethod::GoodnessOfFit => match goodness_of_fit_mc(mfd, config)? {
            Some((mc, quality)) => McEstimate {
                mc,
                method: McMethod::GoodnessOfFit,
                max_curvature_mc,
                gft_quality: Some(quality),
            },
            None => {
                tracing::info!(
                    event = event_names::MC_ESTIMATED,
                    stage = %Stage::Completeness,
                    threshold = config.goodness_of_fit_threshold,
                    "no candidate reached the goodness-of-fit threshold; using max curvature"
                );
                McEstimate {
                    mc: max_curvature_mc,
                    method: McMethod::MaxCurvature,
                    max_curvature_mc,
                    gft_quality: None,
                }
            }
        },
    };

    tracing::debug!(
        event = event_names::MC_ESTIMATED,
        stage = %Stage::Completeness,
        mc = estimate.mc,
        method = %estimate.method,
        max_curvature_mc,
        "magnitude of completeness estimated"
    );

    Ok(estimate)
}

/// Bin of peak curvature of the incremental (non-cumulative) counts.
pub fn max_curvature(mfd: &Mfd) -> Result<f64> {
    if mfd.len() < MIN_MFD_POINTS {
        return Err(Error::insufficient("completeness", MIN_MFD_POINTS, mfd.len()));
    }

    let counts: Vec<f64> = mfd
        .points
        .iter()
        .map(|p| p.incremental_count as f64)
        .collect();
    if all_equal(&counts) {
        return Err(Error::DegenerateDistribution(
            "incremental counts are flat; no rolloff".to_string(),
        ));
    }

    let idx = argmax_first(&peak_curvature(&counts)).ok_or_else(|| {
        Error::DegenerateDistribution("curvature is undefined".to_string())
    })?;
    Ok(mfd.points[idx].magnitude_bin)
}

/// Fit quality `R = 1 - Σ|obs - pred| / Σobs` over the cumulative counts
/// at or above `mc`, floored at zero.
pub fn fit_quality(mfd: &Mfd, mc: f64, a: f64, b: f64) -> f64 {
    let points = mfd.at_or_above(mc);
    let observed: f64 = points.iter().map(|p| p.cumulative_count as f64).sum();
    if observed <= 0.0 {
        return 0.0;
    }
    let deviation: f64 = points
        .iter()
        .map(|p| (p.cumulative_count as f64 - 10f64.powf(a - b * p.magnitude_bin)).abs())
        .sum();
    (1.0 - deviation / observed).max(0.0)
}

/// Smallest candidate bin whose GR fit reaches the configured quality.
///
/// A candidate qualifies when `R >= goodness_of_fit_threshold`; the bound
/// is inclusive so that a threshold of 1.0 accepts an exact fit.
/// Candidates are walked in ascending order. Walking stops once too few
/// bins remain to fit; candidates whose fit is degenerate are skipped.
/// Returns the accepted bin and its quality, or `None` if none qualifies.
pub fn goodness_of_fit_mc(mfd: &Mfd, config: &AnalysisConfig) -> Result<Option<(f64, f64)>> {
    for point in &mfd.points {
        let candidate = point.magnitude_bin;
        let params = match fit(mfd, candidate, config) {
            Ok(params) => params,
            Err(Error::InsufficientData { .. }) => break,
            Err(Error::DegenerateDistribution(_)) => continue,
            Err(e) => return Err(e),
        };

        let quality = fit_quality(mfd, candidate, params.a, params.b);
        tracing::trace!(
            stage = %Stage::Completeness,
            candidate,
            quality,
            "goodness-of-fit candidate"
        );
        if quality >= config.goodness_of_fit_threshold {
            return Ok(Some((candidate, quality)));
        }
    }
    Ok(None)
}
