//! Gutenberg-Richter fitting above the magnitude of completeness.
//!
//! Two estimators are available:
//! - least squares on `log10(cumulative_count)` (default), with the classical
//!   slope standard error and R² as goodness of fit;
//! - Aki–Utsu maximum likelihood on the binned distribution, with `b / sqrt(N)`
//!   as standard error and the R² of the implied line as goodness of fit.

use crate::logging::{event_names, Stage};
use crate::mfd::{Mfd, MfdPoint};
use gr_common::{Error, Result};
use gr_config::validate::MIN_FIT_POINTS;
use gr_config::{AnalysisConfig, FitMethod};
use gr_math::{aki_std_err, aki_utsu_b, ols, r_squared, weighted_mean};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Fitted `log10(N) = a - b·M` parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GrParams {
    pub a: f64,
    pub b: f64,
    pub b_std_err: f64,
    /// In [0, 1]; higher is a tighter fit.
    pub goodness_of_fit: f64,
    /// MFD bins used by the fit.
    pub n_points: usize,
    /// Events at or above `mc`.
    pub n_events: u64,
    /// Lowest bin included in the fit.
    pub mc: f64,
    pub method: FitMethod,
    /// `a` normalized to one year of observation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a_annual: Option<f64>,
}

impl GrParams {
    /// Predicted `log10` cumulative count at magnitude `m`.
    pub fn log10_count(&self, m: f64) -> f64 {
        self.a - self.b * m
    }

    /// Predicted cumulative count at magnitude `m`.
    pub fn predicted_count(&self, m: f64) -> f64 {
        10f64.powf(self.log10_count(m))
    }

    /// Attach the annual `a` for an observation window of `years`.
    pub fn with_observation_years(mut self, years: Option<f64>) -> Self {
        self.a_annual = years
            .filter(|y| y.is_finite() && *y > 0.0)
            .map(|y| self.a - y.log10());
        self
    }
}

/// Fit the GR relation to the MFD bins at or above `mc`.
///
/// Fails with `InsufficientData` when fewer than `min_points_for_fit` bins
/// remain, and with `DegenerateDistribution` when the remaining counts carry
/// no slope information.
pub fn fit(mfd: &Mfd, mc: f64, config: &AnalysisConfig) -> Result<GrParams> {
    if config.min_points_for_fit < MIN_FIT_POINTS {
        return Err(Error::invalid_parameter(
            "min_points_for_fit",
            format!(
                "must be at least {}, got {}",
                MIN_FIT_POINTS, config.min_points_for_fit
            ),
        ));
    }
    if !mc.is_finite() {
        return Err(Error::invalid_parameter("mc", "must be finite"));
    }

    let above = mfd.at_or_above(mc);
    if above.len() < config.min_points_for_fit {
        return Err(Error::insufficient(
            "fit",
            config.min_points_for_fit,
            above.len(),
        ));
    }

    let params = match config.fit_method {
        FitMethod::LeastSquares => least_squares(above)?,
        FitMethod::MaxLikelihood => max_likelihood(above, mfd.bin_width)?,
    };

    tracing::debug!(
        event = event_names::FIT_FINISHED,
        stage = %Stage::Fit,
        method = %params.method,
        mc = params.mc,
        a = params.a,
        b = params.b,
        b_std_err = params.b_std_err,
        goodness_of_fit = params.goodness_of_fit,
        n_points = params.n_points,
        "gutenberg-richter fit finished"
    );

    Ok(params)
}

fn log_counts(points: &[MfdPoint]) -> (Vec<f64>, Vec<f64>) {
    points
        .iter()
        .map(|p| (p.magnitude_bin, (p.cumulative_count as f64).log10()))
        .unzip()
}

fn least_squares(points: &[MfdPoint]) -> Result<GrParams> {
    let (xs, ys) = log_counts(points);
    let line = ols(&xs, &ys).ok_or_else(|| {
        Error::DegenerateDistribution("magnitude bins have no spread".to_string())
    })?;
    if line.total_ss <= 0.0 {
        return Err(Error::DegenerateDistribution(
            "cumulative counts are constant above Mc".to_string(),
        ));
    }

    Ok(GrParams {
        a: line.intercept,
        b: -line.slope,
        b_std_err: line.slope_std_err,
        goodness_of_fit: line.r_squared(),
        n_points: points.len(),
        n_events: points[0].cumulative_count,
        mc: points[0].magnitude_bin,
        method: FitMethod::LeastSquares,
        a_annual: None,
    })
}

fn max_likelihood(points: &[MfdPoint], bin_width: f64) -> Result<GrParams> {
    let mc = points[0].magnitude_bin;
    let n_events = points[0].cumulative_count;

    let bins: Vec<f64> = points.iter().map(|p| p.magnitude_bin).collect();
    let counts: Vec<u64> = points.iter().map(|p| p.incremental_count).collect();
    let b = aki_utsu_b(weighted_mean(&bins, &counts), mc, bin_width);
    if !b.is_finite() {
        return Err(Error::DegenerateDistribution(
            "mean magnitude does not exceed Mc".to_string(),
        ));
    }
    let a = (n_events as f64).log10() + b * mc;

    let (xs, observed) = log_counts(points);
    let predicted: Vec<f64> = xs.iter().map(|m| a - b * m).collect();
    let goodness_of_fit = r_squared(&observed, &predicted);
    if goodness_of_fit.is_nan() {
        return Err(Error::DegenerateDistribution(
            "cumulative counts are constant above Mc".to_string(),
        ));
    }

    Ok(GrParams {
        a,
        b,
        b_std_err: aki_std_err(b, n_events as usize),
        goodness_of_fit,
        n_points: points.len(),
        n_events,
        mc,
        method: FitMethod::MaxLikelihood,
        a_annual: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noiseless() -> Mfd {
        // 1000 / 100 / 10 / 1 events at or above 1, 2, 3, 4
        let mut mags = vec![1.0; 900];
        mags.extend(vec![2.0; 90]);
        mags.extend(vec![3.0; 9]);
        mags.push(4.0);
        Mfd::from_magnitudes(&mags, 1.0).unwrap()
    }

    fn approx(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn least_squares_recovers_exact_line() {
        let params = fit(&noiseless(), 1.0, &AnalysisConfig::default()).unwrap();
        assert!(approx(params.a, 4.0, 1e-9));
        assert!(approx(params.b, 1.0, 1e-9));
        assert!(approx(params.b_std_err, 0.0, 1e-9));
        assert!(approx(params.goodness_of_fit, 1.0, 1e-12));
        assert_eq!(params.n_points, 4);
        assert_eq!(params.n_events, 1000);
    }

    #[test]
    fn exactly_min_points_succeeds_and_one_fewer_is_absent() {
        let mfd = noiseless();
        let config = AnalysisConfig::default().with_min_points(3);
        assert!(fit(&mfd, 2.0, &config).is_ok());

        let err = fit(&mfd, 3.0, &config).unwrap_err();
        assert!(matches!(
            err,
            Error::InsufficientData {
                needed: 3,
                available: 2,
                ..
            }
        ));
        assert!(err.is_data_shortfall());
    }

    #[test]
    fn min_points_below_three_is_rejected() {
        let config = AnalysisConfig::default().with_min_points(2);
        let err = fit(&noiseless(), 1.0, &config).unwrap_err();
        assert!(err.is_caller_error());
    }

    #[test]
    fn constant_counts_are_degenerate() {
        // cumulative counts above 3.1 are all 1
        let mfd = Mfd::from_magnitudes(&[3.0, 3.4], 0.1).unwrap();
        let err = fit(&mfd, 3.1, &AnalysisConfig::default()).unwrap_err();
        assert!(matches!(err, Error::DegenerateDistribution(_)));

        let mle = AnalysisConfig::default().with_fit_method(FitMethod::MaxLikelihood);
        let err = fit(&mfd, 3.1, &mle).unwrap_err();
        assert!(matches!(err, Error::DegenerateDistribution(_)));
    }

    #[test]
    fn max_likelihood_uses_aki_utsu() {
        let config = AnalysisConfig::default().with_fit_method(FitMethod::MaxLikelihood);
        let mfd = noiseless();
        let params = fit(&mfd, 1.0, &config).unwrap();

        // mean of 900x1 + 90x2 + 9x3 + 1x4 = 1.111
        let expected_b = std::f64::consts::LOG10_E / (1.111 - 0.5);
        assert!(approx(params.b, expected_b, 1e-12));
        assert!(approx(params.a, 3.0 + expected_b, 1e-12));
        assert!(approx(params.b_std_err, expected_b / 1000f64.sqrt(), 1e-12));
        assert!((0.0..=1.0).contains(&params.goodness_of_fit));
        assert_eq!(params.method, FitMethod::MaxLikelihood);
    }

    #[test]
    fn annual_a_subtracts_log_years() {
        let params = fit(&noiseless(), 1.0, &AnalysisConfig::default())
            .unwrap()
            .with_observation_years(Some(10.0));
        assert!(approx(params.a_annual.unwrap(), 3.0, 1e-9));

        let params = params.with_observation_years(Some(0.0));
        assert_eq!(params.a_annual, None);
    }

    #[test]
    fn predicted_count_follows_line() {
        let params = fit(&noiseless(), 1.0, &AnalysisConfig::default()).unwrap();
        assert!(approx(params.predicted_count(2.0), 100.0, 1e-6));
    }
}
