//! Ordinary least squares for a single predictor.
//!
//! Computes the line `y = intercept + slope * x`, classical coefficient
//! standard errors, and the coefficient of determination. Sums are
//! taken about the means with compensated summation so identical inputs
//! give bit-identical outputs regardless of platform summation order.

use super::grid::{compensated_sum, mean};
use serde::{Deserialize, Serialize};

/// Result of a simple linear regression.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub intercept: f64,
    pub slope: f64,
    /// Standard error of the slope; NaN when `n <= 2`.
    pub slope_std_err: f64,
    /// Standard error of the intercept; NaN when `n <= 2`.
    pub intercept_std_err: f64,
    /// Sum of squared residuals.
    pub residual_ss: f64,
    /// Total sum of squares of `y` about its mean.
    pub total_ss: f64,
    pub n: usize,
}

impl LinearFit {
    /// Coefficient of determination, clamped to [0, 1].
    ///
    /// NaN when `y` has zero variance.
    pub fn r_squared(&self) -> f64 {
        r_squared_from_ss(self.residual_ss, self.total_ss)
    }
}

/// Fit `y = a + b x` by least squares.
///
/// Returns `None` when fewer than two points are given, the slices differ
/// in length, any value is non-finite, or `x` has zero variance.
pub fn ols(xs: &[f64], ys: &[f64]) -> Option<LinearFit> {
    let n = xs.len();
    if n < 2 || ys.len() != n {
        return None;
    }
    if xs.iter().chain(ys).any(|v| !v.is_finite()) {
        return None;
    }

    let mx = mean(xs);
    let my = mean(ys);
    let dx: Vec<f64> = xs.iter().map(|x| x - mx).collect();
    let dy: Vec<f64> = ys.iter().map(|y| y - my).collect();

    let sxx = compensated_sum(&dx.iter().map(|d| d * d).collect::<Vec<_>>());
    if sxx <= 0.0 {
        return None;
    }
    let sxy = compensated_sum(&dx.iter().zip(&dy).map(|(a, b)| a * b).collect::<Vec<_>>());
    let syy = compensated_sum(&dy.iter().map(|d| d * d).collect::<Vec<_>>());

    let slope = sxy / sxx;
    let intercept = my - slope * mx;

    let residuals: Vec<f64> = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| {
            let r = y - (intercept + slope * x);
            r * r
        })
        .collect();
    let residual_ss = compensated_sum(&residuals);

    let (slope_std_err, intercept_std_err) = if n > 2 {
        let sigma2 = residual_ss / (n as f64 - 2.0);
        let se_slope = (sigma2 / sxx).sqrt();
        let se_intercept = (sigma2 * (1.0 / n as f64 + mx * mx / sxx)).sqrt();
        (se_slope, se_intercept)
    } else {
        (f64::NAN, f64::NAN)
    };

    Some(LinearFit {
        intercept,
        slope,
        slope_std_err,
        intercept_std_err,
        residual_ss,
        total_ss: syy,
        n,
    })
}

/// R² of `predicted` against `observed`, clamped to [0, 1].
///
/// Used to score a line that was not fitted by least squares (it can then
/// be worse than the mean, which clamps to 0). NaN on length mismatch,
/// empty input, or zero variance in `observed`.
pub fn r_squared(observed: &[f64], predicted: &[f64]) -> f64 {
    if observed.is_empty() || observed.len() != predicted.len() {
        return f64::NAN;
    }
    let my = mean(observed);
    let total_ss = compensated_sum(&observed.iter().map(|y| (y - my) * (y - my)).collect::<Vec<_>>());
    let residual_ss = compensated_sum(
        &observed
            .iter()
            .zip(predicted)
            .map(|(y, p)| (y - p) * (y - p))
            .collect::<Vec<_>>(),
    );
    r_squared_from_ss(residual_ss, total_ss)
}

fn r_squared_from_ss(residual_ss: f64, total_ss: f64) -> f64 {
    if !(total_ss > 0.0) {
        return f64::NAN;
    }
    (1.0 - residual_ss / total_ss).clamp(0.0, 1.0)
}
