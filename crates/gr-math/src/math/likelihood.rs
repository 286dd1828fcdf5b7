//! Maximum-likelihood b-value (Aki 1965, Utsu 1966 binning correction).

use std::f64::consts::LOG10_E;

/// Aki–Utsu estimate `b = log10(e) / (mean - (mc - bin_width / 2))`.
///
/// `mean` is the mean magnitude of events at or above `mc`. NaN when the
/// denominator is not positive.
pub fn aki_utsu_b(mean: f64, mc: f64, bin_width: f64) -> f64 {
    if mean.is_nan() || mc.is_nan() || bin_width.is_nan() || bin_width < 0.0 {
        return f64::NAN;
    }
    let denom = mean - (mc - bin_width / 2.0);
    if denom <= 0.0 {
        return f64::NAN;
    }
    LOG10_E / denom
}

/// Aki's first-order standard error `b / sqrt(n)`.
pub fn aki_std_err(b: f64, n: usize) -> f64 {
    if n == 0 || b.is_nan() {
        return f64::NAN;
    }
    b / (n as f64).sqrt()
}

/// Mean of `values` weighted by non-negative integer `counts`.
pub fn weighted_mean(values: &[f64], counts: &[u64]) -> f64 {
    if values.len() != counts.len() {
        return f64::NAN;
    }
    let total: u64 = counts.iter().sum();
    if total == 0 {
        return f64::NAN;
    }
    let terms: Vec<f64> = values
        .iter()
        .zip(counts)
        .map(|(v, c)| v * *c as f64)
        .collect();
    super::grid::compensated_sum(&terms) / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        if a.is_nan() || b.is_nan() {
            return false;
        }
        (a - b).abs() <= tol
    }

    #[test]
    fn unit_b_value_from_mean_excess() {
        // mean excess of log10(e) above the half-bin-corrected Mc gives b = 1
        let mc = 3.0;
        let mean = mc - 0.05 + LOG10_E;
        assert!(approx_eq(aki_utsu_b(mean, mc, 0.1), 1.0, 1e-12));
    }

    #[test]
    fn invalid_denominator_is_nan() {
        assert!(aki_utsu_b(2.0, 3.0, 0.1).is_nan());
        assert!(aki_utsu_b(f64::NAN, 3.0, 0.1).is_nan());
    }

    #[test]
    fn std_err_scales_with_sqrt_n() {
        assert!(approx_eq(aki_std_err(1.0, 100), 0.1, 1e-12));
        assert!(aki_std_err(1.0, 0).is_nan());
    }

    #[test]
    fn weighted_mean_basic() {
        assert!(approx_eq(weighted_mean(&[1.0, 2.0], &[3, 1]), 1.25, 1e-12));
        assert!(weighted_mean(&[1.0], &[0]).is_nan());
        assert!(weighted_mean(&[1.0], &[1, 2]).is_nan());
    }
}
