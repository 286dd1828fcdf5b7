//! Magnitude grid arithmetic.
//!
//! Bins are generated as `lo + k * step`, which accumulates representation
//! error (`3 * 0.1 != 0.3`). Bin values are snapped to a fixed number
//! of decimals and comparisons against observed magnitudes use a tolerance
//! proportional to the step.

/// Decimal places bin values are snapped to.
pub const GRID_DECIMALS: i32 = 10;

/// Relative tolerance (fraction of the step) for magnitude comparisons.
pub const GRID_REL_TOL: f64 = 1e-6;

/// Round `x` to `decimals` decimal places.
pub fn snap(x: f64, decimals: i32) -> f64 {
    if !x.is_finite() {
        return x;
    }
    let scale = 10f64.powi(decimals);
    (x * scale).round() / scale
}

/// Absolute comparison tolerance for a grid with the given step.
pub fn grid_tolerance(step: f64) -> f64 {
    step.abs() * GRID_REL_TOL
}

/// `a >= b` allowing `a` to fall short of `b` by up to `tol`.
pub fn ge_tol(a: f64, b: f64, tol: f64) -> bool {
    a >= b - tol
}

/// Number of grid points from `lo` to `hi` inclusive with spacing `step`.
///
/// Returns 0 for a non-positive or non-finite step, or when `hi < lo`.
pub fn grid_len(lo: f64, hi: f64, step: f64) -> usize {
    if !(step > 0.0) || !step.is_finite() || !lo.is_finite() || !hi.is_finite() || hi < lo {
        return 0;
    }
    let span = (hi - lo) / step;
    ((span + GRID_REL_TOL).floor() as usize).saturating_add(1)
}

/// The `k`-th grid value starting at `lo`, snapped.
pub fn grid_value(lo: f64, step: f64, k: usize) -> f64 {
    snap(lo + k as f64 * step, GRID_DECIMALS)
}

/// Neumaier-compensated sum, independent of the magnitude ordering of terms.
pub fn compensated_sum(values: &[f64]) -> f64 {
    let mut sum = 0.0;
    let mut comp = 0.0;
    for &v in values {
        let t = sum + v;
        if sum.abs() >= v.abs() {
            comp += (sum - t) + v;
        } else {
            comp += (v - t) + sum;
        }
        sum = t;
    }
    sum + comp
}

/// Arithmetic mean, NaN for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    compensated_sum(values) / values.len() as f64
}
