//! Property-based tests for gr-math numerical functions.
//!
//! Uses proptest to verify mathematical properties hold across many random inputs.

use gr_math::{argmax_first, grid_len, grid_value, ols, peak_curvature, snap, GRID_DECIMALS};
use proptest::prelude::*;

/// Tolerance for floating point comparisons.
const TOL: f64 = 1e-9;

fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    if a.is_nan() || b.is_nan() {
        return false;
    }
    (a - b).abs() <= tol.max(tol * a.abs().max(b.abs()))
}

// ============================================================================
// OLS properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// A noiseless line is recovered exactly with perfect R².
    #[test]
    fn ols_recovers_exact_line(
        a in -10.0..10.0f64,
        b in -5.0..5.0f64,
        x0 in -5.0..5.0f64,
        step in 0.05..1.0f64,
        n in 3usize..40,
    ) {
        let xs: Vec<f64> = (0..n).map(|i| x0 + i as f64 * step).collect();
        let ys: Vec<f64> = xs.iter().map(|x| a + b * x).collect();
        let fit = ols(&xs, &ys).unwrap();
        prop_assert!(approx_eq(fit.slope, b, 1e-7), "slope {} != {}", fit.slope, b);
        prop_assert!(approx_eq(fit.intercept, a, 1e-6), "intercept {} != {}", fit.intercept, a);
        if b.abs() > 1e-3 {
            prop_assert!(fit.r_squared() > 1.0 - 1e-9);
        }
    }

    /// R² always lies in [0, 1] when defined.
    #[test]
    fn r_squared_in_unit_interval(ys in prop::collection::vec(-100.0..100.0f64, 3..30)) {
        let xs: Vec<f64> = (0..ys.len()).map(|i| i as f64).collect();
        let fit = ols(&xs, &ys).unwrap();
        let r2 = fit.r_squared();
        prop_assert!(r2.is_nan() || (0.0..=1.0).contains(&r2));
        prop_assert!(fit.slope_std_err >= 0.0);
    }

    /// Shifting y shifts the intercept and leaves the slope alone.
    #[test]
    fn ols_shift_invariance(
        ys in prop::collection::vec(-10.0..10.0f64, 3..20),
        shift in -50.0..50.0f64,
    ) {
        let xs: Vec<f64> = (0..ys.len()).map(|i| i as f64 * 0.1).collect();
        let shifted: Vec<f64> = ys.iter().map(|y| y + shift).collect();
        let base = ols(&xs, &ys).unwrap();
        let moved = ols(&xs, &shifted).unwrap();
        prop_assert!(approx_eq(base.slope, moved.slope, 1e-7));
        prop_assert!(approx_eq(base.intercept + shift, moved.intercept, 1e-7));
    }
}

// ============================================================================
// Grid properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// The last grid value never overshoots the upper bound.
    #[test]
    fn grid_stays_within_bounds(lo in -2.0..8.0f64, span in 0.0..5.0f64, step in 0.01..1.0f64) {
        let hi = lo + span;
        let n = grid_len(lo, hi, step);
        prop_assert!(n >= 1);
        let last = grid_value(lo, step, n - 1);
        prop_assert!(last <= hi + step * 1e-6 + 1e-9, "last {} > hi {}", last, hi);
        prop_assert!(last + step > hi - step * 1e-6);
    }

    /// Snapping is idempotent.
    #[test]
    fn snap_idempotent(x in -1000.0..1000.0f64) {
        let once = snap(x, GRID_DECIMALS);
        prop_assert_eq!(snap(once, GRID_DECIMALS), once);
        prop_assert!(approx_eq(once, x, TOL));
    }
}

// ============================================================================
// Curvature properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Scaling the distribution does not move the curvature peak.
    #[test]
    fn curvature_peak_scale_invariant(
        counts in prop::collection::vec(0u32..500, 3..40),
        scale in 1u32..10,
    ) {
        let base: Vec<f64> = counts.iter().map(|&c| c as f64).collect();
        let scaled: Vec<f64> = base.iter().map(|c| c * scale as f64).collect();
        prop_assert_eq!(
            argmax_first(&peak_curvature(&base)),
            argmax_first(&peak_curvature(&scaled))
        );
    }
}
