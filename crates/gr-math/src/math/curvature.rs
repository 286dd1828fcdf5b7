//! Discrete curvature of a sampled distribution.

/// Peak curvature `2 v[i] - v[i-1] - v[i+1]` at every index.
///
/// Values outside the slice are taken as zero, so a distribution whose
/// first sample is its largest still shows curvature at index 0. The sign
/// is chosen so that peaks (concave-down points) are positive.
pub fn peak_curvature(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    (0..n)
        .map(|i| {
            let left = if i > 0 { values[i - 1] } else { 0.0 };
            let right = if i + 1 < n { values[i + 1] } else { 0.0 };
            2.0 * values[i] - left - right
        })
        .collect()
}

/// Index of the first maximum, ignoring NaN. `None` if no finite value exists.
pub fn argmax_first(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// True when every value equals the first (vacuously true when empty).
pub fn all_equal(values: &[f64]) -> bool {
    match values.first() {
        Some(first) => values.iter().all(|v| v == first),
        None => true,
    }
}
