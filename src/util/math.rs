//! Angle helpers shared by the warp and the pose sweep.

/// Computes sine and cosine for an angle in degrees.
pub(crate) fn sin_cos_deg(angle_deg: f32) -> (f32, f32) {
    angle_deg.to_radians().sin_cos()
}

/// Number of samples in `min..=max` with a positive `step`.
///
/// The count comes from `(max - min) / step` with a small tolerance, so steps
/// like `0.1` do not lose the last sample to rounding.
pub(crate) fn inclusive_sample_count(min: f32, max: f32, step: f32) -> Option<usize> {
    if !min.is_finite() || !max.is_finite() || !step.is_finite() || max < min {
        return None;
    }
    let span = max - min;
    if span == 0.0 {
        return Some(1);
    }
    if step <= 0.0 {
        return None;
    }
    let ratio = f64::from(span) / f64::from(step);
    let count = (ratio + 1e-4).floor();
    if count >= usize::MAX as f64 {
        return None;
    }
    Some(count as usize + 1)
}
