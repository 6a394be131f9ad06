//! Inclusive parameter sweeps for rotation and scale.

use crate::util::math::inclusive_sample_count;

/// Inclusive range `min..=max` sampled every `step`.
///
/// Samples are computed as `min + i * step` for a count derived from
/// `(max - min) / step`, so rounding never adds or drops a boundary sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl SweepRange {
    /// Creates a sweep range.
    pub const fn new(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step }
    }

    /// Single-sample range.
    pub const fn fixed(value: f32) -> Self {
        Self {
            min: value,
            max: value,
            step: 1.0,
        }
    }

    /// Number of samples, or `None` for a degenerate range.
    pub fn sample_count(&self) -> Option<usize> {
        inclusive_sample_count(self.min, self.max, self.step)
    }

    /// Returns the samples in ascending order, or `None` for a degenerate range.
    pub fn samples(&self) -> Option<Vec<f32>> {
        let count = self.sample_count()?;
        Some(
            (0..count)
                .map(|i| {
                    if i + 1 == count && count > 1 {
                        // Land exactly on max when the step divides the span.
                        let last = self.min + i as f32 * self.step;
                        if (last - self.max).abs() <= self.step.abs() * 1e-3 {
                            return self.max;
                        }
                        return last;
                    }
                    self.min + i as f32 * self.step
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::SweepRange;

    #[test]
    fn scale_sweep_hits_both_ends() {
        let samples = SweepRange::new(0.5, 2.0, 0.25).samples().unwrap();
        assert_eq!(samples, vec![0.5, 0.75, 1.0, 1.25, 1.5, 1.75, 2.0]);
    }

    #[test]
    fn tenth_steps_keep_last_sample() {
        let samples = SweepRange::new(0.9, 1.1, 0.1).samples().unwrap();
        assert_eq!(samples.len(), 3);
        assert_eq!(*samples.last().unwrap(), 1.1);
    }

    #[test]
    fn fixed_range_has_one_sample() {
        assert_eq!(SweepRange::fixed(0.0).samples().unwrap(), vec![0.0]);
    }

    #[test]
    fn inverted_range_is_degenerate() {
        assert!(SweepRange::new(4.0, -4.0, 1.0).samples().is_none());
        assert!(SweepRange::new(-4.0, 4.0, 0.0).samples().is_none());
    }
}
