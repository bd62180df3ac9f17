//! Linear calibration of raw classifier output.
//!
//! `score = (raw - known_min) / (known_max - known_min)`, clipped to [0, 1].
//!
//! The classifier's raw probabilities sit in a narrow band, so the band is
//! stretched onto the unit interval before the decision threshold is applied.
//! Non-decreasing in `raw`, flat outside `[known_min, known_max]`.

use crate::domain::CalibrationRange;

/// Rescale `raw` from `[known_min, known_max]` onto [0, 1].
///
/// Callers guarantee `known_max > known_min` (see `ScoringConfig::validate`).
/// A NaN input comes back as NaN.
pub fn calibrate(raw: f64, known_min: f64, known_max: f64) -> f64 {
    let score = (raw - known_min) / (known_max - known_min);
    score.clamp(0.0, 1.0)
}

impl CalibrationRange {
    pub fn calibrate(&self, raw: f64) -> f64 {
        calibrate(raw, self.known_min, self.known_max)
    }
}
