// dqgate-core/src/domain/quality/stats.rs

use serde::{Deserialize, Serialize};

/// Tukey fence multiplier applied to the interquartile range.
pub const IQR_MULTIPLIER: f64 = 1.5;

/// Inclusive z-score cut-off: a row is flagged when `|z| >= 3`.
pub const ZSCORE_THRESHOLD: f64 = 3.0;

/// Outlier fences derived from the 25th/75th continuous percentiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IqrBounds {
    pub q1: f64,
    pub q3: f64,
    pub lower: f64,
    pub upper: f64,
}

impl IqrBounds {
    pub fn from_quartiles(q1: f64, q3: f64) -> Self {
        let iqr = q3 - q1;
        Self {
            q1,
            q3,
            lower: q1 - IQR_MULTIPLIER * iqr,
            upper: q3 + IQR_MULTIPLIER * iqr,
        }
    }

    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// With a zero IQR the fences collapse onto `[q1, q3]` and every deviation
    /// from the mode is flagged. Kept as is; callers only report it.
    pub fn is_degenerate(&self) -> bool {
        self.iqr() == 0.0
    }

    /// Strictly outside the fences.
    pub fn is_outlier(&self, value: f64) -> bool {
        value < self.lower || value > self.upper
    }
}

/// Standardized deviation of `value` from its group.
///
/// Groups without variance (single observation, identical amounts, NULL
/// stddev) are exempt: the score is forced to 0 so they can never be flagged.
pub fn standardize(value: f64, mean: f64, stddev: Option<f64>) -> f64 {
    match stddev {
        Some(sd) if sd != 0.0 && sd.is_finite() => (value - mean) / sd,
        _ => 0.0,
    }
}

pub fn exceeds_threshold(z_score: f64) -> bool {
    z_score.abs() >= ZSCORE_THRESHOLD
}
