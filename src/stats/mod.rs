//! Descriptive statistics shared across the crate.
//!
//! Small f64 helpers used by preprocessing and posterior summarization:
//! mean, sample variance (n−1), percentiles with linear interpolation, and
//! a compact `Statistics` summary.

use serde::{Deserialize, Serialize};

/// Mean of a slice. Returns 0.0 for empty input.
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance (n−1 denominator). Returns 0.0 for fewer than two values.
#[must_use]
pub fn sample_variance(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (n - 1) as f64
}

/// Sample standard deviation (n−1 denominator).
#[must_use]
pub fn sample_std(values: &[f64]) -> f64 {
    sample_variance(values).sqrt()
}

/// Calculate a percentile from a slice of values.
///
/// Uses linear interpolation between data points; `p` is clamped to [0, 1].
#[must_use]
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let p = p.clamp(0.0, 1.0);
    let n = sorted.len();

    if n == 1 {
        return sorted[0];
    }

    let idx = p * (n - 1) as f64;
    let lower = idx.floor() as usize;
    let upper = idx.ceil() as usize;
    let frac = idx - lower as f64;

    if lower == upper {
        sorted[lower]
    } else {
        sorted[lower] * (1.0 - frac) + sorted[upper] * frac
    }
}

/// Summary statistics for a sample.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Statistics {
    /// Sample mean
    pub mean: f64,
    /// Sample standard deviation (n−1)
    pub std: f64,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
    /// Number of samples
    pub n: usize,
}

impl Statistics {
    /// Calculate statistics from values.
    #[must_use]
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Self {
            mean: mean(values),
            std: sample_std(values),
            min,
            max,
            n: values.len(),
        }
    }

    /// Standard error of the mean.
    #[must_use]
    pub fn sem(&self) -> f64 {
        if self.n > 0 {
            self.std / (self.n as f64).sqrt()
        } else {
            f64::INFINITY
        }
    }
}
