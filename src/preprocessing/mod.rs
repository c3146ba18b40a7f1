//! Covariate standardization.
//!
//! Rescales a numeric series to zero mean and unit variance using the sample
//! standard deviation (n−1 denominator), the convention of the inferential
//! setting this crate feeds. Constant-valued input cannot be standardized and
//! fails with [`InferirError::DegenerateInput`].
//!
//! # Example
//!
//! ```
//! use inferir::preprocessing::Standardizer;
//!
//! let raw = vec![2.0, 4.0, 6.0, 8.0];
//! let mut scaler = Standardizer::new();
//! let scaled = scaler.fit_transform(&raw).unwrap();
//!
//! let mean: f64 = scaled.iter().sum::<f64>() / scaled.len() as f64;
//! assert!(mean.abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{InferirError, Result};
use crate::stats;

/// Rescales a series to zero mean, unit sample variance.
///
/// Fitted state is held as `Option`s; transforming before fitting is an
/// error. `fit` learns the mean and sample standard deviation, `transform`
/// applies `(x - mean) / std` element-wise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Standardizer {
    /// Mean of the fitted series.
    mean: Option<f64>,
    /// Sample standard deviation (n−1) of the fitted series.
    std: Option<f64>,
}

impl Default for Standardizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Standardizer {
    /// Creates an unfitted standardizer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mean: None,
            std: None,
        }
    }

    /// Mean of the fitted series, if fitted.
    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        self.mean
    }

    /// Sample standard deviation of the fitted series, if fitted.
    #[must_use]
    pub fn std(&self) -> Option<f64> {
        self.std
    }

    /// Learns the mean and sample standard deviation of `series`.
    ///
    /// # Errors
    ///
    /// Returns [`InferirError::DegenerateInput`] if the series has fewer than
    /// two values or zero variance.
    pub fn fit(&mut self, series: &[f64]) -> Result<()> {
        if series.len() < 2 {
            return Err(InferirError::DegenerateInput {
                context: format!(
                    "need at least 2 values to standardize, got {}",
                    series.len()
                ),
            });
        }

        let std = stats::sample_std(series);
        if std <= 0.0 || !std.is_finite() {
            return Err(InferirError::DegenerateInput {
                context: "series has zero variance".to_string(),
            });
        }

        self.mean = Some(stats::mean(series));
        self.std = Some(std);
        Ok(())
    }

    /// Applies `(x - mean) / std` using the fitted parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the standardizer is not fitted.
    pub fn transform(&self, series: &[f64]) -> Result<Vec<f64>> {
        let mean = self.mean.ok_or_else(|| InferirError::from("Standardizer not fitted"))?;
        let std = self.std.ok_or_else(|| InferirError::from("Standardizer not fitted"))?;

        Ok(series.iter().map(|x| (x - mean) / std).collect())
    }

    /// Fits and transforms in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails.
    pub fn fit_transform(&mut self, series: &[f64]) -> Result<Vec<f64>> {
        self.fit(series)?;
        self.transform(series)
    }
}

/// Standardizes a series in one call.
///
/// Convenience wrapper over [`Standardizer`] for the common fit-and-transform
/// on the same data.
///
/// # Errors
///
/// Returns [`InferirError::DegenerateInput`] for constant or too-short input.
pub fn standardize(series: &[f64]) -> Result<Vec<f64>> {
    Standardizer::new().fit_transform(series)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standardize_mean_zero_std_one() {
        let raw = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let scaled = standardize(&raw).unwrap();

        assert!((crate::stats::mean(&scaled)).abs() < 1e-12);
        assert!((crate::stats::sample_std(&scaled) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_standardize_idempotent_on_shape() {
        // Re-standardizing an already standardized series barely moves it.
        let raw = vec![10.0, 20.0, 15.0, 30.0, 25.0];
        let once = standardize(&raw).unwrap();
        let twice = standardize(&once).unwrap();
        for (a, b) in once.iter().zip(twice.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_zero_variance_fails() {
        let err = standardize(&[3.0, 3.0, 3.0]).unwrap_err();
        assert!(matches!(err, InferirError::DegenerateInput { .. }));
        assert!(err.to_string().contains("zero variance"));
    }

    #[test]
    fn test_too_short_fails() {
        assert!(standardize(&[]).is_err());
        assert!(standardize(&[1.0]).is_err());
    }

    #[test]
    fn test_transform_before_fit_fails() {
        let scaler = Standardizer::new();
        assert!(scaler.transform(&[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_fitted_parameters_accessible() {
        let mut scaler = Standardizer::new();
        scaler.fit(&[2.0, 4.0, 6.0]).unwrap();
        assert!((scaler.mean().unwrap() - 4.0).abs() < 1e-12);
        assert!((scaler.std().unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_transform_new_data_with_fitted_params() {
        // Fit on one series, transform another with the same parameters.
        let mut scaler = Standardizer::new();
        scaler.fit(&[0.0, 10.0]).unwrap();
        let out = scaler.transform(&[5.0]).unwrap();
        assert!((out[0] - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_uses_sample_std_not_population() {
        // For [0, 10]: sample std = sqrt(50), population std = 5.
        let scaled = standardize(&[0.0, 10.0]).unwrap();
        let expected = 5.0 / 50.0f64.sqrt();
        assert!((scaled[1] - expected).abs() < 1e-12);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_standardized_invariants(
                values in prop::collection::vec(-1e4..1e4f64, 3..200),
            ) {
                // Skip effectively-constant inputs.
                prop_assume!(crate::stats::sample_std(&values) > 1e-6);

                let scaled = standardize(&values).unwrap();
                prop_assert!(crate::stats::mean(&scaled).abs() < 1e-7);
                prop_assert!((crate::stats::sample_std(&scaled) - 1.0).abs() < 1e-7);
            }
        }
    }
}
