//! Error types for Inferir operations.
//!
//! Provides rich error context for library consumers.

use std::fmt;

/// Main error type for Inferir operations.
///
/// Covers degenerate statistical inputs, partition violations in group-wise
/// aggregation, sampler failures, and invalid configuration.
///
/// # Examples
///
/// ```
/// use inferir::error::InferirError;
///
/// let err = InferirError::DegenerateInput {
///     context: "covariate 'grassland' has zero variance".to_string(),
/// };
/// assert!(err.to_string().contains("zero variance"));
/// ```
#[derive(Debug)]
pub enum InferirError {
    /// Input series cannot be standardized (zero variance or too few values).
    DegenerateInput {
        /// What made the input degenerate
        context: String,
    },

    /// A record's zone label matched no computed group.
    ///
    /// Unreachable when groups are induced from the same dataset, but
    /// reported rather than silently producing NaN.
    EmptyGroup {
        /// The offending zone label
        label: String,
    },

    /// The sampler exhausted its retry budget on non-finite joint densities.
    NonFiniteLikelihood {
        /// Consecutive non-finite evaluations before giving up
        attempts: usize,
    },

    /// Convergence diagnostics requested with too few chains.
    InsufficientChains {
        /// Chains available
        found: usize,
        /// Chains required
        required: usize,
    },

    /// Input dimensions don't match for the operation.
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// Invalid hyperparameter value provided.
    InvalidHyperparameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for InferirError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferirError::DegenerateInput { context } => {
                write!(f, "Degenerate input: {context}")
            }
            InferirError::EmptyGroup { label } => {
                write!(f, "No group computed for zone label '{label}'")
            }
            InferirError::NonFiniteLikelihood { attempts } => {
                write!(
                    f,
                    "Non-finite joint density after {attempts} consecutive proposals"
                )
            }
            InferirError::InsufficientChains { found, required } => {
                write!(
                    f,
                    "Convergence diagnostics need at least {required} chains, got {found}"
                )
            }
            InferirError::DimensionMismatch { expected, actual } => {
                write!(f, "Dimension mismatch: expected {expected}, got {actual}")
            }
            InferirError::InvalidHyperparameter {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid hyperparameter: {param} = {value}, expected {constraint}"
                )
            }
            InferirError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for InferirError {}

impl From<&str> for InferirError {
    fn from(msg: &str) -> Self {
        InferirError::Other(msg.to_string())
    }
}

impl From<String> for InferirError {
    fn from(msg: String) -> Self {
        InferirError::Other(msg)
    }
}

#[allow(clippy::cmp_owned)]
impl PartialEq<&str> for InferirError {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, InferirError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_input_display() {
        let err = InferirError::DegenerateInput {
            context: "series 'vineyards' is constant".to_string(),
        };
        assert!(err.to_string().contains("Degenerate input"));
        assert!(err.to_string().contains("vineyards"));
    }

    #[test]
    fn test_empty_group_display() {
        let err = InferirError::EmptyGroup {
            label: "W".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("zone label"));
        assert!(msg.contains('W'));
    }

    #[test]
    fn test_non_finite_likelihood_display() {
        let err = InferirError::NonFiniteLikelihood { attempts: 100 };
        assert!(err.to_string().contains("Non-finite"));
        assert!(err.to_string().contains("100"));
    }

    #[test]
    fn test_insufficient_chains_display() {
        let err = InferirError::InsufficientChains {
            found: 1,
            required: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("at least 2"));
        assert!(msg.contains("got 1"));
    }

    #[test]
    fn test_dimension_mismatch_display() {
        let err = InferirError::DimensionMismatch {
            expected: "135 observations".to_string(),
            actual: "134".to_string(),
        };
        assert!(err.to_string().contains("Dimension mismatch"));
        assert!(err.to_string().contains("135"));
    }

    #[test]
    fn test_invalid_hyperparameter_display() {
        let err = InferirError::InvalidHyperparameter {
            param: "n_chains".to_string(),
            value: "0".to_string(),
            constraint: ">= 1".to_string(),
        };
        assert!(err.to_string().contains("n_chains"));
        assert!(err.to_string().contains(">= 1"));
    }

    #[test]
    fn test_from_str() {
        let err: InferirError = "test error".into();
        assert!(matches!(err, InferirError::Other(_)));
        assert_eq!(err.to_string(), "test error");
    }

    #[test]
    fn test_from_string() {
        let err: InferirError = "test error".to_string().into();
        assert!(matches!(err, InferirError::Other(_)));
    }

    #[test]
    fn test_error_eq_str() {
        let err = InferirError::Other("boom".to_string());
        assert!(err == "boom");
    }

    #[test]
    fn test_error_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        assert_send::<InferirError>();
        assert_sync::<InferirError>();
    }
}
