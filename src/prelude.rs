//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use inferir::prelude::*;
//! ```

pub use crate::dataset::{Dataset, Record};
pub use crate::error::{InferirError, Result};
pub use crate::model::BayesianModel;
pub use crate::preprocessing::{standardize, Standardizer};
pub use crate::sampler::{CancelToken, Posterior, Sampler, SamplerConfig};
pub use crate::spatial::{weighted_distance, GroupAggregator, Point};
pub use crate::summary::{summarize, PosteriorSummary};
