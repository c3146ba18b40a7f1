//! Inferir: spatial group statistics and Bayesian inference in pure Rust.
//!
//! Inferir analyzes tabular datasets of geolocated observational records —
//! one row per sampled site, with planar coordinates, a categorical zone
//! label, and ecological covariates. Two engines form the core: group-wise
//! mean pairwise-distance aggregation, and MCMC posterior sampling for a
//! standardized-covariate regression with convergence diagnostics.
//!
//! # Quick Start
//!
//! ```
//! use inferir::prelude::*;
//!
//! let ds = Dataset::new(vec![
//!     Record::new("t01", 0.0, 0.0, "N").with_covariate("grassland", 0.4),
//!     Record::new("t02", 3.0, 4.0, "N").with_covariate("grassland", 0.9),
//!     Record::new("t03", 8.0, 2.0, "S").with_covariate("grassland", 0.1),
//! ]).unwrap();
//!
//! // Mean pairwise distance per zone, broadcast back per record.
//! let report = GroupAggregator::new().aggregate(&ds).unwrap();
//! assert!((report.group_means["N"] - 5.0).abs() < 1e-12);
//! assert_eq!(report.per_record.len(), 3);
//! ```
//!
//! # Modules
//!
//! - [`dataset`]: Records and the in-memory survey table
//! - [`spatial`]: Weighted distance and group-wise aggregation
//! - [`preprocessing`]: Covariate standardization
//! - [`model`]: The Bayesian regression model graph
//! - [`sampler`]: Multi-chain adaptive Metropolis MCMC
//! - [`summary`]: Posterior estimates and convergence diagnostics
//! - [`stats`]: Shared descriptive statistics helpers

pub mod dataset;
pub mod error;
pub mod model;
pub mod prelude;
pub mod preprocessing;
pub mod sampler;
pub mod spatial;
pub mod stats;
pub mod summary;

pub use error::{InferirError, Result};
