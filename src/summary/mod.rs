//! Posterior summarization.
//!
//! Reduces the chains of a [`Posterior`] into a per-variable table: mean,
//! standard deviation, 94% equal-tailed credible interval, effective sample
//! size, and r_hat. The table `Display`s in aligned columns for callers that
//! print it.
//!
//! # Example
//!
//! ```
//! use inferir::model::BayesianModel;
//! use inferir::sampler::{Sampler, SamplerConfig};
//! use inferir::summary::summarize;
//!
//! let v = vec![-1.2, -0.6, 0.0, 0.6, 1.2];
//! let g = vec![0.4, 0.7, 0.5, 0.3, 0.1];
//! let model = BayesianModel::linear_regression(&g, &v).unwrap();
//! let posterior = Sampler::new(&model)
//!     .with_config(SamplerConfig::default().with_n_warmup(200).with_n_samples(100))
//!     .run()
//!     .unwrap();
//!
//! let summary = summarize(&posterior).unwrap();
//! assert!(summary.get("sigma").unwrap().mean > 0.0);
//! ```

pub mod convergence;

pub use convergence::{autocorrelation, ess_autocorr, r_hat};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{InferirError, Result};
use crate::sampler::{Chain, Posterior};
use crate::stats;

/// Posterior mass of the reported credible interval.
pub const CREDIBLE_MASS: f64 = 0.94;

/// Point estimates, interval, and diagnostics for one variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSummary {
    /// Posterior mean over all chains.
    pub mean: f64,
    /// Posterior standard deviation (n−1).
    pub sd: f64,
    /// Lower bound of the 94% equal-tailed credible interval.
    pub ci_low: f64,
    /// Upper bound of the 94% equal-tailed credible interval.
    pub ci_high: f64,
    /// Autocorrelation-adjusted effective sample size, summed over chains.
    pub ess: f64,
    /// Potential scale reduction factor.
    pub r_hat: f64,
}

/// Per-variable summary table for a posterior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PosteriorSummary {
    rows: Vec<(String, ParamSummary)>,
    /// False when the posterior came from a cancelled run; such estimates
    /// are reported but must not be read as converged.
    pub complete: bool,
}

impl PosteriorSummary {
    /// Rows in parameter order.
    #[must_use]
    pub fn rows(&self) -> &[(String, ParamSummary)] {
        &self.rows
    }

    /// Summary for one variable by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamSummary> {
        self.rows
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s)
    }
}

impl fmt::Display for PosteriorSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<10} {:>9} {:>9} {:>9} {:>9} {:>9} {:>7}",
            "", "mean", "sd", "ci_3%", "ci_97%", "ess", "r_hat"
        )?;
        for (name, s) in &self.rows {
            writeln!(
                f,
                "{:<10} {:>9.3} {:>9.3} {:>9.3} {:>9.3} {:>9.1} {:>7.3}",
                name, s.mean, s.sd, s.ci_low, s.ci_high, s.ess, s.r_hat
            )?;
        }
        if !self.complete {
            writeln!(f, "(incomplete run: estimates are not converged)")?;
        }
        Ok(())
    }
}

/// Summarizes a posterior into per-variable estimates and diagnostics.
///
/// Uses every non-empty chain; chains are truncated to a common length for
/// r_hat only, while means, intervals, and ESS use all draws.
///
/// # Errors
///
/// Returns [`InferirError::InsufficientChains`] with fewer than two
/// non-empty chains — r_hat is undefined on a single chain and the
/// degenerate case is flagged, never silently ignored. Returns
/// [`InferirError::DegenerateInput`] if chains are too short to carry a
/// variance estimate.
pub fn summarize(posterior: &Posterior) -> Result<PosteriorSummary> {
    let usable: Vec<&Chain> = posterior.chains.iter().filter(|c| !c.is_empty()).collect();

    if usable.len() < 2 {
        return Err(InferirError::InsufficientChains {
            found: usable.len(),
            required: 2,
        });
    }

    let min_len = usable.iter().map(|c| c.len()).min().unwrap_or(0);
    if min_len < 2 {
        return Err(InferirError::DegenerateInput {
            context: format!("shortest chain has {min_len} draws, need at least 2"),
        });
    }

    let mut rows = Vec::with_capacity(posterior.param_names.len());

    for (idx, name) in posterior.param_names.iter().enumerate() {
        let per_chain: Vec<Vec<f64>> = usable.iter().map(|c| c.param_draws(idx)).collect();

        let pooled: Vec<f64> = per_chain.iter().flatten().copied().collect();
        let half_tail = (1.0 - CREDIBLE_MASS) / 2.0;

        let ess: f64 = per_chain.iter().map(|draws| ess_autocorr(draws)).sum();

        rows.push((
            name.clone(),
            ParamSummary {
                mean: stats::mean(&pooled),
                sd: stats::sample_std(&pooled),
                ci_low: stats::percentile(&pooled, half_tail),
                ci_high: stats::percentile(&pooled, 1.0 - half_tail),
                ess,
                r_hat: r_hat(&per_chain),
            },
        ));
    }

    Ok(PosteriorSummary {
        rows,
        complete: posterior.is_complete(),
    })
}
