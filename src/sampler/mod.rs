//! MCMC sampling from a model's posterior distribution.
//!
//! Adaptive random-walk Metropolis over the joint log-density of a
//! [`BayesianModel`]. Several independent chains run with separate seeded
//! streams and independently jittered starting points; warm-up draws are
//! discarded and the proposal scale adapts only during warm-up, so the kept
//! draws come from a fixed kernel.
//!
//! Positive-support parameters are sampled on the log scale (with the
//! Jacobian folded into the target), so a non-positive `sigma` is never
//! evaluated. Chains are embarrassingly parallel and run on the rayon pool
//! under the `parallel` feature.
//!
//! # Example
//!
//! ```
//! use inferir::model::BayesianModel;
//! use inferir::sampler::{Sampler, SamplerConfig};
//!
//! let v = vec![-1.2, -0.6, 0.0, 0.6, 1.2];
//! let g = vec![0.4, 0.7, 0.5, 0.3, 0.1];
//! let model = BayesianModel::linear_regression(&g, &v).unwrap();
//!
//! let posterior = Sampler::new(&model)
//!     .with_config(SamplerConfig::default().with_n_warmup(200).with_n_samples(100))
//!     .run()
//!     .unwrap();
//! assert_eq!(posterior.chains.len(), 4);
//! ```

mod rng;

pub use rng::ChainRng;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{InferirError, Result};
use crate::model::{BayesianModel, Support};

/// Proposal-scale adaptation happens once per this many warm-up iterations.
const ADAPT_BATCH: usize = 50;

/// Cooperative cancellation flag shared between a caller and running chains.
///
/// Cancelling does not abort mid-iteration; each chain checks the flag once
/// per iteration, stops, and returns the draws it has collected so far.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a token in the not-cancelled state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Sampler run configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Independent chains to run (diagnostics need at least 2).
    pub n_chains: usize,
    /// Warm-up iterations per chain, discarded and used only for adaptation.
    pub n_warmup: usize,
    /// Post-warm-up draws kept per chain.
    pub n_samples: usize,
    /// Run seed; chain streams are derived from it.
    pub seed: u64,
    /// Initial random-walk proposal scale (adapted during warm-up).
    pub initial_scale: f64,
    /// Standard deviation of the starting-point jitter per chain.
    pub init_jitter: f64,
    /// Consecutive non-finite density evaluations tolerated before failing.
    pub max_retries: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            n_chains: 4,
            n_warmup: 1000,
            n_samples: 1000,
            seed: 42,
            initial_scale: 0.2,
            init_jitter: 0.5,
            max_retries: 100,
        }
    }
}

impl SamplerConfig {
    /// Sets the number of chains.
    #[must_use]
    pub fn with_n_chains(mut self, n_chains: usize) -> Self {
        self.n_chains = n_chains;
        self
    }

    /// Sets the warm-up length.
    #[must_use]
    pub fn with_n_warmup(mut self, n_warmup: usize) -> Self {
        self.n_warmup = n_warmup;
        self
    }

    /// Sets the number of kept draws per chain.
    #[must_use]
    pub fn with_n_samples(mut self, n_samples: usize) -> Self {
        self.n_samples = n_samples;
        self
    }

    /// Sets the run seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the initial proposal scale.
    #[must_use]
    pub fn with_initial_scale(mut self, initial_scale: f64) -> Self {
        self.initial_scale = initial_scale;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.n_chains == 0 {
            return Err(InferirError::InvalidHyperparameter {
                param: "n_chains".to_string(),
                value: "0".to_string(),
                constraint: ">= 1".to_string(),
            });
        }
        if self.n_samples == 0 {
            return Err(InferirError::InvalidHyperparameter {
                param: "n_samples".to_string(),
                value: "0".to_string(),
                constraint: ">= 1".to_string(),
            });
        }
        if self.initial_scale <= 0.0 {
            return Err(InferirError::InvalidHyperparameter {
                param: "initial_scale".to_string(),
                value: self.initial_scale.to_string(),
                constraint: "> 0".to_string(),
            });
        }
        Ok(())
    }
}

/// One chain's post-warm-up draws plus its run metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chain {
    /// Chain index within the run.
    pub id: usize,
    /// Seed of this chain's stream.
    pub seed: u64,
    /// Whether the chain was stopped by cancellation before finishing.
    pub interrupted: bool,
    accepted: usize,
    steps: usize,
    draws: Vec<Vec<f64>>,
}

impl Chain {
    /// Kept draws, one `Vec<f64>` of parameter values per iteration.
    #[must_use]
    pub fn draws(&self) -> &[Vec<f64>] {
        &self.draws
    }

    /// Number of kept draws.
    #[must_use]
    pub fn len(&self) -> usize {
        self.draws.len()
    }

    /// Whether the chain holds no draws.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    /// This chain's draws for one parameter.
    #[must_use]
    pub fn param_draws(&self, idx: usize) -> Vec<f64> {
        self.draws.iter().map(|d| d[idx]).collect()
    }

    /// Fraction of post-warm-up proposals accepted.
    #[must_use]
    pub fn acceptance_rate(&self) -> f64 {
        if self.steps == 0 {
            return 0.0;
        }
        self.accepted as f64 / self.steps as f64
    }
}

/// All chains of a run, with parameter names in draw order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Posterior {
    /// Parameter names, matching the layout of every draw.
    pub param_names: Vec<String>,
    /// The chains, in id order.
    pub chains: Vec<Chain>,
}

impl Posterior {
    /// False if any chain was cut short by cancellation.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.chains.iter().all(|c| !c.interrupted)
    }

    /// Total kept draws across chains.
    #[must_use]
    pub fn n_draws(&self) -> usize {
        self.chains.iter().map(Chain::len).sum()
    }

    /// Position of a parameter by name.
    #[must_use]
    pub fn param_index(&self, name: &str) -> Option<usize> {
        self.param_names.iter().position(|n| n == name)
    }
}

/// Adaptive random-walk Metropolis sampler over a model's posterior.
#[derive(Debug)]
pub struct Sampler<'a> {
    model: &'a BayesianModel,
    config: SamplerConfig,
}

impl<'a> Sampler<'a> {
    /// Creates a sampler with the default configuration.
    #[must_use]
    pub fn new(model: &'a BayesianModel) -> Self {
        Self {
            model,
            config: SamplerConfig::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: SamplerConfig) -> Self {
        self.config = config;
        self
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Runs all chains to completion.
    ///
    /// # Errors
    ///
    /// Returns an error on invalid configuration or if any chain exhausts
    /// its non-finite-density retry budget.
    pub fn run(&self) -> Result<Posterior> {
        self.run_with_cancel(&CancelToken::new())
    }

    /// Runs all chains, checking `cancel` between iterations.
    ///
    /// On cancellation every chain stops at its next check, keeps the draws
    /// collected so far, and is flagged [`Chain::interrupted`]; the partial
    /// posterior is returned, not discarded.
    ///
    /// # Errors
    ///
    /// Returns an error on invalid configuration or if any chain exhausts
    /// its non-finite-density retry budget.
    pub fn run_with_cancel(&self, cancel: &CancelToken) -> Result<Posterior> {
        self.config.validate()?;

        let ids: Vec<usize> = (0..self.config.n_chains).collect();

        #[cfg(feature = "parallel")]
        let results: Vec<Result<Chain>> = ids
            .into_par_iter()
            .map(|id| run_chain(self.model, &self.config, id, cancel))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let results: Vec<Result<Chain>> = ids
            .into_iter()
            .map(|id| run_chain(self.model, &self.config, id, cancel))
            .collect();

        let chains = results.into_iter().collect::<Result<Vec<Chain>>>()?;

        Ok(Posterior {
            param_names: self.model.param_names(),
            chains,
        })
    }
}

/// Maps an unconstrained value to the parameter's support.
fn to_constrained(z: f64, support: Support) -> f64 {
    match support {
        Support::Real => z,
        Support::Positive => z.exp(),
    }
}

/// Joint log-density in unconstrained space, Jacobian included.
fn log_target(model: &BayesianModel, supports: &[Support], z: &[f64]) -> f64 {
    let theta: Vec<f64> = z
        .iter()
        .zip(supports.iter())
        .map(|(&zi, &s)| to_constrained(zi, s))
        .collect();

    let mut lp = model.log_density(&theta);
    for (&zi, &s) in z.iter().zip(supports.iter()) {
        if s == Support::Positive {
            lp += zi; // log |d exp(z) / dz|
        }
    }
    lp
}

fn run_chain(
    model: &BayesianModel,
    config: &SamplerConfig,
    chain_id: usize,
    cancel: &CancelToken,
) -> Result<Chain> {
    let n_params = model.n_params();
    let supports: Vec<Support> = (0..n_params)
        .map(|i| model.prior(i).map_or(Support::Real, |p| p.support()))
        .collect();

    let mut rng = ChainRng::for_chain(config.seed, chain_id);
    let seed = rng.seed();

    // Independently jittered starting point with a finite density.
    let mut z = vec![0.0; n_params];
    let mut lp = f64::NEG_INFINITY;
    let mut attempts = 0;
    while !lp.is_finite() {
        if attempts > config.max_retries {
            return Err(InferirError::NonFiniteLikelihood { attempts });
        }
        for zi in &mut z {
            *zi = rng.normal(0.0, config.init_jitter);
        }
        lp = log_target(model, &supports, &z);
        attempts += 1;
    }

    let mut scale = config.initial_scale;
    let mut draws = Vec::with_capacity(config.n_samples.min(65_536));
    let mut accepted = 0;
    let mut steps = 0;
    let mut batch_accepted: u32 = 0;
    let mut nonfinite_streak = 0;
    let mut interrupted = false;

    let total = config.n_warmup + config.n_samples;
    let mut proposal = vec![0.0; n_params];

    for iter in 0..total {
        if cancel.is_cancelled() {
            interrupted = true;
            break;
        }

        for (p, &zi) in proposal.iter_mut().zip(z.iter()) {
            *p = zi + rng.normal(0.0, scale);
        }
        let lp_proposal = log_target(model, &supports, &proposal);

        let warming_up = iter < config.n_warmup;
        if !warming_up {
            steps += 1;
        }

        if lp_proposal.is_finite() {
            nonfinite_streak = 0;
            // Metropolis accept test; the proposal is symmetric.
            if rng.uniform().ln() < lp_proposal - lp {
                z.copy_from_slice(&proposal);
                lp = lp_proposal;
                batch_accepted += 1;
                if !warming_up {
                    accepted += 1;
                }
            }
        } else {
            // Propose-and-reject; repeated non-finite densities are an error.
            nonfinite_streak += 1;
            if nonfinite_streak > config.max_retries {
                return Err(InferirError::NonFiniteLikelihood {
                    attempts: nonfinite_streak,
                });
            }
        }

        if warming_up && (iter + 1) % ADAPT_BATCH == 0 {
            let rate = f64::from(batch_accepted) / ADAPT_BATCH as f64;
            if rate > 0.35 {
                scale *= 1.2;
            } else if rate < 0.2 {
                scale /= 1.2;
            }
            scale = scale.clamp(1e-4, 5.0);
            batch_accepted = 0;
        }

        if !warming_up {
            let theta: Vec<f64> = z
                .iter()
                .zip(supports.iter())
                .map(|(&zi, &s)| to_constrained(zi, s))
                .collect();
            draws.push(theta);
        }
    }

    Ok(Chain {
        id: chain_id,
        seed,
        interrupted,
        accepted,
        steps,
        draws,
    })
}

#[cfg(test)]
#[path = "sampler_tests.rs"]
mod tests;
