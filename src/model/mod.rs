//! Bayesian regression model as an immutable tagged-variant graph.
//!
//! A [`BayesianModel`] holds named free parameters with priors, named
//! deterministic data columns, and a Normal likelihood whose location and
//! scale are small [`Expr`] trees evaluated per observation. The joint
//! log-density — sum of log-priors plus the pointwise log-likelihood — is the
//! target the sampler draws from. The graph never changes after construction.
//!
//! This is deliberately not a probabilistic-programming language: only the
//! pieces needed for the standardized-covariate regression are represented.
//!
//! # Example
//!
//! ```
//! use inferir::model::BayesianModel;
//!
//! let g = vec![0.1, -0.4, 0.9, -0.6];
//! let v = vec![0.2, -0.1, 1.1, -1.2];
//! let model = BayesianModel::linear_regression(&g, &v).unwrap();
//!
//! let lp = model.log_density(&[0.0, 0.0, 1.0]);
//! assert!(lp.is_finite());
//! ```

use crate::error::{InferirError, Result};

/// Support of a prior distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Support {
    /// The whole real line.
    Real,
    /// Strictly positive reals.
    Positive,
}

/// Prior distribution over a single free parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Prior {
    /// Normal with mean `mu` and standard deviation `sigma`.
    Normal { mu: f64, sigma: f64 },
    /// Exponential with rate `rate` (support: x > 0).
    Exponential { rate: f64 },
}

impl Prior {
    /// Log-density at `x`; `NEG_INFINITY` outside the support.
    #[must_use]
    pub fn log_pdf(&self, x: f64) -> f64 {
        match *self {
            Prior::Normal { mu, sigma } => normal_log_pdf(x, mu, sigma),
            Prior::Exponential { rate } => {
                if x > 0.0 {
                    rate.ln() - rate * x
                } else {
                    f64::NEG_INFINITY
                }
            }
        }
    }

    /// Support of the distribution.
    #[must_use]
    pub fn support(&self) -> Support {
        match self {
            Prior::Normal { .. } => Support::Real,
            Prior::Exponential { .. } => Support::Positive,
        }
    }
}

/// Log-density of Normal(mu, sigma) at `x`.
///
/// `NEG_INFINITY` for non-positive `sigma`.
#[must_use]
pub fn normal_log_pdf(x: f64, mu: f64, sigma: f64) -> f64 {
    if sigma <= 0.0 {
        return f64::NEG_INFINITY;
    }
    let z = (x - mu) / sigma;
    -0.5 * (2.0 * std::f64::consts::PI).ln() - sigma.ln() - 0.5 * z * z
}

/// Per-observation scalar expression over parameters and data columns.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Free parameter by position.
    Param(usize),
    /// Deterministic data column by position, indexed per observation.
    Data(usize),
    /// Constant.
    Const(f64),
    /// Sum of two subexpressions.
    Add(Box<Expr>, Box<Expr>),
    /// Product of two subexpressions.
    Mul(Box<Expr>, Box<Expr>),
}

impl Expr {
    fn eval(&self, params: &[f64], data: &[(String, Vec<f64>)], obs: usize) -> f64 {
        match self {
            Expr::Param(i) => params[*i],
            Expr::Data(i) => data[*i].1[obs],
            Expr::Const(c) => *c,
            Expr::Add(a, b) => a.eval(params, data, obs) + b.eval(params, data, obs),
            Expr::Mul(a, b) => a.eval(params, data, obs) * b.eval(params, data, obs),
        }
    }

    fn check_indices(&self, n_params: usize, n_data: usize) -> Result<()> {
        match self {
            Expr::Param(i) if *i >= n_params => Err(InferirError::Other(format!(
                "Expression references parameter {i} but model has {n_params}"
            ))),
            Expr::Data(i) if *i >= n_data => Err(InferirError::Other(format!(
                "Expression references data column {i} but model has {n_data}"
            ))),
            Expr::Add(a, b) | Expr::Mul(a, b) => {
                a.check_indices(n_params, n_data)?;
                b.check_indices(n_params, n_data)
            }
            _ => Ok(()),
        }
    }
}

/// Hierarchical regression model with a Normal likelihood.
///
/// Immutable after construction; evaluated pointwise across observations by
/// [`BayesianModel::log_density`].
#[derive(Debug, Clone)]
pub struct BayesianModel {
    params: Vec<(String, Prior)>,
    data: Vec<(String, Vec<f64>)>,
    mu: Expr,
    sigma: Expr,
    observed: Vec<f64>,
}

impl BayesianModel {
    /// Builds a model from its parts, validating shapes and indices.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no parameters or observations, a data
    /// column's length differs from the observed vector, or an expression
    /// references an out-of-range parameter or column.
    pub fn new(
        params: Vec<(String, Prior)>,
        data: Vec<(String, Vec<f64>)>,
        mu: Expr,
        sigma: Expr,
        observed: Vec<f64>,
    ) -> Result<Self> {
        if params.is_empty() {
            return Err("Model must have at least one free parameter".into());
        }
        if observed.is_empty() {
            return Err("Model must have at least one observation".into());
        }
        for (name, col) in &data {
            if col.len() != observed.len() {
                return Err(InferirError::DimensionMismatch {
                    expected: format!("{} observations", observed.len()),
                    actual: format!("{} values in data column '{name}'", col.len()),
                });
            }
        }
        mu.check_indices(params.len(), data.len())?;
        sigma.check_indices(params.len(), data.len())?;

        Ok(Self {
            params,
            data,
            mu,
            sigma,
            observed,
        })
    }

    /// The standardized-covariate regression:
    ///
    /// - `a ~ Normal(0, 1)`
    /// - `b ~ Normal(0, 1)`
    /// - `sigma ~ Exponential(1)`
    /// - `observed ~ Normal(a + b * covariate, sigma)`
    ///
    /// Callers standardize both series beforehand; the model takes them as-is.
    ///
    /// # Errors
    ///
    /// Returns an error if the two series differ in length or are empty.
    pub fn linear_regression(observed: &[f64], covariate: &[f64]) -> Result<Self> {
        if observed.len() != covariate.len() {
            return Err(InferirError::DimensionMismatch {
                expected: format!("{} observations", observed.len()),
                actual: format!("{} covariate values", covariate.len()),
            });
        }

        Self::new(
            vec![
                ("a".to_string(), Prior::Normal { mu: 0.0, sigma: 1.0 }),
                ("b".to_string(), Prior::Normal { mu: 0.0, sigma: 1.0 }),
                ("sigma".to_string(), Prior::Exponential { rate: 1.0 }),
            ],
            vec![("V".to_string(), covariate.to_vec())],
            Expr::Add(
                Box::new(Expr::Param(0)),
                Box::new(Expr::Mul(Box::new(Expr::Param(1)), Box::new(Expr::Data(0)))),
            ),
            Expr::Param(2),
            observed.to_vec(),
        )
    }

    /// Number of free parameters.
    #[must_use]
    pub fn n_params(&self) -> usize {
        self.params.len()
    }

    /// Number of observations.
    #[must_use]
    pub fn n_obs(&self) -> usize {
        self.observed.len()
    }

    /// Parameter names, in sampling order.
    #[must_use]
    pub fn param_names(&self) -> Vec<String> {
        self.params.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Prior of the parameter at `idx`.
    #[must_use]
    pub fn prior(&self, idx: usize) -> Option<&Prior> {
        self.params.get(idx).map(|(_, prior)| prior)
    }

    /// Joint log-density at a parameter point.
    ///
    /// Sum of the parameters' log-priors plus the Normal log-likelihood of
    /// the observed vector, evaluated pointwise and summed. Out-of-support
    /// values or a non-positive likelihood scale yield `NEG_INFINITY`; the
    /// density itself is never an error.
    #[must_use]
    pub fn log_density(&self, params: &[f64]) -> f64 {
        debug_assert_eq!(params.len(), self.params.len());

        let mut lp = 0.0;
        for (value, (_, prior)) in params.iter().zip(self.params.iter()) {
            lp += prior.log_pdf(*value);
            if lp == f64::NEG_INFINITY {
                return f64::NEG_INFINITY;
            }
        }

        for (obs, y) in self.observed.iter().enumerate() {
            let mu = self.mu.eval(params, &self.data, obs);
            let sigma = self.sigma.eval(params, &self.data, obs);
            lp += normal_log_pdf(*y, mu, sigma);
            if !lp.is_finite() {
                return f64::NEG_INFINITY;
            }
        }

        lp
    }
}
