//! Convergence diagnostics for MCMC chains.
//!
//! Autocorrelation-adjusted effective sample size and the potential scale
//! reduction factor (r_hat) comparing between- and within-chain variance.
//!
//! Reference: Gelman et al. (2013), "Bayesian Data Analysis", Ch. 11

/// Autocorrelation of `values` at a given lag.
#[must_use]
pub fn autocorrelation(values: &[f64], lag: usize) -> f64 {
    let n = values.len();
    if lag >= n {
        return 0.0;
    }

    let mean = values.iter().sum::<f64>() / n as f64;
    let variance: f64 = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;

    if variance < 1e-15 {
        return 0.0;
    }

    let covariance: f64 = values[..n - lag]
        .iter()
        .zip(values[lag..].iter())
        .map(|(x, y)| (x - mean) * (y - mean))
        .sum::<f64>()
        / n as f64;

    covariance / variance
}

/// Effective sample size of one chain via truncated autocorrelation.
///
/// ESS = n / (1 + 2 Σ ρ_k), with the lag sum truncated at the first
/// negligible autocorrelation. A raw draw count overstates information
/// content whenever draws are correlated, which MCMC draws always are.
#[must_use]
pub fn ess_autocorr(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 4 {
        return n as f64;
    }

    let max_lag = (n / 2).min(100);
    let mut sum_rho = 0.0;

    for lag in 1..max_lag {
        let rho = autocorrelation(values, lag);
        if rho.abs() < 0.05 {
            break;
        }
        sum_rho += rho;
    }

    let tau = 1.0 + 2.0 * sum_rho;
    if tau > 0.0 {
        (n as f64 / tau).min(n as f64)
    } else {
        n as f64
    }
}

/// Potential scale reduction factor over chains truncated to equal length.
///
/// Classic Gelman-Rubin: with m chains of n draws, W the mean within-chain
/// variance and B/n the between-chain variance of chain means,
/// r_hat = sqrt(((n-1)/n · W + B/n) / W). Near 1.0 for well-mixed chains.
///
/// Callers guarantee m ≥ 2 and n ≥ 2; chains stuck at distinct constants
/// (zero within-chain variance, nonzero spread) yield infinity rather than a
/// silent NaN.
#[must_use]
pub fn r_hat(chains: &[Vec<f64>]) -> f64 {
    let m = chains.len();
    let n = chains.iter().map(Vec::len).min().unwrap_or(0);
    debug_assert!(m >= 2 && n >= 2);

    let chain_means: Vec<f64> = chains
        .iter()
        .map(|c| c[..n].iter().sum::<f64>() / n as f64)
        .collect();
    let grand_mean = chain_means.iter().sum::<f64>() / m as f64;

    // B/n: variance of chain means.
    let b_over_n = chain_means
        .iter()
        .map(|mu| (mu - grand_mean).powi(2))
        .sum::<f64>()
        / (m - 1) as f64;

    // W: mean within-chain sample variance.
    let w = chains
        .iter()
        .zip(chain_means.iter())
        .map(|(c, mu)| c[..n].iter().map(|x| (x - mu).powi(2)).sum::<f64>() / (n - 1) as f64)
        .sum::<f64>()
        / m as f64;

    if w <= 0.0 {
        return if b_over_n <= 0.0 { 1.0 } else { f64::INFINITY };
    }

    let var_plus = (n - 1) as f64 / n as f64 * w + b_over_n;
    (var_plus / w).sqrt()
}
