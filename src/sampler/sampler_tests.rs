use super::*;
use crate::model::BayesianModel;

fn toy_model() -> BayesianModel {
    // Ten observations on the line g = 0.2 + 0.5 v with noise baked in.
    let v = vec![-1.5, -1.0, -0.5, -0.2, 0.0, 0.2, 0.5, 1.0, 1.2, 1.5];
    let g = vec![-0.6, -0.3, 0.0, 0.1, 0.3, 0.2, 0.5, 0.7, 0.8, 1.0];
    BayesianModel::linear_regression(&g, &v).expect("valid model")
}

fn quick_config() -> SamplerConfig {
    SamplerConfig::default()
        .with_n_chains(2)
        .with_n_warmup(300)
        .with_n_samples(200)
        .with_seed(42)
}

#[test]
fn test_config_defaults() {
    let config = SamplerConfig::default();
    assert_eq!(config.n_chains, 4);
    assert_eq!(config.n_warmup, 1000);
    assert_eq!(config.n_samples, 1000);
    assert!(config.initial_scale > 0.0);
}

#[test]
fn test_config_builder() {
    let config = SamplerConfig::default()
        .with_n_chains(8)
        .with_n_warmup(50)
        .with_n_samples(75)
        .with_seed(7)
        .with_initial_scale(0.3);
    assert_eq!(config.n_chains, 8);
    assert_eq!(config.n_warmup, 50);
    assert_eq!(config.n_samples, 75);
    assert_eq!(config.seed, 7);
    assert!((config.initial_scale - 0.3).abs() < 1e-12);
}

#[test]
fn test_zero_chains_rejected() {
    let model = toy_model();
    let err = Sampler::new(&model)
        .with_config(SamplerConfig::default().with_n_chains(0))
        .run()
        .unwrap_err();
    assert!(matches!(err, InferirError::InvalidHyperparameter { .. }));
}

#[test]
fn test_zero_samples_rejected() {
    let model = toy_model();
    let err = Sampler::new(&model)
        .with_config(SamplerConfig::default().with_n_samples(0))
        .run()
        .unwrap_err();
    assert!(matches!(err, InferirError::InvalidHyperparameter { .. }));
}

#[test]
fn test_run_shape() {
    let model = toy_model();
    let posterior = Sampler::new(&model).with_config(quick_config()).run().unwrap();

    assert_eq!(posterior.chains.len(), 2);
    assert_eq!(posterior.param_names, vec!["a", "b", "sigma"]);
    assert!(posterior.is_complete());
    for chain in &posterior.chains {
        assert_eq!(chain.len(), 200);
        assert!(!chain.interrupted);
        for draw in chain.draws() {
            assert_eq!(draw.len(), 3);
        }
    }
    assert_eq!(posterior.n_draws(), 400);
}

#[test]
fn test_sigma_draws_always_positive() {
    let model = toy_model();
    let posterior = Sampler::new(&model).with_config(quick_config()).run().unwrap();
    let sigma_idx = posterior.param_index("sigma").unwrap();
    for chain in &posterior.chains {
        for value in chain.param_draws(sigma_idx) {
            assert!(value > 0.0, "sigma draw not positive: {value}");
        }
    }
}

#[test]
fn test_seeded_runs_reproducible() {
    let model = toy_model();
    let a = Sampler::new(&model).with_config(quick_config()).run().unwrap();
    let b = Sampler::new(&model).with_config(quick_config()).run().unwrap();

    for (ca, cb) in a.chains.iter().zip(b.chains.iter()) {
        assert_eq!(ca.seed, cb.seed);
        for (da, db) in ca.draws().iter().zip(cb.draws().iter()) {
            for (x, y) in da.iter().zip(db.iter()) {
                assert_eq!(x.to_bits(), y.to_bits());
            }
        }
    }
}

#[test]
fn test_chains_are_distinct() {
    let model = toy_model();
    let posterior = Sampler::new(&model).with_config(quick_config()).run().unwrap();
    let first = &posterior.chains[0];
    let second = &posterior.chains[1];

    assert_ne!(first.seed, second.seed);
    let identical = first
        .draws()
        .iter()
        .zip(second.draws().iter())
        .filter(|(a, b)| a == b)
        .count();
    assert!(identical < first.len() / 2, "chains look like copies");
}

#[test]
fn test_acceptance_rate_reasonable() {
    let model = toy_model();
    let posterior = Sampler::new(&model).with_config(quick_config()).run().unwrap();
    for chain in &posterior.chains {
        let rate = chain.acceptance_rate();
        assert!(rate > 0.02, "chain {} barely moves: {rate}", chain.id);
        assert!(rate < 0.98, "chain {} accepts everything: {rate}", chain.id);
    }
}

#[test]
fn test_precancelled_run_returns_flagged_empty_chains() {
    let model = toy_model();
    let cancel = CancelToken::new();
    cancel.cancel();

    let posterior = Sampler::new(&model)
        .with_config(quick_config())
        .run_with_cancel(&cancel)
        .unwrap();

    assert!(!posterior.is_complete());
    for chain in &posterior.chains {
        assert!(chain.interrupted);
        assert!(chain.is_empty());
    }
}

#[test]
fn test_cancel_token_flag() {
    let token = CancelToken::new();
    assert!(!token.is_cancelled());
    let clone = token.clone();
    clone.cancel();
    assert!(token.is_cancelled());
}

#[test]
fn test_non_finite_data_errors() {
    let g = vec![0.1, f64::NAN, 0.3];
    let v = vec![0.0, 0.5, 1.0];
    let model = BayesianModel::linear_regression(&g, &v).unwrap();

    let err = Sampler::new(&model).with_config(quick_config()).run().unwrap_err();
    assert!(matches!(err, InferirError::NonFiniteLikelihood { .. }));
}

#[test]
fn test_posterior_param_index() {
    let model = toy_model();
    let posterior = Sampler::new(&model).with_config(quick_config()).run().unwrap();
    assert_eq!(posterior.param_index("a"), Some(0));
    assert_eq!(posterior.param_index("sigma"), Some(2));
    assert_eq!(posterior.param_index("nope"), None);
}

#[test]
fn test_posterior_serializes() {
    let model = toy_model();
    let posterior = Sampler::new(&model)
        .with_config(quick_config().with_n_samples(5).with_n_warmup(20))
        .run()
        .unwrap();
    let json = serde_json::to_string(&posterior).unwrap();
    let back: Posterior = serde_json::from_str(&json).unwrap();
    assert_eq!(back.param_names, posterior.param_names);
    assert_eq!(back.n_draws(), posterior.n_draws());
}

#[test]
fn test_posterior_concentrates_near_slope() {
    // The toy data has a clearly positive slope; the posterior mean of b
    // should land well above zero.
    let model = toy_model();
    let posterior = Sampler::new(&model)
        .with_config(
            SamplerConfig::default()
                .with_n_chains(2)
                .with_n_warmup(800)
                .with_n_samples(800)
                .with_seed(11),
        )
        .run()
        .unwrap();

    let b_idx = posterior.param_index("b").unwrap();
    let mut all = Vec::new();
    for chain in &posterior.chains {
        all.extend(chain.param_draws(b_idx));
    }
    let mean = crate::stats::mean(&all);
    assert!(mean > 0.2, "posterior slope mean too low: {mean}");
}
