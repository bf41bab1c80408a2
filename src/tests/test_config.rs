use crate::activations::Activation;
use crate::config::DqnConfig;
use crate::error::DqnError;
use crate::loss::LossReduction;
use crate::optimizer::OptimizerConfig;

#[test]
fn test_default_config() {
    let config = DqnConfig::default();

    assert_eq!(config.layer_sizes(), vec![4, 255, 120, 2]);
    assert_eq!(config.output_activation, Activation::Relu);
    assert_eq!(config.epsilon_start, 1.0);
    assert_eq!(config.epsilon_min, 0.01);
    assert_eq!(config.epsilon_decay, 0.999);
    assert_eq!(config.gamma, 0.999);
    assert_eq!(config.learning_rate, 1e-3);
    assert_eq!(config.target_update, 10);
    assert_eq!(config.reward_window, 100);
    assert_eq!(config.success_threshold, 197.0);
    assert!(config.zero_last_bootstrap);
    assert!(!config.bootstrap_on_done);
    assert_eq!(config.loss_reduction, LossReduction::Sum);
    assert!(matches!(config.optimizer, OptimizerConfig::Adam { .. }));
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_rejects_bad_values() {
    let cases = vec![
        DqnConfig { gamma: 1.5, ..DqnConfig::default() },
        DqnConfig { learning_rate: 0.0, ..DqnConfig::default() },
        DqnConfig { learning_rate: f32::NAN, ..DqnConfig::default() },
        DqnConfig { epsilon_decay: 0.0, ..DqnConfig::default() },
        DqnConfig { epsilon_decay: 1.1, ..DqnConfig::default() },
        DqnConfig { epsilon_start: 0.1, epsilon_min: 0.5, ..DqnConfig::default() },
        DqnConfig { target_update: 0, ..DqnConfig::default() },
        DqnConfig { reward_window: 0, ..DqnConfig::default() },
        DqnConfig { success_threshold: f32::NAN, ..DqnConfig::default() },
        DqnConfig { success_threshold: f32::INFINITY, ..DqnConfig::default() },
        DqnConfig { hidden_sizes: vec![16, 0], ..DqnConfig::default() },
        DqnConfig { input_dim: 0, ..DqnConfig::default() },
    ];

    for config in cases {
        assert!(
            matches!(config.validate(), Err(DqnError::InvalidParameter { .. })),
            "accepted {:?}",
            config
        );
    }
}

#[test]
fn test_partial_json_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "gamma": 0.9, "hidden_sizes": [32], "output_activation": "Linear" }"#).unwrap();

    let config = DqnConfig::from_json_file(&path).unwrap();
    assert_eq!(config.gamma, 0.9);
    assert_eq!(config.layer_sizes(), vec![4, 32, 2]);
    assert_eq!(config.output_activation, Activation::Linear);
    assert_eq!(config.target_update, 10);
}

#[test]
fn test_json_file_roundtrip_and_rejection() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let config = DqnConfig {
        seed: Some(3),
        max_episodes: Some(50),
        loss_reduction: LossReduction::Mean,
        ..DqnConfig::default()
    };
    config.to_json_file(&path).unwrap();
    assert_eq!(DqnConfig::from_json_file(&path).unwrap(), config);

    std::fs::write(&path, r#"{ "target_update": 0 }"#).unwrap();
    assert!(matches!(DqnConfig::from_json_file(&path), Err(DqnError::InvalidParameter { .. })));

    std::fs::write(&path, "not json").unwrap();
    assert!(matches!(DqnConfig::from_json_file(&path), Err(DqnError::Serialization(_))));
}
