//! Tests for optimizer configuration.

use super::*;

#[test]
fn test_defaults() {
    let config = OptimizerConfig::default();
    assert_eq!(config.device, DeviceType::MultiSlotUnit);
    assert_eq!(config.total_slots(), 4);
    assert_eq!(config.strategy, Strategy::Intervals);
    assert_eq!(config.algorithm, Algorithm::Greedy);
    assert_eq!(config.annealing.iterations, 10_000);
    assert_eq!(config.annealing.cooling_rate, 0.995);
    assert_eq!(config.seconds_per_swap, 120);
    assert!(config.validate().is_ok());
}

#[test]
fn test_toml_parsing() {
    let toml = r#"
        device = "multi_slot_unit"
        unit_count = 4
        slots_per_unit = 4
        strategy = "legacy"
        algorithm = "simulated_annealing"
        random_seed = 42

        [annealing]
        iterations = 500
        cooling_rate = 0.99

        [termination]
        seconds_spent_limit = 2
        check_interval = 50

        [constraints]
        max_suggestions_per_range = 3
        similarity_threshold = 120.0
    "#;

    let config = OptimizerConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.total_slots(), 16);
    assert_eq!(config.strategy, Strategy::Legacy);
    assert_eq!(config.algorithm, Algorithm::SimulatedAnnealing);
    assert_eq!(config.random_seed, Some(42));
    assert_eq!(config.annealing.iterations, 500);
    assert_eq!(config.annealing.initial_temperature, 10_000.0);
    assert_eq!(config.time_limit(), Some(Duration::from_secs(2)));
    assert_eq!(config.termination.unwrap().check_interval, Some(50));
    assert_eq!(config.constraints.max_suggestions_per_range, 3);
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        device: single_toolhead
        unit_count: 5
        slots_per_unit: 1
        strategy: intervals
        random_seed: 7
    "#;

    let config = OptimizerConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.device, DeviceType::SingleToolhead);
    assert_eq!(config.total_slots(), 5);
    assert_eq!(config.random_seed, Some(7));
    assert!(config.validate().is_ok());
}

#[test]
fn test_builder() {
    let config = OptimizerConfig::multi_slot_unit(2, 4)
        .with_strategy(Strategy::Groups)
        .with_algorithm(Algorithm::SimulatedAnnealing)
        .with_random_seed(123)
        .with_termination_millis(250);

    assert_eq!(config.total_slots(), 8);
    assert_eq!(config.random_seed, Some(123));
    assert_eq!(config.time_limit(), Some(Duration::from_millis(250)));
}

#[test]
fn test_rejects_zero_slots() {
    let config = OptimizerConfig::multi_slot_unit(0, 4);
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

    let config = OptimizerConfig::multi_slot_unit(1, 0);
    assert!(config.validate().is_err());
}

#[test]
fn test_rejects_out_of_range_layout() {
    assert!(OptimizerConfig::multi_slot_unit(17, 4).validate().is_err());
    assert!(OptimizerConfig::multi_slot_unit(16, 5).validate().is_err());
    assert!(OptimizerConfig::multi_slot_unit(16, 4).validate().is_ok());
}

#[test]
fn test_single_toolhead_has_one_slot_per_unit() {
    assert!(OptimizerConfig::single_toolhead(3).validate().is_ok());

    let mut config = OptimizerConfig::single_toolhead(3);
    config.slots_per_unit = 2;
    assert!(config.validate().is_err());
}

#[test]
fn test_rejects_bad_annealing_parameters() {
    let mut config = OptimizerConfig::default();
    config.annealing.cooling_rate = 1.5;
    assert!(config.validate().is_err());

    let mut config = OptimizerConfig::default();
    config.annealing.initial_temperature = 0.0;
    assert!(config.validate().is_err());
}

#[test]
fn test_config_error_maps_to_configuration_error() {
    let err: SwapForgeError = ConfigError::Invalid("bad".to_string()).into();
    assert!(matches!(err, SwapForgeError::Configuration(msg) if msg == "bad"));
}

#[test]
fn test_missing_file_falls_back_to_default() {
    let config = OptimizerConfig::load("does-not-exist.toml").unwrap_or_default();
    assert_eq!(config.total_slots(), 4);
}

#[test]
fn test_load_dispatches_on_extension() {
    let path = std::env::temp_dir().join(format!("swapforge-config-{}.yaml", std::process::id()));
    std::fs::write(&path, "unit_count: 2\nstrategy: groups\n").unwrap();
    let config = OptimizerConfig::load(&path);
    std::fs::remove_file(&path).unwrap();

    let config = config.unwrap();
    assert_eq!(config.total_slots(), 8);
    assert_eq!(config.strategy, Strategy::Groups);
}

#[test]
fn test_time_limit_saturates_on_huge_values() {
    let termination = TerminationConfig {
        seconds_spent_limit: Some(u64::MAX),
        millis_spent_limit: Some(500),
        check_interval: None,
    };
    assert_eq!(termination.time_limit(), Some(Duration::from_millis(u64::MAX)));

    let termination = TerminationConfig {
        seconds_spent_limit: Some(2),
        millis_spent_limit: Some(500),
        check_interval: None,
    };
    assert_eq!(termination.time_limit(), Some(Duration::from_millis(2_500)));
}
