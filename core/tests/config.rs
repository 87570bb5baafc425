use capacity_core::{
    config::PlanConfig,
    error::PlanError,
    utilization::UtilizationThresholds,
};

fn write_temp(name: &str, contents: &str) -> String {
    let path = std::env::temp_dir().join(format!("capacity-core-{}-{name}", std::process::id()));
    std::fs::write(&path, contents).expect("write temp config");
    path.to_string_lossy().into_owned()
}

#[test]
fn shipped_config_matches_defaults() {
    let config = PlanConfig::load("../data/plan_config.json").expect("load data/plan_config.json");
    assert_eq!(config, PlanConfig::default());
}

#[test]
fn missing_keys_take_defaults() {
    let path = write_temp("partial.json", r#"{ "talent_baseline_hours": 40.0 }"#);
    let config = PlanConfig::load(&path).expect("partial config");
    assert_eq!(config.talent_baseline_hours, 40.0);
    assert_eq!(config.thresholds, UtilizationThresholds::default());
    let _ = std::fs::remove_file(path);
}

#[test]
fn invalid_values_are_rejected() {
    let path = write_temp(
        "bad-thresholds.json",
        r#"{ "thresholds": { "moderate": 90.0, "high": 70.0, "critical": 100.0 } }"#,
    );
    assert!(PlanConfig::load(&path).is_err());
    let _ = std::fs::remove_file(path);

    let zero_baseline = PlanConfig { talent_baseline_hours: 0.0, ..PlanConfig::default() };
    assert!(matches!(zero_baseline.validate(), Err(PlanError::InvalidConfig(_))));

    assert!(PlanConfig::load("/definitely/not/here.json").is_err());
}

#[test]
fn alert_variant_uses_the_alert_thresholds() {
    let config = PlanConfig::alert_variant();
    assert_eq!(config.thresholds, UtilizationThresholds::alert_preset());
    assert!(config.validate().is_ok());
}
