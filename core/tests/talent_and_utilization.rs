use capacity_core::{
    error::PlanError,
    talent::{hours_from_talent, round_half_up_2, talent, talent_with_baseline},
    utilization::{classify, is_escalation, Tier, Utilization, UtilizationThresholds},
};

#[test]
fn talent_units_from_hours() {
    assert_eq!(talent(45.0), 1.0);
    assert_eq!(talent(90.0), 2.0);
    assert_eq!(talent(22.5), 0.5);
    assert_eq!(talent(0.0), 0.0);
    assert_eq!(talent(10.0), 0.22);
    assert_eq!(talent(30.0), 0.67, "0.666.. rounds half-up to 0.67");
}

#[test]
fn configured_baseline_and_degenerate_baseline() {
    assert_eq!(talent_with_baseline(40.0, 40.0), 1.0);
    assert_eq!(talent_with_baseline(40.0, 0.0), 0.0);
    assert_eq!(talent_with_baseline(40.0, -5.0), 0.0);
    assert_eq!(hours_from_talent(2.0, 45.0), 90.0);
}

#[test]
fn half_up_rounding_at_two_decimals() {
    assert_eq!(round_half_up_2(1.005), 1.01);
    assert_eq!(round_half_up_2(2.675), 2.68);
    assert_eq!(round_half_up_2(0.124), 0.12);
    assert_eq!(round_half_up_2(110.0), 110.0);
}

#[test]
fn zero_capacity_is_no_data_not_zero_percent() {
    assert_eq!(Utilization::from_ratio(0.0, 0.0), Utilization::NoData);
    assert_eq!(Utilization::from_ratio(12.0, 0.0), Utilization::NoData);
    assert_eq!(Utilization::from_ratio(0.0, 10.0), Utilization::Percent(0.0));
    assert!(Utilization::NoData.is_no_data());
    assert_eq!(Utilization::NoData.tier(&UtilizationThresholds::default()), None);
}

#[test]
fn over_allocation_reports_above_one_hundred() {
    let u = Utilization::from_ratio(44.0, 40.0);
    assert_eq!(u.percent(), Some(110.0));
    assert_eq!(u.tier(&UtilizationThresholds::default()), Some(Tier::Critical));
    assert_eq!(Utilization::from_ratio(1.0, 3.0).percent(), Some(33.33));
}

#[test]
fn default_thresholds_put_boundaries_in_the_higher_tier() {
    assert_eq!(classify(0.0), Tier::Low);
    assert_eq!(classify(49.99), Tier::Low);
    assert_eq!(classify(50.0), Tier::Moderate);
    assert_eq!(classify(74.99), Tier::Moderate);
    assert_eq!(classify(75.0), Tier::High);
    assert_eq!(classify(99.99), Tier::High);
    assert_eq!(classify(100.0), Tier::Critical);
    assert_eq!(classify(250.0), Tier::Critical);
}

#[test]
fn alert_preset_thresholds() {
    let preset = UtilizationThresholds::alert_preset();
    assert_eq!(preset.classify(69.99), Tier::Low);
    assert_eq!(preset.classify(70.0), Tier::Moderate);
    assert_eq!(preset.classify(90.0), Tier::High);
    assert_eq!(preset.classify(100.0), Tier::Critical);
}

#[test]
fn tiers_are_totally_ordered() {
    assert!(Tier::Low < Tier::Moderate);
    assert!(Tier::Moderate < Tier::High);
    assert!(Tier::High < Tier::Critical);
    assert!(Tier::Critical.requires_escalation());
    assert!(!Tier::High.requires_escalation());
}

#[test]
fn thresholds_must_ascend() {
    assert!(UtilizationThresholds::default().validate().is_ok());
    let bad = UtilizationThresholds { moderate: 75.0, high: 50.0, critical: 100.0 };
    assert!(matches!(bad.validate(), Err(PlanError::InvalidConfig(_))));
    let zero = UtilizationThresholds { moderate: 0.0, high: 50.0, critical: 100.0 };
    assert!(zero.validate().is_err());
}

#[test]
fn escalation_only_on_entering_critical() {
    assert!(is_escalation(Some(Tier::High), Some(Tier::Critical)));
    assert!(is_escalation(None, Some(Tier::Critical)));
    assert!(!is_escalation(Some(Tier::Critical), Some(Tier::Critical)));
    assert!(!is_escalation(Some(Tier::Low), Some(Tier::High)));
    assert!(!is_escalation(Some(Tier::Critical), Some(Tier::High)));
}

#[test]
fn utilization_serializes_with_explicit_state() {
    let no_data = serde_json::to_value(Utilization::NoData).unwrap();
    assert_eq!(no_data, serde_json::json!({ "state": "no_data" }));
    let pct = serde_json::to_value(Utilization::Percent(87.5)).unwrap();
    assert_eq!(pct, serde_json::json!({ "state": "percent", "percent": 87.5 }));
}
