use crate::{
    error::{PlanError, PlanResult},
    talent::BASELINE_HOURS,
    types::Hours,
    utilization::UtilizationThresholds,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    /// Weekly hours equal to one talent unit.
    pub talent_baseline_hours: Hours,
    /// Weekly capacity given to new employees.
    pub default_employee_capacity: Hours,
    /// Lower bounds of the moderate/high/critical tiers.
    pub thresholds: UtilizationThresholds,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            talent_baseline_hours:     BASELINE_HOURS,
            default_employee_capacity: BASELINE_HOURS,
            thresholds:                UtilizationThresholds::default(),
        }
    }
}

impl PlanConfig {
    /// Load from a JSON file. Missing keys take their defaults.
    /// In tests, use PlanConfig::default().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: PlanConfig = serde_json::from_str(&content)?;
        config.validate()?;
        log::debug!(
            "loaded plan config from {path}: baseline={} thresholds={}/{}/{}",
            config.talent_baseline_hours,
            config.thresholds.moderate,
            config.thresholds.high,
            config.thresholds.critical
        );
        Ok(config)
    }

    /// Defaults with the 70/90/100 alert thresholds.
    pub fn alert_variant() -> Self {
        Self {
            thresholds: UtilizationThresholds::alert_preset(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> PlanResult<()> {
        if !(self.talent_baseline_hours > 0.0 && self.talent_baseline_hours.is_finite()) {
            return Err(PlanError::InvalidConfig(format!(
                "talent_baseline_hours must be positive, got {}",
                self.talent_baseline_hours
            )));
        }
        if !(0.0..=crate::model::MAX_WEEKLY_HOURS).contains(&self.default_employee_capacity) {
            return Err(PlanError::InvalidConfig(format!(
                "default_employee_capacity {} is outside 0..=168",
                self.default_employee_capacity
            )));
        }
        self.thresholds.validate()
    }
}
