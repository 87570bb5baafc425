//! Utilization percentage and severity tiers.
//!
//! Tiers form a total order low < moderate < high < critical. A value equal
//! to a threshold belongs to the higher tier. Thresholds are configuration;
//! two sets exist in deployment history (50/75/100 and 70/90/100).

use crate::{
    error::{PlanError, PlanResult},
    talent::round_half_up_2,
};
use serde::{Deserialize, Serialize};

/// Assigned share of available capacity.
///
/// `NoData` is distinct from `Percent(0.0)`: zero capacity has nothing to
/// measure against, while 0% on nonzero capacity is an idle department.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "percent", rename_all = "snake_case")]
pub enum Utilization {
    NoData,
    Percent(f64),
}

impl Utilization {
    /// `assigned / available * 100`, rounded to two decimals.
    pub fn from_ratio(assigned: f64, available: f64) -> Self {
        if available > 0.0 {
            Self::Percent(round_half_up_2(assigned / available * 100.0))
        } else {
            Self::NoData
        }
    }

    pub fn percent(&self) -> Option<f64> {
        match self {
            Self::NoData => None,
            Self::Percent(p) => Some(*p),
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData)
    }

    pub fn tier(&self, thresholds: &UtilizationThresholds) -> Option<Tier> {
        self.percent().map(|p| thresholds.classify(p))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Low,
    Moderate,
    High,
    Critical,
}

impl Tier {
    /// Over-allocation is an alert state, not just a colour.
    pub fn requires_escalation(&self) -> bool {
        matches!(self, Self::Critical)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low      => "low",
            Self::Moderate => "moderate",
            Self::High     => "high",
            Self::Critical => "critical",
        }
    }
}

/// Lower bounds of the moderate, high and critical tiers, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UtilizationThresholds {
    pub moderate: f64,
    pub high:     f64,
    pub critical: f64,
}

impl Default for UtilizationThresholds {
    fn default() -> Self {
        Self { moderate: 50.0, high: 75.0, critical: 100.0 }
    }
}

impl UtilizationThresholds {
    /// The 70/90/100 set used by the alert-oriented deployment.
    pub fn alert_preset() -> Self {
        Self { moderate: 70.0, high: 90.0, critical: 100.0 }
    }

    pub fn validate(&self) -> PlanResult<()> {
        let ordered = self.moderate > 0.0
            && self.moderate < self.high
            && self.high < self.critical;
        if !ordered || !self.critical.is_finite() {
            return Err(PlanError::InvalidConfig(format!(
                "utilization thresholds must be positive and strictly ascending, got {}/{}/{}",
                self.moderate, self.high, self.critical
            )));
        }
        Ok(())
    }

    /// Step function from percent to tier; boundaries go up.
    pub fn classify(&self, percent: f64) -> Tier {
        if percent >= self.critical {
            Tier::Critical
        } else if percent >= self.high {
            Tier::High
        } else if percent >= self.moderate {
            Tier::Moderate
        } else {
            Tier::Low
        }
    }
}

/// Classify with the default threshold set.
pub fn classify(percent: f64) -> Tier {
    UtilizationThresholds::default().classify(percent)
}

/// A move between two tiers that needs more than a colour change.
pub fn is_escalation(previous: Option<Tier>, current: Option<Tier>) -> bool {
    current.is_some_and(|t| t.requires_escalation())
        && !previous.is_some_and(|t| t.requires_escalation())
}
