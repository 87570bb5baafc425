//! Plan snapshot: every record one computation reads, fully materialized.
//!
//! A snapshot is taken before each recomputation and never mutated by the
//! computation layer. It round-trips through JSON so a plan can be
//! exported from one store and replayed elsewhere.

use crate::{
    error::PlanResult,
    model::{Assignment, Employee, Project},
    pool::{InternalPoolEntry, NamedPoolEntry, PoolLedger, PoolToggles},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanSnapshot {
    pub employees:   Vec<Employee>,
    pub projects:    Vec<Project>,
    pub assignments: Vec<Assignment>,
    #[serde(default)]
    pub internal_pools:      Vec<InternalPoolEntry>,
    #[serde(default)]
    pub subcontracted_pools: Vec<NamedPoolEntry>,
    #[serde(default)]
    pub external_pools:      Vec<NamedPoolEntry>,
}

impl PlanSnapshot {
    pub fn pool_ledger(&self) -> PoolLedger {
        PoolLedger::from_entries(
            &self.internal_pools,
            &self.subcontracted_pools,
            &self.external_pools,
        )
    }

    /// Every company and team with recorded capacity switched on.
    pub fn default_toggles(&self) -> PoolToggles {
        PoolToggles::all_active(&self.pool_ledger())
    }

    /// Check every record's invariants.
    pub fn validate(&self) -> PlanResult<()> {
        for e in &self.employees {
            e.validate()?;
        }
        for p in &self.projects {
            p.validate()?;
        }
        for a in &self.assignments {
            a.validate()?;
        }
        let pools = self
            .internal_pools
            .iter()
            .map(|e| e.capacity)
            .chain(self.subcontracted_pools.iter().map(|e| e.capacity))
            .chain(self.external_pools.iter().map(|e| e.capacity));
        for capacity in pools {
            crate::pool::validate_pool_value(capacity)?;
        }
        Ok(())
    }

    pub fn to_json(&self) -> PlanResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> PlanResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let snapshot = Self::from_json(&content)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        std::fs::write(path, self.to_json()?)
            .map_err(|e| anyhow::anyhow!("Cannot write {path}: {e}"))?;
        Ok(())
    }
}
