//! Capacity pools: weekly capacity not tied to a named employee.
//!
//! Three separate namespaces, each keyed by (entity, Monday):
//!   - internal:      department pool entered for high-level planning
//!   - subcontracted: per subcontract company
//!   - external:      per external team
//!
//! Values are hours. Which pools count toward a department, and in which
//! unit, is decided by the aggregator from the department table.

use crate::{
    calendar::week_start,
    department::Department,
    error::{PlanError, PlanResult},
    types::Hours,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternalPoolEntry {
    pub department:      Department,
    pub week_start_date: NaiveDate,
    pub capacity:        Hours,
}

/// A company or team pool entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedPoolEntry {
    pub name:            String,
    pub week_start_date: NaiveDate,
    pub capacity:        Hours,
}

pub(crate) fn validate_pool_value(capacity: Hours) -> PlanResult<()> {
    if capacity < 0.0 || !capacity.is_finite() {
        return Err(PlanError::validation("capacity", "pool capacity cannot be negative"));
    }
    Ok(())
}

/// Lookup tables over the three pool namespaces. Writes normalize the week
/// to its Monday and replace any previous value for the same key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoolLedger {
    internal:      HashMap<(Department, NaiveDate), Hours>,
    subcontracted: HashMap<(String, NaiveDate), Hours>,
    external:      HashMap<(String, NaiveDate), Hours>,
}

impl PoolLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(
        internal:      &[InternalPoolEntry],
        subcontracted: &[NamedPoolEntry],
        external:      &[NamedPoolEntry],
    ) -> Self {
        let mut ledger = Self::new();
        for e in internal {
            ledger.set_internal(e.department, e.week_start_date, e.capacity);
        }
        for e in subcontracted {
            ledger.set_subcontracted(&e.name, e.week_start_date, e.capacity);
        }
        for e in external {
            ledger.set_external(&e.name, e.week_start_date, e.capacity);
        }
        ledger
    }

    pub fn set_internal(&mut self, department: Department, week: NaiveDate, capacity: Hours) {
        self.internal.insert((department, week_start(week)), capacity);
    }

    pub fn set_subcontracted(&mut self, company: &str, week: NaiveDate, capacity: Hours) {
        self.subcontracted.insert((company.to_string(), week_start(week)), capacity);
    }

    pub fn set_external(&mut self, team: &str, week: NaiveDate, capacity: Hours) {
        self.external.insert((team.to_string(), week_start(week)), capacity);
    }

    pub fn internal(&self, department: Department, week: NaiveDate) -> Hours {
        self.internal.get(&(department, week_start(week))).copied().unwrap_or(0.0)
    }

    pub fn subcontracted(&self, company: &str, week: NaiveDate) -> Hours {
        self.subcontracted
            .get(&(company.to_string(), week_start(week)))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn external(&self, team: &str, week: NaiveDate) -> Hours {
        self.external
            .get(&(team.to_string(), week_start(week)))
            .copied()
            .unwrap_or(0.0)
    }

    /// Every company with at least one recorded week.
    pub fn companies(&self) -> BTreeSet<String> {
        self.subcontracted.keys().map(|(c, _)| c.clone()).collect()
    }

    /// Every external team with at least one recorded week.
    pub fn teams(&self) -> BTreeSet<String> {
        self.external.keys().map(|(t, _)| t.clone()).collect()
    }
}

/// Which subcontract companies and external teams currently count toward
/// capacity. Toggling a pool off never touches its recorded values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolToggles {
    pub active_companies: BTreeSet<String>,
    pub active_teams:     BTreeSet<String>,
}

impl PoolToggles {
    /// Every company and team known to `ledger` switched on.
    pub fn all_active(ledger: &PoolLedger) -> Self {
        Self {
            active_companies: ledger.companies(),
            active_teams:     ledger.teams(),
        }
    }

    pub fn set_company(&mut self, company: &str, active: bool) {
        if active {
            self.active_companies.insert(company.to_string());
        } else {
            self.active_companies.remove(company);
        }
    }

    pub fn set_team(&mut self, team: &str, active: bool) {
        if active {
            self.active_teams.insert(team.to_string());
        } else {
            self.active_teams.remove(team);
        }
    }

    pub fn company_active(&self, company: &str) -> bool {
        self.active_companies.contains(company)
    }

    pub fn team_active(&self, team: &str) -> bool {
        self.active_teams.contains(team)
    }
}
