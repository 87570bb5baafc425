//! Capacity aggregator: planned vs. available capacity per department-week.
//!
//! For one department and one week:
//!   assigned  = hours of assignments booked by active employees of the
//!               department in that week (split bookings count both halves)
//!   available = internal pool
//!             + active subcontract company pools (if the department
//!               supports subcontracting)
//!             + active external team pools (if the department supports
//!               external teams)
//!   net       = available - assigned
//!
//! Departments that display talent units convert each pool value and the
//! assigned total with the talent normalizer before summing; raw-hours
//! departments keep hours. Utilization and tier always come from the
//! unrounded hour totals. Pure: inputs are borrowed and never modified.

use crate::{
    calendar::{parse_iso_date, week_start},
    config::PlanConfig,
    department::Department,
    error::PlanResult,
    model::{Assignment, Employee},
    pool::{PoolLedger, PoolToggles},
    talent::{round_half_up_2, talent_with_baseline},
    types::Hours,
    utilization::{Tier, Utilization},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Unit of `available`, `assigned` and `net` in a `WeekCapacity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacityUnit {
    Hours,
    Talent,
}

/// One snapshot of everything the aggregator reads.
#[derive(Debug, Clone, Copy)]
pub struct CapacityInputs<'a> {
    pub employees:   &'a [Employee],
    pub assignments: &'a [Assignment],
    pub pools:       &'a PoolLedger,
    pub toggles:     &'a PoolToggles,
}

/// Aggregate for one (department, week) cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekCapacity {
    pub department:  Department,
    pub week_start:  NaiveDate,
    pub unit:        CapacityUnit,
    pub available:   f64,
    pub assigned:    f64,
    pub net:         f64,
    pub utilization: Utilization,
    /// None when there is no capacity to measure against.
    pub tier:        Option<Tier>,
}

impl WeekCapacity {
    pub fn utilization_percent(&self) -> Option<f64> {
        self.utilization.percent()
    }

    pub fn is_over_allocated(&self) -> bool {
        self.net < 0.0
    }
}

/// Raw hours assigned to `department` in the week of `week`.
pub fn assigned_hours(
    department:  Department,
    week:        NaiveDate,
    employees:   &[Employee],
    assignments: &[Assignment],
) -> Hours {
    let week = week_start(week);
    let members: HashSet<&str> = employees
        .iter()
        .filter(|e| e.is_active && e.department == department)
        .map(|e| e.id.as_str())
        .collect();

    assignments
        .iter()
        .filter(|a| week_start(a.week_start_date) == week)
        .filter(|a| members.contains(a.employee_id.as_str()))
        .map(Assignment::total_hours)
        .sum()
}

/// Raw assigned hours for every (department, week) at once.
pub fn assigned_hours_index(
    employees:   &[Employee],
    assignments: &[Assignment],
) -> HashMap<(Department, NaiveDate), Hours> {
    let departments: HashMap<&str, Department> = employees
        .iter()
        .filter(|e| e.is_active)
        .map(|e| (e.id.as_str(), e.department))
        .collect();

    let mut index = HashMap::new();
    for assignment in assignments {
        if let Some(department) = departments.get(assignment.employee_id.as_str()) {
            *index
                .entry((*department, week_start(assignment.week_start_date)))
                .or_insert(0.0) += assignment.total_hours();
        }
    }
    index
}

/// Pool values counting toward `department` in the week of `week`, in hours.
/// Inactive companies and teams are skipped.
fn pool_contributions(
    department: Department,
    week:       NaiveDate,
    pools:      &PoolLedger,
    toggles:    &PoolToggles,
) -> Vec<Hours> {
    let profile = department.profile();
    let mut values = vec![pools.internal(department, week)];
    if profile.supports_subcontracting {
        values.extend(
            toggles
                .active_companies
                .iter()
                .map(|company| pools.subcontracted(company, week)),
        );
    }
    if profile.supports_external_teams {
        values.extend(toggles.active_teams.iter().map(|team| pools.external(team, week)));
    }
    values
}

/// Build a cell from already-summed assigned hours.
pub fn capacity_from_assigned(
    department:     Department,
    week:           NaiveDate,
    assigned_hours: Hours,
    pools:          &PoolLedger,
    toggles:        &PoolToggles,
    config:         &PlanConfig,
) -> WeekCapacity {
    let week = week_start(week);
    let contributions = pool_contributions(department, week, pools, toggles);
    let baseline = config.talent_baseline_hours;

    let available_hours: Hours = contributions.iter().sum();

    let (unit, available, assigned) = if department.profile().uses_raw_hours_display {
        (CapacityUnit::Hours, available_hours, assigned_hours)
    } else {
        (
            CapacityUnit::Talent,
            contributions
                .iter()
                .map(|h| talent_with_baseline(*h, baseline))
                .sum::<f64>(),
            talent_with_baseline(assigned_hours, baseline),
        )
    };
    let available = round_half_up_2(available);
    let assigned = round_half_up_2(assigned);

    // Measured in hours; the ratio is unit-independent and rounding the
    // talent figures first would shift cells across tier boundaries.
    let utilization = Utilization::from_ratio(assigned_hours, available_hours);
    WeekCapacity {
        department,
        week_start: week,
        unit,
        available,
        assigned,
        net: round_half_up_2(available - assigned),
        utilization,
        tier: utilization.tier(&config.thresholds),
    }
}

/// Aggregate one (department, week) cell from a snapshot.
pub fn capacity_for_week(
    department: Department,
    week:       NaiveDate,
    inputs:     &CapacityInputs<'_>,
    config:     &PlanConfig,
) -> WeekCapacity {
    let assigned = assigned_hours(department, week, inputs.employees, inputs.assignments);
    capacity_from_assigned(department, week, assigned, inputs.pools, inputs.toggles, config)
}

/// `capacity_for_week` for an ISO date string.
pub fn capacity_for_week_str(
    department: Department,
    week:       &str,
    inputs:     &CapacityInputs<'_>,
    config:     &PlanConfig,
) -> PlanResult<WeekCapacity> {
    let week = parse_iso_date(week)?;
    Ok(capacity_for_week(department, week, inputs, config))
}
