//! Per-employee load: weekly bookings against personal capacity, and the
//! period report that flags under- and over-allocated people.

use crate::{
    calendar::{week_start, WeekRange},
    department::Department,
    model::{Assignment, Employee},
    talent::round_half_up_2,
    types::{EntityId, Hours},
    utilization::{Tier, Utilization, UtilizationThresholds},
};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Weeks shown by the employee workload view.
pub const DEFAULT_WORKLOAD_WEEKS: u32 = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeWeekLoad {
    pub week_start:       NaiveDate,
    pub week_end:         NaiveDate,
    pub total_hours:      Hours,
    pub assignment_count: usize,
    pub utilization:      Utilization,
    pub project_ids:      Vec<EntityId>,
}

/// Hours booked by `employee_id` in the week containing `week`.
pub fn employee_week_hours(employee_id: &str, week: NaiveDate, assignments: &[Assignment]) -> Hours {
    let week = week_start(week);
    assignments
        .iter()
        .filter(|a| a.employee_id == employee_id && week_start(a.week_start_date) == week)
        .map(Assignment::total_hours)
        .sum()
}

/// Week-by-week load of one employee for `weeks` weeks from the week of
/// `from`. Zero capacity reports no-data utilization.
pub fn employee_workload(
    employee:    &Employee,
    assignments: &[Assignment],
    from:        NaiveDate,
    weeks:       u32,
) -> Vec<EmployeeWeekLoad> {
    let first = week_start(from);
    (0..weeks)
        .map(|offset| {
            let monday = first + Duration::days(i64::from(offset) * 7);
            let booked: Vec<&Assignment> = assignments
                .iter()
                .filter(|a| a.employee_id == employee.id && week_start(a.week_start_date) == monday)
                .collect();
            let total_hours: Hours = booked.iter().map(|a| a.total_hours()).sum();
            EmployeeWeekLoad {
                week_start: monday,
                week_end: monday + Duration::days(6),
                total_hours,
                assignment_count: booked.len(),
                utilization: Utilization::from_ratio(total_hours, employee.capacity),
                project_ids: booked.iter().map(|a| a.project_id.clone()).collect(),
            }
        })
        .collect()
}

/// This week and next for one employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeCapacitySummary {
    pub employee_id:             EntityId,
    pub name:                    String,
    pub total_capacity:          Hours,
    pub current_week_allocation: Hours,
    pub next_week_allocation:    Hours,
    /// Current week against capacity.
    pub utilization:             Utilization,
    /// Unbooked hours this week, never negative.
    pub available_capacity:      Hours,
}

/// Capacity summary of `employee` for the week containing `today` and the
/// one after it.
pub fn capacity_summary(employee: &Employee, assignments: &[Assignment], today: NaiveDate) -> EmployeeCapacitySummary {
    let this_week = week_start(today);
    let current = employee_week_hours(&employee.id, this_week, assignments);
    let next = employee_week_hours(&employee.id, this_week + Duration::days(7), assignments);
    EmployeeCapacitySummary {
        employee_id: employee.id.clone(),
        name: employee.name.clone(),
        total_capacity: employee.capacity,
        current_week_allocation: round_half_up_2(current),
        next_week_allocation: round_half_up_2(next),
        utilization: Utilization::from_ratio(current, employee.capacity),
        available_capacity: round_half_up_2((employee.capacity - current).max(0.0)),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeUtilization {
    pub employee_id:      EntityId,
    pub name:             String,
    pub department:       Department,
    /// Weekly capacity times the number of weeks in the period.
    pub capacity:         Hours,
    pub allocated:        Hours,
    pub utilization:      Utilization,
    pub tier:             Option<Tier>,
    pub assignment_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilizationReport {
    pub period_start:  NaiveDate,
    pub period_end:    NaiveDate,
    /// Highest utilization first.
    pub summary:       Vec<EmployeeUtilization>,
    /// Low tier, lowest first.
    pub underutilized: Vec<EmployeeUtilization>,
    /// Strictly above the critical threshold, highest first.
    pub overallocated: Vec<EmployeeUtilization>,
}

fn percent_or_zero(row: &EmployeeUtilization) -> f64 {
    row.utilization.percent().unwrap_or(0.0)
}

/// Utilization of every active employee with bookings in the weeks from
/// `start` through `end`.
pub fn utilization_report(
    employees:   &[Employee],
    assignments: &[Assignment],
    start:       NaiveDate,
    end:         NaiveDate,
    thresholds:  &UtilizationThresholds,
) -> UtilizationReport {
    let period_start = week_start(start);
    let week_count = WeekRange::new(start, end).count();
    let period_end = period_start + Duration::days((week_count.max(1) as i64) * 7 - 1);

    let mut booked: HashMap<&str, (Hours, usize)> = HashMap::new();
    for a in assignments {
        let week = week_start(a.week_start_date);
        if week >= period_start && week <= end {
            let entry = booked.entry(a.employee_id.as_str()).or_insert((0.0, 0));
            entry.0 += a.total_hours();
            entry.1 += 1;
        }
    }

    let mut summary: Vec<EmployeeUtilization> = employees
        .iter()
        .filter(|e| e.is_active)
        .filter_map(|e| {
            let (allocated, count) = booked.get(e.id.as_str()).copied()?;
            let capacity = e.capacity * week_count as f64;
            let utilization = Utilization::from_ratio(allocated, capacity);
            Some(EmployeeUtilization {
                employee_id: e.id.clone(),
                name: e.name.clone(),
                department: e.department,
                capacity,
                allocated: round_half_up_2(allocated),
                utilization,
                tier: utilization.tier(thresholds),
                assignment_count: count,
            })
        })
        .collect();

    summary.sort_by(|a, b| {
        percent_or_zero(b)
            .partial_cmp(&percent_or_zero(a))
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });

    let mut underutilized: Vec<EmployeeUtilization> = summary
        .iter()
        .filter(|row| row.tier == Some(Tier::Low))
        .cloned()
        .collect();
    underutilized.sort_by(|a, b| {
        percent_or_zero(a)
            .partial_cmp(&percent_or_zero(b))
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });

    let overallocated = summary
        .iter()
        .filter(|row| row.utilization.percent().is_some_and(|p| p > thresholds.critical))
        .cloned()
        .collect();

    UtilizationReport {
        period_start,
        period_end,
        summary,
        underutilized,
        overallocated,
    }
}
