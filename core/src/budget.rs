//! Per-department project budgets and the utilized/forecast split.

use crate::{
    calendar::week_start,
    department::Department,
    error::{PlanError, PlanResult},
    model::{Assignment, Employee},
    talent::round_half_up_2,
    types::Hours,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Utilized + forecast may not exceed this multiple of the allocation.
pub const MAX_BUDGET_OVERRUN: f64 = 1.5;

const NEAR_PERCENT: f64 = 80.0;
const EXCEEDED_PERCENT: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectBudget {
    pub department:      Department,
    /// Quoted hours for the department.
    pub hours_allocated: Hours,
    #[serde(default)]
    pub hours_utilized:  Hours,
    #[serde(default)]
    pub hours_forecast:  Hours,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    Within,
    Near,
    Exceeded,
}

impl ProjectBudget {
    pub fn new(department: Department, hours_allocated: Hours) -> Self {
        Self {
            department,
            hours_allocated,
            hours_utilized: 0.0,
            hours_forecast: 0.0,
        }
    }

    /// `(utilized + forecast) / allocated * 100`; 0 with no allocation.
    pub fn utilization_percent(&self) -> f64 {
        if self.hours_allocated == 0.0 {
            return 0.0;
        }
        round_half_up_2((self.hours_utilized + self.hours_forecast) / self.hours_allocated * 100.0)
    }

    /// Remaining hours; negative when over budget.
    pub fn available_hours(&self) -> Hours {
        round_half_up_2(self.hours_allocated - self.hours_utilized - self.hours_forecast)
    }

    pub fn status(&self) -> BudgetStatus {
        let utilization = self.utilization_percent();
        if utilization >= EXCEEDED_PERCENT {
            BudgetStatus::Exceeded
        } else if utilization >= NEAR_PERCENT {
            BudgetStatus::Near
        } else {
            BudgetStatus::Within
        }
    }

    /// Replace utilized/forecast with figures derived from assignments.
    pub fn apply_split(&mut self, split: &HoursSplit) {
        self.hours_utilized = split.utilized;
        self.hours_forecast = split.forecast;
    }

    /// Record rule: every figure is a finite, non-negative hour count.
    /// Derived figures may overrun the allocation; `status` reports that.
    pub fn validate(&self) -> PlanResult<()> {
        let parts = [
            ("hours_allocated", self.hours_allocated),
            ("hours_utilized", self.hours_utilized),
            ("hours_forecast", self.hours_forecast),
        ];
        for (field, value) in parts {
            if value < 0.0 || !value.is_finite() {
                return Err(PlanError::validation(field, "budget hours cannot be negative"));
            }
        }
        Ok(())
    }

    /// `validate` plus the overrun cap applied to hand-entered budgets.
    pub fn validate_edit(&self) -> PlanResult<()> {
        self.validate()?;
        if self.hours_utilized + self.hours_forecast > self.hours_allocated * MAX_BUDGET_OVERRUN {
            return Err(PlanError::validation(
                "hours_utilized",
                "combined utilized and forecast hours exceed 150% of allocated hours",
            ));
        }
        Ok(())
    }
}

/// Hours already worked vs. still planned, relative to a split week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HoursSplit {
    pub utilized: Hours,
    pub forecast: Hours,
}

impl HoursSplit {
    pub fn total(&self) -> Hours {
        self.utilized + self.forecast
    }
}

/// Assignment hours of `project_id` per employee department, split at the
/// Monday of `split_date`: earlier weeks are utilized, that week onward is
/// forecast. Assignments of unknown employees are skipped.
pub fn project_hours_split(
    project_id:  &str,
    employees:   &[Employee],
    assignments: &[Assignment],
    split_date:  NaiveDate,
) -> BTreeMap<Department, HoursSplit> {
    let split_week = week_start(split_date);
    let departments: HashMap<&str, Department> =
        employees.iter().map(|e| (e.id.as_str(), e.department)).collect();

    let mut out: BTreeMap<Department, HoursSplit> = BTreeMap::new();
    for assignment in assignments.iter().filter(|a| a.project_id == project_id) {
        let Some(department) = departments.get(assignment.employee_id.as_str()) else {
            continue;
        };
        let entry = out.entry(*department).or_default();
        if week_start(assignment.week_start_date) < split_week {
            entry.utilized += assignment.total_hours();
        } else {
            entry.forecast += assignment.total_hours();
        }
    }
    out
}
