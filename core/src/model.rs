//! Plan records: employees, projects, stage entries and assignments.
//!
//! These are owned by the backing store; the computation layer only reads
//! them. Each record validates its own invariants before it is written.

use crate::{
    budget::ProjectBudget,
    calendar::week_start,
    department::{Department, Facility, Stage},
    error::{PlanError, PlanResult},
    talent::BASELINE_HOURS,
    types::{EntityId, Hours},
};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Hours in a calendar week; no one can be booked for more.
pub const MAX_WEEKLY_HOURS: Hours = 168.0;
/// Five years.
pub const MAX_PROJECT_WEEKS: u32 = 260;
/// Stage week numbers are 1-based and never exceed an ISO year.
pub const MAX_STAGE_WEEK: u32 = 53;

fn new_id() -> EntityId {
    uuid::Uuid::new_v4().to_string()
}

// ── Employee ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id:         EntityId,
    pub name:       String,
    #[serde(default)]
    pub role:       String,
    pub department: Department,
    /// Available hours per week.
    pub capacity:   Hours,
    pub is_active:  bool,
    #[serde(default)]
    pub is_subcontracted_material: bool,
    #[serde(default)]
    pub subcontract_company: Option<String>,
}

impl Employee {
    /// Active in-house employee at the standard weekly baseline.
    pub fn new(name: impl Into<String>, department: Department) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            role: String::new(),
            department,
            capacity: BASELINE_HOURS,
            is_active: true,
            is_subcontracted_material: false,
            subcontract_company: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<EntityId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    pub fn with_capacity(mut self, capacity: Hours) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Mark as subcontracted material supplied by `company`.
    /// A blank company name is stored as no company.
    pub fn subcontracted(mut self, company: &str) -> Self {
        self.is_subcontracted_material = true;
        let company = company.trim();
        self.subcontract_company = (!company.is_empty()).then(|| company.to_string());
        self
    }

    pub fn validate(&self) -> PlanResult<()> {
        if self.name.trim().is_empty() {
            return Err(PlanError::validation("name", "employee name is required"));
        }
        if !(0.0..=MAX_WEEKLY_HOURS).contains(&self.capacity) {
            return Err(PlanError::validation(
                "capacity",
                format!("{} is outside 0..={MAX_WEEKLY_HOURS} hours per week", self.capacity),
            ));
        }
        let profile = self.department.profile();
        if self.is_subcontracted_material && !profile.accepts_subcontract_flag() {
            return Err(PlanError::validation(
                "is_subcontracted_material",
                format!("department {} does not use subcontracted material", self.department),
            ));
        }
        Ok(())
    }
}

// ── Project ───────────────────────────────────────────────────────

/// One department's slot in a project's schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageEntry {
    pub department: Department,
    #[serde(default)]
    pub stage:      Option<Stage>,
    /// 1-based week relative to the project start.
    pub week_start: u32,
    pub week_end:   u32,
    #[serde(default)]
    pub department_start_date: Option<NaiveDate>,
    #[serde(default)]
    pub duration_weeks: Option<u32>,
}

impl StageEntry {
    pub fn new(department: Department, stage: Option<Stage>, week_start: u32, week_end: u32) -> Self {
        Self {
            department,
            stage,
            week_start,
            week_end,
            department_start_date: None,
            duration_weeks: None,
        }
    }

    /// Inclusive length of the week range.
    pub fn span_weeks(&self) -> u32 {
        self.week_end.saturating_sub(self.week_start) + 1
    }

    pub fn validate(&self) -> PlanResult<()> {
        for (field, week) in [("week_start", self.week_start), ("week_end", self.week_end)] {
            if !(1..=MAX_STAGE_WEEK).contains(&week) {
                return Err(PlanError::validation(
                    field,
                    format!("week number {week} must be between 1 and {MAX_STAGE_WEEK}"),
                ));
            }
        }
        if self.week_end < self.week_start {
            return Err(PlanError::validation(
                "week_end",
                format!("end week {} is before start week {}", self.week_end, self.week_start),
            ));
        }
        if let Some(duration) = self.duration_weeks {
            let span = self.span_weeks();
            if duration != span {
                return Err(PlanError::validation(
                    "duration_weeks",
                    format!("{duration} does not match week range length {span}"),
                ));
            }
        }
        if let Some(stage) = self.stage {
            if !self.department.profile().allows_stage(stage) {
                return Err(PlanError::validation(
                    "stage",
                    format!("{} is not a stage of department {}", stage.code(), self.department),
                ));
            }
        }
        Ok(())
    }
}

/// Validate a project's schedule: each entry on its own, at most one per
/// department.
pub fn validate_stage_set(stages: &[StageEntry]) -> PlanResult<()> {
    let mut seen = HashSet::new();
    for stage in stages {
        stage.validate()?;
        if !seen.insert(stage.department) {
            return Err(PlanError::validation(
                "stages",
                format!("department {} is scheduled more than once", stage.department),
            ));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id:              EntityId,
    pub name:            String,
    #[serde(default)]
    pub client:          String,
    pub start_date:      NaiveDate,
    pub number_of_weeks: u32,
    pub facility:        Facility,
    #[serde(default)]
    pub stages:          Vec<StageEntry>,
    #[serde(default)]
    pub budgets:         Vec<ProjectBudget>,
}

impl Project {
    pub fn new(
        name: impl Into<String>,
        client: impl Into<String>,
        start_date: NaiveDate,
        number_of_weeks: u32,
        facility: Facility,
    ) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            client: client.into(),
            start_date,
            number_of_weeks,
            facility,
            stages: Vec::new(),
            budgets: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<EntityId>) -> Self {
        self.id = id.into();
        self
    }

    /// Always `start_date + number_of_weeks * 7 days`.
    pub fn end_date(&self) -> NaiveDate {
        self.start_date + Duration::days(i64::from(self.number_of_weeks) * 7)
    }

    pub fn stage_for(&self, department: Department) -> Option<&StageEntry> {
        self.stages.iter().find(|s| s.department == department)
    }

    pub fn budget_for(&self, department: Department) -> Option<&ProjectBudget> {
        self.budgets.iter().find(|b| b.department == department)
    }

    pub fn validate(&self) -> PlanResult<()> {
        if self.name.trim().is_empty() {
            return Err(PlanError::validation("name", "project name is required"));
        }
        if !(1..=MAX_PROJECT_WEEKS).contains(&self.number_of_weeks) {
            return Err(PlanError::validation(
                "number_of_weeks",
                format!("{} must be between 1 and {MAX_PROJECT_WEEKS}", self.number_of_weeks),
            ));
        }
        validate_stage_set(&self.stages)?;
        let mut budgeted = HashSet::new();
        for budget in &self.budgets {
            budget.validate()?;
            if !budgeted.insert(budget.department) {
                return Err(PlanError::validation(
                    "budgets",
                    format!("department {} has more than one budget", budget.department),
                ));
            }
        }
        Ok(())
    }
}

// ── Assignment ────────────────────────────────────────────────────

/// Hours one employee spends on one project in one week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id:              EntityId,
    pub employee_id:     EntityId,
    pub project_id:      EntityId,
    /// Monday of the booked week.
    pub week_start_date: NaiveDate,
    pub hours:           Hours,
    /// Internal share of `hours`, when the booking is split.
    #[serde(default)]
    pub scio_hours:      Option<Hours>,
    /// Subcontracted share of `hours`, when the booking is split.
    #[serde(default)]
    pub external_hours:  Option<Hours>,
    #[serde(default)]
    pub stage:           Option<Stage>,
    #[serde(default)]
    pub comment:         String,
}

impl Assignment {
    /// Any day of the week may be given; it is normalized to its Monday.
    pub fn new(
        employee_id: impl Into<EntityId>,
        project_id: impl Into<EntityId>,
        week: NaiveDate,
        hours: Hours,
    ) -> Self {
        Self {
            id: new_id(),
            employee_id: employee_id.into(),
            project_id: project_id.into(),
            week_start_date: week_start(week),
            hours,
            scio_hours: None,
            external_hours: None,
            stage: None,
            comment: String::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<EntityId>) -> Self {
        self.id = id.into();
        self
    }

    /// Split the booking into internal and external hours; `hours` becomes
    /// their sum.
    pub fn with_split(mut self, scio_hours: Hours, external_hours: Hours) -> Self {
        self.scio_hours = Some(scio_hours);
        self.external_hours = Some(external_hours);
        self.hours = scio_hours + external_hours;
        self
    }

    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stage = Some(stage);
        self
    }

    /// `scio_hours + external_hours` when both are recorded, else `hours`.
    pub fn total_hours(&self) -> Hours {
        match (self.scio_hours, self.external_hours) {
            (Some(scio), Some(external)) => scio + external,
            _ => self.hours,
        }
    }

    pub fn validate(&self) -> PlanResult<()> {
        if self.week_start_date.weekday() != Weekday::Mon {
            return Err(PlanError::validation(
                "week_start_date",
                format!("{} is not a Monday", self.week_start_date),
            ));
        }
        let parts = [
            ("hours", Some(self.hours)),
            ("scio_hours", self.scio_hours),
            ("external_hours", self.external_hours),
        ];
        for (field, value) in parts {
            if value.is_some_and(|v| v < 0.0 || !v.is_finite()) {
                return Err(PlanError::validation(field, "hours cannot be negative"));
            }
        }
        if let (Some(scio), Some(external)) = (self.scio_hours, self.external_hours) {
            if (scio + external - self.hours).abs() > 1e-9 {
                return Err(PlanError::validation(
                    "hours",
                    format!(
                        "total hours ({}) must equal scio_hours ({scio}) + external_hours ({external})",
                        self.hours
                    ),
                ));
            }
        }
        Ok(())
    }
}
