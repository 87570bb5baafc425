//! The capacity engine: builds the department × week planning matrix.
//!
//! ORDER (fixed):
//!   1. Build the plan-year calendar (ISO weeks + next-year lookahead).
//!   2. Take one snapshot from the source.
//!   3. Index assigned hours per (department, week) in a single pass.
//!   4. Aggregate every cell, department-major, weeks in calendar order.
//!   5. Push each cell to the sink, then finish the sink.
//!
//! RULES:
//!   - Pool toggles are explicit arguments; the engine keeps no state
//!     between runs.
//!   - The snapshot is read-only; the same snapshot always yields the
//!     same matrix.

use crate::{
    calendar::{PlanCalendar, WeekDescriptor},
    capacity::{assigned_hours_index, capacity_from_assigned, WeekCapacity},
    config::PlanConfig,
    department::Department,
    error::PlanResult,
    pool::PoolToggles,
    snapshot::PlanSnapshot,
    source::{CapacitySink, PlanSource},
    types::PlanYear,
    utilization::Tier,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityMatrix {
    pub year:        PlanYear,
    pub weeks:       Vec<WeekDescriptor>,
    pub departments: Vec<Department>,
    /// Department-major: all weeks of `departments[0]`, then the next.
    pub cells:       Vec<WeekCapacity>,
}

impl CapacityMatrix {
    pub fn cell(&self, department: Department, week: NaiveDate) -> Option<&WeekCapacity> {
        let week = crate::calendar::week_start(week);
        self.row(department).find(|c| c.week_start == week)
    }

    pub fn row(&self, department: Department) -> impl Iterator<Item = &WeekCapacity> {
        self.cells.iter().filter(move |c| c.department == department)
    }

    pub fn critical_cells(&self) -> impl Iterator<Item = &WeekCapacity> {
        self.cells.iter().filter(|c| c.tier == Some(Tier::Critical))
    }

    pub fn descriptor(&self, week: NaiveDate) -> Option<&WeekDescriptor> {
        self.weeks.iter().find(|w| w.date == week)
    }
}

pub struct CapacityEngine {
    config:      PlanConfig,
    departments: Vec<Department>,
}

impl CapacityEngine {
    /// Engine covering all six departments.
    pub fn new(config: PlanConfig) -> Self {
        Self {
            config,
            departments: Department::ALL.to_vec(),
        }
    }

    /// Restrict the matrix to `departments`, in the given order.
    pub fn with_departments(mut self, departments: Vec<Department>) -> Self {
        self.departments = departments;
        self
    }

    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    /// Compute the matrix for `year` from an already taken snapshot.
    pub fn build_matrix(
        &self,
        year:     PlanYear,
        snapshot: &PlanSnapshot,
        toggles:  &PoolToggles,
    ) -> CapacityMatrix {
        let calendar = PlanCalendar::new(year);
        let pools = snapshot.pool_ledger();
        let assigned = assigned_hours_index(&snapshot.employees, &snapshot.assignments);

        let mut cells = Vec::with_capacity(self.departments.len() * calendar.weeks().len());
        for department in &self.departments {
            for week in calendar.weeks() {
                let hours = assigned.get(&(*department, week.date)).copied().unwrap_or(0.0);
                cells.push(capacity_from_assigned(
                    *department,
                    week.date,
                    hours,
                    &pools,
                    toggles,
                    &self.config,
                ));
            }
        }

        log::debug!(
            "capacity matrix year={year}: {} departments x {} weeks, {} critical",
            self.departments.len(),
            calendar.weeks().len(),
            cells.iter().filter(|c| c.tier == Some(Tier::Critical)).count()
        );

        CapacityMatrix {
            year,
            weeks: calendar.weeks().to_vec(),
            departments: self.departments.clone(),
            cells,
        }
    }

    /// Snapshot `source`, compute the matrix and stream it into `sink`.
    pub fn run(
        &self,
        year:    PlanYear,
        source:  &dyn PlanSource,
        toggles: &PoolToggles,
        sink:    &mut dyn CapacitySink,
    ) -> PlanResult<CapacityMatrix> {
        let snapshot = source.snapshot()?;
        log::debug!(
            "source '{}': {} employees, {} assignments",
            source.name(),
            snapshot.employees.len(),
            snapshot.assignments.len()
        );
        let matrix = self.build_matrix(year, &snapshot, toggles);
        for cell in &matrix.cells {
            sink.accept(cell)?;
        }
        sink.finish()?;
        Ok(matrix)
    }
}
