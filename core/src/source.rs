//! Data source and sink seams around the computation layer.
//!
//! RULE: the computation layer never reads storage directly. A PlanSource
//! hands it one fully materialized snapshot per run; results leave through
//! a CapacitySink. Callers re-snapshot after every edit.

use crate::{capacity::WeekCapacity, error::PlanResult, snapshot::PlanSnapshot};

/// Supplies the records for one computation.
pub trait PlanSource {
    /// Stable name for logging.
    fn name(&self) -> &'static str;

    /// Materialize every employee, project, assignment and pool entry.
    fn snapshot(&self) -> PlanResult<PlanSnapshot>;
}

/// Receives computed (department, week) aggregates for display.
pub trait CapacitySink {
    fn accept(&mut self, cell: &WeekCapacity) -> PlanResult<()>;

    /// Called once after the last cell of a run.
    fn finish(&mut self) -> PlanResult<()> {
        Ok(())
    }
}

impl PlanSource for PlanSnapshot {
    fn name(&self) -> &'static str {
        "snapshot"
    }

    fn snapshot(&self) -> PlanResult<PlanSnapshot> {
        Ok(self.clone())
    }
}

impl CapacitySink for Vec<WeekCapacity> {
    fn accept(&mut self, cell: &WeekCapacity) -> PlanResult<()> {
        self.push(cell.clone());
        Ok(())
    }
}
