use super::{date_column, date_text, PlanStore};
use crate::{
    department::Stage,
    error::{PlanError, PlanResult},
    model::Assignment,
};
use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};

const ASSIGNMENT_COLUMNS: &str = "assignment_id, employee_id, project_id, week_start_date, hours,
                                  scio_hours, external_hours, stage, comment";

struct AssignmentRow {
    id:              String,
    employee_id:     String,
    project_id:      String,
    week_start_date: String,
    hours:           f64,
    scio_hours:      Option<f64>,
    external_hours:  Option<f64>,
    stage:           Option<String>,
    comment:         String,
}

impl AssignmentRow {
    fn read(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: r.get(0)?,
            employee_id: r.get(1)?,
            project_id: r.get(2)?,
            week_start_date: r.get(3)?,
            hours: r.get(4)?,
            scio_hours: r.get(5)?,
            external_hours: r.get(6)?,
            stage: r.get(7)?,
            comment: r.get(8)?,
        })
    }

    fn into_assignment(self) -> PlanResult<Assignment> {
        Ok(Assignment {
            id: self.id,
            employee_id: self.employee_id,
            project_id: self.project_id,
            week_start_date: date_column(&self.week_start_date)?,
            hours: self.hours,
            scio_hours: self.scio_hours,
            external_hours: self.external_hours,
            stage: self.stage.as_deref().map(str::parse::<Stage>).transpose()?,
            comment: self.comment,
        })
    }
}

impl PlanStore {
    // ── Assignment ────────────────────────────────────────────────

    /// Insert an assignment. The week must already be a Monday and the
    /// employee and project must exist.
    pub fn insert_assignment(&self, a: &Assignment) -> PlanResult<()> {
        a.validate()?;
        if let Some(stage) = a.stage {
            let department = self.employee(&a.employee_id)?.map(|e| e.department);
            if let Some(department) = department.filter(|d| !d.profile().allows_stage(stage)) {
                return Err(PlanError::validation(
                    "stage",
                    format!("{} is not a stage of department {department}", stage.code()),
                ));
            }
        }
        self.conn.execute(
            "INSERT INTO assignment (
                assignment_id, employee_id, project_id, week_start_date, hours,
                scio_hours, external_hours, stage, comment
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                &a.id,
                &a.employee_id,
                &a.project_id,
                date_text(a.week_start_date),
                a.hours,
                a.scio_hours,
                a.external_hours,
                a.stage.map(|s| s.code()),
                &a.comment
            ],
        )?;
        Ok(())
    }

    pub fn assignment(&self, assignment_id: &str) -> PlanResult<Option<Assignment>> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {ASSIGNMENT_COLUMNS} FROM assignment WHERE assignment_id = ?1"),
                params![assignment_id],
                AssignmentRow::read,
            )
            .optional()?;
        row.map(AssignmentRow::into_assignment).transpose()
    }

    pub fn assignments(&self) -> PlanResult<Vec<Assignment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM assignment ORDER BY week_start_date, assignment_id"
        ))?;
        let rows = stmt
            .query_map([], AssignmentRow::read)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(AssignmentRow::into_assignment).collect()
    }

    pub fn assignments_for_project(&self, project_id: &str) -> PlanResult<Vec<Assignment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM assignment
             WHERE project_id = ?1 ORDER BY week_start_date, assignment_id"
        ))?;
        let rows = stmt
            .query_map(params![project_id], AssignmentRow::read)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(AssignmentRow::into_assignment).collect()
    }

    /// Assignments whose week falls in `start..=end`. ISO text compares in
    /// date order.
    pub fn assignments_between(&self, start: NaiveDate, end: NaiveDate) -> PlanResult<Vec<Assignment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM assignment
             WHERE week_start_date >= ?1 AND week_start_date <= ?2
             ORDER BY week_start_date, assignment_id"
        ))?;
        let rows = stmt
            .query_map(params![date_text(start), date_text(end)], AssignmentRow::read)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(AssignmentRow::into_assignment).collect()
    }

    pub fn delete_assignment(&self, assignment_id: &str) -> PlanResult<bool> {
        let n = self
            .conn
            .execute("DELETE FROM assignment WHERE assignment_id = ?1", params![assignment_id])?;
        Ok(n > 0)
    }
}
