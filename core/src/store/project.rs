use super::{date_column, date_text, PlanStore};
use crate::{
    budget::{project_hours_split, ProjectBudget},
    error::{PlanError, PlanResult},
    department::Stage,
    model::{validate_stage_set, Project, StageEntry},
};
use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};

struct ProjectRow {
    id:              String,
    name:            String,
    client:          String,
    start_date:      String,
    number_of_weeks: u32,
    facility:        String,
}

struct StageRow {
    department:            String,
    stage:                 Option<String>,
    week_start:            u32,
    week_end:              u32,
    department_start_date: Option<String>,
    duration_weeks:        Option<u32>,
}

impl StageRow {
    fn into_entry(self) -> PlanResult<StageEntry> {
        Ok(StageEntry {
            department: self.department.parse()?,
            stage: self.stage.as_deref().map(str::parse::<Stage>).transpose()?,
            week_start: self.week_start,
            week_end: self.week_end,
            department_start_date: self.department_start_date.as_deref().map(date_column).transpose()?,
            duration_weeks: self.duration_weeks,
        })
    }
}

impl PlanStore {
    // ── Project ───────────────────────────────────────────────────

    /// Insert a project with its stage entries and budgets.
    pub fn insert_project(&self, p: &Project) -> PlanResult<()> {
        p.validate()?;
        self.in_transaction(|| {
            self.conn.execute(
                "INSERT INTO project (project_id, name, client, start_date, number_of_weeks, facility)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    &p.id,
                    &p.name,
                    &p.client,
                    date_text(p.start_date),
                    p.number_of_weeks,
                    p.facility.code()
                ],
            )?;
            self.write_stages(&p.id, &p.stages)?;
            self.write_budgets(&p.id, &p.budgets)
        })
    }

    /// Replace a project's schedule. Stage entries are rewritten wholesale.
    pub fn replace_stages(&self, project_id: &str, stages: &[StageEntry]) -> PlanResult<()> {
        validate_stage_set(stages)?;
        self.in_transaction(|| {
            self.conn
                .execute("DELETE FROM department_stage WHERE project_id = ?1", params![project_id])?;
            self.write_stages(project_id, stages)
        })
    }

    fn write_stages(&self, project_id: &str, stages: &[StageEntry]) -> PlanResult<()> {
        let mut stmt = self.conn.prepare(
            "INSERT INTO department_stage (
                project_id, department, stage, week_start, week_end,
                department_start_date, duration_weeks
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        for s in stages {
            stmt.execute(params![
                project_id,
                s.department.code(),
                s.stage.map(|st| st.code()),
                s.week_start,
                s.week_end,
                s.department_start_date.map(date_text),
                s.duration_weeks
            ])?;
        }
        Ok(())
    }

    fn write_budgets(&self, project_id: &str, budgets: &[ProjectBudget]) -> PlanResult<()> {
        let mut stmt = self.conn.prepare(
            "INSERT INTO project_budget (project_id, department, hours_allocated, hours_utilized, hours_forecast)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (project_id, department) DO UPDATE SET
                hours_allocated = excluded.hours_allocated,
                hours_utilized  = excluded.hours_utilized,
                hours_forecast  = excluded.hours_forecast",
        )?;
        for b in budgets {
            stmt.execute(params![
                project_id,
                b.department.code(),
                b.hours_allocated,
                b.hours_utilized,
                b.hours_forecast
            ])?;
        }
        Ok(())
    }

    pub fn project(&self, project_id: &str) -> PlanResult<Option<Project>> {
        let row = self
            .conn
            .query_row(
                "SELECT project_id, name, client, start_date, number_of_weeks, facility
                 FROM project WHERE project_id = ?1",
                params![project_id],
                |r| {
                    Ok(ProjectRow {
                        id: r.get(0)?,
                        name: r.get(1)?,
                        client: r.get(2)?,
                        start_date: r.get(3)?,
                        number_of_weeks: r.get(4)?,
                        facility: r.get(5)?,
                    })
                },
            )
            .optional()?;
        row.map(|r| self.hydrate_project(r)).transpose()
    }

    /// All projects with schedules and budgets, ordered by start date.
    pub fn projects(&self) -> PlanResult<Vec<Project>> {
        let mut stmt = self.conn.prepare(
            "SELECT project_id, name, client, start_date, number_of_weeks, facility
             FROM project ORDER BY start_date, project_id",
        )?;
        let rows = stmt
            .query_map([], |r| {
                Ok(ProjectRow {
                    id: r.get(0)?,
                    name: r.get(1)?,
                    client: r.get(2)?,
                    start_date: r.get(3)?,
                    number_of_weeks: r.get(4)?,
                    facility: r.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(|r| self.hydrate_project(r)).collect()
    }

    fn hydrate_project(&self, row: ProjectRow) -> PlanResult<Project> {
        let mut stmt = self.conn.prepare(
            "SELECT department, stage, week_start, week_end, department_start_date, duration_weeks
             FROM department_stage WHERE project_id = ?1 ORDER BY id",
        )?;
        let stages = stmt
            .query_map(params![&row.id], |r| {
                Ok(StageRow {
                    department: r.get(0)?,
                    stage: r.get(1)?,
                    week_start: r.get(2)?,
                    week_end: r.get(3)?,
                    department_start_date: r.get(4)?,
                    duration_weeks: r.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(StageRow::into_entry)
            .collect::<PlanResult<Vec<_>>>()?;

        let mut stmt = self.conn.prepare(
            "SELECT department, hours_allocated, hours_utilized, hours_forecast
             FROM project_budget WHERE project_id = ?1 ORDER BY department",
        )?;
        let budgets = stmt
            .query_map(params![&row.id], |r| {
                Ok((r.get::<_, String>(0)?, r.get(1)?, r.get(2)?, r.get(3)?))
            })?
            .collect::<Result<Vec<(String, f64, f64, f64)>, _>>()?
            .into_iter()
            .map(|(department, allocated, utilized, forecast)| {
                Ok(ProjectBudget {
                    department: department.parse()?,
                    hours_allocated: allocated,
                    hours_utilized: utilized,
                    hours_forecast: forecast,
                })
            })
            .collect::<PlanResult<Vec<_>>>()?;

        Ok(Project {
            id: row.id,
            name: row.name,
            client: row.client,
            start_date: date_column(&row.start_date)?,
            number_of_weeks: row.number_of_weeks,
            facility: row.facility.parse()?,
            stages,
            budgets,
        })
    }

    /// Create or replace one department budget of an existing project.
    pub fn set_budget(&self, project_id: &str, budget: &ProjectBudget) -> PlanResult<()> {
        budget.validate_edit()?;
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS (SELECT 1 FROM project WHERE project_id = ?1)",
            params![project_id],
            |r| r.get(0),
        )?;
        if !exists {
            return Err(PlanError::validation("project_id", format!("no project '{project_id}'")));
        }
        self.write_budgets(project_id, std::slice::from_ref(budget))
    }

    /// Recompute utilized/forecast hours of every budget of `project_id`
    /// from its assignments, split at the week of `split_date`. Overruns are
    /// stored as booked.
    pub fn refresh_budget_split(&self, project_id: &str, split_date: NaiveDate) -> PlanResult<Vec<ProjectBudget>> {
        let mut project = self
            .project(project_id)?
            .ok_or_else(|| PlanError::validation("project_id", format!("no project '{project_id}'")))?;
        let employees = self.employees()?;
        let assignments = self.assignments_for_project(project_id)?;
        let splits = project_hours_split(project_id, &employees, &assignments, split_date);

        for budget in &mut project.budgets {
            let split = splits.get(&budget.department).copied().unwrap_or_default();
            budget.apply_split(&split);
            budget.validate()?;
        }
        self.write_budgets(project_id, &project.budgets)?;
        Ok(project.budgets)
    }

    /// Remove a project with its stages, budgets and assignments.
    pub fn delete_project(&self, project_id: &str) -> PlanResult<bool> {
        let n = self
            .conn
            .execute("DELETE FROM project WHERE project_id = ?1", params![project_id])?;
        Ok(n > 0)
    }
}
