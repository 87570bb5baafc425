use super::{date_column, date_text, PlanStore};
use crate::{
    error::PlanResult,
    statistics::{department_weekly_totals, DepartmentWeeklyTotal},
};
use rusqlite::params;

impl PlanStore {
    // ── Department weekly totals ──────────────────────────────────

    /// Upsert one total on (department, Monday).
    pub fn set_department_weekly_total(&self, total: &DepartmentWeeklyTotal) -> PlanResult<()> {
        total.validate()?;
        self.conn.execute(
            "INSERT INTO department_weekly_total (department, week_start_date, total_hours) VALUES (?1, ?2, ?3)
             ON CONFLICT (department, week_start_date) DO UPDATE SET total_hours = excluded.total_hours",
            params![total.department.code(), date_text(total.week_start_date), total.total_hours],
        )?;
        Ok(())
    }

    pub fn department_weekly_totals(&self) -> PlanResult<Vec<DepartmentWeeklyTotal>> {
        let mut stmt = self.conn.prepare(
            "SELECT department, week_start_date, total_hours FROM department_weekly_total
             ORDER BY department, week_start_date",
        )?;
        let rows = stmt
            .query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?, r.get(2)?)))?
            .collect::<Result<Vec<(String, String, f64)>, _>>()?;
        rows.into_iter()
            .map(|(department, week, total_hours)| {
                Ok(DepartmentWeeklyTotal {
                    department: department.parse()?,
                    week_start_date: date_column(&week)?,
                    total_hours,
                })
            })
            .collect()
    }

    /// Replace every stored total with the ones derived from current
    /// assignments. Returns the number of totals written.
    pub fn refresh_department_weekly_totals(&self) -> PlanResult<usize> {
        let totals = department_weekly_totals(&self.employees()?, &self.assignments()?);
        self.in_transaction(|| {
            self.conn.execute("DELETE FROM department_weekly_total", [])?;
            for total in &totals {
                self.set_department_weekly_total(total)?;
            }
            Ok(())
        })?;
        log::debug!("refreshed {} department weekly totals", totals.len());
        Ok(totals.len())
    }
}
