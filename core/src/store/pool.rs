use super::{date_column, date_text, PlanStore};
use crate::{
    calendar::week_start,
    department::Department,
    error::PlanResult,
    pool::{validate_pool_value, InternalPoolEntry, NamedPoolEntry},
    types::Hours,
};
use chrono::NaiveDate;
use rusqlite::params;

impl PlanStore {
    // ── Capacity pools ────────────────────────────────────────────
    //
    // Writes upsert on (entity, Monday). Any day of the week is accepted and
    // stored as its Monday.

    pub fn set_internal_pool(&self, department: Department, week: NaiveDate, capacity: Hours) -> PlanResult<()> {
        validate_pool_value(capacity)?;
        self.conn.execute(
            "INSERT INTO internal_pool (department, week_start_date, capacity) VALUES (?1, ?2, ?3)
             ON CONFLICT (department, week_start_date) DO UPDATE SET capacity = excluded.capacity",
            params![department.code(), date_text(week_start(week)), capacity],
        )?;
        Ok(())
    }

    pub fn set_subcontracted_pool(&self, company: &str, week: NaiveDate, capacity: Hours) -> PlanResult<()> {
        validate_pool_value(capacity)?;
        self.conn.execute(
            "INSERT INTO subcontracted_pool (company, week_start_date, capacity) VALUES (?1, ?2, ?3)
             ON CONFLICT (company, week_start_date) DO UPDATE SET capacity = excluded.capacity",
            params![company, date_text(week_start(week)), capacity],
        )?;
        Ok(())
    }

    pub fn set_external_pool(&self, team: &str, week: NaiveDate, capacity: Hours) -> PlanResult<()> {
        validate_pool_value(capacity)?;
        self.conn.execute(
            "INSERT INTO external_pool (team, week_start_date, capacity) VALUES (?1, ?2, ?3)
             ON CONFLICT (team, week_start_date) DO UPDATE SET capacity = excluded.capacity",
            params![team, date_text(week_start(week)), capacity],
        )?;
        Ok(())
    }

    pub fn internal_pools(&self) -> PlanResult<Vec<InternalPoolEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT department, week_start_date, capacity FROM internal_pool
             ORDER BY department, week_start_date",
        )?;
        let rows = stmt
            .query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?, r.get(2)?)))?
            .collect::<Result<Vec<(String, String, f64)>, _>>()?;
        rows.into_iter()
            .map(|(department, week, capacity)| {
                Ok(InternalPoolEntry {
                    department: department.parse()?,
                    week_start_date: date_column(&week)?,
                    capacity,
                })
            })
            .collect()
    }

    pub fn subcontracted_pools(&self) -> PlanResult<Vec<NamedPoolEntry>> {
        self.named_pools("SELECT company, week_start_date, capacity FROM subcontracted_pool
                          ORDER BY company, week_start_date")
    }

    pub fn external_pools(&self) -> PlanResult<Vec<NamedPoolEntry>> {
        self.named_pools("SELECT team, week_start_date, capacity FROM external_pool
                          ORDER BY team, week_start_date")
    }

    fn named_pools(&self, sql: &str) -> PlanResult<Vec<NamedPoolEntry>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?, r.get(2)?)))?
            .collect::<Result<Vec<(String, String, f64)>, _>>()?;
        rows.into_iter()
            .map(|(name, week, capacity)| {
                Ok(NamedPoolEntry {
                    name,
                    week_start_date: date_column(&week)?,
                    capacity,
                })
            })
            .collect()
    }
}
