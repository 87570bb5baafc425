//! SQLite persistence for the plan.
//!
//! RULE: Only the store talks to the database.
//! The computation layer reads a PlanSnapshot taken from here; it never
//! executes SQL directly.

use crate::{
    calendar::parse_iso_date,
    error::PlanResult,
    snapshot::PlanSnapshot,
    source::PlanSource,
};
use chrono::NaiveDate;
use rusqlite::Connection;

mod assignment;
mod employee;
mod pool;
mod project;
mod weekly_total;

pub struct PlanStore {
    conn: Connection,
}

impl PlanStore {
    /// Open (or create) the plan database at `path`.
    pub fn open(path: &str) -> PlanResult<Self> {
        let conn = Connection::open(path)?;
        // WAL is ignored by some filesystems; not fatal.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        log::debug!("opened plan store at {path}");
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> PlanResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> PlanResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_plan.sql"))?;
        Ok(())
    }

    /// Write every record of `snapshot` in one transaction. Pools are
    /// upserted; other records must not exist yet.
    pub fn import_snapshot(&self, snapshot: &PlanSnapshot) -> PlanResult<()> {
        snapshot.validate()?;
        self.in_transaction(|| {
            for e in &snapshot.employees {
                self.insert_employee(e)?;
            }
            for p in &snapshot.projects {
                self.insert_project(p)?;
            }
            for a in &snapshot.assignments {
                self.insert_assignment(a)?;
            }
            for entry in &snapshot.internal_pools {
                self.set_internal_pool(entry.department, entry.week_start_date, entry.capacity)?;
            }
            for entry in &snapshot.subcontracted_pools {
                self.set_subcontracted_pool(&entry.name, entry.week_start_date, entry.capacity)?;
            }
            for entry in &snapshot.external_pools {
                self.set_external_pool(&entry.name, entry.week_start_date, entry.capacity)?;
            }
            Ok(())
        })?;
        log::info!(
            "imported {} employees, {} projects, {} assignments",
            snapshot.employees.len(),
            snapshot.projects.len(),
            snapshot.assignments.len()
        );
        Ok(())
    }

    /// Run `f` inside a transaction, or inside the caller's when one is
    /// already open.
    fn in_transaction<T>(&self, f: impl FnOnce() -> PlanResult<T>) -> PlanResult<T> {
        if !self.conn.is_autocommit() {
            return f();
        }
        let tx = self.conn.unchecked_transaction()?;
        let out = f()?;
        tx.commit()?;
        Ok(out)
    }

    /// Count rows of `table` (test helper).
    pub fn row_count(&self, table: &str) -> PlanResult<i64> {
        let n: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?;
        Ok(n)
    }
}

impl PlanSource for PlanStore {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn snapshot(&self) -> PlanResult<PlanSnapshot> {
        Ok(PlanSnapshot {
            employees:           self.employees()?,
            projects:            self.projects()?,
            assignments:         self.assignments()?,
            internal_pools:      self.internal_pools()?,
            subcontracted_pools: self.subcontracted_pools()?,
            external_pools:      self.external_pools()?,
        })
    }
}

fn date_column(value: &str) -> PlanResult<NaiveDate> {
    parse_iso_date(value)
}

fn date_text(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
