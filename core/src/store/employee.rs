use super::PlanStore;
use crate::{
    department::Department,
    error::{PlanError, PlanResult},
    model::Employee,
};
use rusqlite::{params, OptionalExtension, Row};

const EMPLOYEE_COLUMNS: &str = "employee_id, name, role, department, capacity, is_active,
                                is_subcontracted_material, subcontract_company";

/// Raw column values; department code parsed after the row is read.
struct EmployeeRow {
    id:                        String,
    name:                      String,
    role:                      String,
    department:                String,
    capacity:                  f64,
    is_active:                 bool,
    is_subcontracted_material: bool,
    subcontract_company:       Option<String>,
}

impl EmployeeRow {
    fn read(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: r.get(0)?,
            name: r.get(1)?,
            role: r.get(2)?,
            department: r.get(3)?,
            capacity: r.get(4)?,
            is_active: r.get::<_, i32>(5)? != 0,
            is_subcontracted_material: r.get::<_, i32>(6)? != 0,
            subcontract_company: r.get(7)?,
        })
    }

    fn into_employee(self) -> PlanResult<Employee> {
        Ok(Employee {
            id: self.id,
            name: self.name,
            role: self.role,
            department: self.department.parse()?,
            capacity: self.capacity,
            is_active: self.is_active,
            is_subcontracted_material: self.is_subcontracted_material,
            subcontract_company: self.subcontract_company,
        })
    }
}

impl PlanStore {
    // ── Employee ──────────────────────────────────────────────────

    pub fn insert_employee(&self, e: &Employee) -> PlanResult<()> {
        e.validate()?;
        self.conn.execute(
            "INSERT INTO employee (
                employee_id, name, role, department, capacity, is_active,
                is_subcontracted_material, subcontract_company
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                &e.id,
                &e.name,
                &e.role,
                e.department.code(),
                e.capacity,
                if e.is_active { 1 } else { 0 },
                if e.is_subcontracted_material { 1 } else { 0 },
                &e.subcontract_company
            ],
        )?;
        Ok(())
    }

    /// Overwrite an existing employee; unknown ids are an error.
    pub fn update_employee(&self, e: &Employee) -> PlanResult<()> {
        e.validate()?;
        let changed = self.conn.execute(
            "UPDATE employee SET name = ?2, role = ?3, department = ?4, capacity = ?5,
                    is_active = ?6, is_subcontracted_material = ?7, subcontract_company = ?8
             WHERE employee_id = ?1",
            params![
                &e.id,
                &e.name,
                &e.role,
                e.department.code(),
                e.capacity,
                if e.is_active { 1 } else { 0 },
                if e.is_subcontracted_material { 1 } else { 0 },
                &e.subcontract_company
            ],
        )?;
        if changed == 0 {
            return Err(PlanError::validation("employee_id", format!("no employee '{}'", e.id)));
        }
        Ok(())
    }

    pub fn employee(&self, employee_id: &str) -> PlanResult<Option<Employee>> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {EMPLOYEE_COLUMNS} FROM employee WHERE employee_id = ?1"),
                params![employee_id],
                EmployeeRow::read,
            )
            .optional()?;
        row.map(EmployeeRow::into_employee).transpose()
    }

    /// All employees, ordered by department then name.
    pub fn employees(&self) -> PlanResult<Vec<Employee>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employee ORDER BY department, name, employee_id"
        ))?;
        let rows = stmt
            .query_map([], EmployeeRow::read)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(EmployeeRow::into_employee).collect()
    }

    pub fn active_employees_in(&self, department: Department) -> PlanResult<Vec<Employee>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employee
             WHERE department = ?1 AND is_active = 1 ORDER BY name, employee_id"
        ))?;
        let rows = stmt
            .query_map(params![department.code()], EmployeeRow::read)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(EmployeeRow::into_employee).collect()
    }

    /// Remove an employee and, by cascade, their assignments.
    pub fn delete_employee(&self, employee_id: &str) -> PlanResult<bool> {
        let n = self
            .conn
            .execute("DELETE FROM employee WHERE employee_id = ?1", params![employee_id])?;
        Ok(n > 0)
    }
}
