//! Aggregate views over plan records: per-project statistics, the weekly
//! booking breakdown, facility summaries and department weekly totals.
//!
//! Everything here reads records and returns owned summaries. Hours are
//! rounded to two decimals on output only.

use crate::{
    calendar::week_start,
    capacity::assigned_hours_index,
    department::{Department, Facility},
    error::{PlanError, PlanResult},
    model::{Assignment, Employee, Project},
    talent::round_half_up_2,
    types::{EntityId, Hours},
    utilization::Utilization,
};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

// ── Project statistics ────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentProjectStats {
    pub count:          usize,
    pub total_hours:    Hours,
    pub employee_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectWeekStats {
    pub week_start:  NaiveDate,
    pub hours:       Hours,
    pub assignments: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectStatistics {
    pub project_id:        EntityId,
    pub project_name:      String,
    pub total_assignments: usize,
    pub total_hours:       Hours,
    /// 0 without assignments.
    pub average_hours_per_assignment: Hours,
    pub by_department:     BTreeMap<Department, DepartmentProjectStats>,
    /// Earliest week first.
    pub by_week:           Vec<ProjectWeekStats>,
}

/// Booking statistics of one project. Assignments of unknown employees
/// still count toward the totals and weeks but have no department.
pub fn project_statistics(project: &Project, employees: &[Employee], assignments: &[Assignment]) -> ProjectStatistics {
    let departments: HashMap<&str, Department> =
        employees.iter().map(|e| (e.id.as_str(), e.department)).collect();

    let mut total_hours = 0.0;
    let mut total_assignments = 0;
    let mut by_department: BTreeMap<Department, (usize, Hours, BTreeSet<&str>)> = BTreeMap::new();
    let mut by_week: BTreeMap<NaiveDate, (Hours, usize)> = BTreeMap::new();

    for a in assignments.iter().filter(|a| a.project_id == project.id) {
        let hours = a.total_hours();
        total_hours += hours;
        total_assignments += 1;

        if let Some(department) = departments.get(a.employee_id.as_str()) {
            let entry = by_department.entry(*department).or_default();
            entry.0 += 1;
            entry.1 += hours;
            entry.2.insert(a.employee_id.as_str());
        }
        let week = by_week.entry(week_start(a.week_start_date)).or_insert((0.0, 0));
        week.0 += hours;
        week.1 += 1;
    }

    let average_hours_per_assignment = if total_assignments == 0 {
        0.0
    } else {
        round_half_up_2(total_hours / total_assignments as f64)
    };

    ProjectStatistics {
        project_id: project.id.clone(),
        project_name: project.name.clone(),
        total_assignments,
        total_hours: round_half_up_2(total_hours),
        average_hours_per_assignment,
        by_department: by_department
            .into_iter()
            .map(|(department, (count, hours, people))| {
                (
                    department,
                    DepartmentProjectStats {
                        count,
                        total_hours: round_half_up_2(hours),
                        employee_count: people.len(),
                    },
                )
            })
            .collect(),
        by_week: by_week
            .into_iter()
            .map(|(week_start, (hours, assignments))| ProjectWeekStats {
                week_start,
                hours: round_half_up_2(hours),
                assignments,
            })
            .collect(),
    }
}

// ── Weekly breakdown ──────────────────────────────────────────────

/// Which assignments a weekly breakdown covers. Bounds are inclusive and
/// compared by week.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreakdownFilter {
    pub start:      Option<NaiveDate>,
    pub end:        Option<NaiveDate>,
    pub project_id: Option<EntityId>,
}

impl BreakdownFilter {
    fn admits(&self, a: &Assignment) -> bool {
        let week = week_start(a.week_start_date);
        self.start.map_or(true, |s| week >= week_start(s))
            && self.end.map_or(true, |e| week <= week_start(e))
            && self.project_id.as_deref().map_or(true, |p| a.project_id == p)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeWeekShare {
    pub name:        String,
    pub hours:       Hours,
    pub capacity:    Hours,
    pub utilization: Utilization,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectWeekShare {
    pub name:  String,
    pub hours: Hours,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekBreakdown {
    pub week_start:       NaiveDate,
    pub week_end:         NaiveDate,
    pub total_hours:      Hours,
    pub assignment_count: usize,
    pub by_employee:      BTreeMap<EntityId, EmployeeWeekShare>,
    pub by_project:       BTreeMap<EntityId, ProjectWeekShare>,
    pub by_department:    BTreeMap<Department, Hours>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyBreakdown {
    pub week_count:  usize,
    pub total_hours: Hours,
    /// Earliest week first.
    pub weeks:       Vec<WeekBreakdown>,
}

/// Bookings grouped by week, then by employee, project and department.
/// Assignments whose employee or project is unknown are skipped.
pub fn assignments_by_week(
    employees:   &[Employee],
    projects:    &[Project],
    assignments: &[Assignment],
    filter:      &BreakdownFilter,
) -> WeeklyBreakdown {
    let employees: HashMap<&str, &Employee> = employees.iter().map(|e| (e.id.as_str(), e)).collect();
    let projects: HashMap<&str, &Project> = projects.iter().map(|p| (p.id.as_str(), p)).collect();

    let mut weeks: BTreeMap<NaiveDate, WeekBreakdown> = BTreeMap::new();
    for a in assignments.iter().filter(|a| filter.admits(a)) {
        let (Some(employee), Some(project)) =
            (employees.get(a.employee_id.as_str()), projects.get(a.project_id.as_str()))
        else {
            continue;
        };
        let monday = week_start(a.week_start_date);
        let hours = a.total_hours();
        let week = weeks.entry(monday).or_insert_with(|| WeekBreakdown {
            week_start: monday,
            week_end: monday + Duration::days(6),
            total_hours: 0.0,
            assignment_count: 0,
            by_employee: BTreeMap::new(),
            by_project: BTreeMap::new(),
            by_department: BTreeMap::new(),
        });
        week.total_hours += hours;
        week.assignment_count += 1;
        week.by_employee
            .entry(employee.id.clone())
            .or_insert_with(|| EmployeeWeekShare {
                name: employee.name.clone(),
                hours: 0.0,
                capacity: employee.capacity,
                utilization: Utilization::NoData,
            })
            .hours += hours;
        week.by_project
            .entry(project.id.clone())
            .or_insert_with(|| ProjectWeekShare { name: project.name.clone(), hours: 0.0 })
            .hours += hours;
        *week.by_department.entry(employee.department).or_insert(0.0) += hours;
    }

    let weeks: Vec<WeekBreakdown> = weeks
        .into_values()
        .map(|mut week| {
            week.total_hours = round_half_up_2(week.total_hours);
            for share in week.by_employee.values_mut() {
                share.utilization = Utilization::from_ratio(share.hours, share.capacity);
                share.hours = round_half_up_2(share.hours);
            }
            for share in week.by_project.values_mut() {
                share.hours = round_half_up_2(share.hours);
            }
            for hours in week.by_department.values_mut() {
                *hours = round_half_up_2(*hours);
            }
            week
        })
        .collect();

    WeeklyBreakdown {
        week_count: weeks.len(),
        total_hours: round_half_up_2(weeks.iter().map(|w| w.total_hours).sum()),
        weeks,
    }
}

// ── Facility summary ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityProject {
    pub id:               EntityId,
    pub name:             String,
    pub client:           String,
    pub start_date:       NaiveDate,
    pub end_date:         NaiveDate,
    pub duration_weeks:   u32,
    pub assignment_count: usize,
    pub total_hours:      Hours,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilitySummary {
    pub facility:      Facility,
    pub facility_name: String,
    pub project_count: usize,
    /// Ordered by start date, then name.
    pub projects:      Vec<FacilityProject>,
}

pub fn projects_by_facility(facility: Facility, projects: &[Project], assignments: &[Assignment]) -> FacilitySummary {
    let mut booked: HashMap<&str, (usize, Hours)> = HashMap::new();
    for a in assignments {
        let entry = booked.entry(a.project_id.as_str()).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += a.total_hours();
    }

    let mut rows: Vec<FacilityProject> = projects
        .iter()
        .filter(|p| p.facility == facility)
        .map(|p| {
            let (assignment_count, hours) = booked.get(p.id.as_str()).copied().unwrap_or((0, 0.0));
            FacilityProject {
                id: p.id.clone(),
                name: p.name.clone(),
                client: p.client.clone(),
                start_date: p.start_date,
                end_date: p.end_date(),
                duration_weeks: p.number_of_weeks,
                assignment_count,
                total_hours: round_half_up_2(hours),
            }
        })
        .collect();
    rows.sort_by(|a, b| a.start_date.cmp(&b.start_date).then_with(|| a.name.cmp(&b.name)));

    FacilitySummary {
        facility,
        facility_name: facility.label().to_string(),
        project_count: rows.len(),
        projects: rows,
    }
}

// ── Department weekly totals ──────────────────────────────────────

/// Hours booked by one department in one week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentWeeklyTotal {
    pub department:      Department,
    pub week_start_date: NaiveDate,
    pub total_hours:     Hours,
}

impl DepartmentWeeklyTotal {
    pub fn new(department: Department, week: NaiveDate, total_hours: Hours) -> Self {
        Self {
            department,
            week_start_date: week_start(week),
            total_hours,
        }
    }

    pub fn validate(&self) -> PlanResult<()> {
        if self.week_start_date.weekday() != Weekday::Mon {
            return Err(PlanError::validation(
                "week_start_date",
                format!("{} is not a Monday", self.week_start_date),
            ));
        }
        if self.total_hours < 0.0 || !self.total_hours.is_finite() {
            return Err(PlanError::validation("total_hours", "total hours cannot be negative"));
        }
        Ok(())
    }
}

/// One total per (department, week) with bookings by active members,
/// ordered by department then week.
pub fn department_weekly_totals(employees: &[Employee], assignments: &[Assignment]) -> Vec<DepartmentWeeklyTotal> {
    let index: BTreeMap<(Department, NaiveDate), Hours> =
        assigned_hours_index(employees, assignments).into_iter().collect();
    index
        .into_iter()
        .map(|((department, week), hours)| DepartmentWeeklyTotal::new(department, week, round_half_up_2(hours)))
        .collect()
}
