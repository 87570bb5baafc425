//! Seeded demo plan: a realistic snapshot for the runner and for tests.
//!
//! Same seed and year ⇒ identical snapshot, ids included.

use crate::{
    budget::ProjectBudget,
    calendar::PlanCalendar,
    config::PlanConfig,
    department::{Department, Facility, KNOWN_SUBCONTRACT_COMPANIES},
    error::PlanResult,
    model::{Assignment, Employee, Project},
    pool::{InternalPoolEntry, NamedPoolEntry},
    relative_week::schedule_stage,
    rng::PlanRng,
    snapshot::PlanSnapshot,
    talent::hours_from_talent,
    types::PlanYear,
};
use chrono::Duration;

/// External programming teams used by the demo plan.
pub const DEMO_EXTERNAL_TEAMS: [&str; 2] = ["Team Norte", "Team Sur"];

const FIRST_NAMES: [&str; 16] = [
    "Ana", "Luis", "Marta", "Jorge", "Sofia", "Diego", "Elena", "Pablo",
    "Carmen", "Raul", "Lucia", "Hector", "Irene", "Tomas", "Paula", "Andres",
];
const LAST_NAMES: [&str; 12] = [
    "Garcia", "Lopez", "Martinez", "Ruiz", "Torres", "Flores",
    "Rivera", "Castro", "Ortega", "Mendez", "Vargas", "Silva",
];
const CLIENTS: [&str; 6] = ["Northwind", "Contoso", "Fabrikam", "Tailspin", "Wingtip", "Litware"];
const FACILITIES: [Facility; 3] = [Facility::Al, Facility::Mi, Facility::Mx];

// Stream slots. Append only.
const STREAM_EMPLOYEES:   u64 = 0;
const STREAM_PROJECTS:    u64 = 1;
const STREAM_ASSIGNMENTS: u64 = 2;
const STREAM_POOLS:       u64 = 3;

fn demo_employees(seed: u64, config: &PlanConfig) -> Vec<Employee> {
    let mut rng = PlanRng::stream(seed, STREAM_EMPLOYEES);
    let mut employees = Vec::new();
    for department in Department::ALL {
        let count = rng.range_u32(3, 6);
        for n in 0..count {
            let first = rng.pick(&FIRST_NAMES).copied().unwrap_or("Alex");
            let last = rng.pick(&LAST_NAMES).copied().unwrap_or("Doe");
            let mut employee = Employee::new(format!("{first} {last}"), department)
                .with_id(format!("emp-{}-{n}", department.code().to_ascii_lowercase()))
                .with_role(department.label())
                .with_capacity(config.default_employee_capacity);
            if department == Department::Build && n == 0 {
                let company = rng.pick(&KNOWN_SUBCONTRACT_COMPANIES).copied().unwrap_or("AMI");
                employee = employee.subcontracted(company);
            }
            if rng.chance(0.08) {
                employee = employee.inactive();
            }
            employees.push(employee);
        }
    }
    employees
}

fn demo_projects(seed: u64, calendar: &PlanCalendar) -> PlanResult<Vec<Project>> {
    let mut rng = PlanRng::stream(seed, STREAM_PROJECTS);
    let weeks = calendar.weeks();
    let count = rng.range_u32(4, 6);
    let mut projects = Vec::new();

    for n in 0..count {
        let start_index = rng.range_u32(0, 35) as usize;
        let Some(start) = weeks.get(start_index).map(|w| w.date) else {
            continue;
        };
        let client = rng.pick(&CLIENTS).copied().unwrap_or("Internal");
        let facility = rng.pick(&FACILITIES).copied().unwrap_or(Facility::Mx);
        let number_of_weeks = rng.range_u32(10, 20);
        let mut project = Project::new(format!("P-{}-{n:02}", calendar.year), client, start, number_of_weeks, facility)
            .with_id(format!("proj-{n:02}"));

        // Departments start in a staggered sequence; each stage runs a few weeks.
        let mut offset_weeks = 0u32;
        for department in Department::ALL {
            let duration = rng.range_u32(2, 6);
            let department_start = start + Duration::days(i64::from(offset_weeks) * 7);
            let stage = department.profile().valid_stages.first().copied();
            let entry = schedule_stage(calendar, department, stage, department_start, start, duration)?;
            if entry.week_end <= number_of_weeks {
                project.stages.push(entry);
            }
            offset_weeks += rng.range_u32(0, 3);

            let quoted = f64::from(rng.range_u32(4, 30) * 10);
            project.budgets.push(ProjectBudget::new(department, quoted));
        }
        projects.push(project);
    }
    Ok(projects)
}

fn demo_assignments(seed: u64, employees: &[Employee], projects: &[Project]) -> Vec<Assignment> {
    let mut rng = PlanRng::stream(seed, STREAM_ASSIGNMENTS);
    let mut assignments = Vec::new();

    for project in projects {
        for entry in &project.stages {
            let staff: Vec<&Employee> = employees
                .iter()
                .filter(|e| e.department == entry.department)
                .collect();
            for week in entry.week_start..=entry.week_end {
                let Some(employee) = rng.pick(&staff) else {
                    continue;
                };
                let monday = project.start_date + Duration::days(i64::from(week - 1) * 7);
                let hours = f64::from(rng.range_u32(2, 8) * 5);
                let mut assignment = Assignment::new(employee.id.clone(), project.id.clone(), monday, hours)
                    .with_id(format!("asg-{}-{}-{week}", project.id, entry.department.code().to_ascii_lowercase()));
                if let Some(stage) = entry.stage {
                    assignment = assignment.with_stage(stage);
                }
                if entry.department.profile().accepts_subcontract_flag() && rng.chance(0.3) {
                    let external = (hours / 3.0).round();
                    assignment = assignment.with_split(hours - external, external);
                }
                assignments.push(assignment);
            }
        }
    }
    assignments
}

type DemoPools = (Vec<InternalPoolEntry>, Vec<NamedPoolEntry>, Vec<NamedPoolEntry>);

fn demo_pools(seed: u64, calendar: &PlanCalendar, employees: &[Employee], config: &PlanConfig) -> DemoPools {
    let mut rng = PlanRng::stream(seed, STREAM_POOLS);
    let baseline = config.talent_baseline_hours;
    let companies = &KNOWN_SUBCONTRACT_COMPANIES[..3];

    let mut internal = Vec::new();
    let mut subcontracted = Vec::new();
    let mut external = Vec::new();

    for week in calendar.weeks() {
        for department in Department::ALL {
            let headcount = employees
                .iter()
                .filter(|e| e.is_active && e.department == department)
                .count() as f64;
            // Some weeks lose a person to leave or training.
            let absent = if rng.chance(0.15) { 1.0 } else { 0.0 };
            internal.push(InternalPoolEntry {
                department,
                week_start_date: week.date,
                capacity: hours_from_talent((headcount - absent).max(0.0), baseline),
            });
        }
        for company in companies {
            subcontracted.push(NamedPoolEntry {
                name: company.to_string(),
                week_start_date: week.date,
                capacity: hours_from_talent(f64::from(rng.range_u32(0, 3)), baseline),
            });
        }
        for team in DEMO_EXTERNAL_TEAMS {
            external.push(NamedPoolEntry {
                name: team.to_string(),
                week_start_date: week.date,
                capacity: hours_from_talent(f64::from(rng.range_u32(0, 2)), baseline),
            });
        }
    }
    (internal, subcontracted, external)
}

/// Generate a complete plan for `year` from `seed`.
pub fn generate_plan(seed: u64, year: PlanYear, config: &PlanConfig) -> PlanResult<PlanSnapshot> {
    let calendar = PlanCalendar::new(year);
    let employees = demo_employees(seed, config);
    let projects = demo_projects(seed, &calendar)?;
    let assignments = demo_assignments(seed, &employees, &projects);
    let (internal_pools, subcontracted_pools, external_pools) =
        demo_pools(seed, &calendar, &employees, config);

    log::debug!(
        "demo plan seed={seed} year={year}: {} employees, {} projects, {} assignments",
        employees.len(),
        projects.len(),
        assignments.len()
    );

    Ok(PlanSnapshot {
        employees,
        projects,
        assignments,
        internal_pools,
        subcontracted_pools,
        external_pools,
    })
}
