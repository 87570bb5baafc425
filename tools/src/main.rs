//! capacity-runner: headless capacity planner.
//!
//! Usage:
//!   capacity-runner --seed 7 --year 2025
//!   capacity-runner --db plan.db --year 2025 --inactive-company AMI
//!   capacity-runner --snapshot plan.json --department MFG --json

use anyhow::Result;
use capacity_core::{
    alert::{escalations, CapacityAlert},
    calendar::default_plan_year,
    capacity::WeekCapacity,
    config::PlanConfig,
    demo::generate_plan,
    department::Department,
    engine::{CapacityEngine, CapacityMatrix},
    snapshot::PlanSnapshot,
    source::PlanSource,
    store::PlanStore,
    types::PlanYear,
    utilization::{Tier, Utilization},
    statistics::{project_statistics, ProjectStatistics},
    workload::{utilization_report, UtilizationReport},
};
use std::env;

#[derive(serde::Serialize)]
struct RunOutput<'a> {
    matrix: &'a CapacityMatrix,
    alerts: &'a [CapacityAlert],
    report: Option<&'a UtilizationReport>,
    projects: &'a [ProjectStatistics],
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let today = chrono::Local::now().date_naive();
    let year: PlanYear = parse_arg(&args, "--year", default_plan_year(today));
    let seed = parse_arg(&args, "--seed", 42u64);
    let json = args.iter().any(|a| a == "--json");
    let with_report = args.iter().any(|a| a == "--report");

    let config = match flag_value(&args, "--config") {
        Some(path) => PlanConfig::load(path)?,
        None => PlanConfig::default(),
    };

    let source = open_source(&args, seed, year, &config)?;
    let snapshot = source.snapshot()?;
    if let Some(path) = flag_value(&args, "--export") {
        snapshot.save(path)?;
        log::info!("snapshot written to {path}");
    }

    let mut engine = CapacityEngine::new(config.clone());
    let departments = flag_values(&args, "--department")
        .into_iter()
        .map(str::parse::<Department>)
        .collect::<Result<Vec<_>, _>>()?;
    if !departments.is_empty() {
        engine = engine.with_departments(departments);
    }

    let all_on = snapshot.default_toggles();
    let mut toggles = all_on.clone();
    for company in flag_values(&args, "--inactive-company") {
        toggles.set_company(company, false);
    }
    for team in flag_values(&args, "--inactive-team") {
        toggles.set_team(team, false);
    }

    let mut cells: Vec<WeekCapacity> = Vec::new();
    let matrix = engine.run(year, &snapshot, &toggles, &mut cells)?;

    // With pools switched off, report movement against the all-active plan.
    let alerts = if toggles == all_on {
        escalations(None, &matrix)
    } else {
        let baseline = engine.build_matrix(year, &snapshot, &all_on);
        escalations(Some(&baseline), &matrix)
    };

    let report = with_report
        .then(|| {
            let first = matrix.weeks.first().map(|w| w.date)?;
            let last = matrix.weeks.last().map(|w| w.date)?;
            Some(utilization_report(
                &snapshot.employees,
                &snapshot.assignments,
                first,
                last,
                &config.thresholds,
            ))
        })
        .flatten();
    let projects: Vec<ProjectStatistics> = if with_report {
        snapshot
            .projects
            .iter()
            .map(|p| project_statistics(p, &snapshot.employees, &snapshot.assignments))
            .collect()
    } else {
        Vec::new()
    };

    if json {
        let output = RunOutput {
            matrix: &matrix,
            alerts: &alerts,
            report: report.as_ref(),
            projects: &projects,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("capacity-runner: department capacity plan");
    println!("  source:    {}", source.name());
    println!("  year:      {year}");
    println!("  weeks:     {}", matrix.weeks.len());
    println!("  cells:     {}", cells.len());
    println!();
    print_matrix(&matrix);
    print_alerts(&alerts);
    if let Some(report) = &report {
        print_report(report);
        print_projects(&projects);
    }
    Ok(())
}

fn open_source(args: &[String], seed: u64, year: PlanYear, config: &PlanConfig) -> Result<Box<dyn PlanSource>> {
    if let Some(path) = flag_value(args, "--snapshot") {
        return Ok(Box::new(PlanSnapshot::load(path)?));
    }
    let demo = generate_plan(seed, year, config)?;
    let Some(db) = flag_value(args, "--db") else {
        return Ok(Box::new(demo));
    };

    let store = PlanStore::open(db)?;
    store.migrate()?;
    if store.row_count("employee")? == 0 {
        log::info!("empty database {db}; seeding demo plan (seed {seed})");
        store.import_snapshot(&demo)?;
    }
    Ok(Box::new(store))
}

fn print_matrix(matrix: &CapacityMatrix) {
    for department in &matrix.departments {
        println!("=== {} ({}) ===", department.label(), department.code());
        println!("  week        start       available  assigned       net    util");
        for cell in matrix.row(*department) {
            let Some(week) = matrix.descriptor(cell.week_start) else {
                continue;
            };
            let marker = if week.is_next_year { "+" } else { " " };
            let util = match cell.utilization {
                Utilization::NoData => "    -".to_string(),
                Utilization::Percent(p) => format!("{p:>6.1}%"),
            };
            let tier = cell.tier.map(|t| t.label()).unwrap_or("");
            println!(
                "  W{:02}{marker}  {}  {:>10.2}  {:>8.2}  {:>8.2}  {util} {tier}",
                week.week_number, cell.week_start, cell.available, cell.assigned, cell.net
            );
        }
        println!();
    }
}

fn print_alerts(alerts: &[CapacityAlert]) {
    println!("=== ALERTS ===");
    if alerts.is_empty() {
        println!("  (none)");
    }
    for alert in alerts {
        match alert {
            CapacityAlert::Escalated { department, week_start, week_number, utilization_percent, net, .. } => {
                println!(
                    "  ESCALATE {department} W{week_number:02} ({week_start}): {utilization_percent:.2}% net {net:.2}"
                );
            }
            CapacityAlert::TierChanged { department, week_start, week_number, from, to } => {
                println!(
                    "  changed  {department} W{week_number:02} ({week_start}): {} -> {}",
                    tier_label(*from),
                    tier_label(*to)
                );
            }
        }
    }
    println!();
}

fn tier_label(tier: Option<Tier>) -> &'static str {
    tier.map(|t| t.label()).unwrap_or("no data")
}

fn print_report(report: &UtilizationReport) {
    println!("=== EMPLOYEE UTILIZATION {} .. {} ===", report.period_start, report.period_end);
    for row in &report.summary {
        println!(
            "  {:<20} {:<5} {:>8.1}h / {:>8.1}h  {}",
            row.name,
            row.department.code(),
            row.allocated,
            row.capacity,
            row.utilization.percent().map(|p| format!("{p:.2}%")).unwrap_or_else(|| "-".into())
        );
    }
    println!("  underutilized: {}", report.underutilized.len());
    println!("  overallocated: {}", report.overallocated.len());
}

fn print_projects(projects: &[ProjectStatistics]) {
    println!("=== PROJECTS ===");
    for p in projects {
        println!(
            "  {:<20} {:>3} bookings {:>8.1}h  avg {:>6.1}h  {} weeks",
            p.project_name,
            p.total_assignments,
            p.total_hours,
            p.average_hours_per_assignment,
            p.by_week.len()
        );
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].as_str())
}

/// Every value of a repeatable flag.
fn flag_values<'a>(args: &'a [String], flag: &str) -> Vec<&'a str> {
    args.windows(2).filter(|w| w[0] == flag).map(|w| w[1].as_str()).collect()
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
