use capacity_core::{
    budget::{project_hours_split, BudgetStatus, HoursSplit, ProjectBudget},
    department::{Department, Facility, Stage},
    error::PlanError,
    model::{Assignment, Employee, Project, StageEntry},
};
use chrono::NaiveDate;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn field_of(err: PlanError) -> &'static str {
    match err {
        PlanError::Validation { field, .. } => field,
        other => panic!("expected a validation error, got {other}"),
    }
}

#[test]
fn assignment_week_is_normalized_on_construction() {
    let a = Assignment::new("e1", "p1", d(2025, 3, 6), 12.0);
    assert_eq!(a.week_start_date, d(2025, 3, 3));
    assert!(a.validate().is_ok());
}

#[test]
fn non_monday_assignment_is_rejected() {
    let mut a = Assignment::new("e1", "p1", d(2025, 3, 3), 12.0);
    a.week_start_date = d(2025, 3, 4);
    assert_eq!(field_of(a.validate().unwrap_err()), "week_start_date");
}

#[test]
fn split_must_sum_to_total() {
    let a = Assignment::new("e1", "p1", d(2025, 3, 3), 0.0).with_split(20.0, 5.0);
    assert_eq!(a.hours, 25.0);
    assert_eq!(a.total_hours(), 25.0);
    assert!(a.validate().is_ok());

    let mut bad = a.clone();
    bad.hours = 30.0;
    assert_eq!(field_of(bad.validate().unwrap_err()), "hours");
    assert_eq!(bad.total_hours(), 25.0, "the split wins over the stored total");

    let mut negative = Assignment::new("e1", "p1", d(2025, 3, 3), 10.0);
    negative.hours = -1.0;
    assert_eq!(field_of(negative.validate().unwrap_err()), "hours");
}

#[test]
fn employee_validation() {
    assert!(Employee::new("Ana", Department::Mfg).validate().is_ok());
    assert_eq!(
        field_of(Employee::new("  ", Department::Mfg).validate().unwrap_err()),
        "name"
    );
    assert_eq!(
        field_of(Employee::new("Ana", Department::Mfg).with_capacity(169.0).validate().unwrap_err()),
        "capacity"
    );
    let pm_sub = Employee::new("Ana", Department::Pm).subcontracted("AMI");
    assert_eq!(field_of(pm_sub.validate().unwrap_err()), "is_subcontracted_material");

    let build_sub = Employee::new("Luis", Department::Build).subcontracted("  ");
    assert!(build_sub.validate().is_ok());
    assert!(build_sub.is_subcontracted_material);
    assert_eq!(build_sub.subcontract_company, None, "blank company is stored as none");
}

#[test]
fn stage_entry_validation() {
    assert!(StageEntry::new(Department::Med, Some(Stage::Concept), 1, 4).validate().is_ok());
    assert_eq!(
        field_of(StageEntry::new(Department::Med, None, 5, 4).validate().unwrap_err()),
        "week_end"
    );
    assert_eq!(
        field_of(StageEntry::new(Department::Med, None, 0, 4).validate().unwrap_err()),
        "week_start"
    );
    assert_eq!(
        field_of(StageEntry::new(Department::Med, Some(Stage::Debug), 1, 2).validate().unwrap_err()),
        "stage"
    );
    let mut mismatched = StageEntry::new(Department::Mfg, None, 2, 4);
    mismatched.duration_weeks = Some(5);
    assert_eq!(field_of(mismatched.validate().unwrap_err()), "duration_weeks");
}

#[test]
fn project_end_date_and_lookups() {
    let mut project = Project::new("Line 7", "Northwind", d(2025, 3, 3), 10, Facility::Mx);
    project.stages.push(StageEntry::new(Department::Build, Some(Stage::FineTuning), 3, 5));
    project.budgets.push(ProjectBudget::new(Department::Build, 200.0));
    assert_eq!(project.end_date(), d(2025, 5, 12));
    assert_eq!(project.stage_for(Department::Build).map(|s| s.week_start), Some(3));
    assert!(project.stage_for(Department::Prg).is_none());
    assert!(project.budget_for(Department::Build).is_some());
    assert!(project.validate().is_ok());

    project.number_of_weeks = 0;
    assert_eq!(field_of(project.validate().unwrap_err()), "number_of_weeks");
}

#[test]
fn a_department_is_scheduled_and_budgeted_once_per_project() {
    let mut project = Project::new("Line 7", "Northwind", d(2025, 3, 3), 10, Facility::Mx);
    project.stages.push(StageEntry::new(Department::Build, Some(Stage::FineTuning), 3, 5));
    project.stages.push(StageEntry::new(Department::Build, None, 6, 8));
    assert_eq!(field_of(project.validate().unwrap_err()), "stages");

    project.stages.pop();
    project.budgets.push(ProjectBudget::new(Department::Hd, 10.0));
    project.budgets.push(ProjectBudget::new(Department::Hd, 20.0));
    assert_eq!(field_of(project.validate().unwrap_err()), "budgets");
}

#[test]
fn budget_overrun_cap_applies_to_edits_only() {
    let mut budget = ProjectBudget::new(Department::Build, 10.0);
    budget.apply_split(&HoursSplit { utilized: 40.0, forecast: 0.0 });
    assert!(budget.validate().is_ok());
    assert_eq!(budget.status(), BudgetStatus::Exceeded);
    assert_eq!(field_of(budget.validate_edit().unwrap_err()), "hours_utilized");

    budget.apply_split(&HoursSplit { utilized: 10.0, forecast: 5.0 });
    assert!(budget.validate_edit().is_ok(), "exactly 150% is allowed");
}

#[test]
fn budget_status_bands() {
    let mut budget = ProjectBudget::new(Department::Hd, 100.0);
    assert_eq!(budget.status(), BudgetStatus::Within);
    budget.apply_split(&HoursSplit { utilized: 50.0, forecast: 30.0 });
    assert_eq!(budget.utilization_percent(), 80.0);
    assert_eq!(budget.status(), BudgetStatus::Near);
    budget.apply_split(&HoursSplit { utilized: 90.0, forecast: 20.0 });
    assert_eq!(budget.status(), BudgetStatus::Exceeded);
    assert_eq!(budget.available_hours(), -10.0);
    assert!(budget.validate().is_ok());

    budget.apply_split(&HoursSplit { utilized: 100.0, forecast: 51.0 });
    assert_eq!(field_of(budget.validate_edit().unwrap_err()), "hours_utilized");

    assert_eq!(ProjectBudget::new(Department::Hd, 0.0).utilization_percent(), 0.0);
}

#[test]
fn hours_split_at_the_split_week() {
    let employees = vec![
        Employee::new("Ana", Department::Mfg).with_id("m1"),
        Employee::new("Luis", Department::Build).with_id("b1"),
    ];
    let assignments = vec![
        Assignment::new("m1", "p1", d(2025, 3, 3), 10.0),
        Assignment::new("m1", "p1", d(2025, 3, 10), 20.0),
        Assignment::new("b1", "p1", d(2025, 3, 17), 0.0).with_split(8.0, 4.0),
        Assignment::new("m1", "p2", d(2025, 3, 3), 99.0),
        Assignment::new("ghost", "p1", d(2025, 3, 3), 99.0),
    ];
    let split = project_hours_split("p1", &employees, &assignments, d(2025, 3, 12));
    assert_eq!(split.len(), 2);
    assert_eq!(split[&Department::Mfg], HoursSplit { utilized: 10.0, forecast: 20.0 });
    assert_eq!(split[&Department::Build].forecast, 12.0);
    assert_eq!(split[&Department::Build].total(), 12.0);
}

#[test]
fn codes_parse_case_insensitively() {
    assert_eq!("build".parse::<Department>().unwrap(), Department::Build);
    assert_eq!(" MFG ".parse::<Department>().unwrap(), Department::Mfg);
    assert!(matches!("QA".parse::<Department>(), Err(PlanError::UnknownDepartment { .. })));
    assert_eq!("OVERALL_ASSEMBLY".parse::<Stage>().unwrap(), Stage::OverallAssembly);
    assert!(matches!("LUNCH".parse::<Stage>(), Err(PlanError::UnknownStage { .. })));
    assert_eq!("mx".parse::<Facility>().unwrap(), Facility::Mx);
}

#[test]
fn department_table() {
    let mfg = Department::Mfg.profile();
    assert!(mfg.uses_raw_hours_display);
    assert!(Department::Build.profile().supports_subcontracting);
    assert!(Department::Prg.profile().supports_external_teams);
    for department in [Department::Pm, Department::Med, Department::Hd, Department::Build, Department::Prg] {
        assert!(!department.profile().uses_raw_hours_display, "{department} should use talent units");
    }
    assert!(Department::Prg.profile().allows_stage(Stage::RobotSimulation));
    assert!(!Department::Build.profile().allows_stage(Stage::Offline));
}
