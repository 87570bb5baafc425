use capacity_core::{
    budget::{BudgetStatus, ProjectBudget},
    capacity::WeekCapacity,
    config::PlanConfig,
    demo::generate_plan,
    department::{Department, Facility, Stage},
    engine::CapacityEngine,
    error::PlanError,
    model::{Assignment, Employee, Project, StageEntry},
    source::PlanSource,
    statistics::DepartmentWeeklyTotal,
    store::PlanStore,
};
use chrono::NaiveDate;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn fresh_store() -> PlanStore {
    let store = PlanStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
}

fn seed_basic(store: &PlanStore) {
    store
        .insert_employee(&Employee::new("Ana", Department::Mfg).with_id("m1").with_capacity(40.0))
        .unwrap();
    store
        .insert_employee(&Employee::new("Luis", Department::Build).with_id("b1").subcontracted("AMI"))
        .unwrap();
    let mut project = Project::new("Line 7", "Northwind", d(2025, 3, 3), 12, Facility::Al).with_id("p1");
    project.stages.push(StageEntry::new(Department::Build, Some(Stage::CabinetsFrames), 2, 4));
    project.budgets.push(ProjectBudget::new(Department::Mfg, 100.0));
    store.insert_project(&project).unwrap();
}

#[test]
fn records_round_trip() {
    let store = fresh_store();
    seed_basic(&store);

    let luis = store.employee("b1").unwrap().expect("employee b1");
    assert_eq!(luis.department, Department::Build);
    assert!(luis.is_subcontracted_material);
    assert_eq!(luis.subcontract_company.as_deref(), Some("AMI"));
    assert!(store.employee("nobody").unwrap().is_none());

    let project = store.project("p1").unwrap().expect("project p1");
    assert_eq!(project.start_date, d(2025, 3, 3));
    assert_eq!(project.facility, Facility::Al);
    assert_eq!(project.stages, vec![StageEntry::new(Department::Build, Some(Stage::CabinetsFrames), 2, 4)]);
    assert_eq!(project.budgets.len(), 1);

    let a = Assignment::new("b1", "p1", d(2025, 3, 12), 0.0)
        .with_split(20.0, 10.0)
        .with_stage(Stage::CabinetsFrames)
        .with_id("a1");
    store.insert_assignment(&a).unwrap();
    assert_eq!(store.assignment("a1").unwrap(), Some(a));
}

#[test]
fn invalid_records_are_not_written() {
    let store = fresh_store();
    seed_basic(&store);

    let mut tuesday = Assignment::new("m1", "p1", d(2025, 3, 3), 8.0);
    tuesday.week_start_date = d(2025, 3, 4);
    let err = store.insert_assignment(&tuesday).unwrap_err();
    assert!(matches!(err, PlanError::Validation { field: "week_start_date", .. }));

    let wrong_stage = Assignment::new("m1", "p1", d(2025, 3, 3), 8.0).with_stage(Stage::Debug);
    assert!(store.insert_assignment(&wrong_stage).is_err(), "MFG has no DEBUG stage");

    let unknown_employee = Assignment::new("ghost", "p1", d(2025, 3, 3), 8.0);
    assert!(matches!(store.insert_assignment(&unknown_employee), Err(PlanError::Database(_))));

    assert!(store.insert_employee(&Employee::new("Big", Department::Hd).with_capacity(200.0)).is_err());
    assert_eq!(store.row_count("assignment").unwrap(), 0);
    assert_eq!(store.row_count("employee").unwrap(), 2);
}

#[test]
fn pool_writes_upsert_on_the_monday() {
    let store = fresh_store();
    store.set_internal_pool(Department::Mfg, d(2025, 3, 5), 40.0).unwrap();
    store.set_internal_pool(Department::Mfg, d(2025, 3, 3), 50.0).unwrap();
    store.set_subcontracted_pool("AMI", d(2025, 3, 3), 45.0).unwrap();
    store.set_external_pool("Team Norte", d(2025, 3, 9), 90.0).unwrap();

    let internal = store.internal_pools().unwrap();
    assert_eq!(internal.len(), 1);
    assert_eq!(internal[0].week_start_date, d(2025, 3, 3));
    assert_eq!(internal[0].capacity, 50.0);
    assert_eq!(store.external_pools().unwrap()[0].week_start_date, d(2025, 3, 3));
    assert_eq!(store.subcontracted_pools().unwrap()[0].name, "AMI");

    assert!(store.set_external_pool("Team Sur", d(2025, 3, 3), -1.0).is_err());
}

#[test]
fn deleting_a_project_cascades() {
    let store = fresh_store();
    seed_basic(&store);
    store.insert_assignment(&Assignment::new("m1", "p1", d(2025, 3, 3), 8.0)).unwrap();
    store.insert_assignment(&Assignment::new("b1", "p1", d(2025, 3, 10), 8.0)).unwrap();

    assert!(store.delete_project("p1").unwrap());
    assert_eq!(store.row_count("assignment").unwrap(), 0);
    assert_eq!(store.row_count("department_stage").unwrap(), 0);
    assert_eq!(store.row_count("project_budget").unwrap(), 0);
    assert!(!store.delete_project("p1").unwrap());
}

#[test]
fn deleting_an_employee_removes_their_assignments() {
    let store = fresh_store();
    seed_basic(&store);
    store.insert_assignment(&Assignment::new("m1", "p1", d(2025, 3, 3), 8.0)).unwrap();
    store.insert_assignment(&Assignment::new("b1", "p1", d(2025, 3, 3), 8.0)).unwrap();

    assert!(store.delete_employee("m1").unwrap());
    let left = store.assignments().unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].employee_id, "b1");
}

#[test]
fn update_employee_requires_an_existing_row() {
    let store = fresh_store();
    seed_basic(&store);
    let ana = store.employee("m1").unwrap().unwrap().inactive();
    store.update_employee(&ana).unwrap();
    assert!(store.active_employees_in(Department::Mfg).unwrap().is_empty());

    let stranger = Employee::new("Nadie", Department::Mfg).with_id("zz");
    assert!(matches!(store.update_employee(&stranger), Err(PlanError::Validation { .. })));
}

#[test]
fn budget_split_is_refreshed_from_assignments() {
    let store = fresh_store();
    seed_basic(&store);
    store.insert_assignment(&Assignment::new("m1", "p1", d(2025, 3, 3), 30.0)).unwrap();
    store.insert_assignment(&Assignment::new("m1", "p1", d(2025, 3, 17), 20.0)).unwrap();

    let budgets = store.refresh_budget_split("p1", d(2025, 3, 12)).unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0].hours_utilized, 30.0);
    assert_eq!(budgets[0].hours_forecast, 20.0);
    assert_eq!(budgets[0].utilization_percent(), 50.0);

    let stored = store.project("p1").unwrap().unwrap();
    assert_eq!(stored.budgets, budgets);
    assert!(store.refresh_budget_split("missing", d(2025, 3, 12)).is_err());
}

#[test]
fn budget_refresh_records_overruns() {
    let store = fresh_store();
    seed_basic(&store);
    store.set_budget("p1", &ProjectBudget::new(Department::Build, 10.0)).unwrap();
    store.insert_assignment(&Assignment::new("b1", "p1", d(2025, 3, 3), 40.0)).unwrap();

    let budgets = store.refresh_budget_split("p1", d(2025, 3, 12)).unwrap();
    let build = budgets.iter().find(|b| b.department == Department::Build).unwrap();
    assert_eq!(build.hours_utilized, 40.0);
    assert_eq!(build.status(), BudgetStatus::Exceeded);
    assert_eq!(store.project("p1").unwrap().unwrap().budgets, budgets);
}

#[test]
fn edited_budgets_respect_the_overrun_cap() {
    let store = fresh_store();
    seed_basic(&store);
    let mut edit = ProjectBudget::new(Department::Hd, 10.0);
    edit.hours_forecast = 16.0;
    assert!(matches!(store.set_budget("p1", &edit), Err(PlanError::Validation { field: "hours_utilized", .. })));
    assert!(store.set_budget("missing", &ProjectBudget::new(Department::Hd, 10.0)).is_err());

    store.set_budget("p1", &ProjectBudget::new(Department::Mfg, 120.0)).unwrap();
    let stored = store.project("p1").unwrap().unwrap();
    assert_eq!(stored.budget_for(Department::Mfg).map(|b| b.hours_allocated), Some(120.0));
    assert_eq!(stored.budgets.len(), 1);
}

#[test]
fn a_department_has_one_stage_entry_per_project() {
    let store = fresh_store();
    seed_basic(&store);
    let twice = [
        StageEntry::new(Department::Mfg, None, 1, 2),
        StageEntry::new(Department::Mfg, None, 3, 4),
    ];
    assert!(matches!(store.replace_stages("p1", &twice), Err(PlanError::Validation { field: "stages", .. })));
    assert_eq!(store.row_count("department_stage").unwrap(), 1, "schedule left untouched");
}

#[test]
fn department_weekly_totals_refresh_from_assignments() {
    let store = fresh_store();
    seed_basic(&store);
    store
        .set_department_weekly_total(&DepartmentWeeklyTotal::new(Department::Hd, d(2025, 1, 8), 99.0))
        .unwrap();
    store.insert_assignment(&Assignment::new("m1", "p1", d(2025, 3, 3), 30.0)).unwrap();
    store.insert_assignment(&Assignment::new("b1", "p1", d(2025, 3, 3), 12.0)).unwrap();
    store.insert_assignment(&Assignment::new("m1", "p1", d(2025, 3, 10), 8.0)).unwrap();

    assert_eq!(store.refresh_department_weekly_totals().unwrap(), 3);
    let totals = store.department_weekly_totals().unwrap();
    assert_eq!(totals.len(), 3, "stale totals are dropped");
    assert!(totals.contains(&DepartmentWeeklyTotal::new(Department::Mfg, d(2025, 3, 3), 30.0)));
    assert!(totals.contains(&DepartmentWeeklyTotal::new(Department::Build, d(2025, 3, 3), 12.0)));

    let bad = DepartmentWeeklyTotal::new(Department::Mfg, d(2025, 3, 3), -2.0);
    assert!(store.set_department_weekly_total(&bad).is_err());
}

#[test]
fn imported_plan_computes_the_same_matrix() {
    let config = PlanConfig::default();
    let plan = generate_plan(11, 2025, &config).unwrap();
    let store = fresh_store();
    store.import_snapshot(&plan).unwrap();

    let from_store = store.snapshot().unwrap();
    assert_eq!(from_store.employees.len(), plan.employees.len());
    assert_eq!(from_store.projects.len(), plan.projects.len());
    assert_eq!(from_store.assignments.len(), plan.assignments.len());
    assert_eq!(from_store.internal_pools.len(), plan.internal_pools.len());

    let engine = CapacityEngine::new(config);
    let expected = engine.build_matrix(2025, &plan, &plan.default_toggles());
    let mut cells: Vec<WeekCapacity> = Vec::new();
    let actual = engine
        .run(2025, &store, &from_store.default_toggles(), &mut cells)
        .unwrap();
    assert_eq!(actual, expected);
    assert_eq!(cells, expected.cells);
}
