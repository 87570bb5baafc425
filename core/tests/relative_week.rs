use capacity_core::{
    calendar::PlanCalendar,
    department::{Department, Stage},
    error::PlanError,
    relative_week::{relative_week, resolve_relative_week, schedule_stage, FALLBACK_RELATIVE_WEEK},
};
use chrono::NaiveDate;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn department_starting_with_the_project_is_week_one() {
    for start in [d(2025, 1, 6), d(2025, 7, 14), d(2024, 12, 30)] {
        assert_eq!(relative_week(start, start, 2025), 1, "start {start}");
    }
}

#[test]
fn later_departments_count_forward() {
    assert_eq!(relative_week(d(2025, 3, 17), d(2025, 3, 3), 2025), 3);
    // Mid-week dates resolve to their Monday.
    assert_eq!(relative_week(d(2025, 3, 20), d(2025, 3, 5), 2025), 3);
}

#[test]
fn offsets_continue_into_the_lookahead() {
    // 2025-12-15 is ISO week 51; 2026-01-05 is lookahead week 2.
    assert_eq!(relative_week(d(2026, 1, 5), d(2025, 12, 15), 2025), 4);
}

#[test]
fn dates_outside_the_plan_year_fall_back() {
    let _ = env_logger::builder().is_test(true).try_init();
    let calendar = PlanCalendar::new(2025);
    assert_eq!(resolve_relative_week(&calendar, d(2027, 6, 1), d(2025, 3, 3)), None);
    assert_eq!(relative_week(d(2027, 6, 1), d(2025, 3, 3), 2025), FALLBACK_RELATIVE_WEEK);
    assert_eq!(relative_week(d(2025, 3, 3), d(2023, 1, 2), 2025), FALLBACK_RELATIVE_WEEK);
}

#[test]
fn department_before_project_is_not_positive() {
    let calendar = PlanCalendar::new(2025);
    assert_eq!(resolve_relative_week(&calendar, d(2025, 3, 3), d(2025, 3, 17)), Some(-1));
}

#[test]
fn schedule_stage_builds_a_valid_entry() {
    let calendar = PlanCalendar::new(2025);
    let entry = schedule_stage(
        &calendar,
        Department::Build,
        Some(Stage::OverallAssembly),
        d(2025, 4, 14),
        d(2025, 3, 31),
        4,
    )
    .unwrap();
    assert_eq!(entry.week_start, 3);
    assert_eq!(entry.week_end, 6);
    assert_eq!(entry.span_weeks(), 4);
    assert_eq!(entry.department_start_date, Some(d(2025, 4, 14)));
}

#[test]
fn schedule_stage_rejects_bad_input() {
    let calendar = PlanCalendar::new(2025);
    let zero = schedule_stage(&calendar, Department::Mfg, None, d(2025, 4, 14), d(2025, 3, 31), 0);
    assert!(matches!(zero, Err(PlanError::Validation { field: "duration_weeks", .. })));

    let early = schedule_stage(&calendar, Department::Mfg, None, d(2025, 3, 17), d(2025, 3, 31), 2);
    assert!(matches!(early, Err(PlanError::Validation { field: "department_start_date", .. })));

    let wrong_stage =
        schedule_stage(&calendar, Department::Prg, Some(Stage::Concept), d(2025, 3, 31), d(2025, 3, 31), 2);
    assert!(matches!(wrong_stage, Err(PlanError::Validation { field: "stage", .. })));
}

#[test]
fn schedule_stage_rejects_durations_past_the_last_week() {
    let calendar = PlanCalendar::new(2025);
    let huge = schedule_stage(&calendar, Department::Mfg, None, d(2025, 4, 14), d(2025, 3, 31), u32::MAX);
    assert!(matches!(huge, Err(PlanError::Validation { field: "duration_weeks", .. })));

    let long = schedule_stage(&calendar, Department::Mfg, None, d(2025, 4, 14), d(2025, 3, 31), 52);
    assert!(matches!(long, Err(PlanError::Validation { field: "duration_weeks", .. })));
    let fits = schedule_stage(&calendar, Department::Mfg, None, d(2025, 4, 14), d(2025, 3, 31), 51);
    assert_eq!(fits.unwrap().week_end, 53);
}
