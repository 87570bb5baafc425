//! Relative-week resolver: a department's start date as a week offset
//! from its project's start, for multi-phase scheduling.
//!
//! Both dates are located in the plan year's week sequence (lookahead
//! included). The project's own first week is week 1.
//!
//! A date outside the sequence degrades to week 1 instead of failing the
//! project save. `resolve_relative_week` exposes the miss for callers that
//! need to tell the two apart.

use crate::{
    calendar::PlanCalendar,
    department::{Department, Stage},
    error::{PlanError, PlanResult},
    model::{StageEntry, MAX_STAGE_WEEK},
    types::PlanYear,
};
use chrono::NaiveDate;

/// Week used when either date falls outside the plan year.
pub const FALLBACK_RELATIVE_WEEK: i32 = 1;

/// `(department index - project index) + 1`, or None if either date is
/// outside the plan year and its lookahead.
pub fn resolve_relative_week(
    calendar:              &PlanCalendar,
    department_start_date: NaiveDate,
    project_start_date:    NaiveDate,
) -> Option<i32> {
    let department_index = calendar.position(department_start_date)?;
    let project_index = calendar.position(project_start_date)?;
    let offset = i32::try_from(department_index).ok()? - i32::try_from(project_index).ok()?;
    Some(offset + 1)
}

/// Relative week of a department start, falling back to week 1 on a miss.
pub fn relative_week(
    department_start_date: NaiveDate,
    project_start_date:    NaiveDate,
    plan_year:             PlanYear,
) -> i32 {
    relative_week_in(&PlanCalendar::new(plan_year), department_start_date, project_start_date)
}

/// `relative_week` against an already built calendar.
pub fn relative_week_in(
    calendar:              &PlanCalendar,
    department_start_date: NaiveDate,
    project_start_date:    NaiveDate,
) -> i32 {
    resolve_relative_week(calendar, department_start_date, project_start_date).unwrap_or_else(|| {
        log::warn!(
            "relative week fallback: department start {department_start_date} or project start \
             {project_start_date} is outside plan year {} (+lookahead); using week {FALLBACK_RELATIVE_WEEK}",
            calendar.year
        );
        FALLBACK_RELATIVE_WEEK
    })
}

/// Build a stage entry from an absolute department start date and a
/// duration in weeks.
pub fn schedule_stage(
    calendar:              &PlanCalendar,
    department:            Department,
    stage:                 Option<Stage>,
    department_start_date: NaiveDate,
    project_start_date:    NaiveDate,
    duration_weeks:        u32,
) -> PlanResult<StageEntry> {
    if duration_weeks == 0 {
        return Err(PlanError::validation("duration_weeks", "must be at least 1"));
    }
    let week = relative_week_in(calendar, department_start_date, project_start_date);
    let week_start = u32::try_from(week)
        .ok()
        .filter(|w| *w >= 1)
        .ok_or_else(|| {
            PlanError::validation(
                "department_start_date",
                format!("{department_start_date} is before the project start {project_start_date}"),
            )
        })?;

    let week_end = (week_start - 1)
        .checked_add(duration_weeks)
        .filter(|end| *end <= MAX_STAGE_WEEK)
        .ok_or_else(|| {
            PlanError::validation(
                "duration_weeks",
                format!("{duration_weeks} weeks from week {week_start} runs past week {MAX_STAGE_WEEK}"),
            )
        })?;

    let entry = StageEntry {
        department,
        stage,
        week_start,
        week_end,
        department_start_date: Some(department_start_date),
        duration_weeks: Some(duration_weeks),
    };
    entry.validate()?;
    Ok(entry)
}
