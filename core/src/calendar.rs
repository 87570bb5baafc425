//! Calendar engine: Monday-anchored weeks and ISO-8601 week numbering.
//!
//! A plan year is the ISO week-numbering year: weeks 1..=52 (or 53), each
//! identified by its Monday. The sequence is followed by a fixed lookahead
//! of `LOOKAHEAD_WEEKS` weeks from the next ISO year, numbered from 1 again
//! and flagged `is_next_year`, so the planning horizon stays contiguous
//! across the year boundary.
//!
//! Dec 29–31 may fall in week 1 of the next ISO year, and Jan 1–3 may fall in
//! week 52/53 of the previous one. Every lookup therefore goes through
//! `week_start` first and matches on the Monday, never on the calendar year.

use crate::{
    error::{PlanError, PlanResult},
    types::PlanYear,
};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Next-year weeks appended after the last ISO week of a plan year.
pub const LOOKAHEAD_WEEKS: u32 = 10;

/// Parse a strict `YYYY-MM-DD` date.
pub fn parse_iso_date(input: &str) -> PlanResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| PlanError::InvalidDate { input: input.to_string() })
}

/// Monday of the ISO week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    // Monday=0 .. Sunday=6, so Sunday steps back six days.
    let offset = date.weekday().num_days_from_monday();
    date - Duration::days(i64::from(offset))
}

/// `week_start` for an ISO date string.
pub fn week_start_str(input: &str) -> PlanResult<NaiveDate> {
    parse_iso_date(input).map(week_start)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IsoWeekInfo {
    pub year: PlanYear,
    pub week: u32,
}

/// ISO-8601 week-numbering year and week of `date`.
pub fn iso_week_info(date: NaiveDate) -> IsoWeekInfo {
    let iso = date.iso_week();
    IsoWeekInfo { year: iso.year(), week: iso.week() }
}

/// `iso_week_info` for an ISO date string.
pub fn iso_week_info_str(input: &str) -> PlanResult<IsoWeekInfo> {
    parse_iso_date(input).map(iso_week_info)
}

/// Number of ISO weeks in `year` (52 or 53).
pub fn iso_weeks_in_year(year: PlanYear) -> u32 {
    if NaiveDate::from_isoywd_opt(year, 53, Weekday::Mon).is_some() {
        53
    } else {
        52
    }
}

/// The plan year a screen opens on for a given "today": the ISO
/// week-numbering year, so today's week is always a main-year week.
pub fn default_plan_year(today: NaiveDate) -> PlanYear {
    iso_week_info(today).year
}

/// A lazily walked sequence of Mondays, `week_start(start)` through `end`
/// inclusive. Cloning or calling `restart` replays it from the beginning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekRange {
    first:  NaiveDate,
    cursor: NaiveDate,
    end:    NaiveDate,
}

impl WeekRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        let first = week_start(start);
        Self { first, cursor: first, end }
    }

    pub fn restart(&mut self) {
        self.cursor = self.first;
    }
}

impl Iterator for WeekRange {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        if self.cursor > self.end {
            return None;
        }
        let current = self.cursor;
        self.cursor = current + Duration::days(7);
        Some(current)
    }
}

/// Mondays from the week of `start` through `end`, both ISO date strings.
pub fn weeks_in_range(start: &str, end: &str) -> PlanResult<WeekRange> {
    Ok(WeekRange::new(parse_iso_date(start)?, parse_iso_date(end)?))
}

/// One column of the planning matrix. Derived, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeekDescriptor {
    /// Monday of the week.
    pub date:         NaiveDate,
    pub week_number:  u32,
    pub is_next_year: bool,
}

/// Every ISO week of `year` followed by the first `LOOKAHEAD_WEEKS` weeks
/// of `year + 1`.
pub fn all_weeks_of_plan_year(year: PlanYear) -> Vec<WeekDescriptor> {
    let current = (1..=iso_weeks_in_year(year)).filter_map(|week| {
        NaiveDate::from_isoywd_opt(year, week, Weekday::Mon).map(|date| WeekDescriptor {
            date,
            week_number: week,
            is_next_year: false,
        })
    });
    let lookahead = (1..=LOOKAHEAD_WEEKS).filter_map(|week| {
        NaiveDate::from_isoywd_opt(year + 1, week, Weekday::Mon).map(|date| WeekDescriptor {
            date,
            week_number: week,
            is_next_year: true,
        })
    });
    current.chain(lookahead).collect()
}

/// A plan year's week sequence with a Monday → position index.
#[derive(Debug, Clone)]
pub struct PlanCalendar {
    pub year: PlanYear,
    weeks:    Vec<WeekDescriptor>,
    index:    HashMap<NaiveDate, usize>,
}

impl PlanCalendar {
    pub fn new(year: PlanYear) -> Self {
        let weeks = all_weeks_of_plan_year(year);
        let index = weeks.iter().enumerate().map(|(i, w)| (w.date, i)).collect();
        Self { year, weeks, index }
    }

    pub fn weeks(&self) -> &[WeekDescriptor] {
        &self.weeks
    }

    /// Zero-based position of the week containing `date`, if it is inside
    /// the plan year or its lookahead.
    pub fn position(&self, date: NaiveDate) -> Option<usize> {
        self.index.get(&week_start(date)).copied()
    }

    pub fn descriptor(&self, date: NaiveDate) -> Option<&WeekDescriptor> {
        self.position(date).map(|i| &self.weeks[i])
    }

    pub fn first_week(&self) -> Option<NaiveDate> {
        self.weeks.first().map(|w| w.date)
    }

    pub fn last_week(&self) -> Option<NaiveDate> {
        self.weeks.last().map(|w| w.date)
    }
}
