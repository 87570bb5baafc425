//! Talent normalizer: hours expressed as person-weeks.
//!
//! One talent unit is one person working the standard full-time week
//! (`BASELINE_HOURS`). Values are rounded half-up to two decimals.

use crate::types::Hours;

/// Standard full-time weekly hours.
pub const BASELINE_HOURS: Hours = 45.0;

/// `hours` in talent units against the standard baseline.
pub fn talent(hours: Hours) -> f64 {
    talent_with_baseline(hours, BASELINE_HOURS)
}

/// `hours` in talent units against a configured baseline.
/// A non-positive baseline yields 0.
pub fn talent_with_baseline(hours: Hours, baseline: Hours) -> f64 {
    if baseline <= 0.0 {
        return 0.0;
    }
    round_half_up_2(hours / baseline)
}

/// Round half-up to two decimal places.
pub fn round_half_up_2(value: f64) -> f64 {
    // 1e-9 absorbs representation error so 1.005 rounds to 1.01.
    ((value * 100.0) + 0.5 + 1e-9).floor() / 100.0
}

/// Inverse of `talent_with_baseline`, used when a talent figure must be
/// compared against hour-denominated input.
pub fn hours_from_talent(units: f64, baseline: Hours) -> Hours {
    units * baseline
}
