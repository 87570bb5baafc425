//! Shared primitive types used across the planner.

/// A stable, unique identifier for an employee or project.
pub type EntityId = String;

/// A calendar year selected for planning.
pub type PlanYear = i32;

/// Hours per week.
pub type Hours = f64;
