//! Same seed, same plan, same matrix.
//!
//! The demo generator and the engine must both be pure functions of their
//! inputs. Any divergence here makes runner output irreproducible.

use capacity_core::{
    config::PlanConfig,
    demo::generate_plan,
    engine::CapacityEngine,
    snapshot::PlanSnapshot,
};

#[test]
fn same_seed_produces_identical_snapshots() {
    const SEED: u64 = 0xDEAD_BEEF_CAFE_1234;
    let config = PlanConfig::default();

    let a = generate_plan(SEED, 2025, &config).expect("plan a");
    let b = generate_plan(SEED, 2025, &config).expect("plan b");

    let json_a = a.to_json().expect("json a");
    let json_b = b.to_json().expect("json b");
    assert_eq!(json_a.len(), json_b.len(), "snapshot JSON lengths differ");
    for (i, (la, lb)) in json_a.lines().zip(json_b.lines()).enumerate() {
        assert_eq!(la, lb, "snapshot diverged at line {i}:\n  A: {la}\n  B: {lb}");
    }
}

#[test]
fn different_seeds_produce_different_plans() {
    let config = PlanConfig::default();
    let a = generate_plan(42, 2025, &config).expect("plan a");
    let b = generate_plan(99, 2025, &config).expect("plan b");
    assert_ne!(a, b, "seeds 42 and 99 produced the same plan");
}

#[test]
fn demo_plan_is_valid_and_complete() {
    let config = PlanConfig::default();
    let plan = generate_plan(7, 2026, &config).expect("plan");
    plan.validate().expect("demo plan must pass record validation");

    assert!(!plan.employees.is_empty());
    assert!(!plan.projects.is_empty());
    assert!(!plan.assignments.is_empty());
    assert!(plan.employees.iter().any(|e| e.is_subcontracted_material));
    assert_eq!(plan.internal_pools.len(), 6 * 63, "one internal entry per department-week of 2026");
    assert!(!plan.default_toggles().active_companies.is_empty());
    assert!(!plan.default_toggles().active_teams.is_empty());
}

#[test]
fn snapshot_json_round_trips() {
    let plan = generate_plan(3, 2025, &PlanConfig::default()).expect("plan");
    let json = plan.to_json().expect("json");
    let back = PlanSnapshot::from_json(&json).expect("parse");
    assert_eq!(back, plan);
}

#[test]
fn matrix_is_a_pure_function_of_the_snapshot() {
    let plan = generate_plan(5, 2025, &PlanConfig::default()).expect("plan");
    let engine = CapacityEngine::new(PlanConfig::default());
    let toggles = plan.default_toggles();
    let first = engine.build_matrix(2025, &plan, &toggles);
    let second = engine.build_matrix(2025, &plan, &toggles);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}
