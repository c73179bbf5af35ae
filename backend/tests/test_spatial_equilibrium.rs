//! Spatial equilibrium reallocation properties
//!
//! Reallocation only moves migrants between cities: the national total is
//! conserved, and a zero total comes back untouched.

use housing_simulator_core_rs::coupling::SpatialEquilibriumConfig;
use housing_simulator_core_rs::models::Event;
use housing_simulator_core_rs::{CityBaseline, EngineMode, Orchestrator, ScenarioParams};
use proptest::prelude::*;

fn tolerance(flows: &[f64]) -> f64 {
    1e-9 * (1.0 + flows.iter().map(|f| f.abs()).sum::<f64>())
}

fn config_strategy() -> impl Strategy<Value = SpatialEquilibriumConfig> {
    (0.0..20.0f64, 0.0..1.0f64, -2.0..2.0f64, -2.0..2.0f64).prop_map(
        |(sensitivity, friction, wage_weight, cost_weight)| SpatialEquilibriumConfig {
            sensitivity,
            friction,
            wage_weight,
            cost_weight,
            ..SpatialEquilibriumConfig::default()
        },
    )
}

proptest! {
    #[test]
    fn reallocation_conserves_total(
        config in config_strategy(),
        rows in prop::collection::vec((-50_000.0..50_000.0f64, -1.0..1.0f64, 0.0..50_000.0f64), 1..8),
    ) {
        let flows: Vec<f64> = rows.iter().map(|r| r.0).collect();
        let utilities: Vec<f64> = rows.iter().map(|r| r.1).collect();
        let baseline: Vec<f64> = rows.iter().map(|r| r.2).collect();

        let out = config.reallocate(&flows, &utilities, &baseline);
        prop_assert_eq!(out.len(), flows.len());

        let before: f64 = flows.iter().sum();
        let after: f64 = out.iter().sum();
        prop_assert!((before - after).abs() <= tolerance(&flows), "{} vs {}", before, after);
    }

    #[test]
    fn zero_total_is_returned_unchanged(
        config in config_strategy(),
        flow in 0.0..10_000.0f64,
        utilities in prop::collection::vec(-1.0..1.0f64, 2),
    ) {
        let flows = vec![flow, -flow];
        let out = config.reallocate(&flows, &utilities, &[1.0, 1.0]);
        prop_assert_eq!(out, flows);
    }

    #[test]
    fn same_sign_flows_keep_their_sign(
        config in config_strategy(),
        flows in prop::collection::vec(1.0..10_000.0f64, 1..6),
    ) {
        let utilities = vec![0.0; flows.len()];
        let out = config.reallocate(&flows, &utilities, &flows);
        prop_assert!(out.iter().all(|f| *f >= 0.0));
    }
}

#[test]
fn test_equal_utilities_without_friction_split_evenly() {
    let config = SpatialEquilibriumConfig {
        friction: 0.0,
        ..SpatialEquilibriumConfig::default()
    };
    let out = config.reallocate(&[100.0, 300.0], &[0.3, 0.3], &[100.0, 300.0]);
    assert!((out[0] - 200.0).abs() < 1e-9);
    assert!((out[1] - 200.0).abs() < 1e-9);
}

#[test]
fn test_full_friction_keeps_baseline_shares() {
    let config = SpatialEquilibriumConfig {
        friction: 1.0,
        ..SpatialEquilibriumConfig::default()
    };
    let out = config.reallocate(&[100.0, 300.0], &[5.0, -5.0], &[100.0, 300.0]);
    assert!((out[0] - 100.0).abs() < 1e-9);
    assert!((out[1] - 300.0).abs() < 1e-9);
}

#[test]
fn test_advanced_run_conserves_national_migration() {
    let mut per = CityBaseline::new("PER", "WA");
    per.amenity = 0.3;
    per.median_price = 600_000.0;
    let mut hba = CityBaseline::new("HBA", "TAS");
    hba.population = 250_000.0;
    hba.dwelling_stock = 105_000.0;

    let params = ScenarioParams::new(8, vec![CityBaseline::new("SYD", "NSW"), per, hba])
        .with_mode(EngineMode::Advanced);
    let out = Orchestrator::new(params).unwrap().run();

    for event in out.events.events_of_type("MigrationReallocated") {
        if let Event::MigrationReallocated { step, total, .. } = event {
            let realised: f64 = out.cities.values().map(|c| c.years[*step].net_migration).sum();
            assert!((realised - total).abs() < 1e-6 * (1.0 + total.abs()));
        }
    }

    let national = out.national().unwrap();
    for (step, year) in national.years.iter().enumerate() {
        let realised: f64 = out.cities.values().map(|c| c.years[step].net_migration).sum();
        assert!((year.net_migration - realised).abs() < 1e-6);
    }
}
