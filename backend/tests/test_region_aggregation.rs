//! Region aggregation tests
//!
//! National, state and city scopes built from multi-city runs.

use housing_simulator_core_rs::methodology::CoreConstants;
use housing_simulator_core_rs::stress::{synthetic_deciles, StressInputs};
use housing_simulator_core_rs::{
    CityBaseline, Orchestrator, ScenarioOutputs, ScenarioParams, Scope, SimulationError,
};
use proptest::prelude::*;

fn three_cities() -> Vec<CityBaseline> {
    let mut mel = CityBaseline::new("MEL", "VIC");
    mel.population = 5_100_000.0;
    mel.dwelling_stock = 2_100_000.0;
    mel.median_price = 900_000.0;

    let mut ncl = CityBaseline::new("NCL", "NSW");
    ncl.population = 500_000.0;
    ncl.dwelling_stock = 210_000.0;
    ncl.median_price = 820_000.0;
    ncl.median_rent = 520.0;

    vec![CityBaseline::new("SYD", "NSW"), mel, ncl]
}

fn run(cities: Vec<CityBaseline>) -> ScenarioOutputs {
    Orchestrator::new(ScenarioParams::new(6, cities)).unwrap().run()
}

#[test]
fn test_every_scope_is_computed() {
    let out = run(three_cities());
    let tokens: Vec<&str> = out.regions.keys().map(String::as_str).collect();
    assert_eq!(
        tokens,
        vec!["city:MEL", "city:NCL", "city:SYD", "national", "state:NSW", "state:VIC"]
    );
    assert_eq!(out.region("state:NSW").unwrap().city_ids, vec!["SYD", "NCL"]);
    assert_eq!(out.national().unwrap().scope, Scope::National);
}

#[test]
fn test_indices_start_at_100() {
    let out = run(three_cities());
    for region in out.regions.values() {
        let first = &region.years[0];
        assert_eq!(first.price_index, 100.0);
        assert_eq!(first.rent_index, 100.0);
        assert_eq!(first.wage_index, 100.0);
    }
}

#[test]
fn test_weights_sum_to_one() {
    let out = run(three_cities());
    for region in out.regions.values() {
        for year in &region.years {
            let total: f64 = year.weights.values().sum();
            assert!((total - 1.0).abs() < 1e-9, "{} weights sum to {}", region.label, total);
        }
    }
}

#[test]
fn test_population_weighted_national_price() {
    let out = run(three_cities());
    let national = out.national().unwrap();
    let year = &national.years[2];

    let total_pop: f64 = out.cities.values().map(|c| c.years[2].population).sum();
    let expected: f64 = out
        .cities
        .values()
        .map(|c| c.years[2].price * c.years[2].population / total_pop)
        .sum();
    assert!((year.price - expected).abs() < 1e-6);
    assert!((year.population - total_pop).abs() < 1e-6);
}

#[test]
fn test_explicit_weights_override_population() {
    let mut cities = three_cities();
    cities[0].aggregation_weight = Some(1.0);
    cities[1].aggregation_weight = Some(3.0);
    let out = run(cities);

    let weights = &out.national().unwrap().years[0].weights;
    assert!((weights["SYD"] - 0.25).abs() < 1e-12);
    assert!((weights["MEL"] - 0.75).abs() < 1e-12);
    assert_eq!(weights["NCL"], 0.0);
}

#[test]
fn test_single_city_scope_matches_city() {
    let out = run(three_cities());
    let region = out.region("city:MEL").unwrap();
    let city = out.city("MEL").unwrap();
    for (r, c) in region.years.iter().zip(&city.years) {
        assert_eq!(r.price, c.price);
        assert_eq!(r.rent, c.rent);
    }
}

#[test]
fn test_unknown_scope_not_found() {
    let out = run(three_cities());
    assert_eq!(
        out.region("state:QLD").unwrap_err(),
        SimulationError::ScopeNotFound("state:QLD".to_string())
    );
    assert!(matches!(
        out.region("suburb:Carlton"),
        Err(SimulationError::ScopeNotFound(_))
    ));
}

proptest! {
    #[test]
    fn renter_stress_rises_with_rent(rent in 100.0..2_000.0f64, bump in 0.0..500.0f64) {
        let constants = CoreConstants::default();
        let inputs = |rent: f64| StressInputs {
            price: 800_000.0,
            rent,
            wage: 95_000.0,
            wage_index: 1.0,
            mortgage_rate: 0.06,
            rent_assistance_share: 0.0,
        };
        let low = synthetic_deciles(&inputs(rent), &constants);
        let high = synthetic_deciles(&inputs(rent + bump), &constants);
        prop_assert!(high.renter_stress_share >= low.renter_stress_share);
    }
}
