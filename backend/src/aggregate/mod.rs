//! Region Aggregator
//!
//! Rolls city trajectories up into national, state and city-as-region
//! views. Levels that add up (population, stock, completions, revenue,
//! migration) are summed; prices, rents, wages, rates and stress shares are
//! weighted averages.
//!
//! # Weighting
//!
//! - If any city in the run sets `aggregation_weight`, explicit weights are
//!   used everywhere (missing means 0)
//! - Otherwise each year's population is the weight
//! - Per-year weights renormalise to 1 within the region; a zero total falls
//!   back to population, then to uniform
//!
//! Indices are `value / value_year0 * 100`, with year 0 pinned to exactly
//! 100.

pub mod scope;

pub use scope::Scope;

use crate::models::{CityBaseline, CityTrajectory, CityYearSnapshot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One aggregated year
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegionYear {
    pub step: usize,
    pub year: i32,

    // sums
    pub population: f64,
    pub dwelling_stock: f64,
    pub completions: f64,
    pub stamp_duty_revenue: f64,
    pub net_migration: f64,

    // weighted averages
    pub price: f64,
    pub rent: f64,
    pub wage: f64,
    pub mortgage_rate: f64,
    pub renter_stress_share: f64,
    pub mortgage_stress_share: f64,

    // indices, year 0 = 100
    pub price_index: f64,
    pub rent_index: f64,
    pub wage_index: f64,

    /// Normalised weight per city id
    pub weights: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegionSummary {
    pub start_price: f64,
    pub end_price: f64,
    pub start_rent: f64,
    pub end_rent: f64,
    pub end_population: f64,
    pub end_price_index: f64,
    pub end_rent_index: f64,
    pub total_stamp_duty_revenue: f64,
    pub end_renter_stress_share: f64,
    pub end_mortgage_stress_share: f64,
}

/// Aggregated trajectory for one scope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegionScenarioOutputs {
    pub scope: Scope,
    pub label: String,
    pub city_ids: Vec<String>,
    pub years: Vec<RegionYear>,
    pub summary: RegionSummary,
}

/// How per-city weights are chosen for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightBasis {
    Explicit,
    Population,
}

impl WeightBasis {
    /// Explicit if any city in the run carries a weight
    pub fn for_run(cities: &[CityBaseline]) -> Self {
        if cities.iter().any(|c| c.aggregation_weight.is_some()) {
            WeightBasis::Explicit
        } else {
            WeightBasis::Population
        }
    }
}

fn clean_weight(w: f64) -> f64 {
    if w.is_finite() && w > 0.0 {
        w
    } else {
        0.0
    }
}

/// Normalised weights for one year, index-aligned with `members`
pub fn year_weights(
    members: &[(&CityBaseline, &CityYearSnapshot)],
    basis: WeightBasis,
) -> Vec<f64> {
    let n = members.len();
    if n == 0 {
        return Vec::new();
    }

    let explicit: Vec<f64> = members
        .iter()
        .map(|(c, _)| clean_weight(c.aggregation_weight.unwrap_or(0.0)))
        .collect();
    let population: Vec<f64> = members
        .iter()
        .map(|(_, s)| clean_weight(s.population))
        .collect();

    let candidates = match basis {
        WeightBasis::Explicit => vec![explicit, population],
        WeightBasis::Population => vec![population],
    };

    for raw in candidates {
        let total: f64 = raw.iter().sum();
        if total > 0.0 {
            return raw.iter().map(|w| w / total).collect();
        }
    }

    vec![1.0 / n as f64; n]
}

fn index(value: f64, base: f64) -> f64 {
    if base > 0.0 && value.is_finite() {
        value / base * 100.0
    } else {
        100.0
    }
}

/// Aggregate the trajectories of `members` into one region
///
/// `members` pairs each city's baseline with its trajectory; trajectories
/// share the same horizon.
pub fn aggregate_region(
    scope: Scope,
    members: &[(&CityBaseline, &CityTrajectory)],
    basis: WeightBasis,
) -> RegionScenarioOutputs {
    let horizon = members.iter().map(|(_, t)| t.years.len()).min().unwrap_or(0);
    let mut years: Vec<RegionYear> = Vec::with_capacity(horizon);

    for step in 0..horizon {
        let rows: Vec<(&CityBaseline, &CityYearSnapshot)> = members
            .iter()
            .map(|(c, t)| (*c, &t.years[step]))
            .collect();
        let weights = year_weights(&rows, basis);

        let sum = |f: fn(&CityYearSnapshot) -> f64| rows.iter().map(|(_, s)| f(s)).sum::<f64>();
        let avg = |f: fn(&CityYearSnapshot) -> f64| {
            rows.iter()
                .zip(&weights)
                .map(|((_, s), w)| w * f(s))
                .sum::<f64>()
        };

        let price = avg(|s| s.price);
        let rent = avg(|s| s.rent);
        let wage = avg(|s| s.wage);

        let (price_index, rent_index, wage_index) = match years.first() {
            None => (100.0, 100.0, 100.0),
            Some(first) => (
                index(price, first.price),
                index(rent, first.rent),
                index(wage, first.wage),
            ),
        };

        years.push(RegionYear {
            step,
            year: rows.first().map_or(0, |(_, s)| s.year),
            population: sum(|s| s.population),
            dwelling_stock: sum(|s| s.dwelling_stock),
            completions: sum(|s| s.completions),
            stamp_duty_revenue: sum(|s| s.stamp_duty_revenue),
            net_migration: sum(|s| s.net_migration),
            price,
            rent,
            wage,
            mortgage_rate: avg(|s| s.mortgage_rate),
            renter_stress_share: avg(|s| s.deciles.renter_stress_share),
            mortgage_stress_share: avg(|s| s.deciles.mortgage_stress_share),
            price_index,
            rent_index,
            wage_index,
            weights: rows
                .iter()
                .zip(&weights)
                .map(|((c, _), w)| (c.id.clone(), *w))
                .collect(),
        });
    }

    let summary = summarise(&years);
    RegionScenarioOutputs {
        label: scope.label(),
        scope,
        city_ids: members.iter().map(|(c, _)| c.id.clone()).collect(),
        years,
        summary,
    }
}

fn summarise(years: &[RegionYear]) -> RegionSummary {
    let first = years.first();
    let last = years.last();
    RegionSummary {
        start_price: first.map_or(0.0, |y| y.price),
        end_price: last.map_or(0.0, |y| y.price),
        start_rent: first.map_or(0.0, |y| y.rent),
        end_rent: last.map_or(0.0, |y| y.rent),
        end_population: last.map_or(0.0, |y| y.population),
        end_price_index: last.map_or(100.0, |y| y.price_index),
        end_rent_index: last.map_or(100.0, |y| y.rent_index),
        total_stamp_duty_revenue: years.iter().map(|y| y.stamp_duty_revenue).sum(),
        end_renter_stress_share: last.map_or(0.0, |y| y.renter_stress_share),
        end_mortgage_stress_share: last.map_or(0.0, |y| y.mortgage_stress_share),
    }
}

/// Every scope a run produces: national, one per state, one per city
///
/// Keyed by scope token. `cities` and `trajectories` are index-aligned.
pub fn aggregate_all(
    cities: &[CityBaseline],
    trajectories: &[CityTrajectory],
) -> BTreeMap<String, RegionScenarioOutputs> {
    let basis = WeightBasis::for_run(cities);
    let pairs: Vec<(&CityBaseline, &CityTrajectory)> = cities.iter().zip(trajectories).collect();

    let mut scopes: Vec<Scope> = vec![Scope::National];
    let states: std::collections::BTreeSet<&str> =
        cities.iter().map(|c| c.state.as_str()).collect();
    scopes.extend(states.into_iter().map(|s| Scope::State(s.to_string())));
    scopes.extend(cities.iter().map(|c| Scope::City(c.id.clone())));

    scopes
        .into_iter()
        .map(|scope| {
            let members: Vec<(&CityBaseline, &CityTrajectory)> = pairs
                .iter()
                .filter(|(c, _)| match &scope {
                    Scope::National => true,
                    Scope::State(code) => &c.state == code,
                    Scope::City(id) => &c.id == id,
                })
                .copied()
                .collect();
            (scope.token(), aggregate_region(scope, &members, basis))
        })
        .collect()
}
