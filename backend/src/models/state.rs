//! Per-city mutable state and the immutable per-year snapshots
//!
//! # Critical Invariants
//!
//! 1. **Single owner**: each `CityYearState` is mutated only by the year-step
//!    engine for its own city
//! 2. **Append-only trajectory**: one snapshot per step, strictly increasing
//!    in year order
//! 3. **Snapshots are values**: nothing refers back into live state

use crate::models::city::CityBaseline;
use crate::stress::DecileOutputs;
use serde::{Deserialize, Serialize};

/// Live state of one city, evolved in place across years
#[derive(Debug, Clone, PartialEq)]
pub struct CityYearState {
    pub population: f64,
    pub dwelling_stock: f64,

    /// Completions that land in the stock during the next step
    pub completions: f64,

    pub price: f64,
    pub rent: f64,

    /// Cumulative wage index (1.0 at baseline)
    pub wage_index: f64,

    /// Cumulative consumer price index (1.0 at baseline)
    pub cpi_index: f64,

    pub wage: f64,

    /// Mortgage rate before policy premiums (moved by the rate path)
    pub base_rate: f64,

    /// Mortgage rate households face, premiums included
    pub mortgage_rate: f64,

    /// Price growth realised in the previous step
    pub last_price_growth: f64,

    /// Rent growth realised in the previous step
    pub last_rent_growth: f64,

    /// Share of stock currently held by investors
    pub investor_share: f64,
}

impl CityYearState {
    /// Initial state taken straight from the baseline
    ///
    /// The "last observed" growth rates start at the baseline growth so
    /// expectation models see no surprise in the first year.
    pub fn from_baseline(baseline: &CityBaseline) -> Self {
        Self {
            population: baseline.population,
            dwelling_stock: baseline.dwelling_stock,
            completions: baseline.annual_completions,
            price: baseline.median_price,
            rent: baseline.median_rent,
            wage_index: 1.0,
            cpi_index: 1.0,
            wage: baseline.median_income,
            base_rate: baseline.mortgage_rate,
            mortgage_rate: baseline.mortgage_rate,
            last_price_growth: baseline.price_growth,
            last_rent_growth: baseline.rent_growth,
            investor_share: baseline.investor_share,
        }
    }
}

/// Immutable record of one city after one step
///
/// Levels are end-of-step values; growth rates, multipliers and revenue are
/// the flows realised during the step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CityYearSnapshot {
    /// Step index (0-based)
    pub step: usize,
    /// Calendar year label
    pub year: i32,

    pub population: f64,
    pub households: f64,
    pub demand_households: f64,
    pub dwelling_stock: f64,
    pub completions: f64,
    pub price: f64,
    pub rent: f64,
    pub wage: f64,
    pub wage_index: f64,
    pub cpi_index: f64,
    pub mortgage_rate: f64,

    pub gap_ratio: f64,
    pub price_growth: f64,
    pub rent_growth: f64,

    /// Rent growth before the regulatory cap was blended in
    pub uncapped_rent_growth: f64,

    /// Rent cap in force this year, if any
    pub rent_cap: Option<f64>,

    pub investor_multiplier: f64,
    pub investor_share: f64,
    pub divested_share: f64,
    pub rental_supply_shock: f64,

    pub stamp_duty_revenue: f64,
    pub net_migration: f64,

    /// Expected price growth used by investors (advanced mode)
    pub expected_price_growth: Option<f64>,

    pub deciles: DecileOutputs,
}

/// Start/end summary for one city trajectory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CitySummary {
    pub start_price: f64,
    pub end_price: f64,
    pub start_rent: f64,
    pub end_rent: f64,
    pub start_population: f64,
    pub end_population: f64,
    pub start_stock: f64,
    pub end_stock: f64,

    /// `end_price / start_price - 1`, relative to the baseline
    pub cumulative_price_growth: f64,
    pub cumulative_rent_growth: f64,

    pub total_stamp_duty_revenue: f64,
    pub end_renter_stress_share: f64,
    pub end_mortgage_stress_share: f64,
}

/// Complete output for one city
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CityTrajectory {
    pub city_id: String,
    pub state: String,
    pub years: Vec<CityYearSnapshot>,
    pub summary: CitySummary,
}

impl CityTrajectory {
    /// Build the trajectory and its summary from the baseline and snapshots
    pub fn new(baseline: &CityBaseline, years: Vec<CityYearSnapshot>) -> Self {
        let last = years.last();
        let end_price = last.map_or(baseline.median_price, |s| s.price);
        let end_rent = last.map_or(baseline.median_rent, |s| s.rent);

        let summary = CitySummary {
            start_price: baseline.median_price,
            end_price,
            start_rent: baseline.median_rent,
            end_rent,
            start_population: baseline.population,
            end_population: last.map_or(baseline.population, |s| s.population),
            start_stock: baseline.dwelling_stock,
            end_stock: last.map_or(baseline.dwelling_stock, |s| s.dwelling_stock),
            cumulative_price_growth: end_price / baseline.median_price - 1.0,
            cumulative_rent_growth: end_rent / baseline.median_rent - 1.0,
            total_stamp_duty_revenue: years.iter().map(|s| s.stamp_duty_revenue).sum(),
            end_renter_stress_share: last.map_or(0.0, |s| s.deciles.renter_stress_share),
            end_mortgage_stress_share: last.map_or(0.0, |s| s.deciles.mortgage_stress_share),
        };

        Self {
            city_id: baseline.id.clone(),
            state: baseline.state.clone(),
            years,
            summary,
        }
    }
}
