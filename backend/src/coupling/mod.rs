//! Cross-City Coupling Subsystem
//!
//! Advanced mode couples cities through two per-year barrier phases driven
//! by the run loop:
//!
//! 1. [`CouplingHook::year_signals`] runs for every city before any city
//!    steps (expected growth, portfolio multiplier, national rate)
//! 2. [`CouplingHook::reallocate_migration`] runs after every city has
//!    computed its policy-adjusted net migration and before any population
//!    update
//!
//! Aggregate mode uses [`NoCoupling`], which returns neutral signals and
//! leaves migration untouched, so both modes share one year-step engine.

pub mod expectations;
pub mod portfolio;
pub mod rates;
pub mod spatial;

pub use expectations::{normalize_weights, ExpectationModel, ExpectationSettings, ExpectationsConfig};
pub use portfolio::{relative_multiplier, DefaultPortfolioModel, PortfolioModel};
pub use rates::{RateObservation, RatePathConfig};
pub use spatial::{SpatialEquilibriumConfig, UtilityInputs, MIN_REALLOCATION_TOTAL};

use crate::models::{CityBaseline, CityYearState};

/// Coupled inputs for one city for one year
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CitySignals {
    /// Expected price growth; `None` outside advanced mode
    pub expected_price_growth: Option<f64>,
    /// Investor demand multiplier from portfolio choice (1 = neutral)
    pub portfolio_multiplier: f64,
    /// Rate set outside the city (national rate path), before premiums
    pub base_rate: Option<f64>,
}

impl CitySignals {
    pub fn neutral() -> Self {
        Self {
            expected_price_growth: None,
            portfolio_multiplier: 1.0,
            base_rate: None,
        }
    }
}

impl Default for CitySignals {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Two-phase cross-city hook
///
/// `cities` and `states` are index-aligned; both methods return one value
/// per city in the same order.
pub trait CouplingHook {
    fn year_signals(
        &self,
        step: usize,
        cities: &[CityBaseline],
        states: &[CityYearState],
    ) -> Vec<CitySignals>;

    /// Redistribute this year's net migration flows
    fn reallocate_migration(
        &self,
        step: usize,
        cities: &[CityBaseline],
        states: &[CityYearState],
        flows: &[f64],
    ) -> Vec<f64>;

    /// Whether reallocation can change flows (drives event logging)
    fn reallocates(&self) -> bool {
        false
    }
}

/// Independent cities
pub struct NoCoupling;

impl CouplingHook for NoCoupling {
    fn year_signals(
        &self,
        _step: usize,
        cities: &[CityBaseline],
        _states: &[CityYearState],
    ) -> Vec<CitySignals> {
        vec![CitySignals::neutral(); cities.len()]
    }

    fn reallocate_migration(
        &self,
        _step: usize,
        _cities: &[CityBaseline],
        _states: &[CityYearState],
        flows: &[f64],
    ) -> Vec<f64> {
        flows.to_vec()
    }
}

/// Advanced-mode coupling: expectations, portfolio choice, spatial
/// equilibrium and an optional national rate path
pub struct CrossCityCoupling {
    expectations: ExpectationSettings,
    portfolio: Box<dyn PortfolioModel>,
    spatial: SpatialEquilibriumConfig,
    rate_path: Option<RatePathConfig>,
    cpi_trend: f64,
    weeks_per_year: f64,
}

impl CrossCityCoupling {
    pub fn new(
        expectations: ExpectationSettings,
        portfolio: DefaultPortfolioModel,
        spatial: SpatialEquilibriumConfig,
        rate_path: Option<RatePathConfig>,
        cpi_trend: f64,
        weeks_per_year: f64,
    ) -> Self {
        Self {
            expectations,
            portfolio: Box::new(portfolio),
            spatial,
            rate_path,
            cpi_trend,
            weeks_per_year,
        }
    }

    /// Replace the investor portfolio model
    pub fn with_portfolio_model(mut self, model: Box<dyn PortfolioModel>) -> Self {
        self.portfolio = model;
        self
    }

    /// Population-weighted national rate for the coming year
    fn national_rate(&self, cities: &[CityBaseline], states: &[CityYearState]) -> Option<f64> {
        let config = self.rate_path.as_ref()?;

        let weighted: Vec<(RateObservation, f64)> = cities
            .iter()
            .zip(states)
            .map(|(city, state)| {
                let obs = RateObservation {
                    price_growth: state.last_price_growth,
                    baseline_price_growth: city.price_growth,
                    rent_growth: state.last_rent_growth,
                    baseline_rent_growth: city.rent_growth,
                };
                (obs, state.population)
            })
            .collect();
        let obs = RateObservation::weighted(&weighted);

        let total_pop: f64 = states.iter().map(|s| s.population.max(0.0)).sum();
        let current = if total_pop > 0.0 {
            states
                .iter()
                .map(|s| s.base_rate * s.population.max(0.0))
                .sum::<f64>()
                / total_pop
        } else {
            states.iter().map(|s| s.base_rate).sum::<f64>() / states.len().max(1) as f64
        };

        Some(config.next_rate(current, self.cpi_trend, &obs))
    }
}

/// Population-weighted mean wage across cities
fn national_wage(states: &[CityYearState]) -> f64 {
    let total_pop: f64 = states.iter().map(|s| s.population.max(0.0)).sum();
    if total_pop > 0.0 {
        states
            .iter()
            .map(|s| s.wage * s.population.max(0.0))
            .sum::<f64>()
            / total_pop
    } else {
        states.iter().map(|s| s.wage).sum::<f64>() / states.len().max(1) as f64
    }
}

impl CouplingHook for CrossCityCoupling {
    fn year_signals(
        &self,
        _step: usize,
        cities: &[CityBaseline],
        states: &[CityYearState],
    ) -> Vec<CitySignals> {
        let base_rate = self.national_rate(cities, states);

        cities
            .iter()
            .zip(states)
            .map(|(city, state)| {
                let expected = self
                    .expectations
                    .expected_growth(state.last_price_growth, city.price_growth);
                let current_yield = state.rent * self.weeks_per_year / state.price.max(1.0);
                let multiplier = relative_multiplier(
                    self.portfolio.as_ref(),
                    (expected, current_yield, state.mortgage_rate),
                    (
                        city.price_growth,
                        city.rental_yield(self.weeks_per_year),
                        city.mortgage_rate,
                    ),
                );
                CitySignals {
                    expected_price_growth: Some(expected),
                    portfolio_multiplier: multiplier,
                    base_rate,
                }
            })
            .collect()
    }

    fn reallocate_migration(
        &self,
        _step: usize,
        cities: &[CityBaseline],
        states: &[CityYearState],
        flows: &[f64],
    ) -> Vec<f64> {
        if !self.spatial.enabled {
            return flows.to_vec();
        }

        let reference_wage = national_wage(states).max(1.0);
        let utilities: Vec<f64> = cities
            .iter()
            .zip(states)
            .map(|(city, state)| {
                self.spatial.utility(&UtilityInputs {
                    relative_wage: state.wage / reference_wage,
                    price_index: state.price / city.median_price.max(1.0),
                    rent_index: state.rent / city.median_rent.max(1.0),
                    amenity: city.amenity,
                })
            })
            .collect();
        let baseline: Vec<f64> = cities.iter().map(|c| c.baseline_net_migration()).collect();

        self.spatial.reallocate(flows, &utilities, &baseline)
    }

    fn reallocates(&self) -> bool {
        self.spatial.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coupling() -> CrossCityCoupling {
        CrossCityCoupling::new(
            ExpectationSettings::default(),
            DefaultPortfolioModel::default(),
            SpatialEquilibriumConfig::default(),
            None,
            0.025,
            52.0,
        )
    }

    #[test]
    fn test_no_coupling_is_identity() {
        let cities = vec![CityBaseline::new("A", "NSW"), CityBaseline::new("B", "VIC")];
        let states: Vec<_> = cities.iter().map(CityYearState::from_baseline).collect();
        let hook = NoCoupling;
        assert_eq!(
            hook.year_signals(0, &cities, &states),
            vec![CitySignals::neutral(); 2]
        );
        assert_eq!(
            hook.reallocate_migration(0, &cities, &states, &[10.0, -3.0]),
            vec![10.0, -3.0]
        );
    }

    #[test]
    fn test_unsurprised_cities_get_neutral_portfolio() {
        let cities = vec![CityBaseline::new("A", "NSW")];
        let states: Vec<_> = cities.iter().map(CityYearState::from_baseline).collect();
        let signals = coupling().year_signals(0, &cities, &states);
        assert!((signals[0].portfolio_multiplier - 1.0).abs() < 1e-12);
        assert!((signals[0].expected_price_growth.unwrap() - cities[0].price_growth).abs() < 1e-12);
        assert_eq!(signals[0].base_rate, None);
    }

    #[test]
    fn test_national_rate_when_rate_path_configured() {
        let mut hook = coupling();
        hook.rate_path = Some(RatePathConfig::default());
        let cities = vec![CityBaseline::new("A", "NSW"), CityBaseline::new("B", "VIC")];
        let states: Vec<_> = cities.iter().map(CityYearState::from_baseline).collect();
        let signals = hook.year_signals(0, &cities, &states);
        assert!(signals[0].base_rate.is_some());
        assert_eq!(signals[0].base_rate, signals[1].base_rate);
    }

    #[test]
    fn test_reallocation_conserves_total() {
        let mut cheap = CityBaseline::new("A", "SA");
        cheap.amenity = 0.2;
        let cities = vec![cheap, CityBaseline::new("B", "NSW")];
        let mut states: Vec<_> = cities.iter().map(CityYearState::from_baseline).collect();
        states[1].price *= 1.4;
        let out = coupling().reallocate_migration(0, &cities, &states, &[8_000.0, 8_000.0]);
        assert!((out.iter().sum::<f64>() - 16_000.0).abs() < 1e-6);
        assert!(out[0] > out[1]);
    }

    #[test]
    fn test_reallocation_favours_higher_wage_city() {
        let mut hook = coupling();
        hook.spatial.friction = 0.0;
        let mut high = CityBaseline::new("A", "NSW");
        high.median_income = 190_000.0;
        let mut low = CityBaseline::new("B", "NSW");
        low.median_income = 95_000.0;
        let cities = vec![high, low];
        let states: Vec<_> = cities.iter().map(CityYearState::from_baseline).collect();

        let out = hook.reallocate_migration(0, &cities, &states, &[8_000.0, 8_000.0]);
        assert!(out[0] > out[1]);
        assert!((out.iter().sum::<f64>() - 16_000.0).abs() < 1e-6);
    }
}
