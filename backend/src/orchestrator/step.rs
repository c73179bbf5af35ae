//! Per-City Year-Step Engine
//!
//! One parameterised engine serves both modes. A step is split in two
//! around the migration barrier:
//!
//! ```text
//! begin_step (per city, signals in hand)
//!   1. households from population
//!   2. owner / investor demand with channel multipliers
//!   3. investor channel (negative gearing, ownership cap)
//!   4. gap ratio against divestment-adjusted stock
//!   5. mortgage rate, wage and CPI indices
//!   6. price growth
//!   7. rent growth, rent cap blending
//!   8. next completions, capacity bound
//!   9. stock, stamp duty, deciles, policy-adjusted migration flow
//! -- coupling hook may reallocate migration across all cities --
//! finish_step (per city)
//!   population, investor share, completions roll forward
//! ```
//!
//! Numerical trouble is guarded inline (floored denominators, zero-floored
//! rates, capped divestment) and never raised.

use crate::coupling::{CitySignals, RateObservation, RatePathConfig};
use crate::methodology::Methodology;
use crate::models::{CityBaseline, CityYearSnapshot, CityYearState, Event, EventLog, MicrodataRecord};
use crate::orchestrator::config::{EngineMode, ResolvedScenario};
use crate::orchestrator::investor::evaluate_investor_channel;
use crate::policy::{PolicyComposer, PolicyLevers};
use crate::stress::{compute_deciles, StressInputs};
use std::collections::BTreeMap;
use tracing::debug;

/// Bounds on the advanced-mode rate-relative demand multiplier
const RATE_MULTIPLIER_FLOOR: f64 = 0.5;
const RATE_MULTIPLIER_CEILING: f64 = 1.5;

/// Half-finished step awaiting the migration barrier
#[derive(Debug, Clone, PartialEq)]
pub struct PendingStep {
    /// Snapshot with everything but the population update filled in
    pub snapshot: CityYearSnapshot,
    /// Policy-adjusted net migration before any reallocation
    pub migration_flow: f64,
    pub divested_share: f64,
    pub next_completions: f64,
}

/// Year-step engine shared by both modes
pub struct YearStepEngine {
    cities: Vec<CityBaseline>,
    gap_anchors: Vec<f64>,
    levers: PolicyLevers,
    methodology: Methodology,
    composer: PolicyComposer,
    mode: EngineMode,
    rate_path: Option<RatePathConfig>,
    microdata: BTreeMap<String, Vec<MicrodataRecord>>,
    start_year: i32,
}

impl YearStepEngine {
    /// Build the engine for a resolved scenario
    ///
    /// `cities` may differ from the scenario's (history-seeded baselines);
    /// `methodology` may be the calibrated one.
    pub fn new(
        scenario: &ResolvedScenario,
        cities: Vec<CityBaseline>,
        methodology: Methodology,
    ) -> Self {
        let pph = methodology.constants.persons_per_household;
        let gap_anchors = cities
            .iter()
            .map(|c| {
                let stock = c.dwelling_stock.max(1.0);
                (c.households(pph) - stock) / stock
            })
            .collect();

        let microdata = if scenario.advanced.microdata_enabled {
            scenario.microdata.clone()
        } else {
            BTreeMap::new()
        };

        Self {
            cities,
            gap_anchors,
            levers: scenario.levers.clamp(),
            methodology,
            composer: PolicyComposer::standard(),
            mode: scenario.mode,
            rate_path: scenario.rate_path,
            microdata,
            start_year: scenario.start_year,
        }
    }

    pub fn cities(&self) -> &[CityBaseline] {
        &self.cities
    }

    pub fn methodology(&self) -> &Methodology {
        &self.methodology
    }

    /// Rate before policy premiums for the coming year
    fn base_rate(&self, city: &CityBaseline, state: &CityYearState, signals: &CitySignals) -> f64 {
        match (signals.base_rate, &self.rate_path) {
            (Some(rate), _) => rate,
            (None, Some(path)) => {
                let obs = RateObservation {
                    price_growth: state.last_price_growth,
                    baseline_price_growth: city.price_growth,
                    rent_growth: state.last_rent_growth,
                    baseline_rent_growth: city.rent_growth,
                };
                path.next_rate(state.base_rate, self.methodology.curves.trend.cpi_inflation, &obs)
            }
            (None, None) => state.base_rate,
        }
    }

    /// Steps 1-9 for one city, up to the migration barrier
    pub fn begin_step(
        &self,
        step: usize,
        index: usize,
        signals: &CitySignals,
        state: &mut CityYearState,
        events: &mut EventLog,
    ) -> PendingStep {
        let city = &self.cities[index];
        let constants = &self.methodology.constants;
        let curves = &self.methodology.curves;
        let delta = self.composer.compose(step, city, &self.levers);

        // The rate is set before the market clears; demand reads it.
        state.base_rate = self.base_rate(city, state, signals);
        state.mortgage_rate = (state.base_rate + delta.mortgage_rate_delta).max(0.0);

        // 1-2. Demand
        let households = state.population / constants.persons_per_household.max(f64::EPSILON);
        let rate_multiplier = match self.mode {
            EngineMode::Aggregate => 1.0,
            EngineMode::Advanced => (1.0
                - constants.rate_demand_sensitivity * (state.mortgage_rate - city.mortgage_rate))
                .clamp(RATE_MULTIPLIER_FLOOR, RATE_MULTIPLIER_CEILING),
        };

        // 3. Investor channel
        let investor = evaluate_investor_channel(
            step,
            state.investor_share,
            &self.levers.tax,
            curves,
            constants,
        );
        if investor.divestment_capped() {
            debug!(
                city = %city.id,
                step,
                requested = investor.requested_divestment,
                applied = investor.divested_share,
                "divestment capped"
            );
            events.log(Event::DivestmentCapped {
                step,
                city_id: city.id.clone(),
                requested: investor.requested_divestment,
                applied: investor.divested_share,
            });
        }

        let share = state.investor_share.clamp(0.0, 1.0);
        let owner_demand = households * (1.0 - share) * delta.owner_demand_multiplier * rate_multiplier;
        let investor_multiplier = delta.investor_demand_multiplier
            * investor.investor_multiplier
            * signals.portfolio_multiplier;
        let investor_demand = households * share * investor_multiplier * rate_multiplier;
        let demand = owner_demand + investor_demand;

        // 4. Gap
        let effective_stock = (state.dwelling_stock * (1.0 + investor.divested_share)).max(1.0);
        let gap = (demand - effective_stock) / effective_stock - self.gap_anchors[index];

        // 5. Wages and prices index
        let wage_growth = curves.trend.wage_growth_for(city.wage_growth);
        state.wage_index *= 1.0 + wage_growth;
        state.cpi_index *= 1.0 + curves.trend.cpi_inflation;
        state.wage = city.median_income * state.wage_index;

        // 6. Price
        let price_growth = curves.price.growth(gap, city.price_elasticity, city.price_growth);
        state.price *= 1.0 + price_growth;

        // 7. Rent
        let rental_supply_shock = investor.rental_supply_shock + delta.rental_supply_shock;
        let rent_gap = curves.rental_supply.rent_gap(gap, rental_supply_shock);
        let uncapped_rent_growth = curves.rent.growth(rent_gap, city.rent_elasticity, city.rent_growth)
            + delta.rent_growth_modifier;
        let rent_growth = match delta.rent_growth_cap {
            Some(cap) if uncapped_rent_growth > cap => {
                let coverage = if delta.cap_binds_on_relet {
                    delta.rent_regulation_coverage
                } else {
                    delta.rent_regulation_coverage * (1.0 - constants.tenancy_turnover)
                };
                let realized = cap + (1.0 - coverage.clamp(0.0, 1.0)) * (uncapped_rent_growth - cap);
                events.log(Event::RentCapBinding {
                    step,
                    city_id: city.id.clone(),
                    uncapped: uncapped_rent_growth,
                    realized,
                });
                realized
            }
            _ => uncapped_rent_growth,
        };
        state.rent *= 1.0 + rent_growth;

        // 8. Completions
        let excess_price_growth = price_growth - city.price_growth;
        let requested = city.annual_completions
            * curves
                .construction
                .multiplier(excess_price_growth, city.supply_elasticity)
            * delta.completions_multiplier
            + delta.additional_completions;
        let capacity =
            state.completions * (1.0 + constants.max_completions_growth + delta.capacity_lift);
        let bounded = if requested > capacity {
            events.log(Event::ConstructionCapacityBound {
                step,
                city_id: city.id.clone(),
                requested,
                applied: capacity,
            });
            capacity
        } else {
            requested
        };
        let next_completions = bounded.max(0.0);

        // 9. Stock, revenue, deciles, migration
        let landed = state.completions;
        state.dwelling_stock =
            (state.dwelling_stock + landed - city.demolition_rate * state.dwelling_stock).max(0.0);
        let stamp_duty_rate = (constants.stamp_duty_rate + delta.stamp_duty_rate_delta).max(0.0);
        let stamp_duty_revenue =
            constants.turnover_rate * state.dwelling_stock * state.price * stamp_duty_rate;

        let (deciles, fallback) = compute_deciles(
            &StressInputs {
                price: state.price,
                rent: state.rent,
                wage: state.wage,
                wage_index: state.wage_index,
                mortgage_rate: state.mortgage_rate,
                rent_assistance_share: delta.rent_assistance_share,
            },
            constants,
            self.microdata.get(&city.id).map(Vec::as_slice),
        );
        if let Some(usable_records) = fallback {
            if step == 0 {
                events.log(Event::MicrodataFallback {
                    step,
                    city_id: city.id.clone(),
                    usable_records,
                });
            }
        }

        let affordability_excess = (rent_growth - wage_growth) - (city.rent_growth - city.wage_growth);
        let migration_flow = city.net_migration_rate
            * state.population
            * delta.migration_multiplier
            * curves.migration.multiplier(affordability_excess)
            + delta.net_migration_delta;

        state.last_price_growth = price_growth;
        state.last_rent_growth = rent_growth;

        let snapshot = CityYearSnapshot {
            step,
            year: self.start_year + step as i32,
            population: state.population,
            households,
            demand_households: demand,
            dwelling_stock: state.dwelling_stock,
            completions: landed,
            price: state.price,
            rent: state.rent,
            wage: state.wage,
            wage_index: state.wage_index,
            cpi_index: state.cpi_index,
            mortgage_rate: state.mortgage_rate,
            gap_ratio: gap,
            price_growth,
            rent_growth,
            uncapped_rent_growth,
            rent_cap: delta.rent_growth_cap,
            investor_multiplier,
            investor_share: state.investor_share,
            divested_share: investor.divested_share,
            rental_supply_shock,
            stamp_duty_revenue,
            net_migration: migration_flow,
            expected_price_growth: signals.expected_price_growth,
            deciles,
        };

        PendingStep {
            snapshot,
            migration_flow,
            divested_share: investor.divested_share,
            next_completions,
        }
    }

    /// Population update and roll-forward once migration is final
    pub fn finish_step(
        &self,
        index: usize,
        state: &mut CityYearState,
        pending: PendingStep,
        net_migration: f64,
    ) -> CityYearSnapshot {
        let city = &self.cities[index];

        state.population = (state.population
            + city.natural_growth_rate * state.population
            + net_migration)
            .max(0.0);
        state.investor_share = (state.investor_share - pending.divested_share).max(0.0);
        state.completions = pending.next_completions;

        let mut snapshot = pending.snapshot;
        snapshot.population = state.population;
        snapshot.net_migration = net_migration;
        snapshot.investor_share = state.investor_share;
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::config::ScenarioParams;

    fn engine(params: &ScenarioParams) -> YearStepEngine {
        let resolved = params.resolve();
        let cities = resolved.cities.clone();
        let methodology = resolved.methodology.clone();
        YearStepEngine::new(&resolved, cities, methodology)
    }

    fn one_step(params: &ScenarioParams) -> (CityYearSnapshot, EventLog) {
        let engine = engine(params);
        let mut state = CityYearState::from_baseline(&engine.cities()[0]);
        let mut events = EventLog::new();
        let pending = engine.begin_step(0, 0, &CitySignals::neutral(), &mut state, &mut events);
        let flow = pending.migration_flow;
        (engine.finish_step(0, &mut state, pending, flow), events)
    }

    #[test]
    fn test_untouched_city_starts_at_zero_gap() {
        let params = ScenarioParams::new(1, vec![CityBaseline::new("SYD", "NSW")]);
        let (snap, events) = one_step(&params);
        assert!(snap.gap_ratio.abs() < 1e-12);
        assert!((snap.price_growth - 0.04).abs() < 1e-12);
        assert!((snap.rent_growth - 0.035).abs() < 1e-12);
        assert_eq!(snap.investor_multiplier, 1.0);
        assert_eq!(snap.rent_cap, None);
        assert!(events.is_empty());
    }

    #[test]
    fn test_population_and_stock_accounting() {
        let city = CityBaseline::new("SYD", "NSW");
        let params = ScenarioParams::new(1, vec![city.clone()]);
        let (snap, _) = one_step(&params);

        let expected_stock = city.dwelling_stock + city.annual_completions
            - city.demolition_rate * city.dwelling_stock;
        assert!((snap.dwelling_stock - expected_stock).abs() < 1e-6);

        let expected_pop = city.population
            + city.natural_growth_rate * city.population
            + city.net_migration_rate * city.population;
        assert!((snap.population - expected_pop).abs() < 1e-6);
    }

    #[test]
    fn test_stamp_duty_rate_floored_at_zero() {
        let mut params = ScenarioParams::new(1, vec![CityBaseline::new("SYD", "NSW")]);
        params.methodology = Some(
            serde_json::from_str(r#"{"constants": {"stamp_duty_rate": 0.01}}"#).unwrap(),
        );
        let mut levers = PolicyLevers::default();
        levers.tax.stamp_duty_change = -0.04;
        let (snap, _) = one_step(&params.with_levers(levers));
        assert_eq!(snap.stamp_duty_revenue, 0.0);
    }

    #[test]
    fn test_capacity_bound_logged() {
        let mut levers = PolicyLevers::default();
        levers.public_housing.build_per_1000 = 5.0;
        let params =
            ScenarioParams::new(1, vec![CityBaseline::new("SYD", "NSW")]).with_levers(levers);
        let (_, events) = one_step(&params);
        assert_eq!(events.events_of_type("ConstructionCapacityBound").len(), 1);
    }

    #[test]
    fn test_rate_premium_raises_mortgage_rate() {
        let mut levers = PolicyLevers::default();
        levers.credit.mortgage_rate_premium = 0.01;
        let params =
            ScenarioParams::new(1, vec![CityBaseline::new("SYD", "NSW")]).with_levers(levers);
        let (snap, _) = one_step(&params);
        assert!((snap.mortgage_rate - 0.07).abs() < 1e-12);
    }
}
