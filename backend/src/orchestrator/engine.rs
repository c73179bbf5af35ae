//! Orchestrator Engine
//!
//! Runs a scenario over its horizon:
//!
//! ```text
//! Orchestrator::new
//!   validate scenario, resolve defaults
//!   seed baselines from history, calibrate (optional)
//!   choose coupling hook (NoCoupling | CrossCityCoupling)
//!
//! For each year t:
//!   1. coupling hook: year signals for every city
//!   2. begin_step for every city (market, stock, deciles, migration flow)
//!   3. coupling hook: reallocate migration across cities
//!   4. finish_step for every city (population, roll-forward)
//!   5. advance the horizon
//!
//! finish
//!   city trajectories, region aggregation, warnings
//! ```
//!
//! # Example
//!
//! ```rust
//! use housing_simulator_core_rs::{CityBaseline, Orchestrator, ScenarioParams};
//!
//! let params = ScenarioParams::new(5, vec![CityBaseline::new("SYD", "NSW")]);
//! let outputs = Orchestrator::new(params).unwrap().run();
//!
//! assert_eq!(outputs.cities["SYD"].years.len(), 5);
//! assert_eq!(outputs.region("national").unwrap().years[0].price_index, 100.0);
//! ```

use crate::aggregate::aggregate_all;
use crate::core::Horizon;
use crate::coupling::{CouplingHook, CrossCityCoupling, NoCoupling, MIN_REALLOCATION_TOTAL};
use crate::error::SimulationError;
use crate::history::{Calibrator, SeededGrowth};
use crate::methodology::Methodology;
use crate::models::{CityBaseline, CityTrajectory, CityYearSnapshot, CityYearState, Event, EventLog};
use crate::orchestrator::config::{EngineMode, ResolvedScenario, ScenarioParams};
use crate::orchestrator::outputs::ScenarioOutputs;
use crate::orchestrator::step::YearStepEngine;
use tracing::{debug, info, warn};

/// Summary of one completed year
#[derive(Debug, Clone, PartialEq)]
pub struct YearResult {
    pub step: usize,
    pub year: i32,
    /// Net migration across all cities after reallocation
    pub net_migration: f64,
    /// Events logged during the year
    pub events_logged: usize,
}

/// Scenario run loop
pub struct Orchestrator {
    scenario: ResolvedScenario,
    engine: YearStepEngine,
    hook: Box<dyn CouplingHook>,
    horizon: Horizon,
    states: Vec<CityYearState>,
    snapshots: Vec<Vec<CityYearSnapshot>>,
    event_log: EventLog,
}

impl Orchestrator {
    /// Validate and prepare a scenario
    ///
    /// # Errors
    ///
    /// `InvalidConfig` / `InvalidBaseline` when the scenario cannot be run.
    pub fn new(params: ScenarioParams) -> Result<Self, SimulationError> {
        Self::build(params, None)
    }

    /// Like [`Orchestrator::new`], fitting constants with `calibrator` when
    /// the scenario enables calibration
    pub fn with_calibrator(
        params: ScenarioParams,
        calibrator: &dyn Calibrator,
    ) -> Result<Self, SimulationError> {
        Self::build(params, Some(calibrator))
    }

    fn build(
        params: ScenarioParams,
        calibrator: Option<&dyn Calibrator>,
    ) -> Result<Self, SimulationError> {
        params.validate()?;
        let scenario = params.resolve();
        let mut event_log = EventLog::new();

        let cities = Self::seed_history(&scenario, &mut event_log);
        let methodology = if scenario.advanced.calibration_enabled {
            match calibrator {
                Some(calibrator) => {
                    let outcome = calibrator.calibrate(&scenario.history, &scenario.methodology);
                    for message in outcome.warnings {
                        warn!("calibration warning: {}", message);
                        event_log.log(Event::CalibrationWarning { step: 0, message });
                    }
                    outcome.methodology
                }
                None => {
                    let message =
                        "calibration requested but no calibrator is available; baseline constants kept"
                            .to_string();
                    warn!("{}", message);
                    event_log.log(Event::CalibrationWarning { step: 0, message });
                    scenario.methodology.clone()
                }
            }
        } else {
            scenario.methodology.clone()
        };

        let hook: Box<dyn CouplingHook> = match scenario.mode {
            EngineMode::Aggregate => Box::new(NoCoupling),
            EngineMode::Advanced => Box::new(CrossCityCoupling::new(
                scenario.advanced.expectations,
                scenario.advanced.portfolio,
                scenario.advanced.spatial,
                scenario.rate_path,
                methodology.curves.trend.cpi_inflation,
                methodology.constants.weeks_per_year,
            )),
        };

        let states = cities.iter().map(CityYearState::from_baseline).collect();
        let snapshots = vec![Vec::with_capacity(scenario.years); cities.len()];
        let engine = YearStepEngine::new(&scenario, cities, methodology);
        let horizon = Horizon::new(scenario.start_year, scenario.years);

        info!(
            cities = scenario.cities.len(),
            years = scenario.years,
            mode = ?scenario.mode,
            "scenario prepared"
        );

        Ok(Self {
            scenario,
            engine,
            hook,
            horizon,
            states,
            snapshots,
            event_log,
        })
    }

    /// Replace the coupling hook chosen from the engine mode
    ///
    /// Must be called before the first year is stepped.
    pub fn with_coupling_hook(mut self, hook: Box<dyn CouplingHook>) -> Self {
        self.hook = hook;
        self
    }

    /// Baselines with growth rates re-estimated from any supplied history
    fn seed_history(scenario: &ResolvedScenario, event_log: &mut EventLog) -> Vec<CityBaseline> {
        scenario
            .cities
            .iter()
            .map(|city| match scenario.history.get(&city.id) {
                Some(series) => {
                    let growth = SeededGrowth::estimate(series);
                    if growth.is_empty() {
                        debug!(city = %city.id, "history has no usable pairs");
                        return city.clone();
                    }
                    event_log.log(Event::HistorySeeded {
                        step: 0,
                        city_id: city.id.clone(),
                        price_growth: growth.price_growth,
                        rent_growth: growth.rent_growth,
                        wage_growth: growth.wage_growth,
                    });
                    growth.apply(city)
                }
                None => city.clone(),
            })
            .collect()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn current_step(&self) -> usize {
        self.horizon.current_step()
    }

    pub fn is_complete(&self) -> bool {
        self.horizon.is_complete()
    }

    /// Baselines the engine steps from (history-seeded where applicable)
    pub fn cities(&self) -> &[CityBaseline] {
        self.engine.cities()
    }

    pub fn states(&self) -> &[CityYearState] {
        &self.states
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    pub fn scenario(&self) -> &ResolvedScenario {
        &self.scenario
    }

    /// Methodology in force (calibrated where applicable)
    pub fn methodology(&self) -> &Methodology {
        self.engine.methodology()
    }

    // ========================================================================
    // Run Loop
    // ========================================================================

    /// Advance every city by one year; `None` once the horizon is complete
    pub fn step_year(&mut self) -> Option<YearResult> {
        if self.horizon.is_complete() {
            return None;
        }
        let step = self.horizon.current_step();
        let events_before = self.event_log.len();
        let n = self.states.len();

        // Phase 1: signals for every city before any city moves
        let mut signals = self.hook.year_signals(step, self.engine.cities(), &self.states);
        if signals.len() != n {
            warn!(step, got = signals.len(), expected = n, "coupling signals misaligned; using neutral");
            signals = vec![Default::default(); n];
        }

        // Phase 2: market step up to the migration barrier
        let pending: Vec<_> = (0..n)
            .map(|i| {
                self.engine
                    .begin_step(step, i, &signals[i], &mut self.states[i], &mut self.event_log)
            })
            .collect();

        // Phase 3: cross-city migration
        let flows: Vec<f64> = pending.iter().map(|p| p.migration_flow).collect();
        let migration = if self.hook.reallocates() {
            let total: f64 = flows.iter().sum();
            let skipped = total.abs() < MIN_REALLOCATION_TOTAL;
            let reallocated =
                self.hook
                    .reallocate_migration(step, self.engine.cities(), &self.states, &flows);
            self.event_log.log(Event::MigrationReallocated { step, total, skipped });
            if reallocated.len() == n {
                reallocated
            } else {
                warn!(step, "migration reallocation misaligned; keeping flows");
                flows
            }
        } else {
            flows
        };

        // Phase 4: population update
        for (i, (p, m)) in pending.into_iter().zip(migration.iter()).enumerate() {
            let snapshot = self.engine.finish_step(i, &mut self.states[i], p, *m);
            self.snapshots[i].push(snapshot);
        }

        let result = YearResult {
            step,
            year: self.horizon.calendar_year(),
            net_migration: migration.iter().sum(),
            events_logged: self.event_log.len() - events_before,
        };
        debug!(step, events = result.events_logged, "year complete");

        self.horizon.advance();
        Some(result)
    }

    /// Run every remaining year and build the outputs
    pub fn run(mut self) -> ScenarioOutputs {
        while self.step_year().is_some() {}
        self.finish()
    }

    /// Build outputs from the years taken so far
    pub fn finish(self) -> ScenarioOutputs {
        let cities = self.engine.cities();
        let trajectories: Vec<CityTrajectory> = cities
            .iter()
            .zip(self.snapshots)
            .map(|(city, years)| CityTrajectory::new(city, years))
            .collect();

        let regions = aggregate_all(cities, &trajectories);
        let warnings = self
            .event_log
            .events()
            .iter()
            .filter_map(|event| match event {
                Event::CalibrationWarning { message, .. } => Some(message.clone()),
                Event::MicrodataFallback {
                    city_id,
                    usable_records,
                    ..
                } => Some(format!(
                    "microdata for {} unusable ({} usable records); synthetic deciles used",
                    city_id, usable_records
                )),
                _ => None,
            })
            .collect();

        info!(
            cities = trajectories.len(),
            events = self.event_log.len(),
            "scenario run complete"
        );

        ScenarioOutputs {
            cities: trajectories
                .into_iter()
                .map(|t| (t.city_id.clone(), t))
                .collect(),
            regions,
            events: self.event_log,
            warnings,
        }
    }
}

// Manual Debug implementation (the coupling hook doesn't implement Debug)
impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("current_step", &self.current_step())
            .field("years", &self.horizon.years())
            .field("num_cities", &self.states.len())
            .field("mode", &self.scenario.mode)
            .field("event_count", &self.event_log.len())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
