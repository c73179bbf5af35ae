//! Housing Policy Simulator Core - Rust Engine
//!
//! Projects multi-year regional housing trajectories (prices, rents, stock,
//! household stress) under configurable policy settings. Built for policy
//! exploration, not forecasting.
//!
//! # Architecture
//!
//! - **core**: Year clock and policy ramp helper
//! - **models**: Domain types (city baselines, per-year state, events)
//! - **methodology**: Constants and response curves resolved per run
//! - **policy**: Lever model and the seven policy channels
//! - **coupling**: Cross-city expectations, portfolio choice, migration, rates
//! - **stress**: Income-decile housing stress proxy
//! - **aggregate**: National / state / city roll-ups
//! - **history**: Growth seeding from history and the calibration contract
//! - **orchestrator**: Scenario configuration, year-step engine, run loop
//!
//! # Critical Invariants
//!
//! 1. Runs are deterministic: identical scenarios give identical outputs
//! 2. Configuration is resolved once, up front, and never mutated
//! 3. Numerical degradation is logged as events, never raised
//! 4. FFI boundary is minimal and safe

// Module declarations
pub mod aggregate;
pub mod core;
pub mod coupling;
pub mod error;
pub mod history;
pub mod methodology;
pub mod models;
pub mod orchestrator;
pub mod policy;
pub mod stress;

// Re-exports for convenience
pub use aggregate::{RegionScenarioOutputs, Scope};
pub use crate::core::Horizon;
pub use error::SimulationError;
pub use methodology::{resolve as resolve_methodology, Methodology};
pub use models::{
    city::{CityBaseline, HistoricalSeries, MicrodataRecord, Tenure},
    event::{Event, EventLog},
    state::{CityTrajectory, CityYearSnapshot},
};
pub use orchestrator::{
    EngineMode, Orchestrator, ScenarioCache, ScenarioOutputs, ScenarioParams, YearResult,
};
pub use policy::{PolicyChannelDelta, PolicyComposer, PolicyLevers};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn housing_simulator_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::PyScenario>()?;
    m.add_function(wrap_pyfunction!(ffi::run_scenario_json, m)?)?;
    Ok(())
}
