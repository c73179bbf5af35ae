//! Error types for the housing simulator
//!
//! Only two kinds of failure are ever surfaced to callers:
//! - configuration rejected at ingestion (`Orchestrator::new`)
//! - lookup of a region scope that was never computed
//!
//! Numerical edge cases (near-zero denominators, zero migration totals,
//! missing optional data) are guarded inline and never become errors.

use thiserror::Error;

/// Simulation error types
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SimulationError {
    /// Scenario configuration failed validation
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// A city baseline carries a value the engine cannot step from
    #[error("Invalid baseline for city {city_id}: {field} = {value}")]
    InvalidBaseline {
        city_id: String,
        field: &'static str,
        value: f64,
    },

    /// Region scope lookup for a scope that was not computed in this run
    #[error("Scope not found: {0}")]
    ScopeNotFound(String),

    /// Scenario or output could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for SimulationError {
    fn from(err: serde_json::Error) -> Self {
        SimulationError::Serialization(err.to_string())
    }
}
