//! Python bindings (feature `pyo3`)
//!
//! The boundary is JSON in, JSON out: scenarios arrive as the same JSON the
//! CLI reads and outputs leave as serialised `ScenarioOutputs`.

pub mod scenario;

pub use scenario::{run_scenario_json, PyScenario};
