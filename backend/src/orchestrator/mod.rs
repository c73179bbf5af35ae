//! Orchestrator - scenario configuration and the run loop
//!
//! - `config`: scenario shape, validation and the resolve-with-defaults pass
//! - `investor`: negative gearing and ownership-cap channel
//! - `step`: the per-city year-step engine
//! - `engine`: the `Orchestrator` run loop
//! - `outputs`: `ScenarioOutputs`
//! - `cache`: scenario hashing and memoised runs

pub mod cache;
pub mod config;
pub mod engine;
pub mod investor;
pub mod outputs;
pub mod step;


pub use cache::{compute_scenario_hash, ScenarioCache};
pub use config::{
    AdvancedConfig, AdvancedSettings, EngineMode, FeatureToggle, ResolvedScenario, ScenarioParams,
};
pub use engine::{Orchestrator, YearResult};
pub use investor::{evaluate_investor_channel, InvestorChannelOutput};
pub use outputs::ScenarioOutputs;
pub use step::{PendingStep, YearStepEngine};
