//! Run outputs
//!
//! Everything a run produces: per-city trajectories, every aggregated scope,
//! the event log and human-readable warnings. Built once at the end of a
//! run and immutable afterwards.

use crate::aggregate::{RegionScenarioOutputs, Scope};
use crate::error::SimulationError;
use crate::models::{CityTrajectory, EventLog};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioOutputs {
    /// Trajectories keyed by city id
    pub cities: BTreeMap<String, CityTrajectory>,
    /// Aggregated views keyed by scope token
    pub regions: BTreeMap<String, RegionScenarioOutputs>,
    pub events: EventLog,
    pub warnings: Vec<String>,
}

impl ScenarioOutputs {
    /// Region outputs for a scope token (`national`, `state:X`, `city:X`)
    ///
    /// # Errors
    ///
    /// `ScopeNotFound` if the token is malformed or the scope was not
    /// computed in this run.
    pub fn region(&self, token: &str) -> Result<&RegionScenarioOutputs, SimulationError> {
        let scope = Scope::parse(token)?;
        self.regions
            .get(&scope.token())
            .ok_or_else(|| SimulationError::ScopeNotFound(token.to_string()))
    }

    pub fn city(&self, city_id: &str) -> Option<&CityTrajectory> {
        self.cities.get(city_id)
    }

    pub fn national(&self) -> Result<&RegionScenarioOutputs, SimulationError> {
        self.region("national")
    }

    pub fn to_json(&self) -> Result<String, SimulationError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, SimulationError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
