//! Scenario Cache - Memoised Runs Keyed by Scenario Hash
//!
//! A run is a pure function of its `ScenarioParams`, so completed outputs
//! can be reused for an identical scenario. The cache is an optimisation
//! only; callers that bypass it get the same outputs.
//!
//! # Critical Invariants
//!
//! - **Canonical key**: object keys are sorted before hashing, so field
//!   order in the input JSON never changes the key
//! - **Determinism**: the same scenario always hashes to the same key

use crate::error::SimulationError;
use crate::orchestrator::config::ScenarioParams;
use crate::orchestrator::engine::Orchestrator;
use crate::orchestrator::outputs::ScenarioOutputs;
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use tracing::debug;

// ============================================================================
// Scenario Hashing
// ============================================================================

/// Deterministic SHA256 hash of any serialisable scenario
///
/// Uses canonical JSON serialization with sorted keys.
pub fn compute_scenario_hash<T: Serialize>(scenario: &T) -> Result<String, SimulationError> {
    let value = serde_json::to_value(scenario).map_err(|e| {
        SimulationError::Serialization(format!("Scenario serialization failed: {}", e))
    })?;

    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let json = serde_json::to_string(&canonicalize(value)).map_err(|e| {
        SimulationError::Serialization(format!("Scenario serialization failed: {}", e))
    })?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

// ============================================================================
// Cache
// ============================================================================

/// In-memory map from scenario hash to completed outputs
#[derive(Debug, Default)]
pub struct ScenarioCache {
    entries: BTreeMap<String, ScenarioOutputs>,
    hits: usize,
    misses: usize,
}

impl ScenarioCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outputs for `params`, running the scenario on a miss
    pub fn get_or_run(&mut self, params: &ScenarioParams) -> Result<&ScenarioOutputs, SimulationError> {
        let key = compute_scenario_hash(params)?;
        match self.entries.entry(key) {
            Entry::Occupied(entry) => {
                self.hits += 1;
                debug!(key = %entry.key(), "scenario cache hit");
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                debug!(key = %entry.key(), "scenario cache miss");
                let outputs = Orchestrator::new(params.clone())?.run();
                self.misses += 1;
                Ok(entry.insert(outputs))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
