//! Scenario configuration and the resolve-with-defaults pass
//!
//! `ScenarioParams` is the JSON shape accepted at the boundary. Every
//! optional section is resolved exactly once, in [`ScenarioParams::resolve`],
//! into a fully populated [`ResolvedScenario`]; nothing downstream performs
//! optional lookups into configuration.

use crate::coupling::{
    DefaultPortfolioModel, ExpectationSettings, ExpectationsConfig, RatePathConfig,
    SpatialEquilibriumConfig,
};
use crate::error::SimulationError;
use crate::methodology::{resolve, Methodology, ScenarioMethodology};
use crate::models::{CityBaseline, HistoricalSeries, MicrodataRecord};
use crate::policy::{LeverInput, PolicyLevers};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

// ============================================================================
// Scenario Shape
// ============================================================================

/// Engine mode
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EngineMode {
    /// Cities evolve independently
    #[default]
    Aggregate,
    /// Cities are coupled through expectations, portfolio choice, migration
    /// and a national rate path
    Advanced,
}

/// On/off switch for an optional advanced feature
///
/// Presence of the section turns the feature on unless `enabled` says
/// otherwise.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FeatureToggle {
    pub enabled: bool,
}

impl Default for FeatureToggle {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Advanced section of a scenario, every part optional
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AdvancedConfig {
    pub spatial_equilibrium: Option<SpatialEquilibriumConfig>,
    pub expectations: Option<ExpectationsConfig>,
    pub portfolio: Option<DefaultPortfolioModel>,
    pub microdata: Option<FeatureToggle>,
    pub calibration: Option<FeatureToggle>,
}

/// Fully populated advanced settings
#[derive(Debug, Clone, PartialEq)]
pub struct AdvancedSettings {
    pub spatial: SpatialEquilibriumConfig,
    pub expectations: ExpectationSettings,
    pub portfolio: DefaultPortfolioModel,
    pub microdata_enabled: bool,
    pub calibration_enabled: bool,
}

impl AdvancedConfig {
    /// Fill every absent section with its defaults
    ///
    /// Coupling sections default to on; microdata and calibration default
    /// to off unless their section is present.
    pub fn resolve(&self) -> AdvancedSettings {
        AdvancedSettings {
            spatial: self.spatial_equilibrium.unwrap_or_default(),
            expectations: self
                .expectations
                .as_ref()
                .map(ExpectationsConfig::resolve)
                .unwrap_or_default(),
            portfolio: self.portfolio.unwrap_or_default(),
            microdata_enabled: self.microdata.is_some_and(|t| t.enabled),
            calibration_enabled: self.calibration.is_some_and(|t| t.enabled),
        }
    }
}

fn default_start_year() -> i32 {
    2025
}

/// A complete scenario as accepted at the boundary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioParams {
    /// Horizon in years
    pub years: usize,

    /// Calendar label of step 0
    #[serde(default = "default_start_year")]
    pub start_year: i32,

    pub cities: Vec<CityBaseline>,

    /// Grouped or legacy flat levers
    #[serde(default)]
    pub levers: LeverInput,

    #[serde(default)]
    pub mode: EngineMode,

    #[serde(default)]
    pub advanced: Option<AdvancedConfig>,

    /// Dynamic mortgage rates; absent means baseline rate plus premiums
    #[serde(default)]
    pub rate_path: Option<RatePathConfig>,

    #[serde(default)]
    pub methodology: Option<ScenarioMethodology>,

    /// Historical series by city id
    #[serde(default)]
    pub history: BTreeMap<String, HistoricalSeries>,

    /// Survey microdata by city id
    #[serde(default)]
    pub microdata: BTreeMap<String, Vec<MicrodataRecord>>,
}

impl ScenarioParams {
    /// Scenario with default levers and methodology
    pub fn new(years: usize, cities: Vec<CityBaseline>) -> Self {
        Self {
            years,
            start_year: default_start_year(),
            cities,
            levers: LeverInput::default(),
            mode: EngineMode::Aggregate,
            advanced: None,
            rate_path: None,
            methodology: None,
            history: BTreeMap::new(),
            microdata: BTreeMap::new(),
        }
    }

    pub fn with_levers(mut self, levers: PolicyLevers) -> Self {
        self.levers = LeverInput::Grouped(levers);
        self
    }

    pub fn with_mode(mut self, mode: EngineMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn from_json(json: &str) -> Result<Self, SimulationError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reject inputs the engine cannot step from
    ///
    /// Lever values are never rejected; they are clamped by the channels.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.years == 0 {
            return Err(SimulationError::InvalidConfig(
                "years must be > 0".to_string(),
            ));
        }

        if self.cities.is_empty() {
            return Err(SimulationError::InvalidConfig(
                "Must have at least one city".to_string(),
            ));
        }

        let mut ids = HashSet::new();
        for city in &self.cities {
            if !ids.insert(&city.id) {
                return Err(SimulationError::InvalidConfig(format!(
                    "Duplicate city ID: {}",
                    city.id
                )));
            }
            validate_baseline(city)?;
        }

        Ok(())
    }

    /// Resolve every optional section against its defaults
    pub fn resolve(&self) -> ResolvedScenario {
        let advanced = self.advanced.clone().unwrap_or_default().resolve();
        ResolvedScenario {
            years: self.years,
            start_year: self.start_year,
            cities: self.cities.clone(),
            levers: self.levers.clone().into_canonical().clamp(),
            mode: self.mode,
            advanced,
            rate_path: self.rate_path,
            methodology: resolve(&self.methodology.clone().unwrap_or_default()),
            history: self.history.clone(),
            microdata: self.microdata.clone(),
        }
    }
}

fn validate_baseline(city: &CityBaseline) -> Result<(), SimulationError> {
    let fields = [
        ("population", city.population),
        ("dwelling_stock", city.dwelling_stock),
        ("median_price", city.median_price),
        ("median_rent", city.median_rent),
        ("median_income", city.median_income),
    ];
    for (field, value) in fields {
        if !(value.is_finite() && value > 0.0) {
            return Err(SimulationError::InvalidBaseline {
                city_id: city.id.clone(),
                field,
                value,
            });
        }
    }
    Ok(())
}

// ============================================================================
// Resolved Scenario
// ============================================================================

/// Immutable run configuration with every default applied
///
/// Levers are canonical (legacy input upgraded) and clamped.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedScenario {
    pub years: usize,
    pub start_year: i32,
    pub cities: Vec<CityBaseline>,
    pub levers: PolicyLevers,
    pub mode: EngineMode,
    pub advanced: AdvancedSettings,
    pub rate_path: Option<RatePathConfig>,
    pub methodology: Methodology,
    pub history: BTreeMap<String, HistoricalSeries>,
    pub microdata: BTreeMap<String, Vec<MicrodataRecord>>,
}
