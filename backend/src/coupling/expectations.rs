//! Expectation formation
//!
//! Expected price growth is a convex combination of three archetypes:
//!
//! - extrapolators: `baseline + extrapolation_strength * (observed - baseline)`
//! - fundamentals: a fixed anchor (the city's baseline growth by default)
//! - mean-reverters: `baseline - reversion_strength * (observed - baseline)`

use serde::{Deserialize, Serialize};

/// Which archetypes form expectations
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExpectationModel {
    /// Weighted mixture of all three
    #[default]
    Mixture,
    Extrapolative,
    Fundamentals,
    MeanReverting,
}

/// Scenario section, every field optional
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExpectationsConfig {
    pub model: Option<ExpectationModel>,
    pub extrapolative_weight: Option<f64>,
    pub fundamentals_weight: Option<f64>,
    pub mean_reverting_weight: Option<f64>,
    pub extrapolation_strength: Option<f64>,
    pub reversion_strength: Option<f64>,
    /// Fixed fundamentals anchor; absent means each city's baseline growth
    pub anchor: Option<f64>,
}

/// Resolved expectation parameters; weights sum to 1
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ExpectationSettings {
    /// `[extrapolative, fundamentals, mean_reverting]`
    pub weights: [f64; 3],
    pub extrapolation_strength: f64,
    pub reversion_strength: f64,
    pub anchor: Option<f64>,
}

impl Default for ExpectationSettings {
    fn default() -> Self {
        ExpectationsConfig::default().resolve()
    }
}

impl ExpectationsConfig {
    pub fn resolve(&self) -> ExpectationSettings {
        let weights = match self.model.unwrap_or_default() {
            ExpectationModel::Mixture => normalize_weights([
                self.extrapolative_weight.unwrap_or(0.4),
                self.fundamentals_weight.unwrap_or(0.4),
                self.mean_reverting_weight.unwrap_or(0.2),
            ]),
            ExpectationModel::Extrapolative => [1.0, 0.0, 0.0],
            ExpectationModel::Fundamentals => [0.0, 1.0, 0.0],
            ExpectationModel::MeanReverting => [0.0, 0.0, 1.0],
        };

        ExpectationSettings {
            weights,
            extrapolation_strength: self.extrapolation_strength.unwrap_or(0.8),
            reversion_strength: self.reversion_strength.unwrap_or(0.5),
            anchor: self.anchor,
        }
    }
}

/// Normalise mixture weights to sum to 1
///
/// Negative and non-finite weights count as zero; all-zero falls back to
/// fundamentals only.
pub fn normalize_weights(raw: [f64; 3]) -> [f64; 3] {
    let cleaned = raw.map(|w| if w.is_finite() && w > 0.0 { w } else { 0.0 });
    let total: f64 = cleaned.iter().sum();
    if total <= 0.0 {
        return [0.0, 1.0, 0.0];
    }
    cleaned.map(|w| w / total)
}

impl ExpectationSettings {
    /// Expected growth given last year's observed growth and the baseline
    ///
    /// # Example
    ///
    /// ```rust
    /// use housing_simulator_core_rs::coupling::ExpectationsConfig;
    ///
    /// let settings = ExpectationsConfig::default().resolve();
    /// // No surprise means every archetype expects the baseline
    /// assert!((settings.expected_growth(0.04, 0.04) - 0.04).abs() < 1e-12);
    /// ```
    pub fn expected_growth(&self, observed: f64, baseline: f64) -> f64 {
        let surprise = observed - baseline;
        let extrapolate = baseline + self.extrapolation_strength * surprise;
        let fundamental = self.anchor.unwrap_or(baseline);
        let revert = baseline - self.reversion_strength * surprise;

        self.weights[0] * extrapolate + self.weights[1] * fundamental + self.weights[2] * revert
    }
}
