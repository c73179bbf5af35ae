//! Spatial equilibrium migration reallocation
//!
//! Redistributes the year's total net migration across cities by relative
//! utility while conserving the total. A friction term anchors the result
//! to each city's baseline share of migration.

use serde::{Deserialize, Serialize};

/// Totals smaller than this are returned untouched
pub const MIN_REALLOCATION_TOTAL: f64 = 1e-9;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpatialEquilibriumConfig {
    pub enabled: bool,
    /// Inverse softmax temperature
    pub sensitivity: f64,
    /// Weight on baseline shares in `[0, 1]`
    pub friction: f64,
    pub wage_weight: f64,
    pub cost_weight: f64,
    pub amenity_weight: f64,
}

impl Default for SpatialEquilibriumConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sensitivity: 5.0,
            friction: 0.6,
            wage_weight: 1.0,
            cost_weight: -1.0,
            amenity_weight: 1.0,
        }
    }
}

/// Inputs to one city's utility
///
/// Wages are compared across cities against a single national reference;
/// housing costs are indexed to the city's own baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtilityInputs {
    /// Current wage over the national reference wage
    pub relative_wage: f64,
    /// Current price over baseline price
    pub price_index: f64,
    /// Current rent over baseline rent
    pub rent_index: f64,
    pub amenity: f64,
}

fn safe_ln(x: f64) -> f64 {
    x.max(1e-12).ln()
}

impl SpatialEquilibriumConfig {
    /// `w_wage·ln(relative wage) + w_cost·ln(cost index) + w_amenity·amenity`
    pub fn utility(&self, inputs: &UtilityInputs) -> f64 {
        let cost_index = 0.5 * (inputs.price_index + inputs.rent_index);
        let u = self.wage_weight * safe_ln(inputs.relative_wage)
            + self.cost_weight * safe_ln(cost_index)
            + self.amenity_weight * inputs.amenity;
        if u.is_finite() {
            u
        } else {
            0.0
        }
    }

    /// Reallocate `flows` by utility, conserving their sum
    ///
    /// `baseline_flows` sets the friction anchor (shares of absolute
    /// baseline migration; uniform when all zero).
    ///
    /// # Example
    ///
    /// ```rust
    /// use housing_simulator_core_rs::coupling::SpatialEquilibriumConfig;
    ///
    /// let config = SpatialEquilibriumConfig::default();
    /// let out = config.reallocate(&[100.0, 300.0], &[0.2, -0.1], &[100.0, 300.0]);
    /// assert!((out.iter().sum::<f64>() - 400.0).abs() < 1e-9);
    /// assert!(out[0] > 100.0);
    /// ```
    pub fn reallocate(&self, flows: &[f64], utilities: &[f64], baseline_flows: &[f64]) -> Vec<f64> {
        let total: f64 = flows.iter().sum();
        if flows.is_empty() || total.abs() < MIN_REALLOCATION_TOTAL || !total.is_finite() {
            return flows.to_vec();
        }

        let n = flows.len();
        let soft = softmax(utilities, self.sensitivity, n);
        let anchor = baseline_shares(baseline_flows, n);
        let friction = self.friction.clamp(0.0, 1.0);

        let blended: Vec<f64> = (0..n)
            .map(|i| friction * anchor[i] + (1.0 - friction) * soft[i])
            .collect();
        let sum: f64 = blended.iter().sum();

        blended.iter().map(|b| b / sum * total).collect()
    }
}

fn softmax(utilities: &[f64], sensitivity: f64, n: usize) -> Vec<f64> {
    let scaled: Vec<f64> = (0..n)
        .map(|i| {
            let u = utilities.get(i).copied().unwrap_or(0.0) * sensitivity;
            if u.is_finite() {
                u
            } else {
                0.0
            }
        })
        .collect();
    let max = scaled.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exp: Vec<f64> = scaled.iter().map(|u| (u - max).exp()).collect();
    let sum: f64 = exp.iter().sum();
    exp.iter().map(|e| e / sum).collect()
}

fn baseline_shares(baseline_flows: &[f64], n: usize) -> Vec<f64> {
    let abs: Vec<f64> = (0..n)
        .map(|i| {
            let m = baseline_flows.get(i).copied().unwrap_or(0.0).abs();
            if m.is_finite() {
                m
            } else {
                0.0
            }
        })
        .collect();
    let sum: f64 = abs.iter().sum();
    if sum <= 0.0 {
        return vec![1.0 / n as f64; n];
    }
    abs.iter().map(|m| m / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_utility_and_full_friction_keeps_baseline_split() {
        let config = SpatialEquilibriumConfig {
            friction: 1.0,
            ..Default::default()
        };
        let out = config.reallocate(&[100.0, 300.0], &[0.0, 0.0], &[100.0, 300.0]);
        assert!((out[0] - 100.0).abs() < 1e-9);
        assert!((out[1] - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_total_returns_input_exactly() {
        let config = SpatialEquilibriumConfig::default();
        let flows = [500.0, -500.0];
        assert_eq!(config.reallocate(&flows, &[1.0, -1.0], &flows), flows.to_vec());
    }

    #[test]
    fn test_negative_total_conserved() {
        let config = SpatialEquilibriumConfig::default();
        let out = config.reallocate(&[-100.0, -50.0, 20.0], &[0.1, 0.0, -0.3], &[1.0, 1.0, 1.0]);
        assert!((out.iter().sum::<f64>() + 130.0).abs() < 1e-9);
    }

    #[test]
    fn test_utility_falls_with_cost() {
        let config = SpatialEquilibriumConfig::default();
        let cheap = UtilityInputs {
            relative_wage: 1.0,
            price_index: 1.0,
            rent_index: 1.0,
            amenity: 0.0,
        };
        let dear = UtilityInputs {
            price_index: 1.5,
            rent_index: 1.3,
            ..cheap
        };
        assert_eq!(config.utility(&cheap), 0.0);
        assert!(config.utility(&dear) < 0.0);
    }

    #[test]
    fn test_higher_wage_attracts_migrants() {
        let config = SpatialEquilibriumConfig {
            friction: 0.0,
            ..SpatialEquilibriumConfig::default()
        };
        let base = UtilityInputs {
            relative_wage: 1.0,
            price_index: 1.0,
            rent_index: 1.0,
            amenity: 0.0,
        };
        let rich = UtilityInputs {
            relative_wage: 1.3,
            ..base
        };
        let utilities = [config.utility(&rich), config.utility(&base)];
        let out = config.reallocate(&[8_000.0, 8_000.0], &utilities, &[1.0, 1.0]);
        assert!(out[0] > out[1]);
        assert!((out.iter().sum::<f64>() - 16_000.0).abs() < 1e-6);
    }
}
