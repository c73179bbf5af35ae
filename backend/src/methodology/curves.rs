//! Response curves
//!
//! Each curve is a small parameter struct with a pure evaluation method.
//! Saturation is explicit: every curve clamps to its own `[floor, ceiling]`.

use serde::{Deserialize, Serialize};

/// Growth as a linear function of the gap ratio, saturating at both ends
///
/// `growth = clamp(baseline + adjustment_speed * elasticity * gap, floor, ceiling)`
///
/// ```
/// use housing_simulator_core_rs::methodology::GrowthCurve;
///
/// let curve = GrowthCurve { adjustment_speed: 0.5, floor: -0.1, ceiling: 0.2 };
/// assert_eq!(curve.growth(0.0, 1.0, 0.03), 0.03);
/// assert_eq!(curve.growth(10.0, 1.0, 0.03), 0.2);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GrowthCurve {
    /// Market adjustment speed (the constant external calibration fits)
    pub adjustment_speed: f64,
    pub floor: f64,
    pub ceiling: f64,
}

impl GrowthCurve {
    pub fn growth(&self, gap: f64, elasticity: f64, baseline: f64) -> f64 {
        (baseline + self.adjustment_speed * elasticity * gap).clamp(self.floor, self.ceiling)
    }
}

/// Completions response to price growth above its baseline
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ConstructionResponse {
    pub floor: f64,
    pub ceiling: f64,
}

impl ConstructionResponse {
    pub fn multiplier(&self, excess_price_growth: f64, supply_elasticity: f64) -> f64 {
        (1.0 + supply_elasticity * excess_price_growth).clamp(self.floor, self.ceiling)
    }
}

/// Net migration response to rents outgrowing wages
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MigrationResponse {
    pub sensitivity: f64,
    pub floor: f64,
    pub ceiling: f64,
}

impl MigrationResponse {
    /// `excess` is rent growth minus wage growth, relative to baseline
    pub fn multiplier(&self, excess: f64) -> f64 {
        (1.0 - self.sensitivity * excess).clamp(self.floor, self.ceiling)
    }
}

/// Investor demand response to a signed tax-treatment shock
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct InvestorDemandShock {
    /// Demand change for a full-strength negative gearing change
    pub negative_gearing_shock: f64,
}

impl InvestorDemandShock {
    /// Negative `signed_effect` removes concessions, positive expands them
    pub fn multiplier(&self, signed_effect: f64) -> f64 {
        (1.0 + self.negative_gearing_shock * signed_effect).max(0.0)
    }
}

/// How rental-supply shocks reach the rent gap
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RentalSupplyTransmission {
    /// Share of divested dwellings that leave the rental pool
    pub divestment_pass_through: f64,
    /// Weight of rental-supply shocks in the rent gap
    pub rent_gap_weight: f64,
}

impl RentalSupplyTransmission {
    pub fn divestment_shock(&self, divested_share: f64) -> f64 {
        divested_share * self.divestment_pass_through
    }

    pub fn rent_gap(&self, gap: f64, total_shock: f64) -> f64 {
        gap + self.rent_gap_weight * total_shock
    }
}

/// Economy-wide wage and consumer-price trend
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WageTrend {
    pub cpi_inflation: f64,
    /// Fallback nominal wage growth when a city supplies none
    pub wage_growth: f64,
}

impl WageTrend {
    pub fn wage_growth_for(&self, city_wage_growth: f64) -> f64 {
        if city_wage_growth.is_finite() {
            city_wage_growth
        } else {
            self.wage_growth
        }
    }
}

/// Every response curve the engine consumes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Curves {
    pub price: GrowthCurve,
    pub rent: GrowthCurve,
    pub construction: ConstructionResponse,
    pub migration: MigrationResponse,
    pub investor_shock: InvestorDemandShock,
    pub rental_supply: RentalSupplyTransmission,
    pub trend: WageTrend,
}

impl Default for Curves {
    fn default() -> Self {
        Self {
            price: GrowthCurve {
                adjustment_speed: 0.6,
                floor: -0.15,
                ceiling: 0.25,
            },
            rent: GrowthCurve {
                adjustment_speed: 0.5,
                floor: -0.10,
                ceiling: 0.20,
            },
            construction: ConstructionResponse {
                floor: 0.5,
                ceiling: 1.6,
            },
            migration: MigrationResponse {
                sensitivity: 2.0,
                floor: 0.5,
                ceiling: 1.5,
            },
            investor_shock: InvestorDemandShock {
                negative_gearing_shock: 0.12,
            },
            rental_supply: RentalSupplyTransmission {
                divestment_pass_through: 0.6,
                rent_gap_weight: 1.0,
            },
            trend: WageTrend {
                cpi_inflation: 0.025,
                wage_growth: 0.03,
            },
        }
    }
}

// ============================================================================
// Partial curve overrides
// ============================================================================

/// Partial `GrowthCurve` as supplied by scenario configuration
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GrowthCurveOverrides {
    pub adjustment_speed: Option<f64>,
    pub floor: Option<f64>,
    pub ceiling: Option<f64>,
}

impl GrowthCurveOverrides {
    pub fn apply(&self, base: GrowthCurve) -> GrowthCurve {
        GrowthCurve {
            adjustment_speed: self.adjustment_speed.unwrap_or(base.adjustment_speed),
            floor: self.floor.unwrap_or(base.floor),
            ceiling: self.ceiling.unwrap_or(base.ceiling),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConstructionResponseOverrides {
    pub floor: Option<f64>,
    pub ceiling: Option<f64>,
}

impl ConstructionResponseOverrides {
    pub fn apply(&self, base: ConstructionResponse) -> ConstructionResponse {
        ConstructionResponse {
            floor: self.floor.unwrap_or(base.floor),
            ceiling: self.ceiling.unwrap_or(base.ceiling),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MigrationResponseOverrides {
    pub sensitivity: Option<f64>,
    pub floor: Option<f64>,
    pub ceiling: Option<f64>,
}

impl MigrationResponseOverrides {
    pub fn apply(&self, base: MigrationResponse) -> MigrationResponse {
        MigrationResponse {
            sensitivity: self.sensitivity.unwrap_or(base.sensitivity),
            floor: self.floor.unwrap_or(base.floor),
            ceiling: self.ceiling.unwrap_or(base.ceiling),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InvestorDemandShockOverrides {
    pub negative_gearing_shock: Option<f64>,
}

impl InvestorDemandShockOverrides {
    pub fn apply(&self, base: InvestorDemandShock) -> InvestorDemandShock {
        InvestorDemandShock {
            negative_gearing_shock: self
                .negative_gearing_shock
                .unwrap_or(base.negative_gearing_shock),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RentalSupplyTransmissionOverrides {
    pub divestment_pass_through: Option<f64>,
    pub rent_gap_weight: Option<f64>,
}

impl RentalSupplyTransmissionOverrides {
    pub fn apply(&self, base: RentalSupplyTransmission) -> RentalSupplyTransmission {
        RentalSupplyTransmission {
            divestment_pass_through: self
                .divestment_pass_through
                .unwrap_or(base.divestment_pass_through),
            rent_gap_weight: self.rent_gap_weight.unwrap_or(base.rent_gap_weight),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WageTrendOverrides {
    pub cpi_inflation: Option<f64>,
    pub wage_growth: Option<f64>,
}

impl WageTrendOverrides {
    pub fn apply(&self, base: WageTrend) -> WageTrend {
        WageTrend {
            cpi_inflation: self.cpi_inflation.unwrap_or(base.cpi_inflation),
            wage_growth: self.wage_growth.unwrap_or(base.wage_growth),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth_curve_saturates() {
        let curve = Curves::default().price;
        assert_eq!(curve.growth(-100.0, 1.0, 0.04), curve.floor);
        assert_eq!(curve.growth(100.0, 1.0, 0.04), curve.ceiling);
    }

    #[test]
    fn test_construction_response_neutral_at_zero_excess() {
        let c = Curves::default().construction;
        assert_eq!(c.multiplier(0.0, 3.0), 1.0);
        assert!(c.multiplier(0.05, 3.0) > 1.0);
    }

    #[test]
    fn test_investor_shock_never_negative() {
        let s = InvestorDemandShock {
            negative_gearing_shock: 5.0,
        };
        assert_eq!(s.multiplier(-1.0), 0.0);
    }

    #[test]
    fn test_growth_overrides_keep_unset_fields() {
        let base = Curves::default().rent;
        let partial = GrowthCurveOverrides {
            ceiling: Some(0.4),
            ..Default::default()
        };
        let curve = partial.apply(base);
        assert_eq!(curve.ceiling, 0.4);
        assert_eq!(curve.floor, base.floor);
        assert_eq!(curve.adjustment_speed, base.adjustment_speed);
        assert_eq!(GrowthCurveOverrides::default().apply(base), base);
    }

    #[test]
    fn test_wage_trend_fallback() {
        let t = Curves::default().trend;
        assert_eq!(t.wage_growth_for(f64::NAN), 0.03);
        assert_eq!(t.wage_growth_for(0.02), 0.02);
    }
}
