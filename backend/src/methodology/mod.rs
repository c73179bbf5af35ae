//! Methodology Resolver
//!
//! Turns the optional methodology section of a scenario into a complete,
//! immutable `Methodology` (constants + curves). Resolution is pure and
//! total: absent fields fall back to the documented defaults and nothing
//! can fail.

pub mod constants;
pub mod curves;

pub use constants::{ConstantOverrides, CoreConstants};
pub use curves::{
    ConstructionResponse, ConstructionResponseOverrides, Curves, GrowthCurve,
    GrowthCurveOverrides, InvestorDemandShock, InvestorDemandShockOverrides, MigrationResponse,
    MigrationResponseOverrides, RentalSupplyTransmission, RentalSupplyTransmissionOverrides,
    WageTrend, WageTrendOverrides,
};

use serde::{Deserialize, Serialize};

/// Methodology section of a scenario, every field of every part optional
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScenarioMethodology {
    pub constants: ConstantOverrides,
    pub price_curve: GrowthCurveOverrides,
    pub rent_curve: GrowthCurveOverrides,
    pub construction_response: ConstructionResponseOverrides,
    pub migration_response: MigrationResponseOverrides,
    pub investor_shock: InvestorDemandShockOverrides,
    pub rental_supply: RentalSupplyTransmissionOverrides,
    pub trend: WageTrendOverrides,
}

/// Fully resolved constants and curves for one run
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Methodology {
    pub constants: CoreConstants,
    pub curves: Curves,
}

/// Resolve a scenario's methodology section against the defaults
///
/// # Example
///
/// ```rust
/// use housing_simulator_core_rs::methodology::{resolve, ScenarioMethodology};
///
/// let resolved = resolve(&ScenarioMethodology::default());
/// assert_eq!(resolved.constants.persons_per_household, 2.5);
/// ```
pub fn resolve(config: &ScenarioMethodology) -> Methodology {
    let defaults = Curves::default();
    Methodology {
        constants: config.constants.apply(CoreConstants::default()),
        curves: Curves {
            price: config.price_curve.apply(defaults.price),
            rent: config.rent_curve.apply(defaults.rent),
            construction: config.construction_response.apply(defaults.construction),
            migration: config.migration_response.apply(defaults.migration),
            investor_shock: config.investor_shock.apply(defaults.investor_shock),
            rental_supply: config.rental_supply.apply(defaults.rental_supply),
            trend: config.trend.apply(defaults.trend),
        },
    }
}
