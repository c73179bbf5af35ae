//! Legacy flat lever shape and its one-way upgrade
//!
//! Older scenario files carry a single flat object of levers. They are
//! upgraded to the grouped `PolicyLevers` exactly once, at the boundary;
//! nothing inside the engine sees the flat shape.

use crate::policy::levers::{NegativeGearingMode, PolicyLevers};
use serde::{Deserialize, Serialize};

/// Flat lever shape used by older scenario files
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LegacyLevers {
    pub negative_gearing_removed: bool,
    pub negative_gearing_intensity: f64,
    pub negative_gearing_ramp_years: u32,
    pub cgt_discount: f64,
    pub stamp_duty_change: f64,
    pub serviceability_buffer: f64,
    pub first_home_grant: f64,
    pub rent_assistance_share: f64,
    pub rent_cap: Option<f64>,
    pub rent_cap_coverage: f64,
    pub upzoning: f64,
    pub public_housing_per_1000: f64,
    pub migration_multiplier: f64,
    pub investor_cap: Option<f64>,
    pub investor_cap_enforcement: f64,
}

impl Default for LegacyLevers {
    fn default() -> Self {
        Self {
            negative_gearing_removed: false,
            negative_gearing_intensity: 1.0,
            negative_gearing_ramp_years: 0,
            cgt_discount: 0.5,
            stamp_duty_change: 0.0,
            serviceability_buffer: 0.03,
            first_home_grant: 0.0,
            rent_assistance_share: 0.0,
            rent_cap: None,
            rent_cap_coverage: 1.0,
            upzoning: 0.0,
            public_housing_per_1000: 0.0,
            migration_multiplier: 1.0,
            investor_cap: None,
            investor_cap_enforcement: 1.0,
        }
    }
}

/// Upgrade a flat lever set to the canonical grouped shape
///
/// Values are copied as-is; clamping happens in the evaluators.
pub fn upgrade_legacy_levers(legacy: &LegacyLevers) -> PolicyLevers {
    let mut levers = PolicyLevers::default();

    levers.tax.negative_gearing.mode = if legacy.negative_gearing_removed {
        NegativeGearingMode::Remove
    } else {
        NegativeGearingMode::Keep
    };
    levers.tax.negative_gearing.intensity = legacy.negative_gearing_intensity;
    levers.tax.negative_gearing.ramp_years = legacy.negative_gearing_ramp_years;
    levers.tax.cgt_discount = legacy.cgt_discount;
    levers.tax.stamp_duty_change = legacy.stamp_duty_change;

    if let Some(cap) = legacy.investor_cap {
        levers.tax.ownership_cap.enabled = true;
        levers.tax.ownership_cap.cap_share = cap;
        levers.tax.ownership_cap.enforcement = legacy.investor_cap_enforcement;
    }

    levers.credit.serviceability_buffer = legacy.serviceability_buffer;

    levers.subsidies.first_home_grant = legacy.first_home_grant;
    levers.subsidies.rent_assistance_share = legacy.rent_assistance_share;

    if let Some(cap) = legacy.rent_cap {
        levers.rental.rent_cap_enabled = true;
        levers.rental.rent_cap = cap;
        levers.rental.coverage = legacy.rent_cap_coverage;
    }

    levers.planning.upzoning_intensity = legacy.upzoning;
    levers.public_housing.build_per_1000 = legacy.public_housing_per_1000;
    levers.migration.overseas_migration_multiplier = legacy.migration_multiplier;

    levers
}

/// Lever input as accepted at the scenario boundary
///
/// Deserialises either shape; the grouped shape is tried first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum LeverInput {
    Grouped(PolicyLevers),
    Legacy(LegacyLevers),
}

impl Default for LeverInput {
    fn default() -> Self {
        LeverInput::Grouped(PolicyLevers::default())
    }
}

impl From<PolicyLevers> for LeverInput {
    fn from(levers: PolicyLevers) -> Self {
        LeverInput::Grouped(levers)
    }
}

impl LeverInput {
    /// The canonical grouped representation
    pub fn into_canonical(self) -> PolicyLevers {
        match self {
            LeverInput::Grouped(levers) => levers,
            LeverInput::Legacy(legacy) => upgrade_legacy_levers(&legacy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_legacy_upgrades_to_default_grouped() {
        assert_eq!(
            upgrade_legacy_levers(&LegacyLevers::default()),
            PolicyLevers::default()
        );
    }

    #[test]
    fn test_flat_json_parses_as_legacy() {
        let input: LeverInput =
            serde_json::from_str(r#"{"negative_gearing_removed": true, "rent_cap": 0.03}"#).unwrap();
        assert!(matches!(input, LeverInput::Legacy(_)));
        let levers = input.into_canonical();
        assert_eq!(levers.tax.negative_gearing.mode, NegativeGearingMode::Remove);
        assert!(levers.rental.rent_cap_enabled);
        assert_eq!(levers.rental.rent_cap, 0.03);
    }

    #[test]
    fn test_grouped_json_parses_as_grouped() {
        let input: LeverInput =
            serde_json::from_str(r#"{"rental": {"rent_cap_enabled": true}}"#).unwrap();
        assert!(matches!(input, LeverInput::Grouped(_)));
    }
}
