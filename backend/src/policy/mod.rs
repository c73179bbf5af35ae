//! Policy Channel Composer
//!
//! Seven independent evaluators map the lever set to typed effect deltas for
//! one (city, year). Deltas from different channels are merged by fixed
//! per-field rules, so levers compose predictably when toggled
//! independently:
//!
//! | Field kind                         | Rule                        |
//! |------------------------------------|-----------------------------|
//! | multipliers                        | product (identity 1)        |
//! | additive terms                     | sum (identity 0)            |
//! | `rent_growth_cap`                  | min of non-null caps        |
//! | coverage / assistance shares       | max (identity 0)            |
//! | `cap_binds_on_relet`               | logical AND (identity true) |
//!
//! There is no cross-channel interaction beyond these rules.
//!
//! # Channel Interface
//!
//! ```rust
//! use housing_simulator_core_rs::policy::{PolicyChannel, PolicyChannelDelta, PolicyLevers};
//! use housing_simulator_core_rs::CityBaseline;
//!
//! struct NoEffect;
//!
//! impl PolicyChannel for NoEffect {
//!     fn name(&self) -> &'static str {
//!         "no_effect"
//!     }
//!
//!     fn evaluate(&self, _step: usize, _city: &CityBaseline, _levers: &PolicyLevers) -> PolicyChannelDelta {
//!         PolicyChannelDelta::identity()
//!     }
//! }
//! ```

pub mod credit;
pub mod legacy;
pub mod levers;
pub mod migration;
pub mod planning;
pub mod public_housing;
pub mod rental;
pub mod subsidies;
pub mod tax;

pub use legacy::{upgrade_legacy_levers, LegacyLevers, LeverInput};
pub use levers::{
    Bound, CreditLevers, MigrationLevers, NegativeGearingLevers, NegativeGearingMode,
    OwnershipCapLevers, PlanningLevers, PolicyLevers, PublicHousingLevers, RentalLevers,
    SubsidyLevers, TaxLevers,
};

use crate::models::CityBaseline;
use serde::{Deserialize, Serialize};

/// Effect bundle for one city-year
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PolicyChannelDelta {
    // multipliers (product)
    pub owner_demand_multiplier: f64,
    pub investor_demand_multiplier: f64,
    pub completions_multiplier: f64,
    pub migration_multiplier: f64,

    // additive terms (sum)
    pub rent_growth_modifier: f64,
    /// Extra dwellings completed per year
    pub additional_completions: f64,
    /// Share of rental supply withdrawn; negative adds supply
    pub rental_supply_shock: f64,
    /// Extra year-over-year construction capacity
    pub capacity_lift: f64,
    pub stamp_duty_rate_delta: f64,
    pub mortgage_rate_delta: f64,
    /// Extra net migrants per year
    pub net_migration_delta: f64,

    // most restrictive wins (min)
    pub rent_growth_cap: Option<f64>,

    // widest reach wins (max)
    pub rent_regulation_coverage: f64,
    pub rent_assistance_share: f64,

    // logical AND
    /// False when any channel lets rents reset between tenancies
    pub cap_binds_on_relet: bool,
}

impl Default for PolicyChannelDelta {
    fn default() -> Self {
        Self::identity()
    }
}

impl PolicyChannelDelta {
    /// The neutral delta: merging with it changes nothing
    pub fn identity() -> Self {
        Self {
            owner_demand_multiplier: 1.0,
            investor_demand_multiplier: 1.0,
            completions_multiplier: 1.0,
            migration_multiplier: 1.0,
            rent_growth_modifier: 0.0,
            additional_completions: 0.0,
            rental_supply_shock: 0.0,
            capacity_lift: 0.0,
            stamp_duty_rate_delta: 0.0,
            mortgage_rate_delta: 0.0,
            net_migration_delta: 0.0,
            rent_growth_cap: None,
            rent_regulation_coverage: 0.0,
            rent_assistance_share: 0.0,
            cap_binds_on_relet: true,
        }
    }

    /// Combine two deltas field by field
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            owner_demand_multiplier: self.owner_demand_multiplier * other.owner_demand_multiplier,
            investor_demand_multiplier: self.investor_demand_multiplier
                * other.investor_demand_multiplier,
            completions_multiplier: self.completions_multiplier * other.completions_multiplier,
            migration_multiplier: self.migration_multiplier * other.migration_multiplier,
            rent_growth_modifier: self.rent_growth_modifier + other.rent_growth_modifier,
            additional_completions: self.additional_completions + other.additional_completions,
            rental_supply_shock: self.rental_supply_shock + other.rental_supply_shock,
            capacity_lift: self.capacity_lift + other.capacity_lift,
            stamp_duty_rate_delta: self.stamp_duty_rate_delta + other.stamp_duty_rate_delta,
            mortgage_rate_delta: self.mortgage_rate_delta + other.mortgage_rate_delta,
            net_migration_delta: self.net_migration_delta + other.net_migration_delta,
            rent_growth_cap: match (self.rent_growth_cap, other.rent_growth_cap) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, None) => a,
                (None, b) => b,
            },
            rent_regulation_coverage: self
                .rent_regulation_coverage
                .max(other.rent_regulation_coverage),
            rent_assistance_share: self.rent_assistance_share.max(other.rent_assistance_share),
            cap_binds_on_relet: self.cap_binds_on_relet && other.cap_binds_on_relet,
        }
    }
}

/// Merge any number of deltas, starting from the identity
pub fn merge_all<'a, I>(deltas: I) -> PolicyChannelDelta
where
    I: IntoIterator<Item = &'a PolicyChannelDelta>,
{
    deltas
        .into_iter()
        .fold(PolicyChannelDelta::identity(), |acc, d| acc.merge(d))
}

/// One independent policy channel
///
/// Implementations must be pure and must clamp their own lever group
/// before use, so the composer tolerates unvalidated input.
pub trait PolicyChannel {
    /// Stable channel name
    fn name(&self) -> &'static str;

    /// Effect of the levers on `city` at `step`
    fn evaluate(&self, step: usize, city: &CityBaseline, levers: &PolicyLevers)
        -> PolicyChannelDelta;
}

/// Ordered set of channels evaluated for every city-year
pub struct PolicyComposer {
    channels: Vec<Box<dyn PolicyChannel>>,
}

impl Default for PolicyComposer {
    fn default() -> Self {
        Self::standard()
    }
}

impl PolicyComposer {
    /// The seven standard channels
    pub fn standard() -> Self {
        Self {
            channels: vec![
                Box::new(tax::TaxChannel),
                Box::new(credit::CreditChannel),
                Box::new(subsidies::SubsidyChannel),
                Box::new(rental::RentalRegulationChannel),
                Box::new(planning::PlanningChannel),
                Box::new(public_housing::PublicHousingChannel),
                Box::new(migration::MigrationChannel),
            ],
        }
    }

    /// Composer over an explicit channel list
    pub fn with_channels(channels: Vec<Box<dyn PolicyChannel>>) -> Self {
        Self { channels }
    }

    pub fn channel_names(&self) -> Vec<&'static str> {
        self.channels.iter().map(|c| c.name()).collect()
    }

    /// Evaluate every channel and merge the results
    pub fn compose(
        &self,
        step: usize,
        city: &CityBaseline,
        levers: &PolicyLevers,
    ) -> PolicyChannelDelta {
        let deltas: Vec<PolicyChannelDelta> = self
            .channels
            .iter()
            .map(|channel| channel.evaluate(step, city, levers))
            .collect();
        merge_all(&deltas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_neutral() {
        let mut d = PolicyChannelDelta::identity();
        d.owner_demand_multiplier = 0.9;
        d.rent_growth_cap = Some(0.04);
        d.rent_regulation_coverage = 0.5;
        d.cap_binds_on_relet = false;
        assert_eq!(d.merge(&PolicyChannelDelta::identity()), d);
        assert_eq!(PolicyChannelDelta::identity().merge(&d), d);
    }

    #[test]
    fn test_most_restrictive_cap_wins() {
        let mut a = PolicyChannelDelta::identity();
        a.rent_growth_cap = Some(0.05);
        let mut b = PolicyChannelDelta::identity();
        b.rent_growth_cap = Some(0.02);
        assert_eq!(a.merge(&b).rent_growth_cap, Some(0.02));
        assert_eq!(b.merge(&a).rent_growth_cap, Some(0.02));
    }

    #[test]
    fn test_default_levers_compose_to_identity() {
        let composer = PolicyComposer::standard();
        let city = CityBaseline::new("SYD", "NSW");
        let delta = composer.compose(0, &city, &PolicyLevers::default());
        assert_eq!(delta, PolicyChannelDelta::identity());
    }

    #[test]
    fn test_standard_has_seven_channels() {
        assert_eq!(PolicyComposer::standard().channel_names().len(), 7);
    }
}
