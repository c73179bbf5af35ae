//! Subsidies channel: buyer grants, shared equity, rent assistance and
//! build-to-rent incentives

use crate::core::ramp_fraction;
use crate::models::CityBaseline;
use crate::policy::{PolicyChannel, PolicyChannelDelta, PolicyLevers};

/// Owner demand response to a grant, per unit of grant/price
const GRANT_DEMAND_SENSITIVITY: f64 = 0.5;
const SHARED_EQUITY_DEMAND_SENSITIVITY: f64 = 0.15;
const BUILD_TO_RENT_COMPLETIONS: f64 = 0.10;
const BUILD_TO_RENT_RENTAL_SUPPLY: f64 = 0.01;

pub struct SubsidyChannel;

impl PolicyChannel for SubsidyChannel {
    fn name(&self) -> &'static str {
        "subsidies"
    }

    fn evaluate(&self, step: usize, city: &CityBaseline, levers: &PolicyLevers) -> PolicyChannelDelta {
        let subsidies = levers.subsidies.clamp();
        let ramp = ramp_fraction(step, subsidies.ramp_years);

        let grant_share = subsidies.first_home_grant / city.median_price.max(1.0);
        let grant = 1.0 + GRANT_DEMAND_SENSITIVITY * grant_share * ramp;
        let equity = 1.0 + SHARED_EQUITY_DEMAND_SENSITIVITY * subsidies.shared_equity_share * ramp;

        PolicyChannelDelta {
            owner_demand_multiplier: grant * equity,
            completions_multiplier: 1.0
                + BUILD_TO_RENT_COMPLETIONS * subsidies.build_to_rent_incentive * ramp,
            rental_supply_shock: -BUILD_TO_RENT_RENTAL_SUPPLY
                * subsidies.build_to_rent_incentive
                * ramp,
            rent_assistance_share: subsidies.rent_assistance_share * ramp,
            ..PolicyChannelDelta::identity()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grant_scales_with_price() {
        let mut levers = PolicyLevers::default();
        levers.subsidies.first_home_grant = 30_000.0;
        let mut cheap = CityBaseline::new("A", "SA");
        cheap.median_price = 300_000.0;
        let dear = CityBaseline::new("B", "NSW");
        let d_cheap = SubsidyChannel.evaluate(0, &cheap, &levers);
        let d_dear = SubsidyChannel.evaluate(0, &dear, &levers);
        assert!(d_cheap.owner_demand_multiplier > d_dear.owner_demand_multiplier);
    }

    #[test]
    fn test_build_to_rent_adds_rental_supply() {
        let mut levers = PolicyLevers::default();
        levers.subsidies.build_to_rent_incentive = 1.0;
        let d = SubsidyChannel.evaluate(0, &CityBaseline::new("A", "SA"), &levers);
        assert!(d.rental_supply_shock < 0.0);
        assert!(d.completions_multiplier > 1.0);
    }
}
