//! Credit / macroprudential channel

use crate::core::ramp_fraction;
use crate::models::CityBaseline;
use crate::policy::levers::bounds;
use crate::policy::{PolicyChannel, PolicyChannelDelta, PolicyLevers};

const BUFFER_DEMAND_SENSITIVITY: f64 = 3.0;
const LVR_DEMAND_SENSITIVITY: f64 = 0.8;
/// Demand reduction at the tightest DTI cap
const MAX_DTI_REDUCTION: f64 = 0.03;
const INVESTOR_LIMIT_SENSITIVITY: f64 = 0.5;

pub struct CreditChannel;

impl PolicyChannel for CreditChannel {
    fn name(&self) -> &'static str {
        "credit"
    }

    fn evaluate(&self, step: usize, _city: &CityBaseline, levers: &PolicyLevers) -> PolicyChannelDelta {
        let credit = levers.credit.clamp();
        let ramp = ramp_fraction(step, credit.ramp_years);

        let buffer = 1.0
            - BUFFER_DEMAND_SENSITIVITY
                * (credit.serviceability_buffer - bounds::SERVICEABILITY_BUFFER.default)
                * ramp;
        let lvr = 1.0 + LVR_DEMAND_SENSITIVITY * (credit.max_lvr - bounds::MAX_LVR.default) * ramp;

        let dti = if credit.dti_cap_enabled {
            let tightness = (bounds::DTI_CAP.max - credit.dti_cap)
                / (bounds::DTI_CAP.max - bounds::DTI_CAP.min);
            1.0 - MAX_DTI_REDUCTION * tightness * ramp
        } else {
            1.0
        };

        let investor_limit = 1.0 - INVESTOR_LIMIT_SENSITIVITY * credit.investor_lending_limit * ramp;

        PolicyChannelDelta {
            owner_demand_multiplier: (buffer * lvr * dti).max(0.0),
            investor_demand_multiplier: (buffer * dti * investor_limit).max(0.0),
            mortgage_rate_delta: credit.mortgage_rate_premium * ramp,
            ..PolicyChannelDelta::identity()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tighter_buffer_reduces_demand() {
        let mut levers = PolicyLevers::default();
        levers.credit.serviceability_buffer = 0.05;
        let d = CreditChannel.evaluate(0, &CityBaseline::new("A", "VIC"), &levers);
        assert!(d.owner_demand_multiplier < 1.0);
        assert!(d.investor_demand_multiplier < 1.0);
    }

    #[test]
    fn test_dti_cap_only_when_enabled() {
        let mut levers = PolicyLevers::default();
        levers.credit.dti_cap = 4.0;
        let city = CityBaseline::new("A", "VIC");
        assert_eq!(CreditChannel.evaluate(0, &city, &levers).owner_demand_multiplier, 1.0);
        levers.credit.dti_cap_enabled = true;
        let d = CreditChannel.evaluate(0, &city, &levers);
        assert!((d.owner_demand_multiplier - 0.97).abs() < 1e-12);
    }

    #[test]
    fn test_rate_premium_passes_through() {
        let mut levers = PolicyLevers::default();
        levers.credit.mortgage_rate_premium = 0.01;
        let d = CreditChannel.evaluate(3, &CityBaseline::new("A", "VIC"), &levers);
        assert_eq!(d.mortgage_rate_delta, 0.01);
    }
}
