//! Tax / investor channel
//!
//! CGT discount, land tax, foreign-buyer surcharge and stamp duty. Negative
//! gearing and the ownership cap sit in the same lever group but depend on
//! the evolving investor share, so the year-step engine evaluates them.

use crate::core::ramp_fraction;
use crate::models::CityBaseline;
use crate::policy::levers::bounds;
use crate::policy::{PolicyChannel, PolicyChannelDelta, PolicyLevers};

/// Investor demand change per unit change in the CGT discount
const CGT_DEMAND_SENSITIVITY: f64 = 0.3;
/// Investor demand change per unit change in the land tax rate
const LAND_TAX_DEMAND_SENSITIVITY: f64 = 4.0;
/// Investor demand change per unit of foreign-buyer surcharge
const SURCHARGE_DEMAND_SENSITIVITY: f64 = 1.0;
/// Owner demand change per unit change in the stamp duty rate
const STAMP_DUTY_DEMAND_SENSITIVITY: f64 = 1.5;

pub struct TaxChannel;

impl PolicyChannel for TaxChannel {
    fn name(&self) -> &'static str {
        "tax"
    }

    fn evaluate(&self, step: usize, _city: &CityBaseline, levers: &PolicyLevers) -> PolicyChannelDelta {
        let tax = levers.tax.clamp();
        let ramp = ramp_fraction(step, tax.ramp_years);

        let cgt = 1.0
            + CGT_DEMAND_SENSITIVITY * (tax.cgt_discount - bounds::CGT_DISCOUNT.default) * ramp;
        let land_tax = 1.0 - LAND_TAX_DEMAND_SENSITIVITY * tax.land_tax_change * ramp;
        let surcharge = 1.0 - SURCHARGE_DEMAND_SENSITIVITY * tax.foreign_buyer_surcharge * ramp;

        let stamp_duty_rate_delta = tax.stamp_duty_change * ramp;

        PolicyChannelDelta {
            investor_demand_multiplier: (cgt * land_tax * surcharge).max(0.0),
            owner_demand_multiplier: (1.0 - STAMP_DUTY_DEMAND_SENSITIVITY * stamp_duty_rate_delta)
                .max(0.0),
            stamp_duty_rate_delta,
            ..PolicyChannelDelta::identity()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cgt_cut_reduces_investor_demand() {
        let mut levers = PolicyLevers::default();
        levers.tax.cgt_discount = 0.0;
        let d = TaxChannel.evaluate(0, &CityBaseline::new("A", "NSW"), &levers);
        assert!((d.investor_demand_multiplier - 0.85).abs() < 1e-12);
    }

    #[test]
    fn test_stamp_duty_change_ramps_in() {
        let mut levers = PolicyLevers::default();
        levers.tax.stamp_duty_change = 0.02;
        levers.tax.ramp_years = 4;
        let city = CityBaseline::new("A", "NSW");
        assert_eq!(TaxChannel.evaluate(0, &city, &levers).stamp_duty_rate_delta, 0.0);
        assert!((TaxChannel.evaluate(2, &city, &levers).stamp_duty_rate_delta - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_bounds_levers_are_clamped() {
        let mut levers = PolicyLevers::default();
        levers.tax.foreign_buyer_surcharge = 50.0;
        let d = TaxChannel.evaluate(0, &CityBaseline::new("A", "NSW"), &levers);
        assert!((d.investor_demand_multiplier - 0.85).abs() < 1e-12);
    }
}
