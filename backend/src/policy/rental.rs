//! Rental regulation channel
//!
//! Overlapping rent-regulation levers combine only through the merge rules
//! (tightest cap, widest coverage). That is an approximation: the stock
//! each lever covers is not tracked.

use crate::models::CityBaseline;
use crate::policy::{PolicyChannel, PolicyChannelDelta, PolicyLevers};

/// Rental supply withdrawn per unit of covered cap tightness
const INVESTOR_EXIT_SENSITIVITY: f64 = 0.5;

pub struct RentalRegulationChannel;

impl PolicyChannel for RentalRegulationChannel {
    fn name(&self) -> &'static str {
        "rental"
    }

    fn evaluate(&self, _step: usize, city: &CityBaseline, levers: &PolicyLevers) -> PolicyChannelDelta {
        let rental = levers.rental.clamp();

        let mut delta = PolicyChannelDelta {
            rent_growth_modifier: rental.rent_growth_modifier,
            ..PolicyChannelDelta::identity()
        };

        if rental.rent_cap_enabled {
            let tightness = (city.rent_growth - rental.rent_cap).max(0.0);
            delta.rent_growth_cap = Some(rental.rent_cap);
            delta.rent_regulation_coverage = rental.coverage;
            delta.cap_binds_on_relet = !rental.vacancy_decontrol;
            delta.rental_supply_shock = INVESTOR_EXIT_SENSITIVITY * rental.coverage * tightness;
        }

        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_cap_emits_no_cap() {
        let d = RentalRegulationChannel.evaluate(
            0,
            &CityBaseline::new("A", "NSW"),
            &PolicyLevers::default(),
        );
        assert_eq!(d.rent_growth_cap, None);
        assert_eq!(d.rent_regulation_coverage, 0.0);
    }

    #[test]
    fn test_enabled_cap_with_decontrol() {
        let mut levers = PolicyLevers::default();
        levers.rental.rent_cap_enabled = true;
        levers.rental.rent_cap = 0.02;
        levers.rental.coverage = 0.6;
        levers.rental.vacancy_decontrol = true;
        let d = RentalRegulationChannel.evaluate(0, &CityBaseline::new("A", "NSW"), &levers);
        assert_eq!(d.rent_growth_cap, Some(0.02));
        assert_eq!(d.rent_regulation_coverage, 0.6);
        assert!(!d.cap_binds_on_relet);
        assert!(d.rental_supply_shock > 0.0);
    }
}
