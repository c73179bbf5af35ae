//! Public / community housing channel

use crate::core::ramp_fraction;
use crate::models::CityBaseline;
use crate::policy::{PolicyChannel, PolicyChannelDelta, PolicyLevers};

pub struct PublicHousingChannel;

impl PolicyChannel for PublicHousingChannel {
    fn name(&self) -> &'static str {
        "public_housing"
    }

    fn evaluate(&self, step: usize, city: &CityBaseline, levers: &PolicyLevers) -> PolicyChannelDelta {
        let public = levers.public_housing.clamp();
        let ramp = ramp_fraction(step, public.ramp_years);
        let thousands = city.population / 1_000.0;

        let built = public.build_per_1000 * thousands * ramp;
        let acquired = public.acquisition_per_1000 * thousands * ramp;

        // Social dwellings house renters directly, easing private rental demand.
        let rental_relief = (built + acquired) / city.dwelling_stock.max(1.0);

        PolicyChannelDelta {
            additional_completions: built,
            rental_supply_shock: -rental_relief,
            ..PolicyChannelDelta::identity()
        }
    }
}
