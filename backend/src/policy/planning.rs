//! Planning / infrastructure channel

use crate::core::ramp_fraction;
use crate::models::CityBaseline;
use crate::policy::{PolicyChannel, PolicyChannelDelta, PolicyLevers};

const UPZONING_COMPLETIONS: f64 = 0.30;
const APPROVAL_CAPACITY_LIFT: f64 = 0.10;
/// Extra completions per unit of infrastructure, as a share of baseline completions
const INFRASTRUCTURE_COMPLETIONS: f64 = 0.10;
const INFRASTRUCTURE_CAPACITY_LIFT: f64 = 0.05;
/// Completions lost per unit of inclusionary share (viability drag)
const INCLUSIONARY_COMPLETIONS_DRAG: f64 = 0.10;
const INCLUSIONARY_RENTAL_SUPPLY: f64 = 0.02;

pub struct PlanningChannel;

impl PolicyChannel for PlanningChannel {
    fn name(&self) -> &'static str {
        "planning"
    }

    fn evaluate(&self, step: usize, city: &CityBaseline, levers: &PolicyLevers) -> PolicyChannelDelta {
        let planning = levers.planning.clamp();
        let ramp = ramp_fraction(step, planning.ramp_years);

        let upzoning = 1.0 + UPZONING_COMPLETIONS * planning.upzoning_intensity * ramp;
        let inclusionary = 1.0 - INCLUSIONARY_COMPLETIONS_DRAG * planning.inclusionary_share * ramp;

        PolicyChannelDelta {
            completions_multiplier: upzoning * inclusionary,
            additional_completions: INFRASTRUCTURE_COMPLETIONS
                * city.annual_completions.max(0.0)
                * planning.infrastructure_intensity
                * ramp,
            capacity_lift: (APPROVAL_CAPACITY_LIFT * planning.approval_speedup
                + INFRASTRUCTURE_CAPACITY_LIFT * planning.infrastructure_intensity)
                * ramp,
            rental_supply_shock: -INCLUSIONARY_RENTAL_SUPPLY * planning.inclusionary_share * ramp,
            ..PolicyChannelDelta::identity()
        }
    }
}
