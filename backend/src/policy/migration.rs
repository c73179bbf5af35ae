//! Migration channel

use crate::models::CityBaseline;
use crate::policy::{PolicyChannel, PolicyChannelDelta, PolicyLevers};

const STUDENT_SHARE_OF_MIGRATION: f64 = 0.3;
/// Migrants redirected per resident at full regional incentive
const REGIONAL_REDIRECT_RATE: f64 = 0.001;
/// Cities at or above this population lose migrants to regional incentives
const CAPITAL_CITY_POPULATION: f64 = 1_000_000.0;

pub struct MigrationChannel;

impl PolicyChannel for MigrationChannel {
    fn name(&self) -> &'static str {
        "migration"
    }

    fn evaluate(&self, _step: usize, city: &CityBaseline, levers: &PolicyLevers) -> PolicyChannelDelta {
        let migration = levers.migration.clamp();

        let redirect = migration.regional_visa_incentive * REGIONAL_REDIRECT_RATE * city.population;
        let net_migration_delta = if city.population >= CAPITAL_CITY_POPULATION {
            -redirect
        } else {
            redirect
        };

        PolicyChannelDelta {
            migration_multiplier: migration.overseas_migration_multiplier
                * (1.0 - STUDENT_SHARE_OF_MIGRATION * migration.student_cap),
            net_migration_delta,
            ..PolicyChannelDelta::identity()
        }
    }
}
