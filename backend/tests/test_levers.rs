//! Lever clamping properties
//!
//! Clamping must be idempotent, keep values inside their declared bounds
//! and never surface a non-finite lever to the channels.

use housing_simulator_core_rs::policy::levers::{bounds, MAX_RAMP_YEARS};
use housing_simulator_core_rs::policy::{upgrade_legacy_levers, LegacyLevers, NegativeGearingMode};
use housing_simulator_core_rs::PolicyLevers;
use proptest::prelude::*;

fn any_lever_value() -> impl Strategy<Value = f64> {
    prop_oneof![
        -1.0e6..1.0e6f64,
        Just(f64::NAN),
        Just(f64::INFINITY),
        Just(f64::NEG_INFINITY),
    ]
}

fn arbitrary_levers() -> impl Strategy<Value = PolicyLevers> {
    (
        prop::collection::vec(any_lever_value(), 16),
        prop::collection::vec(0u32..100, 4),
        any::<bool>(),
    )
        .prop_map(|(v, ramps, flag)| {
            let mut levers = PolicyLevers::default();
            levers.tax.negative_gearing.mode = if flag {
                NegativeGearingMode::Remove
            } else {
                NegativeGearingMode::Expand
            };
            levers.tax.negative_gearing.intensity = v[0];
            levers.tax.negative_gearing.ramp_years = ramps[0];
            levers.tax.ownership_cap.enabled = flag;
            levers.tax.ownership_cap.cap_share = v[1];
            levers.tax.cgt_discount = v[2];
            levers.tax.stamp_duty_change = v[3];
            levers.credit.serviceability_buffer = v[4];
            levers.credit.max_lvr = v[5];
            levers.credit.dti_cap = v[6];
            levers.credit.mortgage_rate_premium = v[7];
            levers.credit.ramp_years = ramps[1];
            levers.subsidies.first_home_grant = v[8];
            levers.subsidies.rent_assistance_share = v[9];
            levers.rental.rent_cap_enabled = flag;
            levers.rental.rent_cap = v[10];
            levers.rental.coverage = v[11];
            levers.planning.upzoning_intensity = v[12];
            levers.planning.ramp_years = ramps[2];
            levers.public_housing.build_per_1000 = v[13];
            levers.public_housing.ramp_years = ramps[3];
            levers.migration.overseas_migration_multiplier = v[14];
            levers.migration.student_cap = v[15];
            levers
        })
}

proptest! {
    #[test]
    fn clamp_is_idempotent(levers in arbitrary_levers()) {
        let once = levers.clamp();
        prop_assert_eq!(once.clamp(), once.clone());
        prop_assert!(once.is_within_bounds());
    }

    #[test]
    fn clamped_values_are_finite_and_in_range(levers in arbitrary_levers()) {
        let c = levers.clamp();
        prop_assert!(bounds::NEGATIVE_GEARING_INTENSITY.contains(c.tax.negative_gearing.intensity));
        prop_assert!(bounds::OWNERSHIP_CAP_SHARE.contains(c.tax.ownership_cap.cap_share));
        prop_assert!(bounds::CGT_DISCOUNT.contains(c.tax.cgt_discount));
        prop_assert!(bounds::STAMP_DUTY_CHANGE.contains(c.tax.stamp_duty_change));
        prop_assert!(bounds::SERVICEABILITY_BUFFER.contains(c.credit.serviceability_buffer));
        prop_assert!(bounds::MAX_LVR.contains(c.credit.max_lvr));
        prop_assert!(bounds::DTI_CAP.contains(c.credit.dti_cap));
        prop_assert!(bounds::MORTGAGE_RATE_PREMIUM.contains(c.credit.mortgage_rate_premium));
        prop_assert!(bounds::FIRST_HOME_GRANT.contains(c.subsidies.first_home_grant));
        prop_assert!(bounds::RENT_ASSISTANCE_SHARE.contains(c.subsidies.rent_assistance_share));
        prop_assert!(bounds::RENT_CAP.contains(c.rental.rent_cap));
        prop_assert!(bounds::RENT_CAP_COVERAGE.contains(c.rental.coverage));
        prop_assert!(bounds::UPZONING_INTENSITY.contains(c.planning.upzoning_intensity));
        prop_assert!(bounds::PUBLIC_BUILD_PER_1000.contains(c.public_housing.build_per_1000));
        prop_assert!(bounds::OVERSEAS_MIGRATION_MULTIPLIER
            .contains(c.migration.overseas_migration_multiplier));
        prop_assert!(bounds::STUDENT_CAP.contains(c.migration.student_cap));
        prop_assert!(c.tax.negative_gearing.ramp_years <= MAX_RAMP_YEARS);
        prop_assert!(c.credit.ramp_years <= MAX_RAMP_YEARS);
        prop_assert!(c.planning.ramp_years <= MAX_RAMP_YEARS);
        prop_assert!(c.public_housing.ramp_years <= MAX_RAMP_YEARS);
    }

    #[test]
    fn in_range_values_survive_clamping(cap in 0.0..=0.2f64, coverage in 0.0..=1.0f64) {
        let mut levers = PolicyLevers::default();
        levers.rental.rent_cap = cap;
        levers.rental.coverage = coverage;
        let c = levers.clamp();
        prop_assert_eq!(c.rental.rent_cap, cap);
        prop_assert_eq!(c.rental.coverage, coverage);
    }
}

#[test]
fn test_nan_lever_falls_back_to_default() {
    let mut levers = PolicyLevers::default();
    levers.tax.cgt_discount = f64::NAN;
    assert_eq!(levers.clamp().tax.cgt_discount, bounds::CGT_DISCOUNT.default);
}

#[test]
fn test_legacy_upgrade_then_clamp() {
    let legacy = LegacyLevers {
        negative_gearing_removed: true,
        rent_cap: Some(0.5),
        investor_cap: Some(0.01),
        ..LegacyLevers::default()
    };
    let levers = upgrade_legacy_levers(&legacy).clamp();
    assert_eq!(levers.tax.negative_gearing.mode, NegativeGearingMode::Remove);
    assert!(levers.tax.ownership_cap.enabled);
    assert_eq!(levers.tax.ownership_cap.cap_share, bounds::OWNERSHIP_CAP_SHARE.min);
    assert_eq!(levers.rental.rent_cap, bounds::RENT_CAP.max);
}
