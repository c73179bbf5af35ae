//! Grouped policy levers and their bounds
//!
//! Levers arrive unvalidated. Every numeric field has a fixed `[min, max]`
//! range; `clamp()` pulls values into range (non-finite values fall back to
//! the field default) and is idempotent.

use serde::{Deserialize, Serialize};

/// Fixed range and default of one numeric lever
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl Bound {
    pub const fn new(min: f64, max: f64, default: f64) -> Self {
        Self { min, max, default }
    }

    /// Clamp into range; NaN falls back to the default
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            self.default
        } else {
            value.clamp(self.min, self.max)
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Longest ramp any lever group accepts
pub const MAX_RAMP_YEARS: u32 = 10;

fn clamp_ramp(years: u32) -> u32 {
    years.min(MAX_RAMP_YEARS)
}

/// Lever bounds, one constant per numeric field
pub mod bounds {
    use super::Bound;

    pub const NEGATIVE_GEARING_INTENSITY: Bound = Bound::new(0.0, 1.0, 1.0);
    pub const OWNERSHIP_CAP_SHARE: Bound = Bound::new(0.05, 1.0, 0.25);
    pub const OWNERSHIP_CAP_ENFORCEMENT: Bound = Bound::new(0.0, 1.0, 1.0);
    pub const CGT_DISCOUNT: Bound = Bound::new(0.0, 1.0, 0.5);
    pub const LAND_TAX_CHANGE: Bound = Bound::new(-0.01, 0.02, 0.0);
    pub const FOREIGN_BUYER_SURCHARGE: Bound = Bound::new(0.0, 0.15, 0.0);
    pub const STAMP_DUTY_CHANGE: Bound = Bound::new(-0.04, 0.04, 0.0);

    pub const SERVICEABILITY_BUFFER: Bound = Bound::new(0.0, 0.05, 0.03);
    pub const MAX_LVR: Bound = Bound::new(0.6, 0.95, 0.8);
    pub const DTI_CAP: Bound = Bound::new(4.0, 10.0, 6.0);
    pub const INVESTOR_LENDING_LIMIT: Bound = Bound::new(0.0, 1.0, 0.0);
    pub const MORTGAGE_RATE_PREMIUM: Bound = Bound::new(-0.02, 0.03, 0.0);

    pub const FIRST_HOME_GRANT: Bound = Bound::new(0.0, 50_000.0, 0.0);
    pub const SHARED_EQUITY_SHARE: Bound = Bound::new(0.0, 0.4, 0.0);
    pub const RENT_ASSISTANCE_SHARE: Bound = Bound::new(0.0, 0.5, 0.0);
    pub const BUILD_TO_RENT_INCENTIVE: Bound = Bound::new(0.0, 1.0, 0.0);

    pub const RENT_CAP: Bound = Bound::new(0.0, 0.2, 0.03);
    pub const RENT_CAP_COVERAGE: Bound = Bound::new(0.0, 1.0, 1.0);
    pub const RENT_GROWTH_MODIFIER: Bound = Bound::new(-0.05, 0.05, 0.0);

    pub const UPZONING_INTENSITY: Bound = Bound::new(0.0, 1.0, 0.0);
    pub const APPROVAL_SPEEDUP: Bound = Bound::new(0.0, 1.0, 0.0);
    pub const INFRASTRUCTURE_INTENSITY: Bound = Bound::new(0.0, 1.0, 0.0);
    pub const INCLUSIONARY_SHARE: Bound = Bound::new(0.0, 0.3, 0.0);

    pub const PUBLIC_BUILD_PER_1000: Bound = Bound::new(0.0, 5.0, 0.0);
    pub const PUBLIC_ACQUISITION_PER_1000: Bound = Bound::new(0.0, 2.0, 0.0);

    pub const OVERSEAS_MIGRATION_MULTIPLIER: Bound = Bound::new(0.5, 1.5, 1.0);
    pub const STUDENT_CAP: Bound = Bound::new(0.0, 1.0, 0.0);
    pub const REGIONAL_VISA_INCENTIVE: Bound = Bound::new(0.0, 1.0, 0.0);
}

// ============================================================================
// Tax / investor
// ============================================================================

/// Direction of a change to negative gearing concessions
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NegativeGearingMode {
    #[default]
    Keep,
    Restrict,
    Remove,
    Expand,
}

impl NegativeGearingMode {
    /// Sign and size of the change: removal is -1, expansion +0.5
    pub fn direction(&self) -> f64 {
        match self {
            NegativeGearingMode::Keep => 0.0,
            NegativeGearingMode::Restrict => -0.5,
            NegativeGearingMode::Remove => -1.0,
            NegativeGearingMode::Expand => 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NegativeGearingLevers {
    pub mode: NegativeGearingMode,
    pub intensity: f64,
    pub ramp_years: u32,
}

impl Default for NegativeGearingLevers {
    fn default() -> Self {
        Self {
            mode: NegativeGearingMode::Keep,
            intensity: bounds::NEGATIVE_GEARING_INTENSITY.default,
            ramp_years: 0,
        }
    }
}

/// Cap on the investor share of dwelling stock
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OwnershipCapLevers {
    pub enabled: bool,
    /// Maximum investor share of stock
    pub cap_share: f64,
    pub enforcement: f64,
    /// Spread forced divestment over `ramp_years` instead of all at once
    pub phased_divestment: bool,
    pub ramp_years: u32,
}

impl Default for OwnershipCapLevers {
    fn default() -> Self {
        Self {
            enabled: false,
            cap_share: bounds::OWNERSHIP_CAP_SHARE.default,
            enforcement: bounds::OWNERSHIP_CAP_ENFORCEMENT.default,
            phased_divestment: true,
            ramp_years: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TaxLevers {
    pub negative_gearing: NegativeGearingLevers,
    pub ownership_cap: OwnershipCapLevers,
    pub cgt_discount: f64,
    pub land_tax_change: f64,
    pub foreign_buyer_surcharge: f64,
    /// Additive change to the effective stamp duty rate
    pub stamp_duty_change: f64,
    pub ramp_years: u32,
}

impl Default for TaxLevers {
    fn default() -> Self {
        Self {
            negative_gearing: NegativeGearingLevers::default(),
            ownership_cap: OwnershipCapLevers::default(),
            cgt_discount: bounds::CGT_DISCOUNT.default,
            land_tax_change: bounds::LAND_TAX_CHANGE.default,
            foreign_buyer_surcharge: bounds::FOREIGN_BUYER_SURCHARGE.default,
            stamp_duty_change: bounds::STAMP_DUTY_CHANGE.default,
            ramp_years: 0,
        }
    }
}

impl TaxLevers {
    pub fn clamp(&self) -> Self {
        Self {
            negative_gearing: NegativeGearingLevers {
                mode: self.negative_gearing.mode,
                intensity: bounds::NEGATIVE_GEARING_INTENSITY.clamp(self.negative_gearing.intensity),
                ramp_years: clamp_ramp(self.negative_gearing.ramp_years),
            },
            ownership_cap: OwnershipCapLevers {
                enabled: self.ownership_cap.enabled,
                cap_share: bounds::OWNERSHIP_CAP_SHARE.clamp(self.ownership_cap.cap_share),
                enforcement: bounds::OWNERSHIP_CAP_ENFORCEMENT.clamp(self.ownership_cap.enforcement),
                phased_divestment: self.ownership_cap.phased_divestment,
                ramp_years: clamp_ramp(self.ownership_cap.ramp_years),
            },
            cgt_discount: bounds::CGT_DISCOUNT.clamp(self.cgt_discount),
            land_tax_change: bounds::LAND_TAX_CHANGE.clamp(self.land_tax_change),
            foreign_buyer_surcharge: bounds::FOREIGN_BUYER_SURCHARGE
                .clamp(self.foreign_buyer_surcharge),
            stamp_duty_change: bounds::STAMP_DUTY_CHANGE.clamp(self.stamp_duty_change),
            ramp_years: clamp_ramp(self.ramp_years),
        }
    }
}

// ============================================================================
// Credit / macroprudential
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CreditLevers {
    /// Serviceability buffer above the lending rate
    pub serviceability_buffer: f64,
    pub max_lvr: f64,
    pub dti_cap_enabled: bool,
    pub dti_cap: f64,
    /// Share of investor lending growth blocked
    pub investor_lending_limit: f64,
    /// Additive change to mortgage rates
    pub mortgage_rate_premium: f64,
    pub ramp_years: u32,
}

impl Default for CreditLevers {
    fn default() -> Self {
        Self {
            serviceability_buffer: bounds::SERVICEABILITY_BUFFER.default,
            max_lvr: bounds::MAX_LVR.default,
            dti_cap_enabled: false,
            dti_cap: bounds::DTI_CAP.default,
            investor_lending_limit: bounds::INVESTOR_LENDING_LIMIT.default,
            mortgage_rate_premium: bounds::MORTGAGE_RATE_PREMIUM.default,
            ramp_years: 0,
        }
    }
}

impl CreditLevers {
    pub fn clamp(&self) -> Self {
        Self {
            serviceability_buffer: bounds::SERVICEABILITY_BUFFER.clamp(self.serviceability_buffer),
            max_lvr: bounds::MAX_LVR.clamp(self.max_lvr),
            dti_cap_enabled: self.dti_cap_enabled,
            dti_cap: bounds::DTI_CAP.clamp(self.dti_cap),
            investor_lending_limit: bounds::INVESTOR_LENDING_LIMIT
                .clamp(self.investor_lending_limit),
            mortgage_rate_premium: bounds::MORTGAGE_RATE_PREMIUM.clamp(self.mortgage_rate_premium),
            ramp_years: clamp_ramp(self.ramp_years),
        }
    }
}

// ============================================================================
// Subsidies
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SubsidyLevers {
    /// First-home buyer grant in dollars
    pub first_home_grant: f64,
    pub shared_equity_share: f64,
    /// Share of rent covered by assistance for eligible renters
    pub rent_assistance_share: f64,
    pub build_to_rent_incentive: f64,
    pub ramp_years: u32,
}

impl Default for SubsidyLevers {
    fn default() -> Self {
        Self {
            first_home_grant: bounds::FIRST_HOME_GRANT.default,
            shared_equity_share: bounds::SHARED_EQUITY_SHARE.default,
            rent_assistance_share: bounds::RENT_ASSISTANCE_SHARE.default,
            build_to_rent_incentive: bounds::BUILD_TO_RENT_INCENTIVE.default,
            ramp_years: 0,
        }
    }
}

impl SubsidyLevers {
    pub fn clamp(&self) -> Self {
        Self {
            first_home_grant: bounds::FIRST_HOME_GRANT.clamp(self.first_home_grant),
            shared_equity_share: bounds::SHARED_EQUITY_SHARE.clamp(self.shared_equity_share),
            rent_assistance_share: bounds::RENT_ASSISTANCE_SHARE.clamp(self.rent_assistance_share),
            build_to_rent_incentive: bounds::BUILD_TO_RENT_INCENTIVE
                .clamp(self.build_to_rent_incentive),
            ramp_years: clamp_ramp(self.ramp_years),
        }
    }
}

// ============================================================================
// Rental regulation
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RentalLevers {
    pub rent_cap_enabled: bool,
    /// Maximum annual rent increase on covered tenancies
    pub rent_cap: f64,
    /// Share of rental stock covered by the cap
    pub coverage: f64,
    /// Let rents reset to market between tenancies
    pub vacancy_decontrol: bool,
    /// Additive adjustment to rent growth
    pub rent_growth_modifier: f64,
}

impl Default for RentalLevers {
    fn default() -> Self {
        Self {
            rent_cap_enabled: false,
            rent_cap: bounds::RENT_CAP.default,
            coverage: bounds::RENT_CAP_COVERAGE.default,
            vacancy_decontrol: false,
            rent_growth_modifier: bounds::RENT_GROWTH_MODIFIER.default,
        }
    }
}

impl RentalLevers {
    pub fn clamp(&self) -> Self {
        Self {
            rent_cap_enabled: self.rent_cap_enabled,
            rent_cap: bounds::RENT_CAP.clamp(self.rent_cap),
            coverage: bounds::RENT_CAP_COVERAGE.clamp(self.coverage),
            vacancy_decontrol: self.vacancy_decontrol,
            rent_growth_modifier: bounds::RENT_GROWTH_MODIFIER.clamp(self.rent_growth_modifier),
        }
    }
}

// ============================================================================
// Planning / infrastructure
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlanningLevers {
    pub upzoning_intensity: f64,
    pub approval_speedup: f64,
    pub infrastructure_intensity: f64,
    /// Share of new dwellings reserved as affordable rentals
    pub inclusionary_share: f64,
    pub ramp_years: u32,
}

impl Default for PlanningLevers {
    fn default() -> Self {
        Self {
            upzoning_intensity: bounds::UPZONING_INTENSITY.default,
            approval_speedup: bounds::APPROVAL_SPEEDUP.default,
            infrastructure_intensity: bounds::INFRASTRUCTURE_INTENSITY.default,
            inclusionary_share: bounds::INCLUSIONARY_SHARE.default,
            ramp_years: 0,
        }
    }
}

impl PlanningLevers {
    pub fn clamp(&self) -> Self {
        Self {
            upzoning_intensity: bounds::UPZONING_INTENSITY.clamp(self.upzoning_intensity),
            approval_speedup: bounds::APPROVAL_SPEEDUP.clamp(self.approval_speedup),
            infrastructure_intensity: bounds::INFRASTRUCTURE_INTENSITY
                .clamp(self.infrastructure_intensity),
            inclusionary_share: bounds::INCLUSIONARY_SHARE.clamp(self.inclusionary_share),
            ramp_years: clamp_ramp(self.ramp_years),
        }
    }
}

// ============================================================================
// Public / community housing
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PublicHousingLevers {
    /// New social dwellings per 1,000 residents per year
    pub build_per_1000: f64,
    /// Existing dwellings bought into the social pool per 1,000 residents
    pub acquisition_per_1000: f64,
    pub ramp_years: u32,
}

impl Default for PublicHousingLevers {
    fn default() -> Self {
        Self {
            build_per_1000: bounds::PUBLIC_BUILD_PER_1000.default,
            acquisition_per_1000: bounds::PUBLIC_ACQUISITION_PER_1000.default,
            ramp_years: 0,
        }
    }
}

impl PublicHousingLevers {
    pub fn clamp(&self) -> Self {
        Self {
            build_per_1000: bounds::PUBLIC_BUILD_PER_1000.clamp(self.build_per_1000),
            acquisition_per_1000: bounds::PUBLIC_ACQUISITION_PER_1000
                .clamp(self.acquisition_per_1000),
            ramp_years: clamp_ramp(self.ramp_years),
        }
    }
}

// ============================================================================
// Migration
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MigrationLevers {
    pub overseas_migration_multiplier: f64,
    /// Strength of the international student cap
    pub student_cap: f64,
    /// Strength of regional visa incentives
    pub regional_visa_incentive: f64,
}

impl Default for MigrationLevers {
    fn default() -> Self {
        Self {
            overseas_migration_multiplier: bounds::OVERSEAS_MIGRATION_MULTIPLIER.default,
            student_cap: bounds::STUDENT_CAP.default,
            regional_visa_incentive: bounds::REGIONAL_VISA_INCENTIVE.default,
        }
    }
}

impl MigrationLevers {
    pub fn clamp(&self) -> Self {
        Self {
            overseas_migration_multiplier: bounds::OVERSEAS_MIGRATION_MULTIPLIER
                .clamp(self.overseas_migration_multiplier),
            student_cap: bounds::STUDENT_CAP.clamp(self.student_cap),
            regional_visa_incentive: bounds::REGIONAL_VISA_INCENTIVE
                .clamp(self.regional_visa_incentive),
        }
    }
}

// ============================================================================
// All levers
// ============================================================================

/// Canonical grouped lever set
///
/// # Example
///
/// ```rust
/// use housing_simulator_core_rs::policy::PolicyLevers;
///
/// let mut levers = PolicyLevers::default();
/// levers.rental.rent_cap = 0.9;
/// let clamped = levers.clamp();
/// assert_eq!(clamped.rental.rent_cap, 0.2);
/// assert_eq!(clamped.clamp(), clamped);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyLevers {
    pub tax: TaxLevers,
    pub credit: CreditLevers,
    pub subsidies: SubsidyLevers,
    pub rental: RentalLevers,
    pub planning: PlanningLevers,
    pub public_housing: PublicHousingLevers,
    pub migration: MigrationLevers,
}

impl PolicyLevers {
    /// Clamp every group into bounds
    pub fn clamp(&self) -> Self {
        Self {
            tax: self.tax.clamp(),
            credit: self.credit.clamp(),
            subsidies: self.subsidies.clamp(),
            rental: self.rental.clamp(),
            planning: self.planning.clamp(),
            public_housing: self.public_housing.clamp(),
            migration: self.migration.clamp(),
        }
    }

    /// True if clamping would change nothing
    pub fn is_within_bounds(&self) -> bool {
        self.clamp() == *self
    }
}
