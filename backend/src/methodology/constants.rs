//! Global constants shared read-only by every component of a run

use serde::{Deserialize, Serialize};

/// Global parameter set resolved once per run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoreConstants {
    /// Persons per household used to turn population into demand
    pub persons_per_household: f64,

    /// Loan-to-value ratio for a typical new mortgage
    pub lvr: f64,

    pub mortgage_term_years: f64,

    /// Rent-to-income ratio at or above which a renter is in stress
    pub rent_stress_threshold: f64,

    /// Repayment-to-income ratio at or above which a mortgagor is in stress
    pub mortgage_stress_threshold: f64,

    /// Maximum year-over-year growth in completions (construction capacity)
    pub max_completions_growth: f64,

    /// Share of stock changing hands each year
    pub turnover_rate: f64,

    /// Effective stamp duty rate on turnover value
    pub stamp_duty_rate: f64,

    /// Hard cap on the share of stock divested in any one year
    pub max_annual_divestment_share: f64,

    /// Share of tenancies re-let each year
    pub tenancy_turnover: f64,

    pub weeks_per_year: f64,

    /// Investor/owner demand response to mortgage rate deviation (advanced mode)
    pub rate_demand_sensitivity: f64,
}

impl Default for CoreConstants {
    fn default() -> Self {
        Self {
            persons_per_household: 2.5,
            lvr: 0.8,
            mortgage_term_years: 30.0,
            rent_stress_threshold: 0.30,
            mortgage_stress_threshold: 0.30,
            max_completions_growth: 0.15,
            turnover_rate: 0.05,
            stamp_duty_rate: 0.04,
            max_annual_divestment_share: 0.02,
            tenancy_turnover: 0.30,
            weeks_per_year: 52.0,
            rate_demand_sensitivity: 4.0,
        }
    }
}

/// Partial constants as supplied by scenario configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConstantOverrides {
    pub persons_per_household: Option<f64>,
    pub lvr: Option<f64>,
    pub mortgage_term_years: Option<f64>,
    pub rent_stress_threshold: Option<f64>,
    pub mortgage_stress_threshold: Option<f64>,
    pub max_completions_growth: Option<f64>,
    pub turnover_rate: Option<f64>,
    pub stamp_duty_rate: Option<f64>,
    pub max_annual_divestment_share: Option<f64>,
    pub tenancy_turnover: Option<f64>,
    pub rate_demand_sensitivity: Option<f64>,
}

impl ConstantOverrides {
    /// Apply overrides on top of the defaults
    pub fn apply(&self, base: CoreConstants) -> CoreConstants {
        CoreConstants {
            persons_per_household: self
                .persons_per_household
                .unwrap_or(base.persons_per_household),
            lvr: self.lvr.unwrap_or(base.lvr),
            mortgage_term_years: self.mortgage_term_years.unwrap_or(base.mortgage_term_years),
            rent_stress_threshold: self
                .rent_stress_threshold
                .unwrap_or(base.rent_stress_threshold),
            mortgage_stress_threshold: self
                .mortgage_stress_threshold
                .unwrap_or(base.mortgage_stress_threshold),
            max_completions_growth: self
                .max_completions_growth
                .unwrap_or(base.max_completions_growth),
            turnover_rate: self.turnover_rate.unwrap_or(base.turnover_rate),
            stamp_duty_rate: self.stamp_duty_rate.unwrap_or(base.stamp_duty_rate),
            max_annual_divestment_share: self
                .max_annual_divestment_share
                .unwrap_or(base.max_annual_divestment_share),
            tenancy_turnover: self.tenancy_turnover.unwrap_or(base.tenancy_turnover),
            weeks_per_year: base.weeks_per_year,
            rate_demand_sensitivity: self
                .rate_demand_sensitivity
                .unwrap_or(base.rate_demand_sensitivity),
        }
    }
}
