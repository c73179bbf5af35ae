//! Decile Stress Proxy
//!
//! Maps one city-year's price, rent and wage to ten income-decile rows and
//! the headline renter / mortgage stress shares. A household is in stress
//! when its housing cost is at or above the threshold share of income.
//!
//! Two sources:
//! - **Synthetic**: fixed decile income multipliers applied to the city wage
//! - **Microdata**: survey records bucketed into equal-weight deciles (see
//!   [`microdata`]); falls back to synthetic when the sample is unusable

pub mod microdata;

pub use microdata::{microdata_deciles, MIN_MICRODATA_RECORDS};

use crate::methodology::CoreConstants;
use crate::models::MicrodataRecord;
use serde::{Deserialize, Serialize};

/// Decile income as a multiple of the median household wage
pub const SYNTHETIC_DECILE_MULTIPLIERS: [f64; 10] =
    [0.40, 0.55, 0.68, 0.80, 0.92, 1.05, 1.20, 1.40, 1.75, 2.60];

/// Where a year's decile rows came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DecileSource {
    Synthetic,
    Microdata,
}

/// One income decile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DecileRow {
    /// 1..=10
    pub decile: u8,
    /// Annual household income
    pub income: f64,
    pub rent_to_income: f64,
    pub mortgage_to_income: f64,
    /// Share of the decile's renters in rent stress
    pub renter_stress_share: f64,
    /// Share of the decile's mortgagors in repayment stress
    pub mortgage_stress_share: f64,
}

/// All ten decile rows plus the headline shares
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DecileOutputs {
    pub rows: Vec<DecileRow>,
    pub renter_stress_share: f64,
    pub mortgage_stress_share: f64,
    pub source: DecileSource,
}

/// Market values the proxy reads for one city-year
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StressInputs {
    pub price: f64,
    /// Weekly rent
    pub rent: f64,
    /// Median annual household income
    pub wage: f64,
    /// Cumulative wage index, used to age microdata incomes
    pub wage_index: f64,
    pub mortgage_rate: f64,
    /// Share of rent covered by assistance
    pub rent_assistance_share: f64,
}

/// Annual rent paid by a household after assistance
pub fn annual_rent_cost(inputs: &StressInputs, constants: &CoreConstants) -> f64 {
    let assistance = inputs.rent_assistance_share.clamp(0.0, 1.0);
    inputs.rent * constants.weeks_per_year * (1.0 - assistance)
}

/// Annual repayment on a median-price purchase at the configured LVR
///
/// Standard annuity on `price × lvr`; a zero rate degrades to straight-line
/// repayment.
///
/// # Example
///
/// ```rust
/// use housing_simulator_core_rs::methodology::CoreConstants;
/// use housing_simulator_core_rs::stress::annual_mortgage_cost;
///
/// let constants = CoreConstants::default();
/// let cost = annual_mortgage_cost(500_000.0, 0.0, &constants);
/// assert!((cost - 500_000.0 * 0.8 / 30.0).abs() < 1e-6);
/// ```
pub fn annual_mortgage_cost(price: f64, rate: f64, constants: &CoreConstants) -> f64 {
    let principal = price.max(0.0) * constants.lvr;
    let term = constants.mortgage_term_years.max(1.0);
    let rate = rate.max(0.0);
    if rate < 1e-12 {
        return principal / term;
    }
    principal * rate / (1.0 - (1.0 + rate).powf(-term))
}

fn share_of(income: f64, cost: f64) -> f64 {
    cost / income.max(1.0)
}

fn stressed(ratio: f64, threshold: f64) -> f64 {
    if ratio >= threshold {
        1.0
    } else {
        0.0
    }
}

/// Decile rows built from the fixed income multipliers
pub fn synthetic_deciles(inputs: &StressInputs, constants: &CoreConstants) -> DecileOutputs {
    let rent_cost = annual_rent_cost(inputs, constants);
    let mortgage_cost = annual_mortgage_cost(inputs.price, inputs.mortgage_rate, constants);

    let rows: Vec<DecileRow> = SYNTHETIC_DECILE_MULTIPLIERS
        .iter()
        .enumerate()
        .map(|(i, multiplier)| {
            let income = inputs.wage * multiplier;
            let rent_to_income = share_of(income, rent_cost);
            let mortgage_to_income = share_of(income, mortgage_cost);
            DecileRow {
                decile: (i + 1) as u8,
                income,
                rent_to_income,
                mortgage_to_income,
                renter_stress_share: stressed(rent_to_income, constants.rent_stress_threshold),
                mortgage_stress_share: stressed(
                    mortgage_to_income,
                    constants.mortgage_stress_threshold,
                ),
            }
        })
        .collect();

    let n = rows.len() as f64;
    let renter_stress_share = rows.iter().map(|r| r.renter_stress_share).sum::<f64>() / n;
    let mortgage_stress_share = rows.iter().map(|r| r.mortgage_stress_share).sum::<f64>() / n;

    DecileOutputs {
        rows,
        renter_stress_share,
        mortgage_stress_share,
        source: DecileSource::Synthetic,
    }
}

/// Decile rows for one city-year
///
/// Uses `microdata` when given and usable; otherwise synthetic. The second
/// element is `Some(usable_records)` when microdata was supplied but had
/// to be abandoned.
pub fn compute_deciles(
    inputs: &StressInputs,
    constants: &CoreConstants,
    microdata: Option<&[MicrodataRecord]>,
) -> (DecileOutputs, Option<usize>) {
    match microdata {
        None => (synthetic_deciles(inputs, constants), None),
        Some(records) => match microdata_deciles(records, inputs, constants) {
            Ok(outputs) => (outputs, None),
            Err(usable) => (synthetic_deciles(inputs, constants), Some(usable)),
        },
    }
}
