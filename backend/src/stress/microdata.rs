//! Microdata deciles
//!
//! Records are sorted by income and placed into ten equal-weight buckets by
//! the midpoint of their cumulative weight. Incomes are aged by the wage
//! index so a baseline-year sample tracks the simulated wage path.

use crate::methodology::CoreConstants;
use crate::models::{MicrodataRecord, Tenure};
use crate::stress::{
    annual_mortgage_cost, annual_rent_cost, DecileOutputs, DecileRow, DecileSource, StressInputs,
};

/// Fewer usable records than this and the synthetic proxy is used instead
pub const MIN_MICRODATA_RECORDS: usize = 20;

const DECILES: usize = 10;

#[derive(Default, Clone)]
struct Bucket {
    weight: f64,
    weighted_income: f64,
    renter_weight: f64,
    renter_stressed: f64,
    mortgagor_weight: f64,
    mortgagor_stressed: f64,
}

fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 {
        num / den
    } else {
        0.0
    }
}

/// Decile rows from survey microdata
///
/// Returns `Err(usable_records)` when the sample is too small or a decile
/// bucket ends up empty.
pub fn microdata_deciles(
    records: &[MicrodataRecord],
    inputs: &StressInputs,
    constants: &CoreConstants,
) -> Result<DecileOutputs, usize> {
    let mut usable: Vec<&MicrodataRecord> = records
        .iter()
        .filter(|r| r.effective_weight() > 0.0 && r.income.is_finite())
        .collect();

    if usable.len() < MIN_MICRODATA_RECORDS {
        return Err(usable.len());
    }

    usable.sort_by(|a, b| a.income.total_cmp(&b.income));

    let total_weight: f64 = usable.iter().map(|r| r.effective_weight()).sum();
    let rent_cost = annual_rent_cost(inputs, constants);
    let mortgage_cost = annual_mortgage_cost(inputs.price, inputs.mortgage_rate, constants);
    let wage_index = inputs.wage_index.max(0.0);

    let mut buckets = vec![Bucket::default(); DECILES];
    let mut cumulative = 0.0;

    for record in &usable {
        let weight = record.effective_weight();
        let midpoint = (cumulative + weight / 2.0) / total_weight;
        cumulative += weight;

        let index = ((midpoint * DECILES as f64).floor() as usize).min(DECILES - 1);
        let income = record.income * wage_index;
        let bucket = &mut buckets[index];
        bucket.weight += weight;
        bucket.weighted_income += weight * income;

        match record.tenure {
            Tenure::Renter => {
                bucket.renter_weight += weight;
                if rent_cost / income.max(1.0) >= constants.rent_stress_threshold {
                    bucket.renter_stressed += weight;
                }
            }
            Tenure::Mortgaged => {
                bucket.mortgagor_weight += weight;
                if mortgage_cost / income.max(1.0) >= constants.mortgage_stress_threshold {
                    bucket.mortgagor_stressed += weight;
                }
            }
            Tenure::OwnerOutright => {}
        }
    }

    if buckets.iter().any(|b| b.weight <= 0.0) {
        return Err(usable.len());
    }

    let rows = buckets
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let income = b.weighted_income / b.weight;
            DecileRow {
                decile: (i + 1) as u8,
                income,
                rent_to_income: rent_cost / income.max(1.0),
                mortgage_to_income: mortgage_cost / income.max(1.0),
                renter_stress_share: ratio(b.renter_stressed, b.renter_weight),
                mortgage_stress_share: ratio(b.mortgagor_stressed, b.mortgagor_weight),
            }
        })
        .collect();

    let renters: f64 = buckets.iter().map(|b| b.renter_weight).sum();
    let renters_stressed: f64 = buckets.iter().map(|b| b.renter_stressed).sum();
    let mortgagors: f64 = buckets.iter().map(|b| b.mortgagor_weight).sum();
    let mortgagors_stressed: f64 = buckets.iter().map(|b| b.mortgagor_stressed).sum();

    Ok(DecileOutputs {
        rows,
        renter_stress_share: ratio(renters_stressed, renters),
        mortgage_stress_share: ratio(mortgagors_stressed, mortgagors),
        source: DecileSource::Microdata,
    })
}
