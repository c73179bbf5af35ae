//! History seeding
//!
//! When a scenario supplies historical series for a city, the city's
//! baseline growth rates are re-estimated from them before the run. The
//! original baseline is never modified; seeding produces a derived copy.

pub mod calibration;

pub use calibration::{CalibrationOutcome, Calibrator};

use crate::models::{CityBaseline, HistoricalSeries};

/// Mean annual growth implied by a year-indexed series
///
/// `exp(mean(ln(v[i+1] / v[i]) / (y[i+1] - y[i]))) - 1` over adjacent
/// pairs with positive finite values and strictly increasing years.
/// Returns `None` when no such pair exists.
///
/// # Example
///
/// ```rust
/// use housing_simulator_core_rs::history::average_log_growth;
///
/// let g = average_log_growth(&[2020, 2022], &[100.0, 121.0]).unwrap();
/// assert!((g - 0.10).abs() < 1e-12);
/// assert_eq!(average_log_growth(&[2020], &[100.0]), None);
/// ```
pub fn average_log_growth(years: &[i32], values: &[f64]) -> Option<f64> {
    let n = years.len().min(values.len());
    let rates: Vec<f64> = (1..n)
        .filter_map(|i| {
            let (y0, y1) = (years[i - 1], years[i]);
            let (v0, v1) = (values[i - 1], values[i]);
            let valid = y1 > y0 && v0 > 0.0 && v1 > 0.0 && v0.is_finite() && v1.is_finite();
            valid.then(|| (v1 / v0).ln() / f64::from(y1 - y0))
        })
        .collect();

    if rates.is_empty() {
        return None;
    }
    let mean = rates.iter().sum::<f64>() / rates.len() as f64;
    Some(mean.exp() - 1.0)
}

/// Growth rates estimated from one city's history
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SeededGrowth {
    pub price_growth: Option<f64>,
    pub rent_growth: Option<f64>,
    pub wage_growth: Option<f64>,
}

impl SeededGrowth {
    pub fn estimate(series: &HistoricalSeries) -> Self {
        Self {
            price_growth: average_log_growth(&series.years, &series.price),
            rent_growth: average_log_growth(&series.years, &series.rent),
            wage_growth: average_log_growth(&series.years, &series.wage),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.price_growth.is_none() && self.rent_growth.is_none() && self.wage_growth.is_none()
    }

    /// A copy of `city` with the estimated rates in place of the baseline ones
    pub fn apply(&self, city: &CityBaseline) -> CityBaseline {
        let mut seeded = city.clone();
        if let Some(g) = self.price_growth {
            seeded.price_growth = g;
        }
        if let Some(g) = self.rent_growth {
            seeded.rent_growth = g;
        }
        if let Some(g) = self.wage_growth {
            seeded.wage_growth = g;
        }
        seeded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uneven_year_gaps() {
        // 10% a year over one year, then over two years
        let g = average_log_growth(&[2018, 2019, 2021], &[100.0, 110.0, 133.1]).unwrap();
        assert!((g - 0.10).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_pairs_are_skipped() {
        let g = average_log_growth(&[2018, 2019, 2020, 2021], &[100.0, 0.0, 100.0, 105.0]);
        assert!((g.unwrap() - 0.05).abs() < 1e-12);
        assert_eq!(average_log_growth(&[2019, 2019], &[100.0, 110.0]), None);
    }

    #[test]
    fn test_seeding_leaves_original_untouched() {
        let city = CityBaseline::new("ADL", "SA");
        let series = HistoricalSeries {
            years: vec![2020, 2021],
            price: vec![500_000.0, 540_000.0],
            rent: Vec::new(),
            wage: Vec::new(),
        };
        let growth = SeededGrowth::estimate(&series);
        let seeded = growth.apply(&city);
        assert!((seeded.price_growth - 0.08).abs() < 1e-12);
        assert_eq!(seeded.rent_growth, city.rent_growth);
        assert_eq!(city.price_growth, CityBaseline::new("ADL", "SA").price_growth);
    }
}
