//! Rate-path model
//!
//! A smoothed Taylor-style rule:
//!
//! ```text
//! target = neutral_real_rate + inflation
//!        + inflation_response * (inflation - target_inflation)
//!        + output_gap_response * output_gap + spread
//! rate'  = max(0, rate + smoothing * (target - rate))
//! ```
//!
//! Inflation is the CPI trend plus a pass-through of rent growth above its
//! baseline; the output gap is a wealth effect on price growth above its
//! baseline.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RatePathConfig {
    pub neutral_real_rate: f64,
    pub target_inflation: f64,
    pub inflation_response: f64,
    pub output_gap_response: f64,
    /// Lender margin over the policy rate
    pub spread: f64,
    /// Share of the gap to target closed each year, in `[0, 1]`
    pub smoothing: f64,
    pub rent_pass_through: f64,
    pub wealth_effect: f64,
}

impl Default for RatePathConfig {
    fn default() -> Self {
        Self {
            neutral_real_rate: 0.01,
            target_inflation: 0.025,
            inflation_response: 0.5,
            output_gap_response: 0.5,
            spread: 0.025,
            smoothing: 0.3,
            rent_pass_through: 0.2,
            wealth_effect: 0.1,
        }
    }
}

/// Market growth observed in the previous year
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RateObservation {
    pub price_growth: f64,
    pub baseline_price_growth: f64,
    pub rent_growth: f64,
    pub baseline_rent_growth: f64,
}

impl RateObservation {
    /// Weighted mean of several observations; weights need not sum to 1
    pub fn weighted(observations: &[(RateObservation, f64)]) -> RateObservation {
        let total: f64 = observations.iter().map(|(_, w)| w.max(0.0)).sum();
        if total <= 0.0 {
            return RateObservation::default();
        }
        observations
            .iter()
            .fold(RateObservation::default(), |acc, (obs, w)| {
                let share = w.max(0.0) / total;
                RateObservation {
                    price_growth: acc.price_growth + share * obs.price_growth,
                    baseline_price_growth: acc.baseline_price_growth
                        + share * obs.baseline_price_growth,
                    rent_growth: acc.rent_growth + share * obs.rent_growth,
                    baseline_rent_growth: acc.baseline_rent_growth
                        + share * obs.baseline_rent_growth,
                }
            })
    }
}

impl RatePathConfig {
    pub fn inflation(&self, cpi_trend: f64, obs: &RateObservation) -> f64 {
        cpi_trend + self.rent_pass_through * (obs.rent_growth - obs.baseline_rent_growth)
    }

    pub fn output_gap(&self, obs: &RateObservation) -> f64 {
        self.wealth_effect * (obs.price_growth - obs.baseline_price_growth)
    }

    pub fn target_rate(&self, cpi_trend: f64, obs: &RateObservation) -> f64 {
        let inflation = self.inflation(cpi_trend, obs);
        self.neutral_real_rate
            + inflation
            + self.inflation_response * (inflation - self.target_inflation)
            + self.output_gap_response * self.output_gap(obs)
            + self.spread
    }

    /// Next year's mortgage rate, floored at zero
    pub fn next_rate(&self, current: f64, cpi_trend: f64, obs: &RateObservation) -> f64 {
        let smoothing = self.smoothing.clamp(0.0, 1.0);
        let target = self.target_rate(cpi_trend, obs);
        (current + smoothing * (target - current)).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_moves_toward_target() {
        let config = RatePathConfig::default();
        let obs = RateObservation::default();
        let target = config.target_rate(0.025, &obs);
        let next = config.next_rate(0.08, 0.025, &obs);
        assert!(next < 0.08 && next > target);
    }

    #[test]
    fn test_hot_market_raises_target() {
        let config = RatePathConfig::default();
        let calm = RateObservation {
            price_growth: 0.04,
            baseline_price_growth: 0.04,
            ..Default::default()
        };
        let hot = RateObservation {
            price_growth: 0.15,
            ..calm
        };
        assert!(config.target_rate(0.025, &hot) > config.target_rate(0.025, &calm));
    }

    #[test]
    fn test_rate_never_negative() {
        let config = RatePathConfig {
            neutral_real_rate: -0.2,
            smoothing: 1.0,
            ..Default::default()
        };
        assert_eq!(config.next_rate(0.01, 0.0, &RateObservation::default()), 0.0);
    }

    #[test]
    fn test_weighted_observation() {
        let a = RateObservation {
            price_growth: 0.10,
            ..Default::default()
        };
        let b = RateObservation::default();
        let obs = RateObservation::weighted(&[(a, 3.0), (b, 1.0)]);
        assert!((obs.price_growth - 0.075).abs() < 1e-12);
    }
}
