//! Investor portfolio choice
//!
//! Contract: three scalars in (expected price growth, gross rental yield,
//! mortgage rate), one bounded demand multiplier out. The year-step engine
//! divides by the multiplier at the city's baseline inputs, so an
//! unsurprised city sees exactly 1.

use serde::{Deserialize, Serialize};

pub trait PortfolioModel {
    fn demand_multiplier(&self, expected_growth: f64, rental_yield: f64, mortgage_rate: f64)
        -> f64;
}

/// Linear excess-return response, saturating at both ends
///
/// `clamp(1 + sensitivity * (g + y - lvr * r - reference_return), floor, ceiling)`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DefaultPortfolioModel {
    pub sensitivity: f64,
    pub reference_return: f64,
    /// Share of the purchase funded by debt
    pub lvr: f64,
    pub floor: f64,
    pub ceiling: f64,
}

impl Default for DefaultPortfolioModel {
    fn default() -> Self {
        Self {
            sensitivity: 4.0,
            reference_return: 0.04,
            lvr: 0.8,
            floor: 0.5,
            ceiling: 1.5,
        }
    }
}

impl PortfolioModel for DefaultPortfolioModel {
    fn demand_multiplier(&self, expected_growth: f64, rental_yield: f64, mortgage_rate: f64) -> f64 {
        let excess = expected_growth + rental_yield - self.lvr * mortgage_rate - self.reference_return;
        (1.0 + self.sensitivity * excess).clamp(self.floor, self.ceiling)
    }
}

/// Multiplier relative to the value at baseline inputs
pub fn relative_multiplier(
    model: &dyn PortfolioModel,
    current: (f64, f64, f64),
    baseline: (f64, f64, f64),
) -> f64 {
    let now = model.demand_multiplier(current.0, current.1, current.2);
    let base = model.demand_multiplier(baseline.0, baseline.1, baseline.2);
    now / base.max(1e-9)
}
