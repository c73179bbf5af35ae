//! Year clock for the simulation horizon
//!
//! The simulation advances in discrete annual steps. Step `0` is the first
//! projected year; calendar labels are `start_year + step`.

use serde::{Deserialize, Serialize};

/// Tracks the current step within a fixed horizon of years
///
/// # Example
/// ```
/// use housing_simulator_core_rs::Horizon;
///
/// let mut horizon = Horizon::new(2025, 3);
/// assert_eq!(horizon.current_step(), 0);
/// assert_eq!(horizon.calendar_year(), 2025);
///
/// horizon.advance();
/// assert_eq!(horizon.calendar_year(), 2026);
/// assert!(!horizon.is_complete());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Horizon {
    /// Steps taken since the start of the run
    current_step: usize,
    /// Total number of annual steps
    years: usize,
    /// Calendar year of step 0
    start_year: i32,
}

impl Horizon {
    /// Create a new horizon
    ///
    /// # Panics
    /// Panics if `years` is zero. Scenario validation rejects that case
    /// before a horizon is ever built.
    pub fn new(start_year: i32, years: usize) -> Self {
        assert!(years > 0, "years must be positive");
        Self {
            current_step: 0,
            years,
            start_year,
        }
    }

    /// Advance by one year
    pub fn advance(&mut self) {
        self.current_step += 1;
    }

    /// Current step index (0-based)
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Calendar year of the current step
    pub fn calendar_year(&self) -> i32 {
        self.year_label(self.current_step)
    }

    /// Calendar year for an arbitrary step index
    pub fn year_label(&self, step: usize) -> i32 {
        self.start_year + step as i32
    }

    /// Total number of steps in the horizon
    pub fn years(&self) -> usize {
        self.years
    }

    /// True once every step has been taken
    pub fn is_complete(&self) -> bool {
        self.current_step >= self.years
    }
}

/// Linear phase-in fraction for a policy with a ramp of `ramp_years`
///
/// A zero-year ramp applies the full effect from step 0. Otherwise the
/// effect grows linearly from 0 at step 0 and reaches 1 at `ramp_years`.
///
/// ```
/// use housing_simulator_core_rs::core::ramp_fraction;
///
/// assert_eq!(ramp_fraction(0, 0), 1.0);
/// assert_eq!(ramp_fraction(0, 4), 0.0);
/// assert_eq!(ramp_fraction(2, 4), 0.5);
/// assert_eq!(ramp_fraction(9, 4), 1.0);
/// ```
pub fn ramp_fraction(step: usize, ramp_years: u32) -> f64 {
    if ramp_years == 0 {
        return 1.0;
    }
    (step as f64 / ramp_years as f64).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "years must be positive")]
    fn test_zero_year_horizon_panics() {
        Horizon::new(2025, 0);
    }

    #[test]
    fn test_horizon_completes_after_all_steps() {
        let mut horizon = Horizon::new(2030, 2);
        horizon.advance();
        assert!(!horizon.is_complete());
        horizon.advance();
        assert!(horizon.is_complete());
        assert_eq!(horizon.year_label(1), 2031);
    }

    #[test]
    fn test_ramp_fraction_is_monotone() {
        let mut prev = 0.0;
        for step in 0..10 {
            let f = ramp_fraction(step, 5);
            assert!(f >= prev);
            assert!((0.0..=1.0).contains(&f));
            prev = f;
        }
    }
}
