//! Calibration contract
//!
//! Statistical fitting lives outside this crate. A calibrator receives the
//! run's historical series and the resolved methodology and returns a
//! (possibly) refitted methodology plus human-readable warnings.

use crate::methodology::Methodology;
use crate::models::HistoricalSeries;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationOutcome {
    pub methodology: Methodology,
    pub warnings: Vec<String>,
}

pub trait Calibrator {
    fn calibrate(
        &self,
        history: &BTreeMap<String, HistoricalSeries>,
        baseline: &Methodology,
    ) -> CalibrationOutcome;
}
