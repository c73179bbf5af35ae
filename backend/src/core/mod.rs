//! Core timekeeping for the year-stepped simulation

pub mod horizon;

pub use horizon::{ramp_fraction, Horizon};
