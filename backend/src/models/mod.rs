//! Domain models for the housing simulator

pub mod city;
pub mod event;
pub mod state;

// Re-exports
pub use city::{CityBaseline, HistoricalSeries, MicrodataRecord, Tenure};
pub use event::{Event, EventLog};
pub use state::{CitySummary, CityTrajectory, CityYearSnapshot, CityYearState};
