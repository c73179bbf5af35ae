//! Event logging for simulation auditing.
//!
//! Every silent degradation the engine performs (a binding cap, a skipped
//! reallocation, a microdata fallback) is recorded here instead of being
//! raised. The log is part of the run output, so it is deterministic and
//! serialisable.
//!
//! # Example
//!
//! ```rust
//! use housing_simulator_core_rs::models::{Event, EventLog};
//!
//! let mut log = EventLog::new();
//! log.log(Event::DivestmentCapped {
//!     step: 0,
//!     city_id: "SYD".to_string(),
//!     requested: 0.08,
//!     applied: 0.02,
//! });
//! assert_eq!(log.events_for_city("SYD").len(), 1);
//! ```

use serde::{Deserialize, Serialize};

/// Simulation event capturing a noteworthy engine decision.
///
/// Run-level events (history, calibration) use step 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Baseline growth rates were re-estimated from history
    HistorySeeded {
        step: usize,
        city_id: String,
        price_growth: Option<f64>,
        rent_growth: Option<f64>,
        wage_growth: Option<f64>,
    },

    /// Calibration produced a warning or was unavailable
    CalibrationWarning { step: usize, message: String },

    /// Microdata was supplied but could not be used
    MicrodataFallback {
        step: usize,
        city_id: String,
        usable_records: usize,
    },

    /// Regulatory cap pulled realised rent growth below the market rate
    RentCapBinding {
        step: usize,
        city_id: String,
        uncapped: f64,
        realized: f64,
    },

    /// Ownership-cap divestment hit the annual maximum
    DivestmentCapped {
        step: usize,
        city_id: String,
        requested: f64,
        applied: f64,
    },

    /// Completions were limited by construction capacity
    ConstructionCapacityBound {
        step: usize,
        city_id: String,
        requested: f64,
        applied: f64,
    },

    /// Cross-city migration reallocation ran (or was skipped)
    MigrationReallocated {
        step: usize,
        total: f64,
        skipped: bool,
    },
}

impl Event {
    /// Step at which this event occurred
    pub fn step(&self) -> usize {
        match self {
            Event::HistorySeeded { step, .. } => *step,
            Event::CalibrationWarning { step, .. } => *step,
            Event::MicrodataFallback { step, .. } => *step,
            Event::RentCapBinding { step, .. } => *step,
            Event::DivestmentCapped { step, .. } => *step,
            Event::ConstructionCapacityBound { step, .. } => *step,
            Event::MigrationReallocated { step, .. } => *step,
        }
    }

    /// Short description of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::HistorySeeded { .. } => "HistorySeeded",
            Event::CalibrationWarning { .. } => "CalibrationWarning",
            Event::MicrodataFallback { .. } => "MicrodataFallback",
            Event::RentCapBinding { .. } => "RentCapBinding",
            Event::DivestmentCapped { .. } => "DivestmentCapped",
            Event::ConstructionCapacityBound { .. } => "ConstructionCapacityBound",
            Event::MigrationReallocated { .. } => "MigrationReallocated",
        }
    }

    /// City ID if the event concerns one city
    pub fn city_id(&self) -> Option<&str> {
        match self {
            Event::HistorySeeded { city_id, .. } => Some(city_id),
            Event::MicrodataFallback { city_id, .. } => Some(city_id),
            Event::RentCapBinding { city_id, .. } => Some(city_id),
            Event::DivestmentCapped { city_id, .. } => Some(city_id),
            Event::ConstructionCapacityBound { city_id, .. } => Some(city_id),
            _ => None,
        }
    }
}

/// Event log for storing and querying simulation events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Add an event to the log
    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Number of events logged
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// All events in logging order
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Events for a specific step
    pub fn events_at_step(&self, step: usize) -> Vec<&Event> {
        self.events.iter().filter(|e| e.step() == step).collect()
    }

    /// Events of a specific type
    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Events for a specific city
    pub fn events_for_city(&self, city_id: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.city_id() == Some(city_id))
            .collect()
    }
}
