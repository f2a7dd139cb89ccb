//! Observability
//!
//! Structured JSON logging with typed lifecycle events.
//!
//! # Usage
//!
//! ```ignore
//! use querycost::observability::{log_event_with_fields, Event, Logger, Severity};
//!
//! Logger::set_min_severity(Severity::Warn);
//! log_event_with_fields(Event::ScoreComputed, &[("score", "25")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{LogTarget, Logger, Severity};

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
