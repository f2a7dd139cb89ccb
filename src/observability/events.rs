//! Observable events
//!
//! Events are explicit and typed. The analyzer itself emits nothing; the
//! request-handling layer logs around it.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Configuration loaded and validated
    ConfigLoaded,
    /// A search body was read
    RequestReceived,
    /// A search body was decoded into trees
    RequestDecoded,
    /// A search body could not be decoded
    RequestRejected,
    /// A complexity score was computed
    ScoreComputed,
}

impl Event {
    /// Returns the event name used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::RequestReceived => "REQUEST_RECEIVED",
            Event::RequestDecoded => "REQUEST_DECODED",
            Event::RequestRejected => "REQUEST_REJECTED",
            Event::ScoreComputed => "SCORE_COMPUTED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::RequestRejected => Severity::Warn,
            Event::RequestReceived | Event::RequestDecoded => Severity::Trace,
            Event::ConfigLoaded | Event::ScoreComputed => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
