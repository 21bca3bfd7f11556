//! Model — the normalized event handed to the error-tracking backend.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::parser::StackFrame;

/// Event severity understood by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

impl Severity {
    /// Map a raw level string from a log header. Unknown levels fall back
    /// to `Info` — mapping is total, never an error.
    pub fn from_level(level: &str) -> Self {
        match level {
            "error" => Severity::Error,
            "warning" => Severity::Warning,
            "debug" => Severity::Debug,
            _ => Severity::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// Normalized event, derived wholly from one `LogRecord`.
/// Created per send, never persisted, no independent identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    /// Record timestamp, interpreted as UTC.
    pub timestamp: NaiveDateTime,
    pub severity: Severity,
    pub message: String,
    /// Context fields carried over verbatim, in record order.
    pub tags: Vec<(String, String)>,
    /// Frames in source order (outermost-to-innermost as emitted).
    pub frames: Vec<StackFrame>,
}

impl Event {
    /// Exception class for the backend payload, taken from the record's
    /// `category` tag when present.
    pub fn exception_type(&self) -> Option<&str> {
        self.tags
            .iter()
            .find(|(k, _)| k == "category")
            .map(|(_, v)| v.as_str())
    }
}
