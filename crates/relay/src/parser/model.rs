//! Model — the structured LogRecord produced by the parser.

use chrono::NaiveDateTime;
use serde::Serialize;

/// One logical log event reconstructed from the stream, possibly spanning
/// multiple physical lines (header line + trailing stack-trace lines).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRecord {
    /// Timestamp from the header line, source-local wall clock (treated as UTC).
    pub timestamp: NaiveDateTime,

    /// Severity string exactly as it appeared in the header (e.g. "error").
    pub level: String,

    /// Free-form message, everything after the bracketed fields.
    pub message: String,

    /// Context fields captured from the header brackets, in header order.
    pub context: Vec<(String, String)>,

    /// Raw stack-trace lines following the header, in source order.
    /// Empty for header-only records, which are still valid and emitted.
    pub stack: Vec<String>,
}

impl LogRecord {
    /// Look up a context field by key.
    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
