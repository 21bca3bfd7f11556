//! Map — pure conversion of a parsed LogRecord into an Event.

use crate::parser::frame::parse_frame;
use crate::parser::LogRecord;

use super::model::{Event, Severity};

/// Convert a record into a normalized event. Pure and total: no I/O, no
/// failure path. Unmappable severities fall back to `info`; unparseable
/// stack lines simply contribute no frame.
pub fn to_event(record: &LogRecord) -> Event {
    let frames = record.stack.iter().filter_map(|line| parse_frame(line)).collect();

    Event {
        timestamp: record.timestamp,
        severity: Severity::from_level(&record.level),
        message: record.message.clone(),
        tags: record.context.clone(),
        frames,
    }
}
