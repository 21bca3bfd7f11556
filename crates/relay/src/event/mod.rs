//! Event — backend-agnostic event model, mapping, and the Sentry sink.

pub mod map;
pub mod model;
pub mod sentry;
pub mod sink;

pub use map::to_event;
pub use model::{Event, Severity};
pub use sentry::SentryClient;
pub use sink::{EventId, EventSink, SinkError};
