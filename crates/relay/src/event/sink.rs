//! Sink trait — abstract interface to the error-tracking backend.
//!
//! The run loop delivers events through this trait. `sentry.rs` provides
//! the real Sentry-backed implementation; tests use in-memory doubles.

use std::pin::Pin;
use std::time::Duration;

use thiserror::Error;

use super::model::Event;

/// Delivery identifier returned by the backend for an accepted event.
pub type EventId = String;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend rejected credentials (status {0})")]
    Auth(u16),

    #[error("unexpected backend status: {0}")]
    UnexpectedStatus(u16),

    #[error("invalid DSN: {0}")]
    InvalidDsn(String),

    #[error("malformed backend response: {0}")]
    BadResponse(String),
}

impl SinkError {
    /// Whether the failed event is worth re-attempting later.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, SinkError::Auth(_) | SinkError::InvalidDsn(_))
    }
}

/// Unified async interface over the downstream backend.
///
/// Object-safe thanks to `Pin<Box<…>>` returns for the async methods.
/// Implementations must be `Send + Sync` so they can live inside the
/// shared relay state.
pub trait EventSink: Send + Sync {
    /// Deliver one event. One failed delivery must not prevent subsequent
    /// events in the same cycle from being attempted.
    fn capture(
        &self,
        event: Event,
    ) -> Pin<Box<dyn std::future::Future<Output = Result<EventId, SinkError>> + Send + '_>>;

    /// Drain any buffered/parked events before process exit, bounded by
    /// `timeout`. Returns the number of events delivered during the drain.
    fn flush(
        &self,
        timeout: Duration,
    ) -> Pin<Box<dyn std::future::Future<Output = usize> + Send + '_>>;
}
