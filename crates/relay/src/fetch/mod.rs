//! Fetch — resumable retrieval of the remote log.
//!
//! - `offset.rs`: durable byte-offset store surviving restarts
//! - `client.rs`: range-aware HTTP fetcher streaming new bytes

pub mod client;
pub mod offset;

pub use client::{FetchBody, FetchError, FetchOutcome, LogFetcher};
pub use offset::{OffsetRecord, OffsetStore, OffsetStoreError};

/// Persist the offset after this many confirmed bytes. An explicit counter
/// reset on each trigger, never a modulo check on the running position.
/// At most this many bytes are re-processed after a crash.
pub const OFFSET_FLUSH_THRESHOLD: u64 = 1024 * 1024;
