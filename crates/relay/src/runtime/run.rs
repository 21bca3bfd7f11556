//! Run — the periodic fetch-parse-map-send loop.
//!
//! One cycle per tick, never overlapping. Within a cycle the byte stream
//! is consumed in document order: chunks become lines, lines drive the
//! record parser, and each completed record is mapped and handed to the
//! sink before the next one is looked at.
//!
//! Offset discipline: a byte is "confirmed" only once every record it
//! belongs to has been emitted and dispatched. The confirmed position is
//! persisted at a bounded cadence and unconditionally at stream end, so a
//! persisted offset is always safe to resume from — a crash re-processes
//! at most the unconfirmed window (at-least-once, never skip-ahead).

use std::time::Duration;

use bytes::Bytes;
use futures_util::StreamExt;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::event::{to_event, EventSink};
use crate::fetch::{FetchError, FetchOutcome, OFFSET_FLUSH_THRESHOLD};
use crate::parser::{LineSplitter, LogRecord, RecordParser};
use crate::state::{RelayState, SharedState};

/// How long the sink gets to drain parked events at shutdown.
const SHUTDOWN_FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleStats {
    /// Records reconstructed from the stream.
    pub records: usize,
    /// Records accepted by the sink.
    pub delivered: usize,
    /// Records the sink refused; logged, never blocking later records.
    pub failed: usize,
    /// Bytes confirmed as consumed this cycle.
    pub bytes: u64,
}

/// Tick until shutdown, then give the sink a bounded chance to drain.
pub async fn run(state: SharedState) -> Result<(), Box<dyn std::error::Error>> {
    let mut ticker =
        tokio::time::interval(Duration::from_secs(state.config.source.poll_interval_secs));
    // A slow cycle delays the next tick instead of stacking cycles.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match process_cycle(&state).await {
                    Ok(stats) if stats.records > 0 => {
                        info!(
                            records = stats.records,
                            delivered = stats.delivered,
                            failed = stats.failed,
                            bytes = stats.bytes,
                            "cycle complete"
                        );
                    }
                    Ok(_) => {}
                    Err(e) if e.is_retryable() => {
                        warn!(error = %e, "cycle failed, will retry next tick");
                    }
                    Err(e) => {
                        error!(error = %e, "cycle failed with non-retryable error, check credentials");
                    }
                }
            }
            _ = shutdown_signal() => {
                break;
            }
        }
    }

    let drained = state.sink.flush(SHUTDOWN_FLUSH_TIMEOUT).await;
    if drained > 0 {
        info!(drained, "drained parked events before exit");
    }
    Ok(())
}

/// Resolve when the process is asked to stop: Ctrl+C, or SIGTERM as sent
/// by service managers.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, stopping"),
        _ = terminate => info!("Received SIGTERM, stopping"),
    }
}

/// One fetch-parse-map-send cycle.
pub async fn process_cycle(state: &RelayState) -> Result<CycleStats, FetchError> {
    let source = state.fetcher.url().to_string();

    let mut resume = state.offsets.load();
    if !resume.last_file.is_empty() && resume.last_file != source {
        info!(old = %resume.last_file, new = %source, "source changed, starting from zero");
        resume.last_position = 0;
    }

    let body = match state.fetcher.fetch(resume.last_position).await? {
        FetchOutcome::NoNewData => return Ok(CycleStats::default()),
        FetchOutcome::Body(body) => body,
    };

    if body.reset {
        if let Err(e) = state.offsets.reset(&source) {
            warn!(error = %e, "failed to persist offset reset");
        }
    }

    let mut stats = CycleStats::default();
    let mut splitter = LineSplitter::new();
    let mut parser = RecordParser::new();

    // Position safe to resume from: covers only fully dispatched records.
    let mut confirmed: u64 = body.resume_from;
    // Bytes belonging to the still-open record (plus trailing noise).
    let mut open_bytes: u64 = 0;
    // Explicit cadence counter, reset on every trigger.
    let mut unflushed: u64 = 0;
    // Raw bytes received, checked against the advertised length at the end.
    let mut received: u64 = 0;

    let mut stream = body.response.bytes_stream();
    loop {
        let chunk: Bytes = match stream.next().await {
            Some(Ok(chunk)) => chunk,
            None => break,
            Some(Err(e)) => {
                // Surface the transport error, but keep what was already
                // confirmed so the next cycle resumes cleanly.
                persist_offset(state, &source, confirmed);
                return Err(e.into());
            }
        };
        received += chunk.len() as u64;

        for line in splitter.push(&chunk) {
            match parser.feed(&line.text) {
                Some(record) => {
                    // The emitted record's bytes are now confirmed; the
                    // header line that closed it belongs to the new record.
                    confirmed += open_bytes;
                    unflushed += open_bytes;
                    open_bytes = line.raw_len;

                    deliver(state.sink.as_ref(), record, &mut stats).await;

                    if unflushed >= OFFSET_FLUSH_THRESHOLD {
                        persist_offset(state, &source, confirmed);
                        unflushed = 0;
                    }
                }
                None => open_bytes += line.raw_len,
            }
        }
    }

    // The advertised length is informational: the offset follows the bytes
    // actually consumed, a mismatch is only worth a log line.
    if let Some(expected) = body.content_length {
        if received != expected {
            warn!(expected, received, "body length disagreed with Content-Range");
        }
    }

    // End of stream closes the open record. The trailing unterminated
    // line (a write in progress at the source) stays unconfirmed and is
    // re-fetched next cycle.
    if let Some(record) = parser.finish() {
        deliver(state.sink.as_ref(), record, &mut stats).await;
    }
    confirmed += open_bytes;

    stats.bytes = confirmed - body.resume_from;
    persist_offset(state, &source, confirmed);
    Ok(stats)
}

async fn deliver(sink: &dyn EventSink, record: LogRecord, stats: &mut CycleStats) {
    stats.records += 1;
    let event = to_event(&record);
    match sink.capture(event).await {
        Ok(_) => stats.delivered += 1,
        Err(e) => {
            stats.failed += 1;
            warn!(error = %e, message = %record.message, "failed to deliver event");
        }
    }
}

fn persist_offset(state: &RelayState, source: &str, position: u64) {
    // Write failures degrade gracefully: in-memory progress already moved,
    // the cycle keeps going, the operator sees the log line.
    if let Err(e) = state.offsets.update(source, position) {
        warn!(error = %e, position, "failed to persist offset");
    }
}
