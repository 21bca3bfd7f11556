//! Boot — logging init, config load, client construction, state creation.

use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::conf::RelayConfig;
use crate::event::SentryClient;
use crate::fetch::{LogFetcher, OffsetStore};
use crate::state::{RelayState, SharedState};

/// Initialise the tracing / logging subsystem.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "relay=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Load config, open the offset store, and build the fetch and sink
/// clients. Everything that fails here is fatal: a relay that cannot
/// reach its config, its resume point, or its backend has nothing to do.
pub async fn boot() -> Result<SharedState, Box<dyn std::error::Error>> {
    info!("Starting Logrelay v{}", env!("CARGO_PKG_VERSION"));

    let config = RelayConfig::load()?;
    config.validate()?;
    info!(
        "Loaded configuration: source={}, poll_interval={}s",
        config.source.url, config.source.poll_interval_secs
    );

    let offsets = OffsetStore::open(&config.source.offset_file).map_err(|e| {
        error!("Failed to open offset store: {}", e);
        e
    })?;
    let resume = offsets.load();
    info!(
        "Offset store ready: file={:?}, position={}",
        resume.last_file, resume.last_position
    );

    let fetcher = LogFetcher::new(&config.source).map_err(|e| {
        error!("Failed to build fetch client: {}", e);
        e
    })?;

    let sink = SentryClient::new(&config.sentry.dsn, &config.sentry.environment).map_err(|e| {
        error!("Failed to build backend client: {}", e);
        e
    })?;

    Ok(Arc::new(RelayState {
        config,
        offsets,
        fetcher,
        sink: Arc::new(sink),
    }))
}
