//! State — shared application state threaded through the run loop.

use std::sync::Arc;

use crate::conf::RelayConfig;
use crate::event::EventSink;
use crate::fetch::{LogFetcher, OffsetStore};

pub struct RelayState {
    pub config: RelayConfig,
    pub offsets: OffsetStore,
    pub fetcher: LogFetcher,
    pub sink: Arc<dyn EventSink>,
}

pub type SharedState = Arc<RelayState>;
