//! Conf — agent configuration (model, loading, validation).

pub mod load;
pub mod model;

pub use model::{LoggingConfig, RelayConfig, SentryConfig, SourceConfig};
