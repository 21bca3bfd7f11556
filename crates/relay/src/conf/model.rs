//! Model — RelayConfig and related structs.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub source: SourceConfig,
    pub sentry: SentryConfig,
    pub logging: LoggingConfig,
}

/// The remote log being tailed and how often to poll it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub url: String,
    pub username: String,
    pub password: String,
    pub poll_interval_secs: u64,
    /// Path of the JSON offset file used to resume across restarts.
    pub offset_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SentryConfig {
    pub dsn: String,
    pub environment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub filter: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            sentry: SentryConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: "".to_string(),
            username: "".to_string(),
            password: "".to_string(),
            poll_interval_secs: 60,
            offset_file: "/var/lib/logrelay/offset.json".to_string(),
        }
    }
}

impl Default for SentryConfig {
    fn default() -> Self {
        Self {
            dsn: "".to_string(),
            environment: "production".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "relay=info".to_string(),
        }
    }
}

impl RelayConfig {
    /// Validate that all required values are present and sane.
    pub fn validate(&self) -> Result<(), String> {
        if self.source.url.is_empty() {
            return Err("source.url must not be empty".to_string());
        }
        if self.source.poll_interval_secs == 0 {
            return Err("source.poll_interval_secs must be > 0".to_string());
        }
        if self.source.offset_file.is_empty() {
            return Err("source.offset_file must not be empty".to_string());
        }
        if self.sentry.dsn.is_empty() {
            return Err("sentry.dsn must not be empty".to_string());
        }
        Ok(())
    }
}
