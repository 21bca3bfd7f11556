//! Load — config loading from file and environment variables.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::model::RelayConfig;

impl RelayConfig {
    /// Load configuration from file or environment variables
    /// Priority: Environment Variables > Config File > Defaults
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = std::env::var("RELAY_CONFIG_FILE")
            .unwrap_or_else(|_| "/etc/logrelay/relay.toml".to_string());

        let mut config = if Path::new(&config_path).exists() {
            tracing::info!("Loading configuration from: {}", config_path);
            Self::from_file(&config_path)?
        } else {
            tracing::info!("Config file not found at {}, using environment variables", config_path);
            Self::from_env()
        };

        // Environment variables override file config for credentials and DSN
        if let Ok(url) = std::env::var("RELAY_SOURCE_URL") {
            config.source.url = url;
        }
        if let Ok(user) = std::env::var("RELAY_SOURCE_USERNAME") {
            config.source.username = user;
        }
        if let Ok(pass) = std::env::var("RELAY_SOURCE_PASSWORD") {
            config.source.password = pass;
        }
        if let Ok(dsn) = std::env::var("RELAY_SENTRY_DSN") {
            config.sentry.dsn = dsn;
        }

        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: RelayConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from environment variables with sensible defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.source.url = std::env::var("RELAY_SOURCE_URL").unwrap_or_default();
        config.source.username = std::env::var("RELAY_SOURCE_USERNAME").unwrap_or_default();
        config.source.password = std::env::var("RELAY_SOURCE_PASSWORD").unwrap_or_default();
        config.source.poll_interval_secs = std::env::var("RELAY_POLL_INTERVAL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(config.source.poll_interval_secs);
        if let Ok(path) = std::env::var("RELAY_OFFSET_FILE") {
            config.source.offset_file = path;
        }
        config.sentry.dsn = std::env::var("RELAY_SENTRY_DSN").unwrap_or_default();
        if let Ok(env) = std::env::var("RELAY_SENTRY_ENVIRONMENT") {
            config.sentry.environment = env;
        }
        config
    }
}
