//! Server configuration module
//! Handles dynamic configuration parameters for the chat server

use crate::constants::{
    DEFAULT_HOST, DEFAULT_OUTBOX_CAPACITY, DEFAULT_PORT, DEFAULT_STATS_INTERVAL_SECS,
};
use crate::error::{Result, StrangerSocksError};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration parameters
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Number of outbound frames buffered per participant before dropping
    pub outbox_capacity: usize,
    /// How often the binary logs population counts (None disables it)
    pub stats_interval: Option<Duration>,
    /// Directory holding the browser client, if it should be served
    pub static_dir: Option<PathBuf>,
    /// Read operator commands from stdin
    pub enable_console: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            outbox_capacity: DEFAULT_OUTBOX_CAPACITY,
            stats_interval: Some(Duration::from_secs(DEFAULT_STATS_INTERVAL_SECS)),
            static_dir: None,
            enable_console: true,
        }
    }
}

impl ServerConfig {
    /// Create a test configuration bound to loopback without console or reporting
    pub fn for_testing() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            outbox_capacity: 16,
            stats_interval: None,
            static_dir: None,
            enable_console: false,
        }
    }

    fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
        match env::var(name) {
            Ok(raw) => raw.trim().parse().map_err(|_| {
                StrangerSocksError::ConfigError(format!("{} has an invalid value: '{}'", name, raw))
            }),
            Err(_) => Ok(default),
        }
    }

    fn parse_flag(name: &str, default: bool) -> bool {
        env::var(name)
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(default)
    }

    /// Load configuration from environment variables if available
    pub fn from_env() -> Result<Self> {
        let host = env::var("STRANGER_SOCKS_HOST").unwrap_or(DEFAULT_HOST.to_string());
        let port = Self::parse_var("STRANGER_SOCKS_PORT", DEFAULT_PORT)?;

        let outbox_capacity =
            Self::parse_var("STRANGER_SOCKS_OUTBOX_CAPACITY", DEFAULT_OUTBOX_CAPACITY)?;
        if outbox_capacity == 0 {
            return Err(StrangerSocksError::ConfigError(
                "STRANGER_SOCKS_OUTBOX_CAPACITY must be greater than zero".to_string(),
            ));
        }

        let stats_secs =
            Self::parse_var("STRANGER_SOCKS_STATS_INTERVAL", DEFAULT_STATS_INTERVAL_SECS)?;
        let stats_interval = (stats_secs > 0).then(|| Duration::from_secs(stats_secs));

        let static_dir = env::var("STRANGER_SOCKS_STATIC_DIR").ok().map(PathBuf::from);
        if let Some(ref dir) = static_dir {
            if !dir.is_dir() {
                return Err(StrangerSocksError::ConfigError(format!(
                    "Static directory does not exist: {}",
                    dir.display()
                )));
            }
        }

        let enable_console = Self::parse_flag("STRANGER_SOCKS_ENABLE_CONSOLE", true);

        Ok(Self {
            host,
            port,
            outbox_capacity,
            stats_interval,
            static_dir,
            enable_console,
        })
    }
}
