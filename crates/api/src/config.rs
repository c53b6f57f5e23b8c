//! Application configuration loaded from environment variables.

use std::time::Duration;

use domain::DEFAULT_CATALOG_TIMEOUT;
use gateway::DEFAULT_EDGE_TIMEOUT;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `3000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `DATABASE_URL`: Postgres connection string; orders are kept in memory when unset
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: `5`)
/// - `CATALOG_TIMEOUT_MS`: catalog lookup budget when placing orders (default: `3000`)
/// - `EDGE_TIMEOUT_MS`: per-edge budget of the account graph (default: `3000`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub catalog_timeout: Duration,
    pub edge_timeout: Duration,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    ///
    /// Unparseable values fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let millis = |key: &str, default: Duration| {
            lookup(key)
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(default)
        };

        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            database_max_connections: lookup("DATABASE_MAX_CONNECTIONS")
                .and_then(|n| n.parse().ok())
                .unwrap_or(defaults.database_max_connections),
            catalog_timeout: millis("CATALOG_TIMEOUT_MS", defaults.catalog_timeout),
            edge_timeout: millis("EDGE_TIMEOUT_MS", defaults.edge_timeout),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            database_url: None,
            database_max_connections: DEFAULT_MAX_CONNECTIONS,
            catalog_timeout: DEFAULT_CATALOG_TIMEOUT,
            edge_timeout: DEFAULT_EDGE_TIMEOUT,
        }
    }
}
