//! Service configuration read from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `SKYLANE_DB_PATH` | `/data/skylane.db` |
//! | `SKYLANE_POOL_SIZE` | `8` |
//! | `SKYLANE_INIT_SCHEMA` | `true` |
//! | `SKYLANE_PLANE_MATCH` | `exact` |
//! | `SKYLANE_WEATHER_URL` | `https://api.open-meteo.com` |
//! | `SKYLANE_WEATHER_TIMEOUT_SECS` | `10` |
//! | `SERVICE_PORT` | `8001` |

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;
use tracing::warn;

use skylane_lib::db::DEFAULT_MAX_CONNECTIONS;
use skylane_lib::weather::{DEFAULT_WEATHER_TIMEOUT, DEFAULT_WEATHER_URL};
use skylane_lib::{DatabaseConfig, PlaneMatch};

/// Default SQLite database location inside the container.
pub const DEFAULT_DB_PATH: &str = "/data/skylane.db";

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8001;

/// Runtime configuration of the REST service.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceConfig {
    pub db_path: PathBuf,
    pub pool_size: u32,
    pub init_schema: bool,
    pub plane_match: PlaneMatch,
    pub weather_url: String,
    pub weather_timeout: Duration,
    pub port: u16,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            pool_size: DEFAULT_MAX_CONNECTIONS,
            init_schema: true,
            plane_match: PlaneMatch::default(),
            weather_url: DEFAULT_WEATHER_URL.to_string(),
            weather_timeout: DEFAULT_WEATHER_TIMEOUT,
            port: DEFAULT_PORT,
        }
    }
}

impl ServiceConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    ///
    /// Unparseable values fall back to the default with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let timeout_secs = parse_or(
            &lookup,
            "SKYLANE_WEATHER_TIMEOUT_SECS",
            defaults.weather_timeout.as_secs(),
        );

        Self {
            db_path: lookup("SKYLANE_DB_PATH")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            pool_size: parse_or(&lookup, "SKYLANE_POOL_SIZE", defaults.pool_size).max(1),
            init_schema: lookup("SKYLANE_INIT_SCHEMA")
                .map(|v| !matches!(v.trim().to_lowercase().as_str(), "false" | "0" | "no"))
                .unwrap_or(defaults.init_schema),
            plane_match: parse_or(&lookup, "SKYLANE_PLANE_MATCH", defaults.plane_match),
            weather_url: lookup("SKYLANE_WEATHER_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.weather_url),
            weather_timeout: Duration::from_secs(timeout_secs.max(1)),
            port: parse_or(&lookup, "SERVICE_PORT", defaults.port),
        }
    }

    /// Pool settings derived from this configuration.
    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig::default()
            .with_max_connections(self.pool_size)
            .must_exist(!self.init_schema)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key = key, value = %raw, "invalid configuration value, using default");
            default
        }),
    }
}
