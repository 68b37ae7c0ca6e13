//! Structured logging setup for the Skylane service.
//!
//! # Environment Variables
//!
//! - `LOG_FORMAT`: Output format, either `json` (default) or `text`
//! - `RUST_LOG`: Log level filter (default: `info`)
//!
//! # Example
//!
//! ```no_run
//! use skylane_service_shared::logging::{init_logging, log_startup, LoggingConfig};
//! use skylane_service_shared::{ServiceConfig, ServiceIdentity};
//!
//! init_logging(&LoggingConfig::from_env());
//! log_startup(
//!     &ServiceIdentity::new("skylane-service", "0.1.0"),
//!     &ServiceConfig::from_env(),
//! );
//! ```

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::ServiceConfig;
use crate::state::ServiceIdentity;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per event (production).
    #[default]
    Json,
    /// Multi-line human-readable output (development).
    Text,
}

impl LogFormat {
    /// `text` and `pretty` select [`LogFormat::Text`]; anything else is JSON.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "text" | "pretty" => LogFormat::Text,
            _ => LogFormat::Json,
        }
    }
}

/// Configuration for the logging system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Filter directives used when `RUST_LOG` is not set at init time,
    /// e.g. `info` or `skylane_lib=debug,info`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Json,
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            format: lookup("LOG_FORMAT")
                .map(|v| LogFormat::parse(&v))
                .unwrap_or(defaults.format),
            level: lookup("RUST_LOG")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.level),
        }
    }
}

/// Install the global tracing subscriber. Call once at process startup.
///
/// ```json
/// {"timestamp":"2026-01-10T10:00:00Z","level":"INFO","target":"skylane_service","fields":{"message":"listening"}}
/// ```
pub fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Text => {
            registry.with(fmt::layer().pretty()).init();
        }
        LogFormat::Json => {
            let json_layer = fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(false);

            registry.with(json_layer).init();
        }
    }
}

/// Emit the startup event describing what the service is about to serve.
pub fn log_startup(identity: &ServiceIdentity, config: &ServiceConfig) {
    tracing::info!(
        service = %identity.name,
        version = %identity.version,
        db_path = %config.db_path.display(),
        pool_size = config.pool_size,
        init_schema = config.init_schema,
        plane_match = %config.plane_match,
        weather_url = %config.weather_url,
        weather_timeout_secs = config.weather_timeout.as_secs(),
        port = config.port,
        "starting skylane service"
    );
}
