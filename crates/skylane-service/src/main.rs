//! Skylane flight data REST service.
//!
//! # Configuration
//!
//! - `SKYLANE_DB_PATH` - SQLite database file (default: /data/skylane.db)
//! - `SKYLANE_POOL_SIZE` - Maximum pooled connections (default: 8)
//! - `SKYLANE_INIT_SCHEMA` - Create tables at startup (default: true)
//! - `SKYLANE_PLANE_MATCH` - `exact` (default) or `substring` aircraft matching
//! - `SKYLANE_WEATHER_URL` / `SKYLANE_WEATHER_TIMEOUT_SECS` - Forecast provider
//! - `SERVICE_PORT` - HTTP port (default: 8001)
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text
//! - `METRICS_ENABLED` / `METRICS_PATH` - Prometheus exporter

use std::net::SocketAddr;

use anyhow::Context;
use tracing::{error, info};

use skylane_service_shared::{
    init_logging, init_metrics, log_startup, AppState, LoggingConfig, MetricsConfig,
    ServiceConfig, ServiceIdentity,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging(&LoggingConfig::from_env());
    let identity = ServiceIdentity::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let metrics_config = MetricsConfig::from_env();
    if let Err(e) = init_metrics(&metrics_config) {
        tracing::warn!(error = %e, "failed to initialize metrics, continuing without metrics");
    }

    let config = ServiceConfig::from_env();
    log_startup(&identity, &config);

    let state = AppState::open(&config)
        .map_err(|e| {
            error!(error = %e, "failed to open application state");
            e
        })?
        .with_identity(identity);

    let app = skylane_service::router(state, &metrics_config.path);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %addr, "listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("server error")?;

    Ok(())
}
