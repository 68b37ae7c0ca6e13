//! Health check handlers for liveness and readiness probes.
//!
//! `/health/live` answers without touching the store. `/health/ready` runs a
//! trivial query against the pool and reports 503 when it fails.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Health status response for liveness and readiness probes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Status indicator: "ok" or "not_ready: <reason>".
    pub status: String,

    /// Service name for identification.
    pub service: String,

    /// Service version from build-time.
    pub version: String,

    /// RFC 3339 time the check ran.
    pub checked_at: String,

    /// Store reachability (readiness only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl HealthStatus {
    /// Create a healthy liveness status.
    pub fn alive(service: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            checked_at: now(),
            database: None,
        }
    }

    /// Create a ready status after a successful store check.
    pub fn ready(service: &str, version: &str) -> Self {
        Self {
            database: Some("reachable".to_string()),
            ..Self::alive(service, version)
        }
    }

    /// Create a not-ready status.
    pub fn not_ready(service: &str, version: &str, reason: &str) -> Self {
        Self {
            status: format!("not_ready: {}", reason),
            database: Some("unreachable".to_string()),
            ..Self::alive(service, version)
        }
    }
}

/// Liveness probe handler.
///
/// ```text
/// GET /health/live
/// {"status":"ok","service":"skylane-service","version":"0.1.0","checked_at":"2026-01-10T10:00:00Z"}
/// ```
pub async fn health_live(State(state): State<AppState>) -> impl IntoResponse {
    let identity = state.identity();
    let status = HealthStatus::alive(&identity.name, &identity.version);
    (StatusCode::OK, Json(status))
}

/// Readiness probe handler.
///
/// Returns 200 when the pool hands out a connection that answers `SELECT 1`.
pub async fn health_ready(State(state): State<AppState>) -> Response {
    let identity = state.identity().clone();
    let (service, version) = (identity.name.as_str(), identity.version.as_str());

    match state.run(|db| db.ping()).await {
        Ok(()) => (StatusCode::OK, Json(HealthStatus::ready(service, version))).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            let status = HealthStatus::not_ready(service, version, "database unreachable");
            (StatusCode::SERVICE_UNAVAILABLE, Json(status)).into_response()
        }
    }
}
