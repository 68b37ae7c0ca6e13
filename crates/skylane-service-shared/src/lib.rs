//! Shared HTTP infrastructure for the Skylane REST service.
//!
//! - [`AppState`]: Pooled database handle, weather capability and plane matching mode
//! - [`health`]: Liveness/readiness handlers
//! - [`ProblemDetails`]: RFC 9457 Problem Details for consistent error responses
//! - [`ServiceResponse`]: Wrapper for successful responses with content type
//! - [`metrics`]: Prometheus metrics infrastructure
//! - [`logging`]: Structured JSON logging setup
//! - [`middleware`]: Request correlation and metrics middleware
//! - Query-string types for each GET/DELETE endpoint
//!
//! # Architecture
//!
//! Handlers stay thin; every rule about codes, plane lists and distances
//! lives in `skylane-lib`:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  axum Handler                                               │
//! │  - Extract query / JSON body                                │
//! │  - Run skylane-lib call on the blocking pool                │
//! │  - Map library errors to Problem Details                    │
//! │  - Wrap the payload in ServiceResponse                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Testing Support
//!
//! The [`test_utils`] module provides a seeded state and a stub forecaster.
//! Enable the `test-utils` feature to access it from dependent crates.

#![deny(warnings)]

pub mod config;
mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
mod problem;
mod request;
mod response;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::ServiceConfig;
pub use health::{health_live, health_ready, HealthStatus};
pub use logging::{init_logging, log_startup, LogFormat, LoggingConfig};
pub use metrics::{
    init_metrics, metrics_handler, record_lookup, record_lookup_failed, record_route_distance,
    record_weather_request, MetricsConfig, MetricsError,
};
pub use middleware::{extract_or_generate_request_id, MetricsLayer, RequestId};
pub use problem::{
    from_lib_error, ProblemDetails, PROBLEM_CONFLICT, PROBLEM_DATA_INTEGRITY,
    PROBLEM_INTERNAL_ERROR, PROBLEM_INVALID_REQUEST, PROBLEM_NOT_FOUND,
    PROBLEM_UPSTREAM_ERROR,
};
pub use request::{
    AirlineQuery, ArrivalQuery, CodeQuery, CountryQuery, DepartureQuery, DistanceQuery,
    IataQuery, NearestQuery, RouteDistanceQuery, RouteSearchQuery,
};
pub use response::ServiceResponse;
pub use state::{AppState, AppStateError, ServiceIdentity};
