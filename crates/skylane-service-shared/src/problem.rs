//! RFC 9457 Problem Details for HTTP APIs.
//!
//! Provides structured error responses following the Problem Details standard.
//! See: <https://www.rfc-editor.org/rfc/rfc9457.html>

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use skylane_lib::Error as LibError;

/// Problem type URI for invalid request parameters.
pub const PROBLEM_INVALID_REQUEST: &str = "/problems/invalid-request";

/// Problem type URI for lookups that matched no rows.
pub const PROBLEM_NOT_FOUND: &str = "/problems/not-found";

/// Problem type URI for inserts rejected by a uniqueness check.
pub const PROBLEM_CONFLICT: &str = "/problems/conflict";

/// Problem type URI for stored data that cannot satisfy the request.
pub const PROBLEM_DATA_INTEGRITY: &str = "/problems/data-integrity";

/// Problem type URI for weather provider failures.
pub const PROBLEM_UPSTREAM_ERROR: &str = "/problems/upstream-error";

/// Problem type URI for internal server errors.
pub const PROBLEM_INTERNAL_ERROR: &str = "/problems/internal-error";

/// Detail returned for internal failures. Raw store text is only logged.
const INTERNAL_DETAIL: &str = "An unexpected error occurred while processing the request";

/// RFC 9457 Problem Details response structure.
///
/// # Example
///
/// ```
/// use skylane_service_shared::{ProblemDetails, PROBLEM_NOT_FOUND};
/// use axum::http::StatusCode;
///
/// let problem = ProblemDetails::new(PROBLEM_NOT_FOUND, "Not Found", StatusCode::NOT_FOUND)
///     .with_detail("No airline found with the specified ICAO or IATA code")
///     .with_request_id("req-12345");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// URI reference identifying the problem type (relative).
    #[serde(rename = "type")]
    pub type_uri: String,

    /// Short, human-readable summary of the problem.
    pub title: String,

    /// HTTP status code for this problem.
    pub status: u16,

    /// Human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// URI reference identifying the specific occurrence (the request ID).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,

    /// Content type for this response (always "application/problem+json").
    pub content_type: String,
}

impl ProblemDetails {
    /// Create a new ProblemDetails with required fields.
    pub fn new(type_uri: impl Into<String>, title: impl Into<String>, status: StatusCode) -> Self {
        Self {
            type_uri: type_uri.into(),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            instance: None,
            content_type: "application/problem+json".to_string(),
        }
    }

    /// Add a detailed explanation of this specific problem occurrence.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Add the request identifier for tracing.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.instance = Some(request_id.into());
        self
    }

    /// 400 for missing or malformed input.
    pub fn bad_request(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INVALID_REQUEST,
            "Invalid Request",
            StatusCode::BAD_REQUEST,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    /// 404 for lookups with no matching rows.
    pub fn not_found(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(PROBLEM_NOT_FOUND, "Not Found", StatusCode::NOT_FOUND)
            .with_detail(detail)
            .with_request_id(request_id)
    }

    /// 400 for a code that already exists.
    pub fn conflict(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(PROBLEM_CONFLICT, "Conflict", StatusCode::BAD_REQUEST)
            .with_detail(detail)
            .with_request_id(request_id)
    }

    /// 500 for stored rows that cannot satisfy the request.
    pub fn data_integrity(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_DATA_INTEGRITY,
            "Data Integrity Error",
            StatusCode::INTERNAL_SERVER_ERROR,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    /// 500 for weather provider failures.
    pub fn upstream_error(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_UPSTREAM_ERROR,
            "Upstream Error",
            StatusCode::INTERNAL_SERVER_ERROR,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    /// Create a 500 Internal Server Error problem.
    pub fn internal_error(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INTERNAL_ERROR,
            "Internal Error",
            StatusCode::INTERNAL_SERVER_ERROR,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }
}

impl std::fmt::Display for ProblemDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.title,
            self.detail.as_deref().unwrap_or("")
        )
    }
}

impl std::error::Error for ProblemDetails {}

/// Implement IntoResponse for axum to return ProblemDetails as HTTP responses.
impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = Json(&self).into_response();
        response.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderValue::from_static("application/problem+json"),
        );

        *response.status_mut() = status;
        response
    }
}

/// Convert library errors to ProblemDetails.
///
/// The `request_id` must be provided separately since library errors don't have it.
/// Store, pool and IO failures are redacted to a generic detail.
pub fn from_lib_error(error: &LibError, request_id: &str) -> ProblemDetails {
    match error {
        LibError::Validation { message } => ProblemDetails::bad_request(message, request_id),
        LibError::NotFound { message } => ProblemDetails::not_found(message, request_id),
        LibError::Conflict { message } => ProblemDetails::conflict(message, request_id),
        LibError::DataIntegrity { message } => {
            ProblemDetails::data_integrity(message, request_id)
        }
        LibError::Upstream { .. } => ProblemDetails::upstream_error(error.to_string(), request_id),
        LibError::Http(_) => {
            ProblemDetails::upstream_error("Failed to fetch weather data", request_id)
        }
        LibError::DatabaseNotFound { .. }
        | LibError::Sqlite(_)
        | LibError::Pool(_)
        | LibError::Io(_) => ProblemDetails::internal_error(INTERNAL_DETAIL, request_id),
    }
}
