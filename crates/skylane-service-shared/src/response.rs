//! Response wrapper for successful HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Wrapper for successful responses with content type metadata.
///
/// This provides symmetry with `ProblemDetails` by including content type
/// information in the response body. Payload fields are flattened into the
/// top-level object.
///
/// # Example
///
/// ```
/// use skylane_service_shared::ServiceResponse;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Arrivals {
///     departure: String,
///     arrivals: Vec<String>,
/// }
///
/// let body = Arrivals { departure: "LHR".into(), arrivals: vec!["JFK".into()] };
/// let response = ServiceResponse::new(body);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceResponse<T> {
    /// The actual response payload.
    #[serde(flatten)]
    pub data: T,

    /// Content type for this response.
    pub content_type: String,

    /// HTTP status sent with the body. Not serialized.
    #[serde(skip)]
    pub status: StatusCode,
}

impl<T> ServiceResponse<T> {
    /// Create a new successful response with the default content type.
    pub fn new(data: T) -> Self {
        Self {
            data,
            content_type: "application/json".to_string(),
            status: StatusCode::OK,
        }
    }

    /// Create a `201 Created` response.
    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            ..Self::new(data)
        }
    }
}

/// Implement IntoResponse for axum to return ServiceResponse as HTTP responses.
impl<T: Serialize> IntoResponse for ServiceResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
