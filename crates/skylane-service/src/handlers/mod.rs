//! Endpoint handlers, one module per resource.
//!
//! Each handler extracts its input, runs one `skylane-lib` call on the
//! blocking pool through [`lookup`], and wraps the payload in a
//! [`ServiceResponse`]. Failures become Problem Details in [`failure`].

pub mod airlines;
pub mod airports;
pub mod countries;
pub mod distance;
pub mod planes;
pub mod routes;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::Json;
use serde::Serialize;
use tracing::{error, warn};

use skylane_lib::{Database, Error as LibError};
use skylane_service_shared::{
    from_lib_error, record_lookup, record_lookup_failed, AppState, ProblemDetails, RequestId,
    ServiceResponse,
};

/// Handler result: a wrapped payload or an RFC 9457 problem.
pub type HandlerResult<T> = Result<ServiceResponse<T>, ProblemDetails>;

/// Body of creation responses.
#[derive(Debug, Serialize)]
pub struct Created {
    pub message: &'static str,
}

/// Body of delete responses.
#[derive(Debug, Serialize)]
pub struct Deleted<T> {
    pub message: &'static str,
    pub deleted: Vec<T>,
}

/// Record and log a library failure, then convert it to Problem Details.
pub(crate) fn failure(endpoint: &str, request_id: &RequestId, err: &LibError) -> ProblemDetails {
    record_lookup_failed(endpoint, err.kind());
    match err {
        LibError::Validation { .. } | LibError::NotFound { .. } | LibError::Conflict { .. } => {
            warn!(request_id = %request_id, endpoint, error = %err, "request rejected");
        }
        _ => {
            error!(request_id = %request_id, endpoint, error = %err, "request failed");
        }
    }
    from_lib_error(err, request_id.as_str())
}

/// Run a store call on the blocking pool, recording the outcome.
pub(crate) async fn lookup<T, F>(
    state: &AppState,
    endpoint: &'static str,
    request_id: &RequestId,
    f: F,
) -> Result<T, ProblemDetails>
where
    F: FnOnce(&Database) -> skylane_lib::Result<T> + Send + 'static,
    T: Send + 'static,
{
    match state.run(f).await {
        Ok(value) => {
            record_lookup(endpoint);
            Ok(value)
        }
        Err(e) => Err(failure(endpoint, request_id, &e)),
    }
}

/// Unwrap a query extraction, turning a rejection into a 400.
pub(crate) fn query<T>(
    extracted: Result<Query<T>, QueryRejection>,
    endpoint: &str,
    request_id: &RequestId,
) -> Result<T, ProblemDetails> {
    extracted
        .map(|Query(value)| value)
        .map_err(|rejection| rejected(endpoint, request_id, rejection.body_text()))
}

/// Unwrap a JSON body extraction, turning a rejection into a 400.
pub(crate) fn body<T>(
    extracted: Result<Json<T>, JsonRejection>,
    endpoint: &str,
    request_id: &RequestId,
) -> Result<T, ProblemDetails> {
    extracted
        .map(|Json(value)| value)
        .map_err(|rejection| rejected(endpoint, request_id, rejection.body_text()))
}

fn rejected(endpoint: &str, request_id: &RequestId, detail: String) -> ProblemDetails {
    record_lookup_failed(endpoint, "validation_error");
    warn!(request_id = %request_id, endpoint, detail = %detail, "malformed request");
    ProblemDetails::bad_request(detail, request_id.as_str())
}
