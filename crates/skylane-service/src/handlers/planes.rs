use axum::extract::State;
use serde::Serialize;

use skylane_lib::{repo, Plane};
use skylane_service_shared::{AppState, RequestId, ServiceResponse};

use super::{lookup, HandlerResult};

#[derive(Debug, Serialize)]
pub struct Planes {
    pub planes: Vec<Plane>,
}

/// `GET /planes`
pub async fn list_all(State(state): State<AppState>, request_id: RequestId) -> HandlerResult<Planes> {
    let planes = lookup(&state, "/planes", &request_id, repo::planes::list_all).await?;
    Ok(ServiceResponse::new(Planes { planes }))
}

/// `GET /distinctplanes`, catalog entries that carry a code.
pub async fn list_distinct(
    State(state): State<AppState>,
    request_id: RequestId,
) -> HandlerResult<Planes> {
    let planes = lookup(&state, "/distinctplanes", &request_id, repo::planes::list_distinct).await?;
    Ok(ServiceResponse::new(Planes { planes }))
}
