use axum::extract::State;
use serde::Serialize;

use skylane_lib::{repo, Country};
use skylane_service_shared::{AppState, RequestId, ServiceResponse};

use super::{lookup, HandlerResult};

#[derive(Debug, Serialize)]
pub struct Countries {
    pub countries: Vec<Country>,
}

/// `GET /countries`
pub async fn list(State(state): State<AppState>, request_id: RequestId) -> HandlerResult<Countries> {
    let countries = lookup(&state, "/countries", &request_id, repo::countries::list_all).await?;
    Ok(ServiceResponse::new(Countries { countries }))
}
