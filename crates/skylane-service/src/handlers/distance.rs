use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};

use skylane_lib::{airport_distance, AirportDistance};
use skylane_service_shared::{AppState, DistanceQuery, RequestId, ServiceResponse};

use super::{lookup, query, HandlerResult};

/// `GET /distance?from=&to=`, codes may be IATA or ICAO.
pub async fn between_airports(
    State(state): State<AppState>,
    request_id: RequestId,
    params: Result<Query<DistanceQuery>, QueryRejection>,
) -> HandlerResult<AirportDistance> {
    const ENDPOINT: &str = "/distance";
    let params = query(params, ENDPOINT, &request_id)?;

    let result = lookup(&state, ENDPOINT, &request_id, move |db| {
        airport_distance(db, params.from.as_deref(), params.to.as_deref())
    })
    .await?;
    Ok(ServiceResponse::new(result))
}
