use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;

use skylane_lib::{normalize_code, repo, Airline, AirlineSummary, CodeFilter, NewAirline, RouteLeg};
use skylane_service_shared::{
    AirlineQuery, AppState, CodeQuery, CountryQuery, IataQuery, RequestId, ServiceResponse,
};

use super::{body, lookup, query, Created, Deleted, HandlerResult};

#[derive(Debug, Serialize)]
pub struct Airlines<T> {
    pub airlines: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct AirlineRoutes {
    pub airline: String,
    pub routes: Vec<RouteLeg>,
}

/// `GET /airlines?country_code=`
pub async fn by_country(
    State(state): State<AppState>,
    request_id: RequestId,
    params: Result<Query<CountryQuery>, QueryRejection>,
) -> HandlerResult<Airlines<Airline>> {
    const ENDPOINT: &str = "/airlines";
    let params = query(params, ENDPOINT, &request_id)?;

    let airlines = lookup(&state, ENDPOINT, &request_id, move |db| {
        repo::airlines::by_country(db, params.country_code.as_deref())
    })
    .await?;
    Ok(ServiceResponse::new(Airlines { airlines }))
}

/// `GET /airlines/all`
pub async fn list_all(
    State(state): State<AppState>,
    request_id: RequestId,
) -> HandlerResult<Airlines<Airline>> {
    let airlines = lookup(&state, "/airlines/all", &request_id, repo::airlines::list_all).await?;
    Ok(ServiceResponse::new(Airlines { airlines }))
}

/// `GET /airlines/search?icao=&iata=`
pub async fn search(
    State(state): State<AppState>,
    request_id: RequestId,
    params: Result<Query<CodeQuery>, QueryRejection>,
) -> HandlerResult<Airlines<Airline>> {
    const ENDPOINT: &str = "/airlines/search";
    let filter: CodeFilter = query(params, ENDPOINT, &request_id)?.into();

    let airlines = lookup(&state, ENDPOINT, &request_id, move |db| {
        repo::airlines::find_by_code(db, &filter)
    })
    .await?;
    Ok(ServiceResponse::new(Airlines { airlines }))
}

/// `POST /airlines`
pub async fn create(
    State(state): State<AppState>,
    request_id: RequestId,
    draft: Result<Json<NewAirline>, JsonRejection>,
) -> HandlerResult<Created> {
    const ENDPOINT: &str = "POST /airlines";
    let draft = body(draft, ENDPOINT, &request_id)?;

    lookup(&state, ENDPOINT, &request_id, move |db| {
        repo::airlines::insert(db, &draft)
    })
    .await?;
    Ok(ServiceResponse::created(Created {
        message: "Airline added successfully",
    }))
}

/// `DELETE /airlines?icao=&iata=`
pub async fn delete(
    State(state): State<AppState>,
    request_id: RequestId,
    params: Result<Query<CodeQuery>, QueryRejection>,
) -> HandlerResult<Deleted<Airline>> {
    const ENDPOINT: &str = "DELETE /airlines";
    let filter: CodeFilter = query(params, ENDPOINT, &request_id)?.into();

    let deleted = lookup(&state, ENDPOINT, &request_id, move |db| {
        repo::airlines::delete_by_code(db, &filter)
    })
    .await?;
    Ok(ServiceResponse::new(Deleted {
        message: "Airline deleted successfully",
        deleted,
    }))
}

/// `GET /airlines/routes?airline=`
pub async fn routes(
    State(state): State<AppState>,
    request_id: RequestId,
    params: Result<Query<AirlineQuery>, QueryRejection>,
) -> HandlerResult<AirlineRoutes> {
    const ENDPOINT: &str = "/airlines/routes";
    let params = query(params, ENDPOINT, &request_id)?;
    let airline = params.airline.as_deref().map(normalize_code).unwrap_or_default();

    let routes = lookup(&state, ENDPOINT, &request_id, move |db| {
        repo::routes::by_airline(db, params.airline.as_deref())
    })
    .await?;
    Ok(ServiceResponse::new(AirlineRoutes { airline, routes }))
}

/// `GET /airports/airlinesbyairport?iata=`
pub async fn serving_airport(
    State(state): State<AppState>,
    request_id: RequestId,
    params: Result<Query<IataQuery>, QueryRejection>,
) -> HandlerResult<Airlines<AirlineSummary>> {
    const ENDPOINT: &str = "/airports/airlinesbyairport";
    let params = query(params, ENDPOINT, &request_id)?;

    let airlines = lookup(&state, ENDPOINT, &request_id, move |db| {
        repo::airlines::serving_airport(db, params.iata.as_deref())
    })
    .await?;
    Ok(ServiceResponse::new(Airlines { airlines }))
}
