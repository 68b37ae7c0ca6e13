use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;
use tracing::error;

use skylane_lib::{nearest_airports, repo, Airport, CodeFilter, NearbyAirport, NewAirport};
use skylane_service_shared::{
    record_lookup, record_lookup_failed, record_weather_request, AppState, CodeQuery,
    CountryQuery, NearestQuery, ProblemDetails, RequestId, ServiceResponse,
};

use super::{body, failure, lookup, query, Created, Deleted, HandlerResult};

#[derive(Debug, Serialize)]
pub struct Airports<T> {
    pub airports: Vec<T>,
}

/// An airport with today's forecast high and low in °C.
#[derive(Debug, Serialize)]
pub struct AirportWeather {
    #[serde(flatten)]
    pub airport: Airport,
    pub high: f64,
    pub low: f64,
}

/// `GET /airports?country_code=`
pub async fn by_country(
    State(state): State<AppState>,
    request_id: RequestId,
    params: Result<Query<CountryQuery>, QueryRejection>,
) -> HandlerResult<Airports<Airport>> {
    const ENDPOINT: &str = "/airports";
    let params = query(params, ENDPOINT, &request_id)?;

    let airports = lookup(&state, ENDPOINT, &request_id, move |db| {
        repo::airports::by_country(db, params.country_code.as_deref())
    })
    .await?;
    Ok(ServiceResponse::new(Airports { airports }))
}

/// `GET /airports/search?icao=&iata=`
///
/// The first matching airport, with today's temperature range at its location.
pub async fn search(
    State(state): State<AppState>,
    request_id: RequestId,
    params: Result<Query<CodeQuery>, QueryRejection>,
) -> HandlerResult<AirportWeather> {
    const ENDPOINT: &str = "/airports/search";
    let filter: CodeFilter = query(params, ENDPOINT, &request_id)?.into();

    let (airport, at) = state
        .run(move |db| {
            let airport = repo::airports::find_by_code(db, &filter)?
                .into_iter()
                .next()
                .ok_or_else(|| skylane_lib::Error::not_found("Airport not found"))?;
            let at = airport.require_coordinates()?;
            Ok((airport, at))
        })
        .await
        .map_err(|e| failure(ENDPOINT, &request_id, &e))?;

    let range = match state.forecaster().todays_range(at).await {
        Ok(range) => {
            record_weather_request("ok");
            range
        }
        Err(e) => {
            record_weather_request("error");
            record_lookup_failed(ENDPOINT, e.kind());
            error!(request_id = %request_id, error = %e, "weather lookup failed");
            return Err(ProblemDetails::upstream_error(
                "Failed to fetch weather data",
                request_id.as_str(),
            ));
        }
    };

    record_lookup(ENDPOINT);
    Ok(ServiceResponse::new(AirportWeather {
        airport,
        high: range.high,
        low: range.low,
    }))
}

/// `POST /airports`
pub async fn create(
    State(state): State<AppState>,
    request_id: RequestId,
    draft: Result<Json<NewAirport>, JsonRejection>,
) -> HandlerResult<Created> {
    const ENDPOINT: &str = "POST /airports";
    let draft = body(draft, ENDPOINT, &request_id)?;

    lookup(&state, ENDPOINT, &request_id, move |db| {
        repo::airports::insert(db, &draft)
    })
    .await?;
    Ok(ServiceResponse::created(Created {
        message: "Airport added successfully",
    }))
}

/// `DELETE /airports?icao=&iata=`
pub async fn delete(
    State(state): State<AppState>,
    request_id: RequestId,
    params: Result<Query<CodeQuery>, QueryRejection>,
) -> HandlerResult<Deleted<Airport>> {
    const ENDPOINT: &str = "DELETE /airports";
    let filter: CodeFilter = query(params, ENDPOINT, &request_id)?.into();

    let deleted = lookup(&state, ENDPOINT, &request_id, move |db| {
        repo::airports::delete_by_code(db, &filter)
    })
    .await?;
    Ok(ServiceResponse::new(Deleted {
        message: "Airport deleted successfully",
        deleted,
    }))
}

/// `GET /airports/routesorigin`
pub async fn origins(
    State(state): State<AppState>,
    request_id: RequestId,
) -> HandlerResult<Airports<Airport>> {
    let airports = lookup(
        &state,
        "/airports/routesorigin",
        &request_id,
        repo::airports::list_origins,
    )
    .await?;
    Ok(ServiceResponse::new(Airports { airports }))
}

/// `GET /airports/nearest?lat=&lon=&limit=`
pub async fn nearest(
    State(state): State<AppState>,
    request_id: RequestId,
    params: Result<Query<NearestQuery>, QueryRejection>,
) -> HandlerResult<Airports<NearbyAirport>> {
    const ENDPOINT: &str = "/airports/nearest";
    let (origin, limit) = query(params, ENDPOINT, &request_id)?
        .parse()
        .map_err(|e| failure(ENDPOINT, &request_id, &e))?;

    let airports = lookup(&state, ENDPOINT, &request_id, move |db| {
        nearest_airports(db, origin, limit)
    })
    .await?;
    Ok(ServiceResponse::new(Airports { airports }))
}
