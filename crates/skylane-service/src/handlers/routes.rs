use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Serialize;

use skylane_lib::{
    normalize_code, repo, route_distance, ArrivalDetail, DepartureDetail, NewRoute, PlaneList,
    PlaneUpdate, Route, RouteDistance, RouteKey, RouteLeg,
};
use skylane_service_shared::{
    record_route_distance, AppState, ArrivalQuery, DepartureQuery, RequestId,
    RouteDistanceQuery, RouteSearchQuery, ServiceResponse,
};

use super::{body, lookup, query, Created, Deleted, HandlerResult};

#[derive(Debug, Serialize)]
pub struct Arrivals<T> {
    pub departure: String,
    pub arrivals: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct Departures {
    pub arrival: String,
    pub departures: Vec<DepartureDetail>,
}

#[derive(Debug, Serialize)]
pub struct RouteSearch {
    pub airline: String,
    pub aircraft: String,
    pub routes: Vec<RouteLeg>,
}

#[derive(Debug, Serialize)]
pub struct PlanesUpdated {
    pub message: &'static str,
    pub added: usize,
    pub planes: PlaneList,
}

#[derive(Debug, Serialize)]
pub struct PlaneRoutes {
    pub code: String,
    pub routes: Vec<Route>,
}

fn upper(value: &Option<String>) -> String {
    value.as_deref().map(normalize_code).unwrap_or_default()
}

/// `GET /routes/distance?departure=&arrival=`
pub async fn distance(
    State(state): State<AppState>,
    request_id: RequestId,
    params: Result<Query<RouteDistanceQuery>, QueryRejection>,
) -> HandlerResult<RouteDistance> {
    const ENDPOINT: &str = "/routes/distance";
    let params = query(params, ENDPOINT, &request_id)?;

    let result = lookup(&state, ENDPOINT, &request_id, move |db| {
        route_distance(db, params.departure.as_deref(), params.arrival.as_deref())
    })
    .await?;
    record_route_distance(result.distance_km);
    Ok(ServiceResponse::new(result))
}

/// `GET /routes/arrival?departure=`
pub async fn arrivals(
    State(state): State<AppState>,
    request_id: RequestId,
    params: Result<Query<DepartureQuery>, QueryRejection>,
) -> HandlerResult<Arrivals<String>> {
    const ENDPOINT: &str = "/routes/arrival";
    let params = query(params, ENDPOINT, &request_id)?;
    let departure = upper(&params.departure);

    let arrivals = lookup(&state, ENDPOINT, &request_id, move |db| {
        repo::routes::arrivals_from(db, params.departure.as_deref())
    })
    .await?;
    Ok(ServiceResponse::new(Arrivals {
        departure,
        arrivals,
    }))
}

/// `GET /routes/arrivalto?arrival=`
pub async fn departures(
    State(state): State<AppState>,
    request_id: RequestId,
    params: Result<Query<ArrivalQuery>, QueryRejection>,
) -> HandlerResult<Departures> {
    const ENDPOINT: &str = "/routes/arrivalto";
    let params = query(params, ENDPOINT, &request_id)?;
    let arrival = upper(&params.arrival);

    let departures = lookup(&state, ENDPOINT, &request_id, move |db| {
        repo::routes::departures_into(db, params.arrival.as_deref())
    })
    .await?;
    Ok(ServiceResponse::new(Departures {
        arrival,
        departures,
    }))
}

/// `GET /routes/arrivaldetails?departure=`
pub async fn arrival_details(
    State(state): State<AppState>,
    request_id: RequestId,
    params: Result<Query<DepartureQuery>, QueryRejection>,
) -> HandlerResult<Arrivals<ArrivalDetail>> {
    const ENDPOINT: &str = "/routes/arrivaldetails";
    let params = query(params, ENDPOINT, &request_id)?;
    let departure = upper(&params.departure);

    let arrivals = lookup(&state, ENDPOINT, &request_id, move |db| {
        repo::routes::details_from(db, params.departure.as_deref())
    })
    .await?;
    Ok(ServiceResponse::new(Arrivals {
        departure,
        arrivals,
    }))
}

/// `GET /routes/search?airline=&aircraft=`
pub async fn search(
    State(state): State<AppState>,
    request_id: RequestId,
    params: Result<Query<RouteSearchQuery>, QueryRejection>,
) -> HandlerResult<RouteSearch> {
    const ENDPOINT: &str = "/routes/search";
    let params = query(params, ENDPOINT, &request_id)?;
    let airline = upper(&params.airline);
    let aircraft = upper(&params.aircraft);
    let mode = state.plane_match();

    let routes = lookup(&state, ENDPOINT, &request_id, move |db| {
        repo::routes::search_by_airline_and_aircraft(
            db,
            params.airline.as_deref(),
            params.aircraft.as_deref(),
            mode,
        )
    })
    .await?;
    Ok(ServiceResponse::new(RouteSearch {
        airline,
        aircraft,
        routes,
    }))
}

/// `POST /routes`
pub async fn create(
    State(state): State<AppState>,
    request_id: RequestId,
    draft: Result<Json<NewRoute>, JsonRejection>,
) -> HandlerResult<Created> {
    const ENDPOINT: &str = "POST /routes";
    let draft = body(draft, ENDPOINT, &request_id)?;

    lookup(&state, ENDPOINT, &request_id, move |db| {
        repo::routes::insert(db, &draft)
    })
    .await?;
    Ok(ServiceResponse::created(Created {
        message: "Route added successfully",
    }))
}

/// `PUT /routes/toUpdate`
pub async fn add_planes(
    State(state): State<AppState>,
    request_id: RequestId,
    update: Result<Json<PlaneUpdate>, JsonRejection>,
) -> HandlerResult<PlanesUpdated> {
    const ENDPOINT: &str = "PUT /routes/toUpdate";
    let update = body(update, ENDPOINT, &request_id)?;

    let union = lookup(&state, ENDPOINT, &request_id, move |db| {
        repo::routes::add_planes(db, &update)
    })
    .await?;
    let message = if union.added == 0 {
        "No new aircraft types to add"
    } else {
        "Route updated successfully"
    };
    Ok(ServiceResponse::new(PlanesUpdated {
        message,
        added: union.added,
        planes: union.planes,
    }))
}

/// `DELETE /routes/toDelete`
pub async fn delete(
    State(state): State<AppState>,
    request_id: RequestId,
    key: Result<Json<RouteKey>, JsonRejection>,
) -> HandlerResult<Deleted<Route>> {
    const ENDPOINT: &str = "DELETE /routes/toDelete";
    let key = body(key, ENDPOINT, &request_id)?;

    let deleted = lookup(&state, ENDPOINT, &request_id, move |db| {
        repo::routes::delete(db, &key)
    })
    .await?;
    Ok(ServiceResponse::new(Deleted {
        message: "Route deleted successfully",
        deleted,
    }))
}

/// `GET /routes-by-plane/{code}`
pub async fn by_plane(
    State(state): State<AppState>,
    request_id: RequestId,
    Path(code): Path<String>,
) -> HandlerResult<PlaneRoutes> {
    const ENDPOINT: &str = "/routes-by-plane/{code}";
    let mode = state.plane_match();
    let lookup_code = code.clone();

    let routes = lookup(&state, ENDPOINT, &request_id, move |db| {
        repo::routes::by_plane(db, &lookup_code, mode)
    })
    .await?;
    Ok(ServiceResponse::new(PlaneRoutes {
        code: normalize_code(&code),
        routes,
    }))
}
