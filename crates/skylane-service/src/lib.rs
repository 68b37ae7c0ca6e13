//! Skylane flight data REST service.
//!
//! # Endpoints
//!
//! | Method & Path | Handler |
//! |---|---|
//! | `GET /countries` | [`handlers::countries::list`] |
//! | `GET /airlines?country_code=` | [`handlers::airlines::by_country`] |
//! | `GET /airlines/all` | [`handlers::airlines::list_all`] |
//! | `GET /airlines/search?icao=&iata=` | [`handlers::airlines::search`] |
//! | `POST /airlines` | [`handlers::airlines::create`] |
//! | `DELETE /airlines?icao=&iata=` | [`handlers::airlines::delete`] |
//! | `GET /airlines/routes?airline=` | [`handlers::airlines::routes`] |
//! | `GET /airports?country_code=` | [`handlers::airports::by_country`] |
//! | `GET /airports/search?icao=&iata=` | [`handlers::airports::search`] |
//! | `POST /airports` | [`handlers::airports::create`] |
//! | `DELETE /airports?icao=&iata=` | [`handlers::airports::delete`] |
//! | `GET /airports/routesorigin` | [`handlers::airports::origins`] |
//! | `GET /airports/airlinesbyairport?iata=` | [`handlers::airlines::serving_airport`] |
//! | `GET /airports/nearest?lat=&lon=&limit=` | [`handlers::airports::nearest`] |
//! | `GET /routes/distance?departure=&arrival=` | [`handlers::routes::distance`] |
//! | `GET /routes/arrival?departure=` | [`handlers::routes::arrivals`] |
//! | `GET /routes/arrivalto?arrival=` | [`handlers::routes::departures`] |
//! | `GET /routes/arrivaldetails?departure=` | [`handlers::routes::arrival_details`] |
//! | `GET /routes/search?airline=&aircraft=` | [`handlers::routes::search`] |
//! | `POST /routes` | [`handlers::routes::create`] |
//! | `PUT /routes/toUpdate` | [`handlers::routes::add_planes`] |
//! | `DELETE /routes/toDelete` | [`handlers::routes::delete`] |
//! | `GET /planes` | [`handlers::planes::list_all`] |
//! | `GET /distinctplanes` | [`handlers::planes::list_distinct`] |
//! | `GET /routes-by-plane/{code}` | [`handlers::routes::by_plane`] |
//! | `GET /distance?from=&to=` | [`handlers::distance::between_airports`] |
//!
//! Plus `GET /health/live`, `GET /health/ready` and the Prometheus endpoint.

#![deny(warnings)]

pub mod handlers;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;

use skylane_service_shared::{health_live, health_ready, metrics_handler, AppState, MetricsLayer};

use handlers::{airlines, airports, countries, distance, planes, routes};

/// Build the application router over `state`.
///
/// `metrics_path` is where the Prometheus text is served (normally `/metrics`).
pub fn router(state: AppState, metrics_path: &str) -> Router {
    Router::new()
        .route("/countries", get(countries::list))
        .route(
            "/airlines",
            get(airlines::by_country)
                .post(airlines::create)
                .delete(airlines::delete),
        )
        .route("/airlines/all", get(airlines::list_all))
        .route("/airlines/search", get(airlines::search))
        .route("/airlines/routes", get(airlines::routes))
        .route(
            "/airports",
            get(airports::by_country)
                .post(airports::create)
                .delete(airports::delete),
        )
        .route("/airports/search", get(airports::search))
        .route("/airports/routesorigin", get(airports::origins))
        .route("/airports/airlinesbyairport", get(airlines::serving_airport))
        .route("/airports/nearest", get(airports::nearest))
        .route("/routes", post(routes::create))
        .route("/routes/distance", get(routes::distance))
        .route("/routes/arrival", get(routes::arrivals))
        .route("/routes/arrivalto", get(routes::departures))
        .route("/routes/arrivaldetails", get(routes::arrival_details))
        .route("/routes/search", get(routes::search))
        .route("/routes/toUpdate", put(routes::add_planes))
        .route("/routes/toDelete", axum::routing::delete(routes::delete))
        .route("/routes-by-plane/{code}", get(routes::by_plane))
        .route("/planes", get(planes::list_all))
        .route("/distinctplanes", get(planes::list_distinct))
        .route("/distance", get(distance::between_airports))
        .route(metrics_path, get(metrics_handler))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready))
        .layer(MetricsLayer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
