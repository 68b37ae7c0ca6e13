//! Skylane library entry points.
//!
//! This crate holds the flight-data core: the Haversine distance calculator,
//! the pooled SQLite query executor, the entity repositories, the
//! route/distance aggregator and the weather capability. The HTTP service and
//! the CLI depend only on what is exported here.

#![deny(warnings)]

pub mod aggregate;
pub mod codes;
pub mod db;
pub mod error;
pub mod geo;
pub mod models;
pub mod planes;
pub mod repo;
pub mod schema;
pub mod weather;

pub use aggregate::{
    airport_distance, nearest_airports, route_distance, AirportDistance, NearbyAirport,
    RouteDistance,
};
pub use codes::{normalize_code, CodeKind};
pub use db::{init_schema, Database, DatabaseConfig};
pub use error::{Error, Result};
pub use geo::{distance_km, quick_distance, Coordinates};
pub use models::{
    Airline, AirlineSummary, Airport, ArrivalDetail, Carrier, CodeFilter, Country,
    DepartureDetail, NewAirline, NewAirport, NewRoute, Plane, PlaneUpdate, Route, RouteKey,
    RouteLeg,
};
pub use planes::{PlaneList, PlaneMatch};
pub use repo::routes::PlaneUnion;
pub use weather::{Forecaster, OpenMeteoClient, TemperatureRange};
