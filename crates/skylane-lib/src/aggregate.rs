//! Route and distance aggregation.
//!
//! Composes airport lookups, the Haversine calculator and route lookups into
//! the answers the HTTP layer and CLI present: distance plus carriers between
//! two airports, plain airport-to-airport distance, and nearest airports to a
//! point.

use serde::Serialize;
use tracing::debug;

use crate::codes::{self, classify, CodeKind};
use crate::db::Database;
use crate::error::{Error, Result};
use crate::geo::{rank_nearest, round_km, Coordinates};
use crate::models::{Airport, Carrier};
use crate::repo::{airports, routes};

/// Default number of airports returned by [`nearest_airports`].
pub const DEFAULT_NEAREST_LIMIT: usize = 5;
/// Upper bound on the number of airports returned by [`nearest_airports`].
pub const MAX_NEAREST_LIMIT: usize = 50;

/// Distance between two airports plus every carrier flying that exact leg.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteDistance {
    pub departure: String,
    pub arrival: String,
    pub distance_km: f64,
    pub carriers: Vec<Carrier>,
}

/// One side of an [`AirportDistance`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Endpoint {
    pub code: String,
    pub kind: CodeKind,
    pub name: String,
}

/// Distance between two airports identified by IATA or ICAO code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirportDistance {
    pub from: Endpoint,
    pub to: Endpoint,
    pub distance_km: f64,
}

/// An airport ranked by proximity to a point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyAirport {
    #[serde(flatten)]
    pub airport: Airport,
    /// Planar ranking score in degrees. Only comparable within one query.
    pub score: f64,
    pub distance_km: f64,
}

fn matches_code(airport: &Airport, code: &str) -> bool {
    classify(code, airport.iata.as_deref(), airport.icao.as_deref()) != CodeKind::Unknown
}

/// Distance and carriers for the ordered `(departure, arrival)` leg.
///
/// The reverse leg is not considered.
pub fn route_distance(
    db: &Database,
    departure: Option<&str>,
    arrival: Option<&str>,
) -> Result<RouteDistance> {
    let departure = codes::airport_iata(departure, "departure")?;
    let arrival = codes::airport_iata(arrival, "arrival")?;

    let found = airports::find_by_iata_pair(db, &departure, &arrival)?;
    if found.len() != 2 {
        return Err(Error::not_found("One or both airports not found"));
    }

    let from = found
        .iter()
        .find(|a| a.iata.as_deref().is_some_and(|c| c.eq_ignore_ascii_case(&departure)))
        .ok_or_else(|| Error::not_found("One or both airports not found"))?;
    let to = found
        .iter()
        .find(|a| a.iata.as_deref().is_some_and(|c| c.eq_ignore_ascii_case(&arrival)))
        .ok_or_else(|| Error::not_found("One or both airports not found"))?;

    let distance = from.require_coordinates()?.distance_km(&to.require_coordinates()?);

    let legs = routes::between(db, &departure, &arrival)?;
    if legs.is_empty() {
        return Err(Error::not_found("No routes found for the given airports"));
    }

    let carriers = legs
        .into_iter()
        .map(|route| Carrier {
            airline: route.airline,
            planes: route.planes,
        })
        .collect::<Vec<_>>();

    debug!(
        departure = %departure,
        arrival = %arrival,
        distance_km = distance,
        carriers = carriers.len(),
        "route distance"
    );

    Ok(RouteDistance {
        departure,
        arrival,
        distance_km: round_km(distance),
        carriers,
    })
}

/// Distance between two airports, each given by IATA or ICAO code.
pub fn airport_distance(
    db: &Database,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<AirportDistance> {
    let (Some(from), Some(to)) = (codes::normalize_optional(from), codes::normalize_optional(to))
    else {
        return Err(Error::validation("Missing airport codes"));
    };

    let found = airports::find_by_any_code(db, &from, &to)?;
    if found.len() != 2 {
        return Err(Error::not_found("One or both airports not found"));
    }

    let origin = found
        .iter()
        .find(|a| matches_code(a, &from))
        .ok_or_else(|| Error::not_found("One or both airports not found"))?;
    let target = found
        .iter()
        .find(|a| !std::ptr::eq(*a, origin) && matches_code(a, &to))
        .ok_or_else(|| Error::not_found("One or both airports not found"))?;

    let distance = origin
        .require_coordinates()?
        .distance_km(&target.require_coordinates()?);

    let endpoint = |airport: &Airport, code: String| Endpoint {
        kind: classify(&code, airport.iata.as_deref(), airport.icao.as_deref()),
        code,
        name: airport.name.clone(),
    };

    Ok(AirportDistance {
        from: endpoint(origin, from),
        to: endpoint(target, to),
        distance_km: round_km(distance),
    })
}

/// Clamp a requested limit into `1..=MAX_NEAREST_LIMIT`, defaulting when absent.
pub fn nearest_limit(limit: Option<usize>) -> Result<usize> {
    match limit {
        None => Ok(DEFAULT_NEAREST_LIMIT),
        Some(n) if (1..=MAX_NEAREST_LIMIT).contains(&n) => Ok(n),
        Some(_) => Err(Error::validation(format!(
            "limit must be between 1 and {MAX_NEAREST_LIMIT}"
        ))),
    }
}

/// Airports closest to `origin`, ranked by the planar approximation.
///
/// Airports without stored coordinates are skipped.
pub fn nearest_airports(
    db: &Database,
    origin: Coordinates,
    limit: Option<usize>,
) -> Result<Vec<NearbyAirport>> {
    if !origin.latitude.is_finite() || !origin.longitude.is_finite() || !origin.is_in_range() {
        return Err(Error::validation(
            "Latitude must be within [-90, 90] and longitude within [-180, 180]",
        ));
    }
    let limit = nearest_limit(limit)?;

    let candidates = airports::with_coordinates(db)?
        .into_iter()
        .filter_map(|airport| airport.coordinates().map(|c| (airport, c)));

    let ranked = rank_nearest(origin, candidates, limit)
        .into_iter()
        .map(|(airport, score)| {
            let distance = airport
                .coordinates()
                .map(|c| origin.distance_km(&c))
                .unwrap_or_default();
            NearbyAirport {
                airport,
                score,
                distance_km: round_km(distance),
            }
        })
        .collect::<Vec<_>>();

    debug!(
        latitude = origin.latitude,
        longitude = origin.longitude,
        count = ranked.len(),
        "nearest airports"
    );
    Ok(ranked)
}
