//! Query-string types for the GET and DELETE endpoints.
//!
//! Every field is optional so a missing parameter reaches the library as
//! `None` and comes back as a validation error with the library's message,
//! instead of an extractor rejection.

use serde::{Deserialize, Serialize};

use skylane_lib::{CodeFilter, Coordinates, Error as LibError, Result as LibResult};

/// `?country_code=`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CountryQuery {
    pub country_code: Option<String>,
}

/// `?icao=&iata=`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodeQuery {
    pub icao: Option<String>,
    pub iata: Option<String>,
}

impl From<CodeQuery> for CodeFilter {
    fn from(query: CodeQuery) -> Self {
        CodeFilter {
            icao: query.icao,
            iata: query.iata,
        }
    }
}

/// `?airline=`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AirlineQuery {
    pub airline: Option<String>,
}

/// `?iata=`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IataQuery {
    pub iata: Option<String>,
}

/// `?departure=&arrival=`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteDistanceQuery {
    pub departure: Option<String>,
    pub arrival: Option<String>,
}

/// `?departure=`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DepartureQuery {
    pub departure: Option<String>,
}

/// `?arrival=`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArrivalQuery {
    pub arrival: Option<String>,
}

/// `?airline=&aircraft=`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteSearchQuery {
    pub airline: Option<String>,
    pub aircraft: Option<String>,
}

/// `?from=&to=`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DistanceQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// `?lat=&lon=&limit=`
///
/// Kept as strings so that `lat=abc` is reported with the same message as a
/// missing value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NearestQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub limit: Option<String>,
}

impl NearestQuery {
    /// Parse the origin point and optional limit.
    pub fn parse(&self) -> LibResult<(Coordinates, Option<usize>)> {
        let number = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .and_then(|v| v.parse::<f64>().ok())
                .filter(|v| v.is_finite())
        };

        let (Some(lat), Some(lon)) = (number(&self.lat), number(&self.lon)) else {
            return Err(LibError::validation(
                "lat and lon are required and must be numbers",
            ));
        };

        let limit = match self.limit.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<usize>().map_err(|_| {
                LibError::validation("limit must be a positive integer")
            })?),
        };

        Ok((Coordinates::new(lat, lon), limit))
    }
}
