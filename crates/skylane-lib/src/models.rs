//! Row records for the five tables and the input drafts that create them.
//!
//! Drafts deserialize with every field optional so that missing input is
//! reported as a validation error instead of a decoding failure. Calling
//! `validate()` on a draft yields the normalized record to write.

use rusqlite::Row;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codes::{self, normalize_optional};
use crate::error::{Error, Result};
use crate::geo::Coordinates;
use crate::planes::PlaneList;

/// A country reference row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub name: String,
    pub code: String,
}

impl Country {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            name: row.get(0)?,
            code: row.get(1)?,
        })
    }
}

/// An airline row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airline {
    pub name: String,
    pub iata: Option<String>,
    pub icao: Option<String>,
    pub callsign: Option<String>,
    pub country: String,
}

impl Airline {
    pub(crate) const COLUMNS: &'static str = "name, iata, icao, callsign, country";

    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            name: row.get(0)?,
            iata: row.get(1)?,
            icao: row.get(2)?,
            callsign: row.get(3)?,
            country: row.get(4)?,
        })
    }
}

/// Airline identity as listed for an airport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirlineSummary {
    pub name: String,
    pub iata: Option<String>,
    pub country: String,
}

impl AirlineSummary {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            name: row.get(0)?,
            iata: row.get(1)?,
            country: row.get(2)?,
        })
    }
}

/// An airport row. Coordinates are decimal degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    pub name: String,
    pub city: Option<String>,
    pub country: String,
    pub iata: Option<String>,
    pub icao: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Airport {
    pub(crate) const COLUMNS: &'static str = "name, city, country, iata, icao, latitude, longitude";

    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            name: row.get(0)?,
            city: row.get(1)?,
            country: row.get(2)?,
            iata: row.get(3)?,
            icao: row.get(4)?,
            latitude: row.get(5)?,
            longitude: row.get(6)?,
        })
    }

    /// Coordinates when both components are stored.
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
            _ => None,
        }
    }

    /// Coordinates, or a data-integrity error naming the airport.
    pub fn require_coordinates(&self) -> Result<Coordinates> {
        self.coordinates().ok_or_else(|| {
            Error::data_integrity(format!(
                "Invalid airport location data for {}",
                self.display_code()
            ))
        })
    }

    /// Best available code for messages.
    pub fn display_code(&self) -> &str {
        self.iata
            .as_deref()
            .or(self.icao.as_deref())
            .unwrap_or(self.name.as_str())
    }
}

/// An aircraft type in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub name: String,
    pub code: Option<String>,
}

impl Plane {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            name: row.get(0)?,
            code: row.get(1)?,
        })
    }
}

/// A route row with its parsed plane list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub airline: String,
    pub departure: String,
    pub arrival: String,
    pub planes: PlaneList,
}

impl Route {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let planes: Option<String> = row.get(3)?;
        Ok(Self {
            airline: row.get(0)?,
            departure: row.get(1)?,
            arrival: row.get(2)?,
            planes: PlaneList::parse(planes.as_deref().unwrap_or_default()),
        })
    }

    pub fn ident(&self) -> RouteIdent {
        RouteIdent {
            airline: self.airline.clone(),
            departure: self.departure.clone(),
            arrival: self.arrival.clone(),
        }
    }
}

/// A departure/arrival pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteLeg {
    pub departure: String,
    pub arrival: String,
}

impl RouteLeg {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            departure: row.get(0)?,
            arrival: row.get(1)?,
        })
    }
}

/// An airline operating a leg with its aircraft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Carrier {
    pub airline: String,
    pub planes: PlaneList,
}

/// Route detail seen from the departure airport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrivalDetail {
    pub arrival: String,
    pub airline: String,
    pub planes: PlaneList,
}

/// Route detail seen from the arrival airport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartureDetail {
    pub departure: String,
    pub airline: String,
    pub planes: PlaneList,
}

/// Unique identity of a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteIdent {
    pub airline: String,
    pub departure: String,
    pub arrival: String,
}

// =============================================================================
// Input drafts
// =============================================================================

fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Accept a coordinate given as a JSON number or a numeric string.
fn coordinate(value: Option<&Value>) -> Result<Option<f64>> {
    let parsed = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    match parsed {
        Some(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(Error::validation(
            "Latitude and longitude must be valid numbers",
        )),
    }
}

/// Lookup by ICAO and/or IATA code. At least one must be present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeFilter {
    #[serde(default)]
    pub icao: Option<String>,
    #[serde(default)]
    pub iata: Option<String>,
}

impl CodeFilter {
    pub fn new(icao: Option<&str>, iata: Option<&str>) -> Self {
        Self {
            icao: icao.map(str::to_string),
            iata: iata.map(str::to_string),
        }
    }

    /// Normalize both codes and require at least one.
    pub fn validate(&self) -> Result<Self> {
        let icao = normalize_optional(self.icao.as_deref());
        let iata = normalize_optional(self.iata.as_deref());
        if icao.is_none() && iata.is_none() {
            return Err(Error::validation("ICAO or IATA code is required"));
        }
        Ok(Self { icao, iata })
    }
}

/// Draft for a new airline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewAirline {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub iata: Option<String>,
    #[serde(default)]
    pub icao: Option<String>,
    #[serde(default)]
    pub callsign: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl NewAirline {
    pub fn validate(&self) -> Result<Airline> {
        let missing = || {
            Error::validation(
                "Name, callsign, country, and either IATA or ICAO code are required",
            )
        };

        let name = optional_text(self.name.as_deref()).ok_or_else(missing)?;
        let callsign = optional_text(self.callsign.as_deref()).ok_or_else(missing)?;
        let country = optional_text(self.country.as_deref()).ok_or_else(missing)?;
        let iata = normalize_optional(self.iata.as_deref());
        let icao = normalize_optional(self.icao.as_deref());
        if iata.is_none() && icao.is_none() {
            return Err(missing());
        }

        Ok(Airline {
            name,
            iata,
            icao,
            callsign: Some(callsign),
            country,
        })
    }
}

/// Draft for a new airport.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewAirport {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub iata: Option<String>,
    #[serde(default)]
    pub icao: Option<String>,
    #[serde(default)]
    pub latitude: Option<Value>,
    #[serde(default)]
    pub longitude: Option<Value>,
}

impl NewAirport {
    pub fn validate(&self) -> Result<Airport> {
        let missing = || {
            Error::validation(
                "Name, city, country, latitude, longitude, and either IATA or ICAO are required",
            )
        };

        let name = optional_text(self.name.as_deref()).ok_or_else(missing)?;
        let city = optional_text(self.city.as_deref()).ok_or_else(missing)?;
        let country = optional_text(self.country.as_deref()).ok_or_else(missing)?;
        let iata = normalize_optional(self.iata.as_deref());
        let icao = normalize_optional(self.icao.as_deref());
        if iata.is_none() && icao.is_none() {
            return Err(missing());
        }

        let latitude = coordinate(self.latitude.as_ref())?.ok_or_else(missing)?;
        let longitude = coordinate(self.longitude.as_ref())?.ok_or_else(missing)?;
        if !Coordinates::new(latitude, longitude).is_in_range() {
            return Err(Error::validation(
                "Latitude must be within [-90, 90] and longitude within [-180, 180]",
            ));
        }

        if let Some(code) = &iata {
            codes::check_len(code, codes::AIRPORT_IATA_LEN, "IATA code")?;
        }
        if let Some(code) = &icao {
            codes::check_len(code, codes::AIRPORT_ICAO_LEN, "ICAO code")?;
        }

        Ok(Airport {
            name,
            city: Some(city),
            country,
            iata,
            icao,
            latitude: Some(latitude),
            longitude: Some(longitude),
        })
    }
}

/// Draft identifying a route by airline, departure and arrival.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteKey {
    #[serde(default)]
    pub airline: Option<String>,
    #[serde(default)]
    pub departure: Option<String>,
    #[serde(default)]
    pub arrival: Option<String>,
}

impl RouteKey {
    pub fn validate(&self) -> Result<RouteIdent> {
        if [&self.airline, &self.departure, &self.arrival]
            .iter()
            .any(|v| optional_text(v.as_deref()).is_none())
        {
            return Err(Error::validation(
                "Airline, departure, and arrival are required",
            ));
        }

        Ok(RouteIdent {
            airline: codes::airline_iata(self.airline.as_deref())?,
            departure: codes::airport_iata(self.departure.as_deref(), "departure")?,
            arrival: codes::airport_iata(self.arrival.as_deref(), "arrival")?,
        })
    }
}

/// Draft for a new route.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewRoute {
    #[serde(default)]
    pub airline: Option<String>,
    #[serde(default)]
    pub departure: Option<String>,
    #[serde(default)]
    pub arrival: Option<String>,
    #[serde(default)]
    pub planes: Option<String>,
}

impl NewRoute {
    pub fn validate(&self) -> Result<Route> {
        if optional_text(self.planes.as_deref()).is_none() {
            return Err(Error::validation(
                "Airline, departure, arrival, and planes are required",
            ));
        }

        let ident = RouteKey {
            airline: self.airline.clone(),
            departure: self.departure.clone(),
            arrival: self.arrival.clone(),
        }
        .validate()?;
        let planes = PlaneList::parse_input(self.planes.as_deref().unwrap_or_default())?;

        Ok(Route {
            airline: ident.airline,
            departure: ident.departure,
            arrival: ident.arrival,
            planes,
        })
    }
}

/// Draft for adding aircraft to an existing route.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaneUpdate {
    #[serde(default)]
    pub airline: Option<String>,
    #[serde(default)]
    pub departure: Option<String>,
    #[serde(default)]
    pub arrival: Option<String>,
    #[serde(default, rename = "newPlanes", alias = "new_planes")]
    pub new_planes: Option<String>,
}

impl PlaneUpdate {
    pub fn validate(&self) -> Result<(RouteIdent, PlaneList)> {
        if optional_text(self.new_planes.as_deref()).is_none() {
            return Err(Error::validation(
                "Airline, departure, arrival, and new planes are required",
            ));
        }

        let ident = RouteKey {
            airline: self.airline.clone(),
            departure: self.departure.clone(),
            arrival: self.arrival.clone(),
        }
        .validate()?;
        let planes = PlaneList::parse_input(self.new_planes.as_deref().unwrap_or_default())?;
        Ok((ident, planes))
    }
}
