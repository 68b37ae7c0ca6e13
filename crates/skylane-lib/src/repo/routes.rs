use rusqlite::{params, Connection};
use serde::Serialize;
use tracing::{debug, info};

use crate::codes::{self, normalize_code, normalize_optional, PLANE_CODE_LEN};
use crate::db::{query_rows, Database};
use crate::error::{Error, Result};
use crate::models::{
    ArrivalDetail, DepartureDetail, NewRoute, PlaneUpdate, Route, RouteIdent, RouteKey, RouteLeg,
};
use crate::planes::{PlaneList, PlaneMatch};
use crate::repo::{contains_pattern, planes};

const BY_AIRLINE: &str = "
    SELECT departure, arrival FROM routes
    WHERE UPPER(airline) = ?1
    ORDER BY departure, arrival
";

const ARRIVALS_FROM: &str = "
    SELECT DISTINCT UPPER(arrival) FROM routes
    WHERE UPPER(departure) = ?1
    ORDER BY 1
";

const DEPARTURES_INTO: &str = "
    SELECT departure, airline, planes FROM routes
    WHERE UPPER(arrival) = ?1
";

const DETAILS_FROM: &str = "
    SELECT arrival, airline, planes FROM routes
    WHERE UPPER(departure) = ?1
";

const BETWEEN: &str = "
    SELECT airline, departure, arrival, planes FROM routes
    WHERE UPPER(departure) = ?1 AND UPPER(arrival) = ?2
";

const BY_AIRLINE_AND_AIRCRAFT: &str = "
    SELECT airline, departure, arrival, planes FROM routes
    WHERE UPPER(airline) = ?1 AND UPPER(planes) LIKE ?2 ESCAPE '\\'
";

const BY_PLANE: &str = "
    SELECT airline, departure, arrival, planes FROM routes
    WHERE UPPER(planes) LIKE ?1 ESCAPE '\\'
";

const SELECT_ONE: &str = "
    SELECT airline, departure, arrival, planes FROM routes
    WHERE UPPER(airline) = ?1 AND UPPER(departure) = ?2 AND UPPER(arrival) = ?3
";

const AIRLINE_EXISTS: &str = "SELECT COUNT(*) FROM airlines WHERE UPPER(iata) = ?1";

const AIRPORT_EXISTS: &str = "SELECT COUNT(*) FROM airports WHERE UPPER(iata) = ?1";

const INSERT: &str = "
    INSERT INTO routes (airline, departure, arrival, planes)
    VALUES (?1, ?2, ?3, ?4)
";

const UPDATE_PLANES: &str = "
    UPDATE routes SET planes = ?1
    WHERE UPPER(airline) = ?2 AND UPPER(departure) = ?3 AND UPPER(arrival) = ?4
";

const DELETE: &str = "
    DELETE FROM routes
    WHERE UPPER(airline) = ?1 AND UPPER(departure) = ?2 AND UPPER(arrival) = ?3
";

/// Outcome of adding aircraft to a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaneUnion {
    /// Number of codes that were not on the route before.
    pub added: usize,
    /// The route's plane list after the union.
    pub planes: PlaneList,
}

fn require(value: Option<&str>, message: &str) -> Result<String> {
    normalize_optional(value).ok_or_else(|| Error::validation(message))
}

/// Stored token string alongside the parsed route, for substring matching.
fn route_with_tokens(row: &rusqlite::Row<'_>) -> rusqlite::Result<(Route, String)> {
    let tokens: Option<String> = row.get(3)?;
    Ok((Route::from_row(row)?, tokens.unwrap_or_default()))
}

fn filter_by_plane(rows: Vec<(Route, String)>, code: &str, mode: PlaneMatch) -> Vec<Route> {
    rows.into_iter()
        .filter(|(_, tokens)| mode.matches(&tokens.to_uppercase(), code))
        .map(|(route, _)| route)
        .collect()
}

/// Departure/arrival legs operated by an airline.
pub fn by_airline(db: &Database, airline: Option<&str>) -> Result<Vec<RouteLeg>> {
    let airline = codes::airline_iata(airline).map_err(|_| {
        Error::validation("Invalid or missing airline code. Must be 2 characters.")
    })?;

    let legs = db.query(BY_AIRLINE, [&airline], RouteLeg::from_row)?;
    if legs.is_empty() {
        return Err(Error::not_found("No routes found for the selected airline."));
    }
    Ok(legs)
}

/// Distinct arrival airports reachable from a departure airport.
pub fn arrivals_from(db: &Database, departure: Option<&str>) -> Result<Vec<String>> {
    let departure = require(departure, "Departure airport code is required")?;

    let arrivals = db.query(ARRIVALS_FROM, [&departure], |row| row.get(0))?;
    if arrivals.is_empty() {
        return Err(Error::not_found(
            "No arrival airports found for the specified departure airport",
        ));
    }
    Ok(arrivals)
}

/// Departures, airlines and aircraft flying into an arrival airport.
pub fn departures_into(db: &Database, arrival: Option<&str>) -> Result<Vec<DepartureDetail>> {
    let arrival = require(arrival, "Arrival airport code is required")?;

    let details = db.query(DEPARTURES_INTO, [&arrival], |row| {
        let planes: Option<String> = row.get(2)?;
        Ok(DepartureDetail {
            departure: row.get(0)?,
            airline: row.get(1)?,
            planes: PlaneList::parse(planes.as_deref().unwrap_or_default()),
        })
    })?;
    if details.is_empty() {
        return Err(Error::not_found(
            "No departures found for the specified arrival airport",
        ));
    }
    Ok(details)
}

/// Arrivals, airlines and aircraft flying out of a departure airport.
pub fn details_from(db: &Database, departure: Option<&str>) -> Result<Vec<ArrivalDetail>> {
    let departure = require(departure, "Departure airport code is required")?;

    let details = db.query(DETAILS_FROM, [&departure], |row| {
        let planes: Option<String> = row.get(2)?;
        Ok(ArrivalDetail {
            arrival: row.get(0)?,
            airline: row.get(1)?,
            planes: PlaneList::parse(planes.as_deref().unwrap_or_default()),
        })
    })?;
    if details.is_empty() {
        return Err(Error::not_found(
            "No arrival airports found for the specified departure airport",
        ));
    }
    Ok(details)
}

/// Routes on the exact ordered (departure, arrival) pair. May be empty.
pub fn between(db: &Database, departure: &str, arrival: &str) -> Result<Vec<Route>> {
    db.query(
        BETWEEN,
        [normalize_code(departure), normalize_code(arrival)],
        Route::from_row,
    )
}

/// Routes of an airline that use a given aircraft type.
pub fn search_by_airline_and_aircraft(
    db: &Database,
    airline: Option<&str>,
    aircraft: Option<&str>,
    mode: PlaneMatch,
) -> Result<Vec<RouteLeg>> {
    let invalid = || {
        Error::validation(
            "Invalid airline or aircraft code. Airline must be 2 characters and aircraft must be 3 characters.",
        )
    };
    let airline = codes::airline_iata(airline).map_err(|_| invalid())?;
    let aircraft = normalize_optional(aircraft).ok_or_else(invalid)?;
    codes::check_len(&aircraft, PLANE_CODE_LEN, "aircraft code").map_err(|_| invalid())?;

    let rows = db.query(
        BY_AIRLINE_AND_AIRCRAFT,
        [airline.clone(), contains_pattern(&aircraft)],
        route_with_tokens,
    )?;
    let routes = filter_by_plane(rows, &aircraft, mode);
    debug!(airline = %airline, aircraft = %aircraft, mode = %mode, count = routes.len(), "route search");

    if routes.is_empty() {
        return Err(Error::not_found(
            "No routes found for the specified airline and aircraft type",
        ));
    }
    Ok(routes
        .into_iter()
        .map(|r| RouteLeg {
            departure: r.departure,
            arrival: r.arrival,
        })
        .collect())
}

/// Every route that uses an aircraft type.
pub fn by_plane(db: &Database, code: &str, mode: PlaneMatch) -> Result<Vec<Route>> {
    let code = require(Some(code), "Aircraft code is required")?;

    let rows = db.query(BY_PLANE, [contains_pattern(&code)], route_with_tokens)?;
    let routes = filter_by_plane(rows, &code, mode);
    debug!(code = %code, mode = %mode, count = routes.len(), "routes by plane");

    if routes.is_empty() {
        return Err(Error::not_found("No routes found for this aircraft type"));
    }
    Ok(routes)
}

fn count(conn: &Connection, sql: &str, code: &str) -> Result<i64> {
    Ok(conn.query_row(sql, [code], |row| row.get(0))?)
}

fn find_one(conn: &Connection, ident: &RouteIdent) -> Result<Vec<Route>> {
    query_rows(
        conn,
        SELECT_ONE,
        params![ident.airline, ident.departure, ident.arrival],
        Route::from_row,
    )
}

/// Insert a route after checking its airline, airports and aircraft exist.
pub fn insert(db: &Database, draft: &NewRoute) -> Result<Route> {
    let route = draft.validate()?;

    db.transaction(|tx| {
        if count(tx, AIRLINE_EXISTS, &route.airline)? == 0 {
            return Err(Error::validation("Invalid airline code. Airline not found"));
        }
        if count(tx, AIRPORT_EXISTS, &route.departure)? == 0
            || count(tx, AIRPORT_EXISTS, &route.arrival)? == 0
        {
            return Err(Error::validation(
                "Invalid airport code(s). Departure or arrival airport not found",
            ));
        }
        planes::ensure_known(tx, &route.planes)?;

        if !find_one(tx, &route.ident())?.is_empty() {
            return Err(Error::conflict("Route already exists"));
        }

        tx.execute(
            INSERT,
            params![
                route.airline,
                route.departure,
                route.arrival,
                route.planes.to_token_string()
            ],
        )?;
        Ok(())
    })?;

    info!(
        airline = %route.airline,
        departure = %route.departure,
        arrival = %route.arrival,
        planes = %route.planes,
        "route added"
    );
    Ok(route)
}

/// Union new aircraft into a route's plane list.
///
/// Existing codes are kept in place; only codes not yet present are appended.
/// Nothing is written when every code is already on the route.
pub fn add_planes(db: &Database, update: &PlaneUpdate) -> Result<PlaneUnion> {
    let (ident, new_planes) = update.validate()?;

    let outcome = db.transaction(|tx| {
        let existing = find_one(tx, &ident)?;
        let Some(route) = existing.into_iter().next() else {
            return Err(Error::not_found("Route not found"));
        };
        planes::ensure_known(tx, &new_planes)?;

        let mut planes = route.planes;
        let added = planes.union(&new_planes);
        if added > 0 {
            tx.execute(
                UPDATE_PLANES,
                params![
                    planes.to_token_string(),
                    ident.airline,
                    ident.departure,
                    ident.arrival
                ],
            )?;
        }
        Ok(PlaneUnion { added, planes })
    })?;

    info!(
        airline = %ident.airline,
        departure = %ident.departure,
        arrival = %ident.arrival,
        added = outcome.added,
        "route planes updated"
    );
    Ok(outcome)
}

/// Delete a route, returning the deleted rows.
pub fn delete(db: &Database, key: &RouteKey) -> Result<Vec<Route>> {
    let ident = key.validate()?;

    let deleted = db.transaction(|tx| {
        let rows = find_one(tx, &ident)?;
        if rows.is_empty() {
            return Err(Error::not_found("Route not found"));
        }
        tx.execute(
            DELETE,
            params![ident.airline, ident.departure, ident.arrival],
        )?;
        Ok(rows)
    })?;

    info!(
        airline = %ident.airline,
        departure = %ident.departure,
        arrival = %ident.arrival,
        "route deleted"
    );
    Ok(deleted)
}
