use rusqlite::{params, params_from_iter};
use tracing::{debug, info};

use crate::codes::normalize_optional;
use crate::db::{query_rows, Database};
use crate::error::{Error, Result};
use crate::models::{Airline, AirlineSummary, CodeFilter, NewAirline};
use crate::repo::code_clause;

const BY_COUNTRY: &str = "
    SELECT airlines.name, airlines.iata, airlines.icao, airlines.callsign, airlines.country
    FROM airlines
    JOIN countries ON airlines.country = countries.name
    WHERE UPPER(countries.code) = ?1
    ORDER BY airlines.name
";

const CODE_IN_USE: &str = "
    SELECT COUNT(*) FROM airlines
    WHERE UPPER(iata) = ?1 OR UPPER(icao) = ?2
";

const INSERT: &str = "
    INSERT INTO airlines (name, iata, icao, callsign, country)
    VALUES (?1, ?2, ?3, ?4, ?5)
";

const SERVING_AIRPORT: &str = "
    SELECT DISTINCT al.name, al.iata, al.country
    FROM routes r
    JOIN airlines al ON UPPER(r.airline) = UPPER(al.iata)
    WHERE UPPER(r.departure) = ?1 OR UPPER(r.arrival) = ?1
    ORDER BY al.name
";

/// Every airline, ordered by name.
pub fn list_all(db: &Database) -> Result<Vec<Airline>> {
    let sql = format!("SELECT {} FROM airlines ORDER BY name ASC", Airline::COLUMNS);
    db.query(&sql, [], Airline::from_row)
}

/// Airlines registered in the country with the given code.
pub fn by_country(db: &Database, country_code: Option<&str>) -> Result<Vec<Airline>> {
    let code = normalize_optional(country_code)
        .ok_or_else(|| Error::validation("Country code is required"))?;

    let airlines = db.query(BY_COUNTRY, [&code], Airline::from_row)?;
    debug!(country = %code, count = airlines.len(), "airlines by country");

    if airlines.is_empty() {
        return Err(Error::not_found(
            "No airlines found for the specified country code",
        ));
    }
    Ok(airlines)
}

/// Airlines matching the ICAO or the IATA code (case-insensitive).
pub fn find_by_code(db: &Database, filter: &CodeFilter) -> Result<Vec<Airline>> {
    let filter = filter.validate()?;
    let (clause, values) = code_clause(&filter);
    let sql = format!("SELECT {} FROM airlines WHERE {clause}", Airline::COLUMNS);

    let airlines = db.query(&sql, params_from_iter(values.iter()), Airline::from_row)?;
    if airlines.is_empty() {
        return Err(Error::not_found(
            "No airline found with the specified ICAO or IATA code",
        ));
    }
    Ok(airlines)
}

/// Insert an airline after checking that neither code is taken.
///
/// The check and the write share one transaction.
pub fn insert(db: &Database, draft: &NewAirline) -> Result<Airline> {
    let airline = draft.validate()?;

    db.transaction(|tx| {
        let in_use: i64 = tx.query_row(
            CODE_IN_USE,
            params![airline.iata, airline.icao],
            |row| row.get(0),
        )?;
        if in_use > 0 {
            return Err(Error::conflict("The IATA or ICAO code already exists"));
        }

        tx.execute(
            INSERT,
            params![
                airline.name,
                airline.iata,
                airline.icao,
                airline.callsign,
                airline.country
            ],
        )?;
        Ok(())
    })?;

    info!(iata = ?airline.iata, icao = ?airline.icao, name = %airline.name, "airline added");
    Ok(airline)
}

/// Delete airlines matching the ICAO or IATA code, returning the deleted rows.
pub fn delete_by_code(db: &Database, filter: &CodeFilter) -> Result<Vec<Airline>> {
    let filter = filter.validate()?;
    let (clause, values) = code_clause(&filter);
    let select = format!("SELECT {} FROM airlines WHERE {clause}", Airline::COLUMNS);
    let delete = format!("DELETE FROM airlines WHERE {clause}");

    let deleted = db.transaction(|tx| {
        let rows = query_rows(tx, &select, params_from_iter(values.iter()), Airline::from_row)?;
        if rows.is_empty() {
            return Err(Error::not_found("Airline not found"));
        }
        tx.execute(&delete, params_from_iter(values.iter()))?;
        Ok(rows)
    })?;

    info!(count = deleted.len(), "airline(s) deleted");
    Ok(deleted)
}

/// Distinct airlines flying into or out of an airport.
pub fn serving_airport(db: &Database, iata: Option<&str>) -> Result<Vec<AirlineSummary>> {
    let code = normalize_optional(iata).ok_or_else(|| Error::validation("Missing airport code"))?;

    let airlines = db.query(SERVING_AIRPORT, [&code], AirlineSummary::from_row)?;
    debug!(airport = %code, count = airlines.len(), "airlines serving airport");

    if airlines.is_empty() {
        return Err(Error::not_found(
            "No airlines found for the selected airport.",
        ));
    }
    Ok(airlines)
}
