use rusqlite::{params, params_from_iter};
use tracing::{debug, info};

use crate::codes::{normalize_code, normalize_optional};
use crate::db::{query_rows, Database};
use crate::error::{Error, Result};
use crate::models::{Airport, CodeFilter, NewAirport};
use crate::repo::code_clause;

const BY_COUNTRY: &str = "
    SELECT airports.name, airports.city, airports.country, airports.iata,
           airports.icao, airports.latitude, airports.longitude
    FROM airports
    JOIN countries ON airports.country = countries.name
    WHERE UPPER(countries.code) = ?1
    ORDER BY airports.name
";

const CODE_IN_USE: &str = "
    SELECT COUNT(*) FROM airports
    WHERE UPPER(iata) = ?1 OR UPPER(icao) = ?2
";

const INSERT: &str = "
    INSERT INTO airports (name, city, country, iata, icao, latitude, longitude)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
";

/// Airports located in the country with the given code.
pub fn by_country(db: &Database, country_code: Option<&str>) -> Result<Vec<Airport>> {
    let code = normalize_optional(country_code)
        .ok_or_else(|| Error::validation("Country code is required"))?;

    let airports = db.query(BY_COUNTRY, [&code], Airport::from_row)?;
    debug!(country = %code, count = airports.len(), "airports by country");

    if airports.is_empty() {
        return Err(Error::not_found(
            "No airports found for the specified country code",
        ));
    }
    Ok(airports)
}

/// Airports matching the ICAO or the IATA code.
pub fn find_by_code(db: &Database, filter: &CodeFilter) -> Result<Vec<Airport>> {
    let filter = filter.validate()?;
    let (clause, values) = code_clause(&filter);
    let sql = format!("SELECT {} FROM airports WHERE {clause}", Airport::COLUMNS);

    let airports = db.query(&sql, params_from_iter(values.iter()), Airport::from_row)?;
    if airports.is_empty() {
        return Err(Error::not_found(
            "No airport found with the specified ICAO or IATA code",
        ));
    }
    Ok(airports)
}

/// Insert an airport after checking that neither code is taken.
pub fn insert(db: &Database, draft: &NewAirport) -> Result<Airport> {
    let airport = draft.validate()?;

    db.transaction(|tx| {
        let in_use: i64 = tx.query_row(
            CODE_IN_USE,
            params![airport.iata, airport.icao],
            |row| row.get(0),
        )?;
        if in_use > 0 {
            return Err(Error::conflict("The IATA or ICAO code already exists"));
        }

        tx.execute(
            INSERT,
            params![
                airport.name,
                airport.city,
                airport.country,
                airport.iata,
                airport.icao,
                airport.latitude,
                airport.longitude
            ],
        )?;
        Ok(())
    })?;

    info!(iata = ?airport.iata, icao = ?airport.icao, name = %airport.name, "airport added");
    Ok(airport)
}

/// Delete airports matching the ICAO or IATA code, returning the deleted rows.
pub fn delete_by_code(db: &Database, filter: &CodeFilter) -> Result<Vec<Airport>> {
    let filter = filter.validate()?;
    let (clause, values) = code_clause(&filter);
    let select = format!("SELECT {} FROM airports WHERE {clause}", Airport::COLUMNS);
    let delete = format!("DELETE FROM airports WHERE {clause}");

    let deleted = db.transaction(|tx| {
        let rows = query_rows(tx, &select, params_from_iter(values.iter()), Airport::from_row)?;
        if rows.is_empty() {
            return Err(Error::not_found("Airport not found"));
        }
        tx.execute(&delete, params_from_iter(values.iter()))?;
        Ok(rows)
    })?;

    info!(count = deleted.len(), "airport(s) deleted");
    Ok(deleted)
}

/// Every airport with the fields needed to pick an origin or destination.
pub fn list_origins(db: &Database) -> Result<Vec<Airport>> {
    let sql = format!("SELECT {} FROM airports ORDER BY name", Airport::COLUMNS);
    let airports = db.query(&sql, [], Airport::from_row)?;
    if airports.is_empty() {
        return Err(Error::not_found("No airports found"));
    }
    Ok(airports)
}

/// Airports that have both coordinates stored.
pub fn with_coordinates(db: &Database) -> Result<Vec<Airport>> {
    let sql = format!(
        "SELECT {} FROM airports WHERE latitude IS NOT NULL AND longitude IS NOT NULL",
        Airport::COLUMNS
    );
    db.query(&sql, [], Airport::from_row)
}

/// Airports whose IATA code is either of the two codes.
pub fn find_by_iata_pair(db: &Database, first: &str, second: &str) -> Result<Vec<Airport>> {
    let sql = format!(
        "SELECT {} FROM airports WHERE UPPER(iata) = ?1 OR UPPER(iata) = ?2",
        Airport::COLUMNS
    );
    db.query(
        &sql,
        [normalize_code(first), normalize_code(second)],
        Airport::from_row,
    )
}

/// Airports whose IATA or ICAO code is either of the two codes.
pub fn find_by_any_code(db: &Database, first: &str, second: &str) -> Result<Vec<Airport>> {
    let sql = format!(
        "SELECT {} FROM airports
         WHERE UPPER(iata) = ?1 OR UPPER(icao) = ?1 OR UPPER(iata) = ?2 OR UPPER(icao) = ?2",
        Airport::COLUMNS
    );
    db.query(
        &sql,
        [normalize_code(first), normalize_code(second)],
        Airport::from_row,
    )
}
