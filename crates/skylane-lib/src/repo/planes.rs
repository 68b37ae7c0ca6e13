use std::collections::HashSet;

use rusqlite::{params_from_iter, Connection};

use crate::db::{placeholders, query_rows, Database};
use crate::error::{Error, Result};
use crate::models::Plane;
use crate::planes::PlaneList;

const LIST_ALL: &str = "SELECT name, code FROM planes";

const LIST_DISTINCT: &str = "
    SELECT DISTINCT name, code FROM planes
    WHERE code IS NOT NULL AND code != ''
    ORDER BY name
";

/// The whole aircraft catalog.
pub fn list_all(db: &Database) -> Result<Vec<Plane>> {
    let planes = db.query(LIST_ALL, [], Plane::from_row)?;
    if planes.is_empty() {
        return Err(Error::not_found("No aircraft types found"));
    }
    Ok(planes)
}

/// Catalog entries that carry a code, ordered by name.
pub fn list_distinct(db: &Database) -> Result<Vec<Plane>> {
    let planes = db.query(LIST_DISTINCT, [], Plane::from_row)?;
    if planes.is_empty() {
        return Err(Error::not_found("No aircraft types found"));
    }
    Ok(planes)
}

/// Which of `codes` exist in the catalog (upper-cased).
pub fn existing_codes(conn: &Connection, codes: &PlaneList) -> Result<HashSet<String>> {
    if codes.is_empty() {
        return Ok(HashSet::new());
    }

    let sql = format!(
        "SELECT DISTINCT UPPER(code) FROM planes WHERE UPPER(code) IN ({})",
        placeholders(1, codes.len())
    );
    let found = query_rows(conn, &sql, params_from_iter(codes.iter()), |row| {
        row.get::<_, String>(0)
    })?;
    Ok(found.into_iter().collect())
}

/// Fail with a validation error unless every code is in the catalog.
pub(crate) fn ensure_known(conn: &Connection, codes: &PlaneList) -> Result<()> {
    let known = existing_codes(conn, codes)?;
    let unknown: Vec<&str> = codes.iter().filter(|c| !known.contains(*c)).collect();
    if unknown.is_empty() {
        Ok(())
    } else {
        Err(Error::validation(format!(
            "One or more aircraft codes do not exist in the planes table: {}",
            unknown.join(", ")
        )))
    }
}
