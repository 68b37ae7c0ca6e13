use tracing::debug;

use crate::db::Database;
use crate::error::Result;
use crate::models::Country;

const LIST_ALL: &str = "SELECT name, code FROM countries ORDER BY name ASC";

/// All countries, ordered by name.
pub fn list_all(db: &Database) -> Result<Vec<Country>> {
    let countries = db.query(LIST_ALL, [], Country::from_row)?;
    debug!(count = countries.len(), "listed countries");
    Ok(countries)
}
