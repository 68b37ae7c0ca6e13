//! Entity repositories.
//!
//! Each submodule wraps the [`Database`](crate::db::Database) executor with
//! the statement templates and input validation for one table. Codes are
//! compared upper-cased on both sides so legacy rows stored in lower case
//! still match.

pub mod airlines;
pub mod airports;
pub mod countries;
pub mod planes;
pub mod routes;

use crate::models::CodeFilter;

/// Build an `UPPER(col) = ?n OR ...` clause for a validated [`CodeFilter`].
///
/// Returns the clause and its positional values in placeholder order.
pub(crate) fn code_clause(filter: &CodeFilter) -> (String, Vec<String>) {
    let mut conditions = Vec::new();
    let mut values = Vec::new();

    if let Some(icao) = &filter.icao {
        values.push(icao.clone());
        conditions.push(format!("UPPER(icao) = ?{}", values.len()));
    }
    if let Some(iata) = &filter.iata {
        values.push(iata.clone());
        conditions.push(format!("UPPER(iata) = ?{}", values.len()));
    }

    (conditions.join(" OR "), values)
}

/// `LIKE` pattern matching `code` anywhere, with wildcards escaped by `\`.
pub(crate) fn contains_pattern(code: &str) -> String {
    let escaped = code
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}
