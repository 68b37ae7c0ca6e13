//! IATA/ICAO code normalization and structural checks.
//!
//! Every code entering the library is trimmed and upper-cased here, for
//! airlines, airports, countries and planes alike.

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

/// Length of an airline IATA designator.
pub const AIRLINE_IATA_LEN: usize = 2;
/// Length of an airport IATA location identifier.
pub const AIRPORT_IATA_LEN: usize = 3;
/// Length of an airport ICAO location indicator.
pub const AIRPORT_ICAO_LEN: usize = 4;
/// Length of an aircraft type code.
pub const PLANE_CODE_LEN: usize = 3;

/// Trim and upper-case a code.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Normalize an optional code, mapping blank values to `None`.
pub fn normalize_optional(code: Option<&str>) -> Option<String> {
    code.map(normalize_code).filter(|c| !c.is_empty())
}

/// Normalize a required code, rejecting missing or blank input.
pub fn require_code(code: Option<&str>, field: &str) -> Result<String> {
    normalize_optional(code).ok_or_else(|| Error::validation(format!("{field} is required")))
}

/// Check that a normalized code has exactly `len` characters.
pub fn check_len(code: &str, len: usize, what: &str) -> Result<()> {
    if code.chars().count() == len {
        Ok(())
    } else {
        Err(Error::validation(format!(
            "Invalid {what} '{code}'. It must be a {len}-character code"
        )))
    }
}

/// Normalize and length-check an airline IATA code.
pub fn airline_iata(code: Option<&str>) -> Result<String> {
    let code = require_code(code, "airline")?;
    check_len(&code, AIRLINE_IATA_LEN, "airline code")?;
    Ok(code)
}

/// Normalize and length-check an airport IATA code.
pub fn airport_iata(code: Option<&str>, field: &str) -> Result<String> {
    let code = require_code(code, field)?;
    check_len(&code, AIRPORT_IATA_LEN, "airport code")?;
    Ok(code)
}

/// Which identifier family a supplied code matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CodeKind {
    Iata,
    Icao,
    Unknown,
}

impl fmt::Display for CodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            CodeKind::Iata => "IATA",
            CodeKind::Icao => "ICAO",
            CodeKind::Unknown => "Unknown",
        };
        f.write_str(value)
    }
}

/// Report whether `code` is the IATA or ICAO code of an airport.
pub fn classify(code: &str, iata: Option<&str>, icao: Option<&str>) -> CodeKind {
    let code = normalize_code(code);
    if iata.is_some_and(|i| i.eq_ignore_ascii_case(&code)) {
        CodeKind::Iata
    } else if icao.is_some_and(|i| i.eq_ignore_ascii_case(&code)) {
        CodeKind::Icao
    } else {
        CodeKind::Unknown
    }
}
