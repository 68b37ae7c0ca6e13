//! Ordered plane-code lists and aircraft matching.
//!
//! Routes persist their aircraft as a single space-delimited token string
//! (`"320 321 738"`). [`PlaneList`] is the typed view of that column: parsing
//! splits on whitespace, serializing joins with one space. Stored tokens are
//! kept exactly as written, including repeats and legacy lower-case codes;
//! only codes appended through [`PlaneList::union`] are checked for presence.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::codes::{normalize_code, PLANE_CODE_LEN};
use crate::error::{Error, Result};

/// Ordered list of plane codes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaneList(Vec<String>);

impl PlaneList {
    /// Parse a stored token string. Empty tokens are dropped, everything else
    /// is kept in order.
    pub fn parse(tokens: &str) -> Self {
        PlaneList(tokens.split_whitespace().map(str::to_string).collect())
    }

    /// Parse user input, normalizing and validating every token.
    ///
    /// Each token must be a 3-character code. The error lists every invalid
    /// token. Repeated codes in the input collapse to one.
    pub fn parse_input(tokens: &str) -> Result<Self> {
        let raw: Vec<String> = tokens.split_whitespace().map(normalize_code).collect();
        if raw.is_empty() {
            return Err(Error::validation("At least one aircraft code is required"));
        }

        let invalid: Vec<&str> = raw
            .iter()
            .filter(|code| code.chars().count() != PLANE_CODE_LEN)
            .map(String::as_str)
            .collect();
        if !invalid.is_empty() {
            return Err(Error::validation(format!(
                "Invalid aircraft code(s): {}",
                invalid.join(", ")
            )));
        }

        let mut list = PlaneList::default();
        for code in raw {
            list.push(code);
        }
        Ok(list)
    }

    fn push(&mut self, code: String) -> bool {
        if self.contains(&code) {
            false
        } else {
            self.0.push(code);
            true
        }
    }

    /// Append every code from `other` not already present.
    ///
    /// Existing tokens are never removed or reordered. Returns the number added.
    pub fn union(&mut self, other: &PlaneList) -> usize {
        other
            .iter()
            .filter(|code| self.push((*code).to_string()))
            .count()
    }

    /// Whether `code` is one of the tokens, ignoring ASCII case.
    pub fn contains(&self, code: &str) -> bool {
        self.0.iter().any(|c| c.eq_ignore_ascii_case(code))
    }

    /// Serialize back to the stored space-delimited form.
    pub fn to_token_string(&self) -> String {
        self.0.join(" ")
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PlaneList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_token_string())
    }
}

/// How an aircraft code is matched against a route's plane list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaneMatch {
    /// A route matches when one of its tokens equals the code.
    #[default]
    Exact,
    /// A route matches when the token string contains the code anywhere,
    /// so `A32` also matches `A320`.
    Substring,
}

impl PlaneMatch {
    /// Whether the stored token string matches `code` under this mode.
    pub fn matches(self, stored: &str, code: &str) -> bool {
        match self {
            PlaneMatch::Exact => PlaneList::parse(stored).contains(code),
            PlaneMatch::Substring => stored.contains(code),
        }
    }
}

impl FromStr for PlaneMatch {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "exact" => Ok(PlaneMatch::Exact),
            "substring" | "contains" => Ok(PlaneMatch::Substring),
            other => Err(Error::validation(format!(
                "unknown plane match mode '{other}', expected 'exact' or 'substring'"
            ))),
        }
    }
}

impl fmt::Display for PlaneMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaneMatch::Exact => f.write_str("exact"),
            PlaneMatch::Substring => f.write_str("substring"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keeps_stored_tokens_in_order() {
        let list = PlaneList::parse("320  321 320\t738");
        assert_eq!(list.to_token_string(), "320 321 320 738");
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn union_leaves_repeated_stored_tokens_alone() {
        let mut current = PlaneList::parse("320 320 321");
        let added = current.union(&PlaneList::parse("744 320"));
        assert_eq!(added, 1);
        assert_eq!(current.to_token_string(), "320 320 321 744");
    }

    #[test]
    fn union_ignores_case_of_stored_tokens() {
        let mut current = PlaneList::parse("320 crj");
        let added = current.union(&PlaneList::parse_input("crj").unwrap());
        assert_eq!(added, 0);
        assert_eq!(current.to_token_string(), "320 crj");
    }

    #[test]
    fn parse_input_collapses_repeats() {
        let list = PlaneList::parse_input("320 320 crj CRJ").unwrap();
        assert_eq!(list.to_token_string(), "320 CRJ");
    }

    #[test]
    fn union_appends_only_new_tokens() {
        let mut current = PlaneList::parse("320 321");
        let added = current.union(&PlaneList::parse("321 738 319"));
        assert_eq!(added, 2);
        assert_eq!(current.to_token_string(), "320 321 738 319");
    }

    #[test]
    fn union_is_idempotent() {
        let update = PlaneList::parse("738 320");
        let mut once = PlaneList::parse("320 321");
        once.union(&update);

        let mut twice = once.clone();
        let added = twice.union(&update);

        assert_eq!(added, 0);
        assert_eq!(once.to_token_string(), twice.to_token_string());
    }

    #[test]
    fn parse_input_rejects_wrong_lengths() {
        let err = PlaneList::parse_input("320 A3 7378").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("A3"));
        assert!(message.contains("7378"));
        assert!(!message.contains("320,"));
    }

    #[test]
    fn parse_input_normalizes_case() {
        let list = PlaneList::parse_input("crj e90").unwrap();
        assert_eq!(list.to_token_string(), "CRJ E90");
    }

    #[test]
    fn parse_input_requires_a_token() {
        assert!(PlaneList::parse_input("   ").is_err());
    }

    #[test]
    fn exact_match_does_not_collide_with_longer_tokens() {
        assert!(!PlaneMatch::Exact.matches("A320 737", "A32"));
        assert!(PlaneMatch::Exact.matches("A320 A32", "A32"));
    }

    #[test]
    fn substring_match_keeps_legacy_behaviour() {
        assert!(PlaneMatch::Substring.matches("A320 737", "A32"));
        assert!(!PlaneMatch::Substring.matches("737 738", "A32"));
    }

    #[test]
    fn plane_match_parses_from_config() {
        assert_eq!("Exact".parse::<PlaneMatch>().unwrap(), PlaneMatch::Exact);
        assert_eq!(
            "substring".parse::<PlaneMatch>().unwrap(),
            PlaneMatch::Substring
        );
        assert!("fuzzy".parse::<PlaneMatch>().is_err());
    }

    #[test]
    fn serializes_as_plain_array() {
        let json = serde_json::to_string(&PlaneList::parse("320 321")).unwrap();
        assert_eq!(json, r#"["320","321"]"#);
    }
}
