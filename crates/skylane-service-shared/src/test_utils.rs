//! Test utilities for handler testing.
//!
//! Builds an [`AppState`] over a temporary database loaded with the seed
//! fixture, and a [`StubForecaster`] that answers without network access.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use skylane_lib::{
    init_schema, Coordinates, Database, DatabaseConfig, Error as LibError, Forecaster,
    PlaneMatch, Result as LibResult, TemperatureRange,
};
use tempfile::TempDir;

use crate::state::AppState;

/// Path to the seed SQL fixture shared by every crate's tests.
pub const SEED_SQL_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../docs/fixtures/seed.sql");

/// Codes known to exist in the seed fixture.
pub mod fixture_codes {
    /// New York JFK, has coordinates and routes.
    pub const JFK: &str = "JFK";
    /// London Heathrow, has coordinates and routes.
    pub const LHR: &str = "LHR";
    /// Airport row stored without coordinates.
    pub const NO_COORDINATES: &str = "NWF";
    /// British Airways.
    pub const BA: &str = "BA";
}

/// Forecaster that returns a fixed answer and counts calls.
#[derive(Debug)]
pub struct StubForecaster {
    answer: Option<TemperatureRange>,
    calls: AtomicUsize,
}

impl StubForecaster {
    /// Always answer with `range`.
    pub fn returning(range: TemperatureRange) -> Self {
        Self {
            answer: Some(range),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always fail with an upstream error.
    pub fn failing() -> Self {
        Self {
            answer: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of forecasts requested so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Forecaster for StubForecaster {
    async fn todays_range(&self, _at: Coordinates) -> LibResult<TemperatureRange> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer
            .ok_or_else(|| LibError::upstream("stub forecaster unavailable"))
    }
}

/// Open a temp database with the schema and the seed fixture applied.
///
/// # Panics
///
/// Panics if the fixture cannot be applied. This indicates a test
/// configuration issue.
pub fn seeded_database() -> (TempDir, Database) {
    let dir = TempDir::new().unwrap_or_else(|e| panic!("failed to create temp dir: {e}"));
    let db = Database::open(dir.path().join("skylane.db"), &DatabaseConfig::default())
        .unwrap_or_else(|e| panic!("failed to open test database: {e}"));
    init_schema(&db).unwrap_or_else(|e| panic!("failed to create schema: {e}"));

    let seed = std::fs::read_to_string(seed_sql_path())
        .unwrap_or_else(|e| panic!("failed to read {SEED_SQL_PATH}: {e}"));
    db.execute_batch(&seed)
        .unwrap_or_else(|e| panic!("failed to apply seed fixture: {e}"));
    (dir, db)
}

/// Seeded state with a forecaster answering 18.5 / 9.0 °C.
///
/// Keep the returned `TempDir` alive for as long as the state is used.
pub fn seeded_state(plane_match: PlaneMatch) -> (TempDir, AppState) {
    seeded_state_with(
        plane_match,
        Arc::new(StubForecaster::returning(TemperatureRange {
            high: 18.5,
            low: 9.0,
        })),
    )
}

/// Seeded state with a caller-supplied forecaster.
pub fn seeded_state_with(
    plane_match: PlaneMatch,
    forecaster: Arc<dyn Forecaster>,
) -> (TempDir, AppState) {
    let (dir, db) = seeded_database();
    (dir, AppState::from_components(db, forecaster, plane_match))
}

/// Get the absolute path to the seed fixture.
pub fn seed_sql_path() -> PathBuf {
    PathBuf::from(SEED_SQL_PATH)
}

/// Generate a unique request ID for testing.
pub fn test_request_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("test-{}", timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_fixture_exists() {
        let path = seed_sql_path();
        assert!(path.exists(), "seed fixture not found at {:?}", path);
    }

    #[test]
    fn test_seeded_state_contains_fixture_airports() {
        let (_dir, state) = seeded_state(PlaneMatch::Exact);
        let codes = state
            .db()
            .query(
                "SELECT iata FROM airports WHERE iata IN (?1, ?2, ?3)",
                [fixture_codes::JFK, fixture_codes::LHR, fixture_codes::NO_COORDINATES],
                |row| row.get::<_, String>(0),
            )
            .unwrap();
        assert_eq!(codes.len(), 3);
    }

    #[tokio::test]
    async fn test_stub_forecaster_counts_calls() {
        let stub = StubForecaster::returning(TemperatureRange { high: 1.0, low: 0.0 });
        stub.todays_range(Coordinates::new(0.0, 0.0)).await.unwrap();
        stub.todays_range(Coordinates::new(1.0, 1.0)).await.unwrap();
        assert_eq!(stub.calls(), 2);

        let failing = StubForecaster::failing();
        let err = failing
            .todays_range(Coordinates::new(0.0, 0.0))
            .await
            .unwrap_err();
        assert!(matches!(err, LibError::Upstream { .. }));
    }

    #[test]
    fn test_request_id_unique() {
        let id1 = test_request_id();
        let id2 = test_request_id();
        assert_ne!(id1, id2);
    }
}
