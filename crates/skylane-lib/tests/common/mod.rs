use std::path::PathBuf;

use skylane_lib::{init_schema, Database, DatabaseConfig};
use tempfile::TempDir;

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// Fresh database in a temp dir with the schema and the seed fixture applied.
pub fn seeded_db() -> (TempDir, Database) {
    let dir = TempDir::new().expect("create temp dir");
    let db = Database::open(dir.path().join("skylane.db"), &DatabaseConfig::default())
        .expect("open database");
    init_schema(&db).expect("create schema");

    let seed = std::fs::read_to_string(fixtures_dir().join("seed.sql")).expect("read seed.sql");
    db.execute_batch(&seed).expect("apply seed");
    (dir, db)
}
