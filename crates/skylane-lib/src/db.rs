//! Pooled SQLite access: the query executor every repository builds on.
//!
//! A [`Database`] owns a bounded `r2d2` pool. Each executor call checks out
//! one connection, runs exactly one parameterized statement (or one
//! transaction closure) and hands the connection back when the guard drops,
//! on success, error and unwind alike.

use std::path::{Path, PathBuf};
use std::time::Duration;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, Params, Row, Transaction, TransactionBehavior};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::schema::SCHEMA;

/// Default upper bound on pooled connections.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 8;

/// Default busy timeout applied to every pooled connection.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Pool tuning knobs.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub busy_timeout: Duration,
    /// Refuse to open a path that does not exist yet.
    pub must_exist: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            must_exist: false,
        }
    }
}

impl DatabaseConfig {
    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections.max(1);
        self
    }

    pub fn must_exist(mut self, must_exist: bool) -> Self {
        self.must_exist = must_exist;
        self
    }
}

/// Handle to the relational store. Cheap to clone; clones share the pool.
#[derive(Clone)]
pub struct Database {
    pool: Pool<SqliteConnectionManager>,
    path: PathBuf,
}

impl Database {
    /// Open (or create) the database file at `path` behind a connection pool.
    pub fn open(path: impl AsRef<Path>, config: &DatabaseConfig) -> Result<Self> {
        let path = path.as_ref();
        if config.must_exist && !path.exists() {
            return Err(Error::DatabaseNotFound {
                path: path.to_path_buf(),
            });
        }

        let busy_timeout = config.busy_timeout;
        let manager = SqliteConnectionManager::file(path)
            .with_init(move |conn| conn.busy_timeout(busy_timeout));
        let pool = Pool::builder()
            .max_size(config.max_connections)
            .build(manager)?;

        debug!(
            path = %path.display(),
            max_connections = config.max_connections,
            "opened connection pool"
        );

        Ok(Self {
            pool,
            path: path.to_path_buf(),
        })
    }

    /// Location of the backing database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run one parameterized query and map every row.
    pub fn query<T, P, F>(&self, sql: &str, params: P, map: F) -> Result<Vec<T>>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let conn = self.pool.get()?;
        query_rows(&conn, sql, params, map)
    }

    /// Run one parameterized write and return the affected row count.
    pub fn execute<P: Params>(&self, sql: &str, params: P) -> Result<usize> {
        let conn = self.pool.get()?;
        Ok(conn.execute(sql, params)?)
    }

    /// Run `f` inside a `BEGIN IMMEDIATE` transaction.
    ///
    /// Commits when `f` returns `Ok`; any `Err` (or unwind) rolls back when the
    /// transaction guard drops.
    pub fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    /// Execute a batch of SQL statements, such as a seed script.
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute_batch(sql)?;
        Ok(())
    }

    /// Liveness check against the store.
    pub fn ping(&self) -> Result<()> {
        let conn = self.pool.get()?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.pool.state();
        f.debug_struct("Database")
            .field("path", &self.path)
            .field("connections", &state.connections)
            .field("idle_connections", &state.idle_connections)
            .finish()
    }
}

/// Run one parameterized query on an already checked-out connection.
///
/// Repositories use this inside [`Database::transaction`] closures.
pub fn query_rows<T, P, F>(conn: &Connection, sql: &str, params: P, map: F) -> Result<Vec<T>>
where
    P: Params,
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, map)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Build `?start, ?start+1, ...` placeholders for an `IN (...)` list.
pub fn placeholders(start: usize, count: usize) -> String {
    (start..start + count)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Create the five-table schema if it does not exist yet.
pub fn init_schema(db: &Database) -> Result<()> {
    db.execute_batch(SCHEMA)?;
    info!(path = %db.path().display(), "schema ready");
    Ok(())
}
