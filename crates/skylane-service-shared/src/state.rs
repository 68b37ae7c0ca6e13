//! Application state for the REST service.
//!
//! Holds the pooled database handle, the weather capability and the aircraft
//! matching mode. Repository calls are synchronous, so handlers run them
//! through [`AppState::run`] on the blocking thread pool.

use std::sync::Arc;

use skylane_lib::{init_schema, Database, Error as LibError, Forecaster, OpenMeteoClient, PlaneMatch};

use crate::config::ServiceConfig;

/// Error during application state initialization.
#[derive(Debug)]
pub enum AppStateError {
    /// Failed to open or prepare the database.
    Database(LibError),

    /// Failed to build the weather client.
    Weather(LibError),
}

impl std::fmt::Display for AppStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Database(e) => write!(f, "failed to open database: {}", e),
            Self::Weather(e) => write!(f, "failed to build weather client: {}", e),
        }
    }
}

impl std::error::Error for AppStateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Database(e) | Self::Weather(e) => Some(e),
        }
    }
}

/// Name and version the service reports about itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceIdentity {
    pub name: String,
    pub version: String,
}

impl ServiceIdentity {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl Default for ServiceIdentity {
    fn default() -> Self {
        Self::new("skylane", "unknown")
    }
}

/// Shared application state for all axum handlers.
///
/// Cheaply cloneable; clones share the same pool and forecaster.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    db: Database,
    forecaster: Arc<dyn Forecaster>,
    plane_match: PlaneMatch,
    identity: ServiceIdentity,
}

impl AppState {
    /// Open the database described by `config`, optionally create the schema,
    /// check the store is reachable and build the Open-Meteo client.
    pub fn open(config: &ServiceConfig) -> Result<Self, AppStateError> {
        tracing::info!(path = %config.db_path.display(), pool_size = config.pool_size, "opening database");
        let db = Database::open(&config.db_path, &config.database_config())
            .map_err(AppStateError::Database)?;

        if config.init_schema {
            init_schema(&db).map_err(AppStateError::Database)?;
        }

        match db.ping() {
            Ok(()) => tracing::info!("database liveness check passed"),
            Err(e) => {
                tracing::error!(error = %e, "database liveness check failed");
                return Err(AppStateError::Database(e));
            }
        }

        let forecaster = OpenMeteoClient::new(config.weather_url.clone(), config.weather_timeout)
            .map_err(AppStateError::Weather)?;

        Ok(Self::from_components(
            db,
            Arc::new(forecaster),
            config.plane_match,
        ))
    }

    /// Create application state from pre-built components.
    ///
    /// This is useful for testing with a stub forecaster.
    pub fn from_components(
        db: Database,
        forecaster: Arc<dyn Forecaster>,
        plane_match: PlaneMatch,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                db,
                forecaster,
                plane_match,
                identity: ServiceIdentity::default(),
            }),
        }
    }

    /// Replace the name and version reported by the health probes.
    pub fn with_identity(self, identity: ServiceIdentity) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                db: self.inner.db.clone(),
                forecaster: Arc::clone(&self.inner.forecaster),
                plane_match: self.inner.plane_match,
                identity,
            }),
        }
    }

    /// Access the database handle.
    pub fn db(&self) -> &Database {
        &self.inner.db
    }

    /// Access the weather capability.
    pub fn forecaster(&self) -> &dyn Forecaster {
        self.inner.forecaster.as_ref()
    }

    /// Aircraft matching mode for route searches.
    pub fn plane_match(&self) -> PlaneMatch {
        self.inner.plane_match
    }

    pub fn identity(&self) -> &ServiceIdentity {
        &self.inner.identity
    }

    /// Run a synchronous store operation on the blocking thread pool.
    pub async fn run<T, F>(&self, f: F) -> Result<T, LibError>
    where
        F: FnOnce(&Database) -> Result<T, LibError> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.inner.db.clone();
        tokio::task::spawn_blocking(move || f(&db))
            .await
            .map_err(|e| LibError::Io(std::io::Error::other(e.to_string())))?
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("db", &self.inner.db)
            .field("plane_match", &self.inner.plane_match)
            .field("identity", &self.inner.identity)
            .finish()
    }
}
