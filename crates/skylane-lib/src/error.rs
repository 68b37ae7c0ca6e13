use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the Skylane library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// A required field is missing or malformed. Raised before any store access.
    #[error("{message}")]
    Validation { message: String },

    /// A lookup returned no rows where at least one was expected.
    #[error("{message}")]
    NotFound { message: String },

    /// A uniqueness check failed before an insert.
    #[error("{message}")]
    Conflict { message: String },

    /// Stored data cannot satisfy the request (for example an airport without coordinates).
    #[error("{message}")]
    DataIntegrity { message: String },

    /// The weather provider was unavailable or answered with an unusable payload.
    #[error("upstream error: {message}")]
    Upstream { message: String },

    /// Database file could not be located at the resolved path.
    #[error("database not found at {path}")]
    DatabaseNotFound { path: PathBuf },

    /// Wrapper for SQLite errors.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// Wrapper for connection pool errors.
    #[error(transparent)]
    Pool(#[from] r2d2::Error),

    /// Wrapper for HTTP client errors.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Error::NotFound {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Error::Conflict {
            message: message.into(),
        }
    }

    pub fn data_integrity(message: impl Into<String>) -> Self {
        Error::DataIntegrity {
            message: message.into(),
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Error::Upstream {
            message: message.into(),
        }
    }

    /// Short, stable label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Validation { .. } => "validation_error",
            Error::NotFound { .. } => "not_found",
            Error::Conflict { .. } => "conflict",
            Error::DataIntegrity { .. } => "data_integrity",
            Error::Upstream { .. } | Error::Http(_) => "upstream_error",
            Error::DatabaseNotFound { .. }
            | Error::Sqlite(_)
            | Error::Pool(_)
            | Error::Io(_) => "internal_error",
        }
    }
}
