//! Unified error type for data layer
//!
//! This module provides a unified error type that can represent errors from
//! both transactional backends (SQLite, PostgreSQL).

use thiserror::Error;

/// Unified error type for data layer operations
///
/// This error type wraps backend-specific errors while preserving context
/// about which backend generated the error.
#[derive(Error, Debug)]
pub enum DataError {
    /// SQLite database error
    #[error("SQLite error: {0}")]
    Sqlite(sqlx::Error),

    /// PostgreSQL database error
    #[error("PostgreSQL error: {0}")]
    Postgres(sqlx::Error),

    /// Migration failed
    #[error("Migration {version} ({name}) failed on {backend}: {error}")]
    MigrationFailed {
        backend: &'static str,
        version: i32,
        name: String,
        error: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A report group summed to zero installs, so cpi is undefined
    #[error("Division by zero computing cpi on {backend}")]
    DivisionByZero { backend: &'static str },
}

impl DataError {
    /// Check if this is a connection-related error that might be transient
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Sqlite(e) | Self::Postgres(e) => {
                matches!(
                    e,
                    sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
                )
            }
            _ => false,
        }
    }

    /// Get the backend name that generated this error
    pub fn backend(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "sqlite",
            Self::Postgres(_) => "postgres",
            Self::MigrationFailed { backend, .. } => backend,
            Self::DivisionByZero { backend } => backend,
            Self::Config(_) => "unknown",
        }
    }
}

/// Convert from the SQLite backend error
impl From<crate::data::sqlite::SqliteError> for DataError {
    fn from(e: crate::data::sqlite::SqliteError) -> Self {
        match e {
            crate::data::sqlite::SqliteError::Database(e) => Self::Sqlite(e),
            crate::data::sqlite::SqliteError::MigrationFailed {
                version,
                name,
                error,
            } => Self::MigrationFailed {
                backend: "sqlite",
                version,
                name,
                error,
            },
            crate::data::sqlite::SqliteError::DivisionByZero => {
                Self::DivisionByZero { backend: "sqlite" }
            }
        }
    }
}

/// Convert from the PostgreSQL backend error
impl From<crate::data::postgres::PostgresError> for DataError {
    fn from(e: crate::data::postgres::PostgresError) -> Self {
        match e {
            crate::data::postgres::PostgresError::Database(e) => Self::Postgres(e),
            crate::data::postgres::PostgresError::MigrationFailed {
                version,
                name,
                error,
            } => Self::MigrationFailed {
                backend: "postgres",
                version,
                name,
                error,
            },
            crate::data::postgres::PostgresError::Config(msg) => Self::Config(msg),
            crate::data::postgres::PostgresError::DivisionByZero => {
                Self::DivisionByZero { backend: "postgres" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::postgres::PostgresError;
    use crate::data::sqlite::SqliteError;

    #[test]
    fn test_migration_failed_error_display() {
        let err = DataError::MigrationFailed {
            backend: "postgres",
            version: 2,
            name: "add_metrics_index".to_string(),
            error: "syntax error".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Migration 2 (add_metrics_index) failed on postgres: syntax error"
        );
    }

    #[test]
    fn test_division_by_zero_from_backends() {
        let err: DataError = SqliteError::DivisionByZero.into();
        assert!(matches!(err, DataError::DivisionByZero { backend: "sqlite" }));

        let err: DataError = PostgresError::DivisionByZero.into();
        assert_eq!(err.backend(), "postgres");
        assert_eq!(err.to_string(), "Division by zero computing cpi on postgres");
    }

    #[test]
    fn test_backend_method() {
        assert_eq!(DataError::Sqlite(sqlx::Error::RowNotFound).backend(), "sqlite");
        assert_eq!(
            DataError::DivisionByZero { backend: "sqlite" }.backend(),
            "sqlite"
        );
        assert_eq!(DataError::Config("x".into()).backend(), "unknown");
    }

    #[test]
    fn test_is_transient() {
        assert!(DataError::Postgres(sqlx::Error::PoolTimedOut).is_transient());
        assert!(!DataError::Sqlite(sqlx::Error::RowNotFound).is_transient());
        assert!(!DataError::Config("bad config".into()).is_transient());
        assert!(
            !DataError::MigrationFailed {
                backend: "sqlite",
                version: 1,
                name: "test".to_string(),
                error: "error".to_string(),
            }
            .is_transient()
        );
    }
}
