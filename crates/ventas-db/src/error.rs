//! # Storage Errors
//!
//! `DbError` sorts sqlx failures into the cases callers act on differently.
//!
//! ```text
//!  sqlx::Error ──► DbError ──► CoreError (via the ports)
//!                     │
//!                     ├─ UniqueViolation { "invoices.sale_id" } ──► AlreadyInvoiced
//!                     │                                              (mapped in DbSession)
//!                     ├─ UniqueViolation / ForeignKeyViolation ───► Conflict
//!                     └─ everything else ─────────────────────────► Store
//! ```

use sqlx::error::ErrorKind;
use thiserror::Error;
use ventas_core::CoreError;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// `field` is `<table>.<column>` as reported by SQLite.
    #[error("Duplicate value for {field}")]
    UniqueViolation { field: String },

    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Any other error reported by SQLite itself.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Driver-side failures (decoding, I/O, protocol).
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn duplicate(field: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
        }
    }

    /// True if this is a unique violation on `<table>.<column>`.
    pub fn is_unique_violation_on(&self, column: &str) -> bool {
        matches!(self, DbError::UniqueViolation { field } if field == column)
    }
}

/// Pulls `<table>.<column>` out of SQLite's
/// `UNIQUE constraint failed: <table>.<column>` message.
fn unique_field(message: &str) -> String {
    message
        .strip_prefix("UNIQUE constraint failed: ")
        .unwrap_or(message)
        .to_string()
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),

            sqlx::Error::Database(db_err) => {
                let message = db_err.message();
                match db_err.kind() {
                    ErrorKind::UniqueViolation => DbError::duplicate(unique_field(message)),
                    ErrorKind::ForeignKeyViolation => DbError::ForeignKeyViolation {
                        message: message.to_string(),
                    },
                    // Without extended result codes SQLite only says "constraint".
                    _ if message.starts_with("UNIQUE constraint failed") => {
                        DbError::duplicate(unique_field(message))
                    }
                    _ if message.contains("FOREIGN KEY constraint failed") => {
                        DbError::ForeignKeyViolation {
                            message: message.to_string(),
                        }
                    }
                    _ => DbError::QueryFailed(message.to_string()),
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool closed".to_string()),

            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Constraint failures become `Conflict`; everything else is an opaque
/// `Store` error. The duplicate-invoice case never reaches this impl: the
/// invoice port maps it first, where the sale id is known.
impl From<DbError> for CoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::UniqueViolation { .. } | DbError::ForeignKeyViolation { .. } => {
                CoreError::Conflict(err.to_string())
            }
            other => CoreError::Store(other.to_string()),
        }
    }
}

pub type DbResult<T> = Result<T, DbError>;
