//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Ventas API                             │
//! │                                                                         │
//! │  Handler: Result<T, ApiError>                                           │
//! │         │                                                               │
//! │         ├── ValidationError ──────────────────► 400 VALIDATION_ERROR    │
//! │         ├── CoreError::NotFound ──────────────► 404 NOT_FOUND           │
//! │         ├── CoreError::ReferenceIntegrity ────► 404 NOT_FOUND           │
//! │         ├── CoreError::AlreadyInvoiced ───────► 409 ALREADY_INVOICED    │
//! │         ├── CoreError::Conflict / unique / FK ► 409 CONFLICT            │
//! │         └── storage failure ──────────────────► 500 DATABASE_ERROR      │
//! │                                                  (details logged only)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Response Body
//! ```json
//! { "code": "NOT_FOUND", "message": "Sale not found: 7f0c..." }
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use ventas_core::{CoreError, EntityKind, ValidationError};
use ventas_db::DbError;

/// Error body returned by every failing handler.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Sale already has an invoice (409)
    AlreadyInvoiced,

    /// Uniqueness or reference constraint rejected the write (409)
    Conflict,

    /// Database operation failed (500)
    DatabaseError,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::AlreadyInvoiced | ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(entity: EntityKind, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", entity, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    fn storage(detail: impl std::fmt::Display) -> Self {
        tracing::error!("Storage failure: {}", detail);
        ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { .. } | CoreError::ReferenceIntegrityViolation { .. } => {
                ApiError::new(ErrorCode::NotFound, err.to_string())
            }
            CoreError::AlreadyInvoiced { .. } => {
                ApiError::new(ErrorCode::AlreadyInvoiced, err.to_string())
            }
            CoreError::Conflict(message) => ApiError::new(ErrorCode::Conflict, message),
            CoreError::Validation(e) => e.into(),
            CoreError::Store(detail) => ApiError::storage(detail),
        }
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => {
                ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", entity, id))
            }
            DbError::UniqueViolation { field, .. } => {
                ApiError::new(ErrorCode::Conflict, format!("{} already exists", field))
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::warn!("Foreign key violation: {}", message);
                ApiError::new(ErrorCode::Conflict, "Record is still referenced")
            }
            other => ApiError::storage(other),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;
