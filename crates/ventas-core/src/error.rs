//! # Error Types
//!
//! Domain-specific error types for ventas-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  ventas-core errors (this file)                                        │
//! │  ├── CoreError        - Domain taxonomy (not found, bad reference, ...) │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  ventas-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures (→ CoreError)      │
//! │                                                                         │
//! │  HTTP errors (in app)                                                  │
//! │  └── ApiError         - What clients see (serialized)                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError ← DbError;  CoreError → ApiError    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Neither `NotFound` nor `ReferenceIntegrityViolation` is retried anywhere;
//! the transport translates them into a "not found" response.

use std::fmt;

use thiserror::Error;

// =============================================================================
// Entity Kind
// =============================================================================

/// The kind of entity an identifier failed to resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Customer,
    Product,
    Sale,
    Invoice,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Customer => "Customer",
            EntityKind::Product => "Product",
            EntityKind::Sale => "Sale",
            EntityKind::Invoice => "Invoice",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An identifier does not resolve.
    ///
    /// ## When This Occurs
    /// - Creating a sale for an unknown customer
    /// - Discounting, cancelling, updating or deleting an unknown sale
    /// - Updating or deleting an unknown invoice
    #[error("{entity} not found: {id}")]
    NotFound { entity: EntityKind, id: String },

    /// A line item names a product that does not resolve.
    ///
    /// Raised during sale creation, before anything is persisted.
    #[error("Line item references unknown product: {product_id}")]
    ReferenceIntegrityViolation { product_id: String },

    /// The storage layer rejected a second invoice for the same sale.
    ///
    /// The issuer does not check for this up front; the unique constraint on
    /// the invoice's sale reference does, and the store reports it here.
    #[error("Sale {sale_id} already has an invoice")]
    AlreadyInvoiced { sale_id: String },

    /// The store rejected a write that breaks a uniqueness or reference
    /// constraint (duplicate RUT, deleting an invoiced sale, ...).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Any other storage failure, surfaced as-is.
    #[error("Storage failure: {0}")]
    Store(String),
}

impl CoreError {
    /// Creates a NotFound error.
    pub fn not_found(entity: EntityKind, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// True for every variant the transport reports as "not found".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoreError::NotFound { .. } | CoreError::ReferenceIntegrityViolation { .. }
        )
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., malformed RUT).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::not_found(EntityKind::Sale, "abc");
        assert_eq!(err.to_string(), "Sale not found: abc");

        let err = CoreError::ReferenceIntegrityViolation {
            product_id: "p-1".to_string(),
        };
        assert_eq!(err.to_string(), "Line item references unknown product: p-1");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "rut".to_string(),
        };
        assert_eq!(err.to_string(), "rut is required");

        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }

    #[test]
    fn test_is_not_found() {
        assert!(CoreError::not_found(EntityKind::Customer, "c").is_not_found());
        assert!(CoreError::ReferenceIntegrityViolation {
            product_id: "p".to_string()
        }
        .is_not_found());
        assert!(!CoreError::AlreadyInvoiced {
            sale_id: "s".to_string()
        }
        .is_not_found());
        assert!(!CoreError::Store("disk full".to_string()).is_not_found());
    }
}
