//! # Validation Module
//!
//! Input validation for the records callers hand to the system.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: HTTP handler (axum)                                          │
//! │  └── Shape validation (JSON deserialization)                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  └── Field rules: required, length, sign, RUT shape                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  ├── UNIQUE (customers.rut, invoices.sale_id)                          │
//! │  └── Foreign keys                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A discount percentage only has to be a finite number. Values outside
//! 0..=100 are applied as given.

use crate::error::ValidationError;
use crate::types::{NewCustomer, NewLineItem, ProductInput};
use crate::MAX_PRODUCT_NAME_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - At most 200 characters
///
/// ## Example
/// ```rust
/// use ventas_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Laptop").is_ok());
/// assert!(validate_product_name("  ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_PRODUCT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_PRODUCT_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a customer's full name.
pub fn validate_full_name(name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "full_name".to_string(),
        });
    }

    Ok(())
}

/// Validates the shape of a RUT (Chilean tax id).
///
/// ## Rules
/// - Seven or eight digits, a hyphen, then one check character
/// - The check character is a digit or `K`/`k`
/// - The check digit itself is NOT verified
///
/// ## Example
/// ```rust
/// use ventas_core::validation::validate_rut;
///
/// assert!(validate_rut("12345678-9").is_ok());
/// assert!(validate_rut("7654321-K").is_ok());
/// assert!(validate_rut("12.345.678-9").is_err());
/// ```
pub fn validate_rut(rut: &str) -> ValidationResult<()> {
    let rut = rut.trim();

    if rut.is_empty() {
        return Err(ValidationError::Required {
            field: "rut".to_string(),
        });
    }

    let invalid = || ValidationError::InvalidFormat {
        field: "rut".to_string(),
        reason: "expected 7-8 digits, a hyphen and a check digit or K".to_string(),
    };

    let (body, check) = rut.split_once('-').ok_or_else(invalid)?;

    if !(7..=8).contains(&body.len()) || !body.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let mut check_chars = check.chars();
    match (check_chars.next(), check_chars.next()) {
        (Some(c), None) if c.is_ascii_digit() || c == 'k' || c == 'K' => Ok(()),
        _ => Err(invalid()),
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line item quantity: strictly positive.
///
/// There is no fixed upper bound. A quantity whose subtotal overflows is
/// rejected when the sale total is derived.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
///
/// ## Example
/// ```rust
/// use ventas_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a discount percentage.
///
/// ## Rules
/// - Must be a finite number (NaN and infinities are rejected)
/// - Not range-checked: 150 or -10 are accepted
///
/// ## Example
/// ```rust
/// use ventas_core::validation::validate_discount_percentage;
///
/// assert!(validate_discount_percentage(12.5).is_ok());
/// assert!(validate_discount_percentage(150.0).is_ok());
/// assert!(validate_discount_percentage(f64::NAN).is_err());
/// ```
pub fn validate_discount_percentage(percentage: f64) -> ValidationResult<()> {
    if !percentage.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: "percentage".to_string(),
            reason: "must be a finite number".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates every field of a product create/update payload.
pub fn validate_product_input(input: &ProductInput) -> ValidationResult<()> {
    validate_product_name(&input.name)?;
    validate_price_cents(input.price_cents)
}

/// Validates a customer registration payload.
pub fn validate_new_customer(input: &NewCustomer) -> ValidationResult<()> {
    validate_rut(&input.rut)?;
    validate_full_name(&input.full_name)
}

/// Validates the requested line items of a candidate sale.
///
/// Product ids are not checked here; resolving them is the catalog's job.
pub fn validate_line_items(items: &[NewLineItem]) -> ValidationResult<()> {
    items
        .iter()
        .try_for_each(|item| validate_quantity(item.quantity))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Mouse inalámbrico").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(200)).is_ok());
        assert!(validate_product_name(&"A".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_rut() {
        assert!(validate_rut("12345678-9").is_ok());
        assert!(validate_rut("1234567-0").is_ok());
        assert!(validate_rut("7654321-k").is_ok());
        assert!(validate_rut("7654321-K").is_ok());

        assert!(matches!(
            validate_rut(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(validate_rut("123456-7").is_err());
        assert!(validate_rut("123456789-0").is_err());
        assert!(validate_rut("12345678").is_err());
        assert!(validate_rut("12345678-").is_err());
        assert!(validate_rut("12345678-10").is_err());
        assert!(validate_rut("1234567A-9").is_err());
        assert!(validate_rut("12345678-X").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(10_000).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(120000).is_ok());
        assert!(validate_price_cents(-1).is_err());
    }

    #[test]
    fn test_validate_discount_percentage() {
        assert!(validate_discount_percentage(0.0).is_ok());
        assert!(validate_discount_percentage(-10.0).is_ok());
        assert!(validate_discount_percentage(1e300).is_ok());

        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                validate_discount_percentage(bad),
                Err(ValidationError::InvalidFormat { ref field, .. }) if field == "percentage"
            ));
        }
    }

    #[test]
    fn test_validate_line_items_stops_at_first_bad_quantity() {
        let items = vec![
            NewLineItem {
                product_id: "p-1".to_string(),
                quantity: 2,
            },
            NewLineItem {
                product_id: "p-2".to_string(),
                quantity: 0,
            },
        ];
        assert!(matches!(
            validate_line_items(&items),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(validate_line_items(&[]).is_ok());
    }

    #[test]
    fn test_validate_new_customer() {
        let mut customer = NewCustomer {
            rut: "12345678-9".to_string(),
            full_name: "Juan Perez".to_string(),
            email: None,
            address: None,
            phone: None,
        };
        assert!(validate_new_customer(&customer).is_ok());

        customer.full_name = " ".to_string();
        assert!(validate_new_customer(&customer).is_err());
    }
}
