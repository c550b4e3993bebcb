//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A sale total summed from doubles drifts away from the line items      │
//! │  it was derived from.                                                   │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Subtotals and totals are exact sums of cents.                       │
//! │    Only a percentage discount rounds, and it rounds in one place.      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use ventas_core::money::Money;
//!
//! let price = Money::from_cents(1099); // 10.99
//! let line = price.checked_mul(3).unwrap();
//! assert_eq!(line.cents(), 3297);
//! assert_eq!(line.to_string(), "32.97");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: a discount above 100% produces a negative total,
///   which must be representable rather than clamped
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Checked arithmetic only**: overflow comes back as `None`, never a
///   panic or a wrapped total
///
/// ## Where Money is Used
/// ```text
/// Product.price_cents ──► LineItem.unit_price (captured) ──► LineItem.subtotal
///                                                                  │
///                                     Sale.total ◄── checked sum ──┘
///                                         │
///                                         ├──► apply_discount (rounds once)
///                                         └──► Invoice.total (snapshot)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use ventas_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Multiplies money by a quantity, or `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use ventas_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.checked_mul(3), Some(Money::from_cents(897)));
    /// assert_eq!(unit_price.checked_mul(i64::MAX), None);
    /// ```
    #[inline]
    pub const fn checked_mul(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Adds two amounts, or `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Applies a percentage discount: `amount × (1 − percentage / 100)`.
    ///
    /// Any finite percentage is applied as given: 150 yields a negative
    /// amount, -10 inflates it. The result is rounded to the nearest cent,
    /// halves away from zero.
    ///
    /// Returns `None` if `percentage` is NaN or infinite, or if the rounded
    /// result does not fit in an `i64`.
    ///
    /// ## Example
    /// ```rust
    /// use ventas_core::money::Money;
    ///
    /// let total = Money::from_cents(10000);
    /// assert_eq!(total.apply_percentage_discount(10.0), Some(Money::from_cents(9000)));
    /// assert_eq!(Money::from_cents(1005).apply_percentage_discount(50.0), Some(Money::from_cents(503)));
    /// assert_eq!(total.apply_percentage_discount(f64::NAN), None);
    /// ```
    pub fn apply_percentage_discount(&self, percentage: f64) -> Option<Money> {
        if !percentage.is_finite() {
            return None;
        }

        let factor = 1.0 - percentage / 100.0;
        let rounded = (self.0 as f64 * factor).round();

        // i64::MIN as f64 is exact (-2^63); 2^63 itself is already out of range.
        if !rounded.is_finite() || rounded < i64::MIN as f64 || rounded >= -(i64::MIN as f64) {
            return None;
        }
        Some(Money(rounded as i64))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Locale-independent rendering: `[-]<major>.<minor:02>`, no currency symbol.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
