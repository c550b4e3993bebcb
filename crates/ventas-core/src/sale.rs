//! # Sale Aggregate
//!
//! The rules that govern a sale's total and lifecycle.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   open() ──► PENDING ──── apply_discount(p) ───► PENDING (total × k)    │
//! │                 │                                                       │
//! │                 │ cancel()                                              │
//! │                 ▼                                                       │
//! │             CANCELLED ◄── cancel() from any state                       │
//! │                                                                         │
//! │   COMPLETED is reached only through apply_update()                      │
//! │   apply_discount() on a non-pending sale is a no-op                     │
//! │   totals that overflow i64 cents are rejected, never wrapped            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is synchronous and side-effect free. Resolving products
//! and customers, and persisting the result, is the service layer's job.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{LineItem, Product, Sale, SaleStatus, SaleUpdate, ShippingMethod};
use crate::validation::{validate_discount_percentage, ValidationResult};

impl Sale {
    /// Opens a new sale with no line items and a zero total.
    ///
    /// `status` defaults to `Pending`; `sold_at` defaults to `now`.
    pub fn open(
        customer_id: impl Into<String>,
        shipping_method: ShippingMethod,
        status: Option<SaleStatus>,
        sold_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        Sale {
            id: Uuid::new_v4().to_string(),
            customer_id: customer_id.into(),
            sold_at: sold_at.unwrap_or(now),
            total_cents: 0,
            shipping_method,
            status: status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
            line_items: Vec::new(),
        }
    }

    /// Binds a line item for `product` to this sale, capturing the product's
    /// current price and name.
    ///
    /// The total is not touched; call [`Sale::recompute_total`] once all
    /// items are in.
    pub fn add_line_item(&mut self, product: &Product, quantity: i64) -> &LineItem {
        let position = self.line_items.len() as i64;
        self.line_items.push(LineItem {
            id: Uuid::new_v4().to_string(),
            sale_id: self.id.clone(),
            position,
            product_id: product.id.clone(),
            name_snapshot: product.name.clone(),
            unit_price_cents: product.price_cents,
            quantity,
        });
        &self.line_items[self.line_items.len() - 1]
    }

    /// Sum of line subtotals. Zero for a sale without items, `None` if any
    /// subtotal or the running sum overflows.
    pub fn line_items_total(&self) -> Option<Money> {
        self.line_items
            .iter()
            .try_fold(Money::zero(), |acc, item| acc.checked_add(item.subtotal()?))
    }

    /// Resets the total to the sum of line subtotals.
    ///
    /// Fails, leaving the total untouched, if the sum does not fit in cents.
    pub fn recompute_total(&mut self) -> ValidationResult<()> {
        let total = self
            .line_items_total()
            .ok_or_else(|| ValidationError::OutOfRange {
                field: "total_cents".to_string(),
                min: 0,
                max: i64::MAX,
            })?;
        self.total_cents = total.cents();
        Ok(())
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.status == SaleStatus::Pending
    }

    /// Multiplies the total by `1 - percentage / 100` if the sale is pending.
    ///
    /// Returns whether the sale changed. Repeated calls compound on the
    /// already-discounted total. A non-finite percentage is rejected whatever
    /// the status; a result that does not fit in cents is rejected and the
    /// sale is left as it was.
    pub fn apply_discount(
        &mut self,
        percentage: f64,
        now: DateTime<Utc>,
    ) -> ValidationResult<bool> {
        validate_discount_percentage(percentage)?;
        if !self.is_pending() {
            return Ok(false);
        }

        let discounted = self
            .total()
            .apply_percentage_discount(percentage)
            .ok_or_else(|| ValidationError::OutOfRange {
                field: "total_cents".to_string(),
                min: i64::MIN,
                max: i64::MAX,
            })?;
        self.total_cents = discounted.cents();
        self.updated_at = now;
        Ok(true)
    }

    /// Moves the sale to `Cancelled`, whatever its current state.
    pub fn cancel(&mut self, now: DateTime<Utc>) {
        self.status = SaleStatus::Cancelled;
        self.updated_at = now;
    }

    /// Replaces timestamp, total, shipping method and status wholesale.
    ///
    /// Customer and line items stay as they are and the total is taken as
    /// supplied, not re-derived.
    pub fn apply_update(&mut self, update: SaleUpdate, now: DateTime<Utc>) {
        self.sold_at = update.sold_at;
        self.total_cents = update.total_cents;
        self.shipping_method = update.shipping_method;
        self.status = update.status;
        self.updated_at = now;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).unwrap()
    }

    fn product(id: &str, name: &str, price_cents: i64) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            price_cents,
            created_at: ts(),
            updated_at: ts(),
        }
    }

    fn pending_sale() -> Sale {
        Sale::open("c-1", ShippingMethod::StorePickup, None, None, ts())
    }

    #[test]
    fn test_open_defaults() {
        let sale = pending_sale();
        assert_eq!(sale.status, SaleStatus::Pending);
        assert_eq!(sale.total_cents, 0);
        assert_eq!(sale.sold_at, ts());
        assert!(sale.line_items.is_empty());
        assert!(Uuid::parse_str(&sale.id).is_ok());
    }

    #[test]
    fn test_open_keeps_supplied_status() {
        let sale = Sale::open(
            "c-1",
            ShippingMethod::HomeDelivery,
            Some(SaleStatus::Completed),
            None,
            ts(),
        );
        assert_eq!(sale.status, SaleStatus::Completed);
    }

    #[test]
    fn test_total_is_sum_of_captured_subtotals() {
        let mut laptop = product("p-1", "Laptop", 120000);
        let mouse = product("p-2", "Mouse", 2599);

        let mut sale = pending_sale();
        sale.add_line_item(&laptop, 2);
        sale.add_line_item(&mouse, 3);
        sale.recompute_total().unwrap();

        assert_eq!(sale.total_cents, 2 * 120000 + 3 * 2599);
        assert_eq!(sale.line_items[0].position, 0);
        assert_eq!(sale.line_items[1].position, 1);
        assert!(sale.line_items.iter().all(|li| li.sale_id == sale.id));

        // later catalog price changes do not leak into the sale
        laptop.price_cents = 1;
        assert_eq!(sale.line_items[0].unit_price_cents, 120000);
        assert_eq!(sale.line_items_total(), Some(Money::from_cents(247797)));
    }

    #[test]
    fn test_empty_sale_total_is_zero() {
        let mut sale = pending_sale();
        sale.recompute_total().unwrap();
        assert_eq!(sale.total_cents, 0);
    }

    #[test]
    fn test_discount_compounds() {
        let mut sale = pending_sale();
        sale.add_line_item(&product("p-1", "Caja", 10000), 1);
        sale.recompute_total().unwrap();

        assert!(sale.apply_discount(10.0, ts()).unwrap());
        assert!(sale.apply_discount(10.0, ts()).unwrap());
        assert_eq!(sale.total_cents, 8100);
    }

    #[test]
    fn test_discount_ignored_unless_pending() {
        for status in [SaleStatus::Cancelled, SaleStatus::Completed] {
            let mut sale = pending_sale();
            sale.total_cents = 5000;
            sale.status = status;

            assert!(!sale.apply_discount(50.0, ts()).unwrap());
            assert_eq!(sale.total_cents, 5000);
        }
    }

    #[test]
    fn test_discount_above_hundred_goes_negative() {
        let mut sale = pending_sale();
        sale.total_cents = 10000;
        assert!(sale.apply_discount(150.0, ts()).unwrap());
        assert_eq!(sale.total_cents, -5000);
    }

    #[test]
    fn test_non_finite_discount_is_rejected() {
        for percentage in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut sale = pending_sale();
            sale.total_cents = 10000;

            let err = sale.apply_discount(percentage, ts()).unwrap_err();
            assert!(matches!(err, ValidationError::InvalidFormat { .. }));
            assert_eq!(sale.total_cents, 10000);
        }
    }

    #[test]
    fn test_discount_that_overflows_leaves_total() {
        let mut sale = pending_sale();
        sale.total_cents = i64::MAX;

        let err = sale.apply_discount(-50.0, ts()).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { .. }));
        assert_eq!(sale.total_cents, i64::MAX);
    }

    #[test]
    fn test_total_overflow_is_an_error() {
        let mut sale = pending_sale();
        sale.add_line_item(&product("p-1", "Laptop", 120000), 100_000_000_000_000);

        assert_eq!(sale.line_items_total(), None);
        let err = sale.recompute_total().unwrap_err();
        assert!(matches!(
            err,
            ValidationError::OutOfRange { ref field, .. } if field == "total_cents"
        ));
        assert_eq!(sale.total_cents, 0);
    }

    #[test]
    fn test_sum_of_subtotals_overflow_is_an_error() {
        let mut sale = pending_sale();
        let item = product("p-1", "Caja", i64::MAX / 2 + 1);
        sale.add_line_item(&item, 1);
        assert!(sale.line_items_total().is_some());

        sale.add_line_item(&item, 1);
        assert!(sale.recompute_total().is_err());
    }

    #[test]
    fn test_cancel_is_unconditional() {
        for status in [
            SaleStatus::Pending,
            SaleStatus::Completed,
            SaleStatus::Cancelled,
        ] {
            let mut sale = pending_sale();
            sale.status = status;
            sale.cancel(ts());
            assert_eq!(sale.status, SaleStatus::Cancelled);
        }
    }

    #[test]
    fn test_apply_update_does_not_rederive_total() {
        let mut sale = pending_sale();
        sale.add_line_item(&product("p-1", "Caja", 10000), 1);
        sale.recompute_total().unwrap();

        let later = Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap();
        sale.apply_update(
            SaleUpdate {
                sold_at: later,
                total_cents: 42,
                shipping_method: ShippingMethod::HomeDelivery,
                status: SaleStatus::Completed,
            },
            later,
        );

        assert_eq!(sale.total_cents, 42);
        assert_eq!(sale.sold_at, later);
        assert_eq!(sale.status, SaleStatus::Completed);
        assert_eq!(sale.shipping_method, ShippingMethod::HomeDelivery);
        assert_eq!(sale.line_items.len(), 1);
        assert_eq!(sale.customer_id, "c-1");
    }
}
