//! Invoice snapshot rules.
//!
//! An invoice copies a sale's total at issuance time and is never re-derived
//! afterwards. At most one invoice per sale is a storage constraint, not a
//! check performed here.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::types::{Invoice, InvoiceUpdate, Sale};

impl Invoice {
    /// Takes a snapshot of `sale`'s current total.
    pub fn snapshot(sale: &Sale, issued_at: DateTime<Utc>) -> Self {
        Invoice {
            id: Uuid::new_v4().to_string(),
            sale_id: sale.id.clone(),
            issued_at,
            total_cents: sale.total_cents,
        }
    }

    /// Replaces issuance time, total and owning sale with caller data.
    pub fn apply_update(&mut self, update: InvoiceUpdate) {
        self.issued_at = update.issued_at;
        self.total_cents = update.total_cents;
        self.sale_id = update.sale_id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ShippingMethod;
    use chrono::TimeZone;

    #[test]
    fn test_snapshot_is_detached_from_sale() {
        let now = Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap();
        let mut sale = Sale::open("c-1", ShippingMethod::StorePickup, None, None, now);
        sale.total_cents = 9000;

        let invoice = Invoice::snapshot(&sale, now);
        sale.total_cents = 1;

        assert_eq!(invoice.total_cents, 9000);
        assert_eq!(invoice.sale_id, sale.id);
        assert_eq!(invoice.issued_at, now);
        assert_ne!(invoice.id, sale.id);
    }

    #[test]
    fn test_apply_update_is_wholesale() {
        let now = Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap();
        let sale = Sale::open("c-1", ShippingMethod::StorePickup, None, None, now);
        let mut invoice = Invoice::snapshot(&sale, now);

        let later = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
        invoice.apply_update(InvoiceUpdate {
            issued_at: later,
            total_cents: 777,
            sale_id: "s-other".to_string(),
        });

        assert_eq!(invoice.issued_at, later);
        assert_eq!(invoice.total_cents, 777);
        assert_eq!(invoice.sale_id, "s-other");
    }
}
