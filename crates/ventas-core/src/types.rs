//! # Domain Types
//!
//! Core domain types used throughout the sales system.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Customer     │   │      Sale       │   │    Invoice      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │◄──│  customer_id    │◄──│  sale_id (1:1)  │       │
//! │  │  rut (unique)   │   │  status         │   │  issued_at      │       │
//! │  │  full_name      │   │  total_cents    │   │  total_cents    │       │
//! │  └─────────────────┘   │  line_items ────┼─┐ └─────────────────┘       │
//! │                        └─────────────────┘ │                            │
//! │  ┌─────────────────┐   ┌─────────────────┐ │                            │
//! │  │    Product      │   │    LineItem     │◄┘ owned by value             │
//! │  │  ─────────────  │   │  ─────────────  │                              │
//! │  │  id (UUID)      │◄──│  product_id     │   non-owning id reference    │
//! │  │  name           │   │  unit_price     │   captured at sale time      │
//! │  │  price_cents    │   │  quantity       │                              │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership
//! A `Sale` owns its `LineItem`s by value. Customers and products are only
//! referenced by id; there are no back-pointers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Customer
// =============================================================================

/// A customer, identified for tax purposes by a unique RUT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Customer {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Tax/legal identifier, unique across customers (e.g. `12345678-9`).
    pub rut: String,

    /// Full name printed on invoices.
    pub full_name: String,

    pub email: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product. Its price may change over time; sales never re-read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Current unit price in cents.
    pub price_cents: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the current price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Shipping Method
// =============================================================================

/// How the goods of a sale reach the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ShippingMethod {
    /// Customer collects the goods at the store.
    StorePickup,
    /// Goods are delivered to the customer's address.
    HomeDelivery,
}

impl ShippingMethod {
    /// Label printed on the textual invoice.
    pub fn invoice_label(&self) -> &'static str {
        match self {
            ShippingMethod::StorePickup => "RETIRO_EN_TIENDA",
            ShippingMethod::HomeDelivery => "DESPACHO_A_DOMICILIO",
        }
    }
}

// =============================================================================
// Sale Status
// =============================================================================

/// The lifecycle state of a sale.
///
/// Only `Pending → Cancelled` and total mutation while `Pending` are driven
/// by dedicated operations. `Completed` is reachable through a wholesale
/// update only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    /// Sale is open; its total may still be discounted.
    Pending,
    /// Sale has been fulfilled.
    Completed,
    /// Sale was cancelled.
    Cancelled,
}

impl Default for SaleStatus {
    fn default() -> Self {
        SaleStatus::Pending
    }
}

impl SaleStatus {
    /// Label printed on the textual invoice.
    pub fn invoice_label(&self) -> &'static str {
        match self {
            SaleStatus::Pending => "PENDIENTE",
            SaleStatus::Completed => "COMPLETADA",
            SaleStatus::Cancelled => "CANCELADA",
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One product/quantity pairing within a sale.
/// Uses snapshot pattern to freeze product data at time of sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct LineItem {
    pub id: String,
    pub sale_id: String,
    /// 0-based position inside the sale.
    pub position: i64,
    pub product_id: String,
    /// Product name at time of sale (frozen).
    pub name_snapshot: String,
    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
    /// Quantity sold (> 0).
    pub quantity: i64,
}

impl LineItem {
    /// Returns the captured unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// `quantity × unit price`, or `None` if it does not fit in an `i64`.
    #[inline]
    pub fn subtotal(&self) -> Option<Money> {
        self.unit_price().checked_mul(self.quantity)
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A customer order composed of line items, with a derived total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: String,
    pub customer_id: String,
    #[ts(as = "String")]
    pub sold_at: DateTime<Utc>,
    /// Sum of line subtotals, or a discounted derivative of it.
    pub total_cents: i64,
    pub shipping_method: ShippingMethod,
    pub status: SaleStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
    /// Ordered by `position`.
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub line_items: Vec<LineItem>,
}

impl Sale {
    /// Returns the current total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// A snapshot of a sale's total at issuance time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Invoice {
    pub id: String,
    /// Owning sale; at most one invoice per sale.
    pub sale_id: String,
    #[ts(as = "String")]
    pub issued_at: DateTime<Utc>,
    pub total_cents: i64,
}

impl Invoice {
    /// Returns the invoiced total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Inputs
// =============================================================================

/// A line item requested by a caller: which product, how many.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewLineItem {
    pub product_id: String,
    pub quantity: i64,
}

/// A candidate sale, before prices are captured and an id is assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSale {
    pub customer_id: String,
    pub shipping_method: ShippingMethod,
    /// Defaults to `Pending` when absent.
    #[serde(default)]
    pub status: Option<SaleStatus>,
    /// Defaults to the creation time when absent.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub sold_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub line_items: Vec<NewLineItem>,
}

/// Wholesale replacement of a sale's header fields.
///
/// Customer and line items are not part of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleUpdate {
    #[ts(as = "String")]
    pub sold_at: DateTime<Utc>,
    pub total_cents: i64,
    pub shipping_method: ShippingMethod,
    pub status: SaleStatus,
}

/// Wholesale replacement of an invoice, taken as supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceUpdate {
    #[ts(as = "String")]
    pub issued_at: DateTime<Utc>,
    pub total_cents: i64,
    pub sale_id: String,
}

/// Product fields supplied on create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductInput {
    pub name: String,
    pub price_cents: i64,
}

/// Customer fields supplied on registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewCustomer {
    pub rut: String,
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sale_status_default() {
        assert_eq!(SaleStatus::default(), SaleStatus::Pending);
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(
            serde_json::to_string(&ShippingMethod::StorePickup).unwrap(),
            "\"store_pickup\""
        );
        assert_eq!(
            serde_json::to_string(&ShippingMethod::HomeDelivery).unwrap(),
            "\"home_delivery\""
        );
        assert_eq!(
            serde_json::to_string(&SaleStatus::Cancelled).unwrap(),
            "\"cancelled\""
        );
    }

    #[test]
    fn test_line_item_subtotal() {
        let item = LineItem {
            id: "li-1".to_string(),
            sale_id: "s-1".to_string(),
            position: 0,
            product_id: "p-1".to_string(),
            name_snapshot: "Laptop".to_string(),
            unit_price_cents: 120000,
            quantity: 2,
        };
        assert_eq!(item.subtotal(), Some(Money::from_cents(240000)));

        let huge = LineItem {
            quantity: 100_000_000_000_000,
            ..item
        };
        assert_eq!(huge.subtotal(), None);
    }

    #[test]
    fn test_new_sale_defaults_from_json() {
        let json = r#"{"customer_id":"c-1","shipping_method":"home_delivery"}"#;
        let new_sale: NewSale = serde_json::from_str(json).unwrap();
        assert!(new_sale.line_items.is_empty());
        assert!(new_sale.status.is_none());
        assert!(new_sale.sold_at.is_none());
    }
}
