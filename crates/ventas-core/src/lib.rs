//! # ventas-core: Sale Lifecycle and Total Computation
//!
//! Pure business logic of the sales system. No database, no network.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Ventas Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 ventas-api (axum HTTP handlers)                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ ventas-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   sale    │  │  invoice  │  │  service  │  │   │
//! │  │   │  money    │  │ aggregate │  │ + text    │  │ over ports│  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ ports (traits)                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 ventas-db (SQLite, sqlx)                        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Customer, Product, Sale, LineItem, Invoice)
//! - [`money`] - Integer-cent money with a single rounding point
//! - [`sale`] - Price capture, totals, discount, cancellation
//! - [`invoice`] - Invoice snapshot rules
//! - [`invoice_text`] - Human-readable invoice rendering
//! - [`ports`] - Collaborator traits implemented by the storage layer
//! - [`service`] - `SaleService` and `InvoiceIssuer`
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use ventas_core::{Product, Sale, ShippingMethod};
//!
//! let now = Utc::now();
//! let laptop = Product {
//!     id: "p-1".into(),
//!     name: "Laptop".into(),
//!     price_cents: 100_00,
//!     created_at: now,
//!     updated_at: now,
//! };
//!
//! let mut sale = Sale::open("c-1", ShippingMethod::StorePickup, None, None, now);
//! sale.add_line_item(&laptop, 1);
//! sale.recompute_total().unwrap();
//!
//! sale.apply_discount(10.0, now).unwrap();
//! sale.apply_discount(10.0, now).unwrap();
//! assert_eq!(sale.total().to_string(), "81.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod invoice;
pub mod invoice_text;
pub mod money;
pub mod ports;
pub mod sale;
pub mod service;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, EntityKind, ValidationError};
pub use money::Money;
pub use service::{DiscountOutcome, InvoiceIssuer, SaleService};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a product name, in characters.
pub const MAX_PRODUCT_NAME_LEN: usize = 200;
