//! # Collaborator Ports
//!
//! The traits through which the services reach the outside world.
//!
//! ```text
//! ┌──────────────┐   ┌──────────────────┐   ┌──────────────┐  ┌──────────────┐
//! │CatalogLookup │   │ CustomerRegistry │   │  SaleStore   │  │ InvoiceStore │
//! └──────┬───────┘   └────────┬─────────┘   └──────┬───────┘  └──────┬───────┘
//!        │                    │                    │                 │
//!        └──────────┬─────────┴──────────┬─────────┘                 │
//!                   ▼                    ▼                           │
//!             SaleService         InvoiceIssuer ◄────────────────────┘
//! ```
//!
//! Implementations are handed to the services at construction time. In
//! production a single `ventas_db::DbSession` implements all four, so every
//! call made by one service operation lands in the same transaction.
//!
//! Lookups return `Ok(None)` for an unknown id; `Err` is reserved for
//! storage failures.

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::{Customer, Invoice, Product, Sale};

/// Resolves product ids against the catalog.
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    async fn resolve_product(&self, id: &str) -> CoreResult<Option<Product>>;
}

/// Resolves customer ids against the registry.
#[async_trait]
pub trait CustomerRegistry: Send + Sync {
    async fn resolve_customer(&self, id: &str) -> CoreResult<Option<Customer>>;
}

/// Durable storage for sales and their line items.
#[async_trait]
pub trait SaleStore: Send + Sync {
    /// Loads a sale with its line items ordered by position.
    async fn find_sale(&self, id: &str) -> CoreResult<Option<Sale>>;

    async fn list_sales(&self) -> CoreResult<Vec<Sale>>;

    /// Inserts the sale row and every line item row.
    async fn insert_sale(&self, sale: &Sale) -> CoreResult<()>;

    /// Writes the header fields of an existing sale. Line items are untouched.
    async fn save_sale(&self, sale: &Sale) -> CoreResult<()>;

    /// Removes a sale and, by cascade, its line items. Returns whether a row
    /// was deleted.
    async fn delete_sale(&self, id: &str) -> CoreResult<bool>;
}

/// Durable storage for invoices.
///
/// `insert_invoice` must fail with `CoreError::AlreadyInvoiced` when the
/// sale already carries an invoice.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    async fn find_invoice(&self, id: &str) -> CoreResult<Option<Invoice>>;
    async fn find_invoice_by_sale(&self, sale_id: &str) -> CoreResult<Option<Invoice>>;
    async fn list_invoices(&self) -> CoreResult<Vec<Invoice>>;
    async fn insert_invoice(&self, invoice: &Invoice) -> CoreResult<()>;
    async fn save_invoice(&self, invoice: &Invoice) -> CoreResult<()>;
    async fn delete_invoice(&self, id: &str) -> CoreResult<bool>;
}
