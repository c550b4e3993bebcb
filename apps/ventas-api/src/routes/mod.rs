//! # HTTP Routes
//!
//! ```text
//! /health              system
//! /api/sales/...       sales      (DbSession + SaleService)
//! /api/invoices/...    invoices   (DbSession + InvoiceIssuer)
//! /api/products/...    products   (ProductRepository)
//! /api/customers/...   customers  (CustomerRepository)
//! ```

pub mod customers;
pub mod invoices;
pub mod products;
pub mod sales;
pub mod system;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(system::health))
        .nest("/api/sales", sales::router())
        .nest("/api/invoices", invoices::router())
        .nest("/api/products", products::router())
        .nest("/api/customers", customers::router())
}
