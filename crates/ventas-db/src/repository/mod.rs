//! # Repository Module
//!
//! Database access, one submodule per table family.
//!
//! ## Two Access Styles
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Registry/catalog CRUD           Sale lifecycle                         │
//! │  ─────────────────────           ──────────────                         │
//! │  db.customers().insert(..)       db.begin() → DbSession                 │
//! │  db.products().update(..)          │                                    │
//! │       │                            ├─ sale::find(conn, ..)              │
//! │       │ SqlitePool                 ├─ sale::insert(conn, ..)            │
//! │       ▼                            └─ invoice::insert(conn, ..)         │
//! │  one statement, autocommit            one transaction, explicit commit  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CustomerRepository`](customer::CustomerRepository) - Customer registry
//! - [`ProductRepository`](product::ProductRepository) - Product catalog CRUD
//! - [`sale`] / [`invoice`] - Connection-scoped statements used by `DbSession`

pub mod customer;
pub mod invoice;
pub mod product;
pub mod sale;
