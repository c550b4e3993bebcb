//! # Database Session
//!
//! A single SQLite transaction that implements every core port.
//!
//! ## Unit of Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  let session = db.begin().await?;          BEGIN                        │
//! │                                                                         │
//! │  SaleService::new(&session, &session, &session)                         │
//! │      .apply_discount(id, 10.0).await?;     SELECT sale ... (read)       │
//! │                                            UPDATE sales ... (write)     │
//! │                                                                         │
//! │  session.commit().await?;                  COMMIT                       │
//! │                                                                         │
//! │  (early return / `?` / panic)              ROLLBACK on drop             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The read that decides and the write that persists are never observed as
//! separate steps by a concurrent operation. Conflicting writers surface as
//! storage errors; nothing is retried here.

use async_trait::async_trait;
use sqlx::{Sqlite, SqliteConnection, Transaction};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::{customer, invoice, product, sale};
use ventas_core::ports::{CatalogLookup, CustomerRegistry, InvoiceStore, SaleStore};
use ventas_core::{CoreError, CoreResult, Customer, EntityKind, Invoice, Product, Sale};

type Tx = Transaction<'static, Sqlite>;

/// Transaction-scoped implementation of the core ports.
pub struct DbSession {
    tx: Mutex<Option<Tx>>,
}

impl DbSession {
    pub(crate) fn new(tx: Tx) -> Self {
        DbSession {
            tx: Mutex::new(Some(tx)),
        }
    }

    /// Commits everything written through this session.
    pub async fn commit(self) -> DbResult<()> {
        let tx = self
            .tx
            .into_inner()
            .ok_or_else(|| DbError::TransactionFailed("session already closed".to_string()))?;
        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
        debug!("Session committed");
        Ok(())
    }

    /// Discards everything written through this session.
    pub async fn rollback(self) -> DbResult<()> {
        if let Some(tx) = self.tx.into_inner() {
            tx.rollback()
                .await
                .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
        }
        debug!("Session rolled back");
        Ok(())
    }
}

/// Borrows the live connection out of a locked session.
fn active(slot: &mut Option<Tx>) -> DbResult<&mut SqliteConnection> {
    match slot.as_mut() {
        Some(tx) => Ok(&mut **tx),
        None => Err(DbError::TransactionFailed(
            "session already closed".to_string(),
        )),
    }
}

// =============================================================================
// Port Implementations
// =============================================================================

#[async_trait]
impl CatalogLookup for DbSession {
    async fn resolve_product(&self, id: &str) -> CoreResult<Option<Product>> {
        let mut slot = self.tx.lock().await;
        Ok(product::fetch_by_id(active(&mut slot)?, id).await?)
    }
}

#[async_trait]
impl CustomerRegistry for DbSession {
    async fn resolve_customer(&self, id: &str) -> CoreResult<Option<Customer>> {
        let mut slot = self.tx.lock().await;
        Ok(customer::fetch_by_id(active(&mut slot)?, id).await?)
    }
}

#[async_trait]
impl SaleStore for DbSession {
    async fn find_sale(&self, id: &str) -> CoreResult<Option<Sale>> {
        let mut slot = self.tx.lock().await;
        Ok(sale::find(active(&mut slot)?, id).await?)
    }

    async fn list_sales(&self) -> CoreResult<Vec<Sale>> {
        let mut slot = self.tx.lock().await;
        Ok(sale::list(active(&mut slot)?).await?)
    }

    async fn insert_sale(&self, new_sale: &Sale) -> CoreResult<()> {
        let mut slot = self.tx.lock().await;
        Ok(sale::insert(active(&mut slot)?, new_sale).await?)
    }

    async fn save_sale(&self, updated: &Sale) -> CoreResult<()> {
        let mut slot = self.tx.lock().await;
        if !sale::update_header(active(&mut slot)?, updated).await? {
            return Err(CoreError::not_found(EntityKind::Sale, updated.id.as_str()));
        }
        Ok(())
    }

    async fn delete_sale(&self, id: &str) -> CoreResult<bool> {
        let mut slot = self.tx.lock().await;
        Ok(sale::delete(active(&mut slot)?, id).await?)
    }
}

#[async_trait]
impl InvoiceStore for DbSession {
    async fn find_invoice(&self, id: &str) -> CoreResult<Option<Invoice>> {
        let mut slot = self.tx.lock().await;
        Ok(invoice::find(active(&mut slot)?, id).await?)
    }

    async fn find_invoice_by_sale(&self, sale_id: &str) -> CoreResult<Option<Invoice>> {
        let mut slot = self.tx.lock().await;
        Ok(invoice::find_by_sale(active(&mut slot)?, sale_id).await?)
    }

    async fn list_invoices(&self) -> CoreResult<Vec<Invoice>> {
        let mut slot = self.tx.lock().await;
        Ok(invoice::list(active(&mut slot)?).await?)
    }

    async fn insert_invoice(&self, new_invoice: &Invoice) -> CoreResult<()> {
        let mut slot = self.tx.lock().await;
        invoice::insert(active(&mut slot)?, new_invoice)
            .await
            .map_err(|err| {
                if err.is_unique_violation_on("invoices.sale_id") {
                    CoreError::AlreadyInvoiced {
                        sale_id: new_invoice.sale_id.clone(),
                    }
                } else {
                    err.into()
                }
            })
    }

    async fn save_invoice(&self, updated: &Invoice) -> CoreResult<()> {
        let mut slot = self.tx.lock().await;
        if !invoice::update(active(&mut slot)?, updated).await? {
            return Err(CoreError::not_found(EntityKind::Invoice, updated.id.as_str()));
        }
        Ok(())
    }

    async fn delete_invoice(&self, id: &str) -> CoreResult<bool> {
        let mut slot = self.tx.lock().await;
        Ok(invoice::delete(active(&mut slot)?, id).await?)
    }
}

// =============================================================================
// Tests
// =============================================================================
