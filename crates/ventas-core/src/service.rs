//! # Services
//!
//! Orchestration of the sale and invoice operations over injected ports.
//!
//! ## Operation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create(NewSale)                                                        │
//! │    ├── validate quantities                                              │
//! │    ├── resolve customer ────────── unknown → NotFound(Customer)         │
//! │    ├── resolve every product ───── unknown → ReferenceIntegrityViolation│
//! │    ├── capture prices, derive total ─ overflow → Validation             │
//! │    └── insert sale + line items (only after every lookup succeeded)     │
//! │                                                                         │
//! │  apply_discount(id, p)                                                  │
//! │    ├── find sale ──────────────── unknown → NotFound(Sale)              │
//! │    ├── NaN / infinite p ───────── Validation                            │
//! │    ├── pending?  yes → mutate total, save → Applied(sale)               │
//! │    └──           no  → no write           → Unchanged(sale)             │
//! │                                                                         │
//! │  issue(sale_id)                                                         │
//! │    ├── find sale ──────────────── unknown → Ok(None)                    │
//! │    └── snapshot total, insert ─── duplicate → AlreadyInvoiced (store)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The services hold borrowed collaborators only. Atomicity comes from the
//! caller passing ports that share one transaction.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::{CoreError, CoreResult, EntityKind};
use crate::invoice_text;
use crate::ports::{CatalogLookup, CustomerRegistry, InvoiceStore, SaleStore};
use crate::types::{Invoice, InvoiceUpdate, NewSale, Sale, SaleUpdate};
use crate::validation::validate_line_items;

// =============================================================================
// Discount Outcome
// =============================================================================

/// Result of a discount request on an existing sale.
///
/// Not-found is reported separately as an error, so together with these two
/// variants a caller can tell all three cases apart.
#[derive(Debug, Clone, PartialEq)]
pub enum DiscountOutcome {
    /// The sale was pending; its total was reduced and saved.
    Applied(Sale),
    /// The sale was not pending; nothing was written.
    Unchanged(Sale),
}

impl DiscountOutcome {
    pub fn sale(&self) -> &Sale {
        match self {
            DiscountOutcome::Applied(sale) | DiscountOutcome::Unchanged(sale) => sale,
        }
    }

    pub fn into_sale(self) -> Sale {
        match self {
            DiscountOutcome::Applied(sale) | DiscountOutcome::Unchanged(sale) => sale,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, DiscountOutcome::Applied(_))
    }
}

// =============================================================================
// Sale Service
// =============================================================================

/// Sale operations over a catalog, a customer registry and a sale store.
pub struct SaleService<'a, C, R, S> {
    catalog: &'a C,
    customers: &'a R,
    store: &'a S,
}

impl<'a, C, R, S> SaleService<'a, C, R, S>
where
    C: CatalogLookup,
    R: CustomerRegistry,
    S: SaleStore,
{
    pub fn new(catalog: &'a C, customers: &'a R, store: &'a S) -> Self {
        Self {
            catalog,
            customers,
            store,
        }
    }

    /// Creates and persists a sale.
    ///
    /// Nothing is written unless the customer and every product resolve.
    pub async fn create(&self, new_sale: NewSale) -> CoreResult<Sale> {
        validate_line_items(&new_sale.line_items)?;

        if self
            .customers
            .resolve_customer(&new_sale.customer_id)
            .await?
            .is_none()
        {
            return Err(CoreError::not_found(
                EntityKind::Customer,
                new_sale.customer_id,
            ));
        }

        let mut sale = Sale::open(
            new_sale.customer_id,
            new_sale.shipping_method,
            new_sale.status,
            new_sale.sold_at,
            Utc::now(),
        );

        for requested in &new_sale.line_items {
            let product = self
                .catalog
                .resolve_product(&requested.product_id)
                .await?
                .ok_or_else(|| CoreError::ReferenceIntegrityViolation {
                    product_id: requested.product_id.clone(),
                })?;
            sale.add_line_item(&product, requested.quantity);
        }
        if let Err(e) = sale.recompute_total() {
            warn!(customer_id = %sale.customer_id, error = %e, "Sale rejected: total overflows");
            return Err(e.into());
        }

        self.store.insert_sale(&sale).await?;

        info!(
            id = %sale.id,
            customer_id = %sale.customer_id,
            items = sale.line_items.len(),
            total = %sale.total(),
            "Sale created"
        );
        Ok(sale)
    }

    pub async fn get(&self, id: &str) -> CoreResult<Sale> {
        self.store
            .find_sale(id)
            .await?
            .ok_or_else(|| CoreError::not_found(EntityKind::Sale, id))
    }

    pub async fn list(&self) -> CoreResult<Vec<Sale>> {
        self.store.list_sales().await
    }

    /// Replaces timestamp, total, shipping method and status.
    pub async fn update(&self, id: &str, update: SaleUpdate) -> CoreResult<Sale> {
        let mut sale = self.get(id).await?;
        sale.apply_update(update, Utc::now());
        self.store.save_sale(&sale).await?;

        info!(id = %sale.id, status = ?sale.status, total = %sale.total(), "Sale updated");
        Ok(sale)
    }

    pub async fn delete(&self, id: &str) -> CoreResult<()> {
        if !self.store.delete_sale(id).await? {
            return Err(CoreError::not_found(EntityKind::Sale, id));
        }
        info!(id = %id, "Sale deleted");
        Ok(())
    }

    /// Applies a percentage discount to a pending sale.
    ///
    /// Any finite percentage is accepted, inside 0..=100 or not. NaN,
    /// infinities and results that overflow are validation errors. A
    /// non-pending sale is returned as [`DiscountOutcome::Unchanged`]
    /// without touching the store.
    pub async fn apply_discount(&self, id: &str, percentage: f64) -> CoreResult<DiscountOutcome> {
        let mut sale = self.get(id).await?;

        if !sale.apply_discount(percentage, Utc::now())? {
            warn!(id = %id, status = ?sale.status, "Discount ignored: sale is not pending");
            return Ok(DiscountOutcome::Unchanged(sale));
        }

        self.store.save_sale(&sale).await?;
        info!(id = %id, percentage, total = %sale.total(), "Discount applied");
        Ok(DiscountOutcome::Applied(sale))
    }

    /// Cancels a sale regardless of its current state.
    pub async fn cancel(&self, id: &str) -> CoreResult<Sale> {
        let mut sale = self.get(id).await?;
        sale.cancel(Utc::now());
        self.store.save_sale(&sale).await?;

        info!(id = %id, "Sale cancelled");
        Ok(sale)
    }

    /// Renders the textual invoice, or `None` for an unknown sale.
    pub async fn render_invoice_text(&self, id: &str) -> CoreResult<Option<String>> {
        let Some(sale) = self.store.find_sale(id).await? else {
            debug!(id = %id, "Invoice text requested for unknown sale");
            return Ok(None);
        };
        let customer = self.customers.resolve_customer(&sale.customer_id).await?;
        Ok(Some(invoice_text::render(&sale, customer.as_ref())))
    }
}

// =============================================================================
// Invoice Issuer
// =============================================================================

/// Invoice operations over a sale store and an invoice store.
pub struct InvoiceIssuer<'a, S, I> {
    sales: &'a S,
    invoices: &'a I,
}

impl<'a, S, I> InvoiceIssuer<'a, S, I>
where
    S: SaleStore,
    I: InvoiceStore,
{
    pub fn new(sales: &'a S, invoices: &'a I) -> Self {
        Self { sales, invoices }
    }

    /// Issues an invoice for `sale_id`, or returns `None` if the sale does
    /// not exist.
    ///
    /// A second invoice for the same sale is rejected by the store with
    /// [`CoreError::AlreadyInvoiced`].
    pub async fn issue(&self, sale_id: &str) -> CoreResult<Option<Invoice>> {
        let Some(sale) = self.sales.find_sale(sale_id).await? else {
            debug!(sale_id = %sale_id, "Invoice requested for unknown sale");
            return Ok(None);
        };

        let invoice = Invoice::snapshot(&sale, Utc::now());
        self.invoices.insert_invoice(&invoice).await?;

        info!(id = %invoice.id, sale_id = %sale_id, total = %invoice.total(), "Invoice issued");
        Ok(Some(invoice))
    }

    pub async fn find_by_id(&self, id: &str) -> CoreResult<Invoice> {
        self.invoices
            .find_invoice(id)
            .await?
            .ok_or_else(|| CoreError::not_found(EntityKind::Invoice, id))
    }

    pub async fn find_by_sale_id(&self, sale_id: &str) -> CoreResult<Invoice> {
        self.invoices
            .find_invoice_by_sale(sale_id)
            .await?
            .ok_or_else(|| CoreError::not_found(EntityKind::Invoice, sale_id))
    }

    pub async fn list(&self) -> CoreResult<Vec<Invoice>> {
        self.invoices.list_invoices().await
    }

    /// Replaces issuance time, total and owning sale as supplied.
    pub async fn update(&self, id: &str, update: InvoiceUpdate) -> CoreResult<Invoice> {
        let mut invoice = self.find_by_id(id).await?;
        invoice.apply_update(update);
        self.invoices.save_invoice(&invoice).await?;

        info!(id = %id, sale_id = %invoice.sale_id, "Invoice updated");
        Ok(invoice)
    }

    pub async fn delete(&self, id: &str) -> CoreResult<()> {
        if !self.invoices.delete_invoice(id).await? {
            return Err(CoreError::not_found(EntityKind::Invoice, id));
        }
        info!(id = %id, "Invoice deleted");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
