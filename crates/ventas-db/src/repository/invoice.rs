//! # Invoice Queries
//!
//! Statements for invoices. `invoices.sale_id` is UNIQUE, which is what
//! enforces one invoice per sale.

use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::DbResult;
use ventas_core::Invoice;

const INVOICE_COLUMNS: &str = "id, sale_id, issued_at, total_cents";

pub async fn find(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Invoice>> {
    let invoice = sqlx::query_as::<_, Invoice>(&format!(
        "SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = ?1"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(invoice)
}

pub async fn find_by_sale(conn: &mut SqliteConnection, sale_id: &str) -> DbResult<Option<Invoice>> {
    let invoice = sqlx::query_as::<_, Invoice>(&format!(
        "SELECT {INVOICE_COLUMNS} FROM invoices WHERE sale_id = ?1"
    ))
    .bind(sale_id)
    .fetch_optional(conn)
    .await?;

    Ok(invoice)
}

pub async fn list(conn: &mut SqliteConnection) -> DbResult<Vec<Invoice>> {
    let invoices = sqlx::query_as::<_, Invoice>(&format!(
        "SELECT {INVOICE_COLUMNS} FROM invoices ORDER BY issued_at DESC, id"
    ))
    .fetch_all(conn)
    .await?;

    Ok(invoices)
}

/// Inserts an invoice.
///
/// Fails with `UniqueViolation { field: "invoices.sale_id" }` if the sale is
/// already invoiced.
pub async fn insert(conn: &mut SqliteConnection, invoice: &Invoice) -> DbResult<()> {
    debug!(id = %invoice.id, sale_id = %invoice.sale_id, "Inserting invoice");

    sqlx::query(
        r#"
        INSERT INTO invoices (id, sale_id, issued_at, total_cents)
        VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(&invoice.id)
    .bind(&invoice.sale_id)
    .bind(invoice.issued_at)
    .bind(invoice.total_cents)
    .execute(conn)
    .await?;

    Ok(())
}

/// Overwrites every column of an invoice. Returns whether a row matched.
pub async fn update(conn: &mut SqliteConnection, invoice: &Invoice) -> DbResult<bool> {
    debug!(id = %invoice.id, "Updating invoice");

    let result = sqlx::query(
        r#"
        UPDATE invoices SET
            sale_id = ?2,
            issued_at = ?3,
            total_cents = ?4
        WHERE id = ?1
        "#,
    )
    .bind(&invoice.id)
    .bind(&invoice.sale_id)
    .bind(invoice.issued_at)
    .bind(invoice.total_cents)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete(conn: &mut SqliteConnection, id: &str) -> DbResult<bool> {
    debug!(id = %id, "Deleting invoice");

    let result = sqlx::query("DELETE FROM invoices WHERE id = ?1")
        .bind(id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected() > 0)
}
