//! # Sale Queries
//!
//! Statements for sales and their line items.
//!
//! ## Storage Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sales                         sale_line_items                          │
//! │  ┌───────────────────┐         ┌──────────────────────────────┐         │
//! │  │ id                │◄────────│ sale_id  (ON DELETE CASCADE) │         │
//! │  │ customer_id       │         │ position                     │         │
//! │  │ sold_at           │         │ product_id  (no cascade)     │         │
//! │  │ total_cents       │         │ name_snapshot                │         │
//! │  │ shipping_method   │         │ unit_price_cents             │         │
//! │  │ status            │         │ quantity                     │         │
//! │  └───────────────────┘         └──────────────────────────────┘         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function takes the connection it runs on, so a `DbSession` can
//! thread one transaction through a whole operation.

use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::DbResult;
use ventas_core::{LineItem, Sale};

const SALE_COLUMNS: &str =
    "id, customer_id, sold_at, total_cents, shipping_method, status, created_at, updated_at";

const LINE_ITEM_COLUMNS: &str =
    "id, sale_id, position, product_id, name_snapshot, unit_price_cents, quantity";

/// Loads a sale and its line items.
pub async fn find(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Sale>> {
    let sale = sqlx::query_as::<_, Sale>(&format!("SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    match sale {
        Some(mut sale) => {
            sale.line_items = line_items(conn, &sale.id).await?;
            Ok(Some(sale))
        }
        None => Ok(None),
    }
}

/// Lists all sales, newest first, each with its line items.
pub async fn list(conn: &mut SqliteConnection) -> DbResult<Vec<Sale>> {
    let mut sales = sqlx::query_as::<_, Sale>(&format!(
        "SELECT {SALE_COLUMNS} FROM sales ORDER BY sold_at DESC, id"
    ))
    .fetch_all(&mut *conn)
    .await?;

    for sale in &mut sales {
        sale.line_items = line_items(conn, &sale.id).await?;
    }

    debug!(count = sales.len(), "Listed sales");
    Ok(sales)
}

/// Gets the line items of a sale, in position order.
pub async fn line_items(conn: &mut SqliteConnection, sale_id: &str) -> DbResult<Vec<LineItem>> {
    let items = sqlx::query_as::<_, LineItem>(&format!(
        "SELECT {LINE_ITEM_COLUMNS} FROM sale_line_items WHERE sale_id = ?1 ORDER BY position"
    ))
    .bind(sale_id)
    .fetch_all(conn)
    .await?;

    Ok(items)
}

/// Inserts the sale row followed by every line item row.
pub async fn insert(conn: &mut SqliteConnection, sale: &Sale) -> DbResult<()> {
    debug!(id = %sale.id, items = sale.line_items.len(), "Inserting sale");

    sqlx::query(
        r#"
        INSERT INTO sales (
            id, customer_id, sold_at, total_cents,
            shipping_method, status, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(&sale.id)
    .bind(&sale.customer_id)
    .bind(sale.sold_at)
    .bind(sale.total_cents)
    .bind(sale.shipping_method)
    .bind(sale.status)
    .bind(sale.created_at)
    .bind(sale.updated_at)
    .execute(&mut *conn)
    .await?;

    for item in &sale.line_items {
        insert_line_item(conn, item).await?;
    }

    Ok(())
}

async fn insert_line_item(conn: &mut SqliteConnection, item: &LineItem) -> DbResult<()> {
    debug!(sale_id = %item.sale_id, product_id = %item.product_id, "Adding line item");

    sqlx::query(
        r#"
        INSERT INTO sale_line_items (
            id, sale_id, position, product_id,
            name_snapshot, unit_price_cents, quantity
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&item.id)
    .bind(&item.sale_id)
    .bind(item.position)
    .bind(&item.product_id)
    .bind(&item.name_snapshot)
    .bind(item.unit_price_cents)
    .bind(item.quantity)
    .execute(conn)
    .await?;

    Ok(())
}

/// Writes the header fields of a sale. Returns whether a row matched.
pub async fn update_header(conn: &mut SqliteConnection, sale: &Sale) -> DbResult<bool> {
    debug!(id = %sale.id, status = ?sale.status, "Updating sale");

    let result = sqlx::query(
        r#"
        UPDATE sales SET
            sold_at = ?2,
            total_cents = ?3,
            shipping_method = ?4,
            status = ?5,
            updated_at = ?6
        WHERE id = ?1
        "#,
    )
    .bind(&sale.id)
    .bind(sale.sold_at)
    .bind(sale.total_cents)
    .bind(sale.shipping_method)
    .bind(sale.status)
    .bind(sale.updated_at)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Deletes a sale; its line items go with it. Returns whether a row matched.
pub async fn delete(conn: &mut SqliteConnection, id: &str) -> DbResult<bool> {
    debug!(id = %id, "Deleting sale");

    let result = sqlx::query("DELETE FROM sales WHERE id = ?1")
        .bind(id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected() > 0)
}
