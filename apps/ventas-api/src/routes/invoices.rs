//! # Invoice Routes
//!
//! | Method | Path                              | Operation       |
//! |--------|-----------------------------------|-----------------|
//! | GET    | /api/invoices                     | list            |
//! | GET    | /api/invoices/:id                 | find_by_id      |
//! | PUT    | /api/invoices/:id                 | update          |
//! | DELETE | /api/invoices/:id                 | delete          |
//! | GET    | /api/invoices/by-sale/:sale_id    | find_by_sale_id |
//! | POST   | /api/invoices/issue/:sale_id      | issue           |

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use ventas_core::{EntityKind, Invoice, InvoiceIssuer, InvoiceUpdate};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_invoices))
        .route(
            "/:id",
            get(get_invoice).put(update_invoice).delete(delete_invoice),
        )
        .route("/by-sale/:sale_id", get(get_invoice_by_sale))
        .route("/issue/:sale_id", post(issue_invoice))
}

pub async fn list_invoices(State(state): State<AppState>) -> ApiResult<Json<Vec<Invoice>>> {
    let session = state.db.begin().await?;
    let invoices = InvoiceIssuer::new(&session, &session).list().await?;
    session.commit().await?;

    Ok(Json(invoices))
}

pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Invoice>> {
    let session = state.db.begin().await?;
    let invoice = InvoiceIssuer::new(&session, &session)
        .find_by_id(&id)
        .await?;
    session.commit().await?;

    Ok(Json(invoice))
}

pub async fn get_invoice_by_sale(
    State(state): State<AppState>,
    Path(sale_id): Path<String>,
) -> ApiResult<Json<Invoice>> {
    let session = state.db.begin().await?;
    let invoice = InvoiceIssuer::new(&session, &session)
        .find_by_sale_id(&sale_id)
        .await?;
    session.commit().await?;

    Ok(Json(invoice))
}

/// Issues the invoice for a sale. 404 if the sale does not exist, 409 if it
/// is already invoiced.
pub async fn issue_invoice(
    State(state): State<AppState>,
    Path(sale_id): Path<String>,
) -> ApiResult<(StatusCode, Json<Invoice>)> {
    let session = state.db.begin().await?;
    let issued = InvoiceIssuer::new(&session, &session)
        .issue(&sale_id)
        .await?;
    session.commit().await?;

    issued
        .map(|invoice| (StatusCode::CREATED, Json(invoice)))
        .ok_or_else(|| ApiError::not_found(EntityKind::Sale, &sale_id))
}

pub async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<InvoiceUpdate>,
) -> ApiResult<Json<Invoice>> {
    let session = state.db.begin().await?;
    let invoice = InvoiceIssuer::new(&session, &session)
        .update(&id, body)
        .await?;
    session.commit().await?;

    Ok(Json(invoice))
}

pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let session = state.db.begin().await?;
    InvoiceIssuer::new(&session, &session).delete(&id).await?;
    session.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}
