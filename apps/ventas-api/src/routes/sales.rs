//! # Sale Routes
//!
//! Sale lifecycle over HTTP. Every handler opens one `DbSession`, runs a
//! single `SaleService` operation against it and commits; an early `?`
//! drops the session, which rolls the transaction back.
//!
//! | Method | Path                         | Operation          |
//! |--------|------------------------------|--------------------|
//! | GET    | /api/sales                   | list               |
//! | POST   | /api/sales                   | create             |
//! | GET    | /api/sales/:id               | get                |
//! | PUT    | /api/sales/:id               | update             |
//! | DELETE | /api/sales/:id               | delete             |
//! | PUT    | /api/sales/:id/discount      | apply_discount     |
//! | PUT    | /api/sales/:id/cancel        | cancel             |
//! | GET    | /api/sales/:id/invoice-text  | render_invoice_text|

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Deserialize;
use ventas_core::{EntityKind, NewSale, Sale, SaleService, SaleUpdate};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sales).post(create_sale))
        .route("/:id", get(get_sale).put(update_sale).delete(delete_sale))
        .route("/:id/discount", put(apply_discount))
        .route("/:id/cancel", put(cancel_sale))
        .route("/:id/invoice-text", get(invoice_text))
}

#[derive(Debug, Deserialize)]
pub struct DiscountParams {
    pub percentage: f64,
}

pub async fn list_sales(State(state): State<AppState>) -> ApiResult<Json<Vec<Sale>>> {
    let session = state.db.begin().await?;
    let sales = SaleService::new(&session, &session, &session).list().await?;
    session.commit().await?;

    Ok(Json(sales))
}

pub async fn create_sale(
    State(state): State<AppState>,
    Json(body): Json<NewSale>,
) -> ApiResult<(StatusCode, Json<Sale>)> {
    let session = state.db.begin().await?;
    let sale = SaleService::new(&session, &session, &session)
        .create(body)
        .await?;
    session.commit().await?;

    Ok((StatusCode::CREATED, Json(sale)))
}

pub async fn get_sale(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Sale>> {
    let session = state.db.begin().await?;
    let sale = SaleService::new(&session, &session, &session).get(&id).await?;
    session.commit().await?;

    Ok(Json(sale))
}

pub async fn update_sale(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<SaleUpdate>,
) -> ApiResult<Json<Sale>> {
    let session = state.db.begin().await?;
    let sale = SaleService::new(&session, &session, &session)
        .update(&id, body)
        .await?;
    session.commit().await?;

    Ok(Json(sale))
}

pub async fn delete_sale(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let session = state.db.begin().await?;
    SaleService::new(&session, &session, &session)
        .delete(&id)
        .await?;
    session.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Responds with the sale either way; a non-pending sale comes back as it
/// was stored.
pub async fn apply_discount(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<DiscountParams>,
) -> ApiResult<Json<Sale>> {
    let session = state.db.begin().await?;
    let outcome = SaleService::new(&session, &session, &session)
        .apply_discount(&id, params.percentage)
        .await?;
    session.commit().await?;

    Ok(Json(outcome.into_sale()))
}

pub async fn cancel_sale(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Sale>> {
    let session = state.db.begin().await?;
    let sale = SaleService::new(&session, &session, &session)
        .cancel(&id)
        .await?;
    session.commit().await?;

    Ok(Json(sale))
}

/// Plain-text invoice (`text/plain; charset=utf-8`).
pub async fn invoice_text(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<String> {
    let session = state.db.begin().await?;
    let text = SaleService::new(&session, &session, &session)
        .render_invoice_text(&id)
        .await?;
    session.commit().await?;

    text.ok_or_else(|| ApiError::not_found(EntityKind::Sale, &id))
}
