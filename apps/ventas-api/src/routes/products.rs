//! Product catalog routes. Plain CRUD on the pool, no session needed.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use ventas_core::validation::validate_product_input;
use ventas_core::{EntityKind, Product, ProductInput};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

pub async fn list_products(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    Ok(Json(state.db.products().list().await?))
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(body): Json<ProductInput>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    validate_product_input(&body)?;
    let product = state.db.products().insert(&body).await?;

    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(EntityKind::Product, &id))
}

/// Replaces name and price. Line items already sold keep their captured
/// price.
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ProductInput>,
) -> ApiResult<Json<Product>> {
    validate_product_input(&body)?;
    let product = state.db.products().update(&id, &body).await?;

    Ok(Json(product))
}

/// 409 while any line item still references the product.
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.db.products().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
