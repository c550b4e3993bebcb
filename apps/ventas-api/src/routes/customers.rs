//! Customer registry routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use ventas_core::validation::validate_new_customer;
use ventas_core::{Customer, EntityKind, NewCustomer};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_customers).post(create_customer))
        .route("/:id", get(get_customer))
        .route("/by-rut/:rut", get(get_customer_by_rut))
}

pub async fn list_customers(State(state): State<AppState>) -> ApiResult<Json<Vec<Customer>>> {
    Ok(Json(state.db.customers().list().await?))
}

/// Registers a customer. A RUT that is already registered is a 409.
pub async fn create_customer(
    State(state): State<AppState>,
    Json(body): Json<NewCustomer>,
) -> ApiResult<(StatusCode, Json<Customer>)> {
    validate_new_customer(&body)?;
    let customer = state.db.customers().insert(&body).await?;

    Ok((StatusCode::CREATED, Json(customer)))
}

pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Customer>> {
    state
        .db
        .customers()
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(EntityKind::Customer, &id))
}

pub async fn get_customer_by_rut(
    State(state): State<AppState>,
    Path(rut): Path<String>,
) -> ApiResult<Json<Customer>> {
    state
        .db
        .customers()
        .get_by_rut(&rut)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(EntityKind::Customer, &rut))
}
