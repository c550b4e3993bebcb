use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::state::AppState;

/// Liveness, a database round trip and the schema's migration state.
///
/// 503 when the database is unreachable or migrations are pending.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    if !state.db.health_check().await {
        tracing::warn!("Health check failed: database unreachable");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "degraded", "database": "down" })),
        );
    }

    match state.db.migration_status().await {
        Ok((total, applied)) if applied >= total => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "database": "up",
                "migrations": { "total": total, "applied": applied },
            })),
        ),
        Ok((total, applied)) => {
            tracing::warn!(total, applied, "Health check failed: migrations pending");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "database": "up",
                    "migrations": { "total": total, "applied": applied },
                })),
            )
        }
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed: migration status unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "database": "up", "migrations": null })),
            )
        }
    }
}
