//! Read-only view of the mirrored order records.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/orders: all mirrored records, in reference order.
pub async fn list_orders(State(app): State<AppState>) -> Result<Json<Value>, AppError> {
    let db = app.db.clone();
    let records = tokio::task::spawn_blocking(move || db.list_orders())
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;
    Ok(Json(serde_json::json!(records)))
}

/// GET /api/orders/{reference}: one record by exact reference.
pub async fn get_order(
    State(app): State<AppState>,
    Path(reference): Path<String>,
) -> Result<Json<Value>, AppError> {
    let db = app.db.clone();
    let lookup = reference.clone();
    let record = tokio::task::spawn_blocking(move || db.get_order(&lookup))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    match record {
        Some(record) => Ok(Json(serde_json::json!(record))),
        None => Err(AppError::not_found(format!(
            "order '{reference}' not found"
        ))),
    }
}
