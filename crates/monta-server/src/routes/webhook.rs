//! Inbound webhook: Monta pushes an update, the bridge mirrors it.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use monta_core::log::LogLevel;
use monta_core::mapper::first_string;
use monta_core::order::{ExternalOrder, StatusSource};

use crate::error::AppError;
use crate::state::AppState;

pub const LOG_TAG: &str = "monta.webhook";

#[derive(Deserialize)]
pub struct WebhookBody {
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default)]
    pub data: Value,
}

/// POST /monta/webhook: mirror a pushed update into the order store.
///
/// Unknown events and payloads without a usable reference are acknowledged
/// and ignored; rejecting them would only trigger sender-side retry storms.
pub async fn handle_webhook(
    State(app): State<AppState>,
    Json(body): Json<WebhookBody>,
) -> Result<Json<Value>, AppError> {
    if let Some(expected) = &app.webhook_secret {
        if body.secret.as_deref() != Some(expected.as_str()) {
            tracing::warn!("webhook with invalid secret rejected");
            return Err(AppError::forbidden("invalid webhook secret"));
        }
    }

    let db = app.db.clone();
    let event = body.event.unwrap_or_default();
    let data = body.data;
    let mirrored = tokio::task::spawn_blocking(move || {
        db.log(LogLevel::Info, LOG_TAG, &json!({ "event": event, "data": data }))?;

        let update = match event.as_str() {
            "order.updated" => order_update(&data),
            "shipment.updated" => shipment_update(&data),
            _ => {
                tracing::debug!(event, "ignoring webhook event");
                None
            }
        };
        let mirrored = match update {
            Some(order) => {
                db.upsert_order(&order)?;
                true
            }
            None => false,
        };
        Ok::<_, monta_core::MontaError>(mirrored)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(json!({ "ok": true, "mirrored": mirrored })))
}

/// Webhook payloads use camelCase keys, unlike the PascalCase REST bodies.
fn order_update(data: &Value) -> Option<ExternalOrder> {
    let reference = first_string(data, &["orderId", "id", "reference"])?;
    let mut order = ExternalOrder::new(reference);
    order.status = first_string(data, &["status"]);
    order.source = Some(StatusSource::Orders);
    Some(order)
}

fn shipment_update(data: &Value) -> Option<ExternalOrder> {
    let reference = first_string(data, &["orderId", "orderReference", "reference"])?;
    let mut order = ExternalOrder::new(reference);
    order.status = first_string(data, &["status"]);
    order.track_trace = first_string(data, &["trackingNumber", "trackTrace"]);
    order.source = Some(StatusSource::Shipments);
    Some(order)
}
