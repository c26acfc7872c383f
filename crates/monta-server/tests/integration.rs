use std::sync::Arc;

use axum::http::StatusCode;
use http_body_util::BodyExt;
use monta_core::order::ExternalOrder;
use monta_core::store::SyncDb;
use tempfile::TempDir;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn open_db(dir: &TempDir) -> Arc<SyncDb> {
    Arc::new(SyncDb::open(&dir.path().join("bridge.db")).unwrap())
}

/// Send a GET request via `oneshot` and return (status, parsed JSON body).
async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// Send a POST request with a JSON body via `oneshot`.
async fn post_json(
    app: axum::Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(axum::body::Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

// ---------------------------------------------------------------------------
// Webhook
// ---------------------------------------------------------------------------

#[tokio::test]
async fn webhook_rejects_wrong_secret() {
    let dir = TempDir::new().unwrap();
    let db = open_db(&dir);
    let app = monta_server::build_router(db, Some("s3cret".to_string()));

    let (status, body) = post_json(
        app,
        "/monta/webhook",
        serde_json::json!({ "event": "order.updated", "secret": "wrong", "data": {} }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn shipment_update_mirrors_tracking_into_the_store() {
    let dir = TempDir::new().unwrap();
    let db = open_db(&dir);
    let app = monta_server::build_router(db.clone(), Some("s3cret".to_string()));

    let (status, body) = post_json(
        app,
        "/monta/webhook",
        serde_json::json!({
            "event": "shipment.updated",
            "secret": "s3cret",
            "data": { "orderId": "BC00013", "status": "shipped", "trackingNumber": "3STEST123" },
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mirrored"], true);

    let record = db.get_order("BC00013").unwrap().unwrap();
    assert_eq!(record.track_trace.as_deref(), Some("3STEST123"));
    assert_eq!(record.status.as_deref(), Some("shipped"));
}

#[tokio::test]
async fn order_update_creates_a_missing_record() {
    let dir = TempDir::new().unwrap();
    let db = open_db(&dir);
    let app = monta_server::build_router(db.clone(), None);

    let (status, body) = post_json(
        app,
        "/monta/webhook",
        serde_json::json!({
            "event": "order.updated",
            "data": { "id": "BC42", "status": "cancelled" },
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mirrored"], true);
    assert!(db.get_order("BC42").unwrap().is_some());
}

#[tokio::test]
async fn unknown_event_is_acknowledged_and_ignored() {
    let dir = TempDir::new().unwrap();
    let db = open_db(&dir);
    let app = monta_server::build_router(db.clone(), None);

    let (status, body) = post_json(
        app,
        "/monta/webhook",
        serde_json::json!({ "event": "inventory.updated", "data": { "sku": "X" } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mirrored"], false);
    assert!(db.list_orders().unwrap().is_empty());
}

#[tokio::test]
async fn webhook_payload_is_logged_redacted() {
    let dir = TempDir::new().unwrap();
    let db = open_db(&dir);
    let app = monta_server::build_router(db.clone(), Some("s3cret".to_string()));

    post_json(
        app,
        "/monta/webhook",
        serde_json::json!({
            "event": "order.updated",
            "secret": "s3cret",
            "data": { "id": "BC1", "status": "picked", "token": "abc123" },
        }),
    )
    .await;

    let logs = db.recent_logs(1).unwrap();
    assert_eq!(logs[0].tag, "monta.webhook");
    assert_eq!(logs[0].data["data"]["status"], "picked");
    assert!(!logs[0].data.to_string().contains("abc123"));
}

// ---------------------------------------------------------------------------
// Orders API
// ---------------------------------------------------------------------------

#[tokio::test]
async fn orders_list_and_get_round_trip() {
    let dir = TempDir::new().unwrap();
    let db = open_db(&dir);
    let mut order = ExternalOrder::new("BC00013");
    order.status = Some("Picked".to_string());
    db.upsert_order(&order).unwrap();

    let app = monta_server::build_router(db.clone(), None);
    let (status, body) = get(app.clone(), "/api/orders").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = get(app, "/api/orders/BC00013").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Picked");
}

#[tokio::test]
async fn unknown_reference_is_404() {
    let dir = TempDir::new().unwrap();
    let app = monta_server::build_router(open_db(&dir), None);
    let (status, _) = get(app, "/api/orders/NOPE").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
