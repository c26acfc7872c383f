//! `monta-server`: webhook listener and read-only orders API.
//!
//! Polling via the CLI is the primary sync path; this listener lets Monta
//! push `order.updated` / `shipment.updated` events between polls so the
//! mirror stays fresh.

pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use monta_core::store::SyncDb;

/// Build the axum Router with all routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(db: Arc<SyncDb>, webhook_secret: Option<String>) -> Router {
    let app_state = state::AppState::new(db, webhook_secret);

    Router::new()
        .route("/monta/webhook", post(routes::webhook::handle_webhook))
        .route("/api/orders", get(routes::orders::list_orders))
        .route("/api/orders/{reference}", get(routes::orders::get_order))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(db: Arc<SyncDb>, webhook_secret: Option<String>, port: u16) -> anyhow::Result<()> {
    let router = build_router(db, webhook_secret);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("webhook listener on {}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}
