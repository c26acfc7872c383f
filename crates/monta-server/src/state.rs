use std::sync::Arc;

use monta_core::store::SyncDb;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<SyncDb>,
    /// Shared secret expected in webhook bodies. `None` disables the check.
    pub webhook_secret: Option<String>,
}

impl AppState {
    pub fn new(db: Arc<SyncDb>, webhook_secret: Option<String>) -> Self {
        Self { db, webhook_secret }
    }
}
