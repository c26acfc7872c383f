use std::path::Path;
use std::sync::Arc;

use monta_core::store::SyncDb;

/// `monta serve`: run the webhook listener until interrupted.
pub fn run(db_path: &Path, port: u16, webhook_secret: Option<String>) -> anyhow::Result<()> {
    if webhook_secret.is_none() {
        tracing::warn!("no webhook secret configured; accepting unauthenticated webhooks");
    }
    let db = Arc::new(SyncDb::open(db_path)?);
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(monta_server::serve(db, webhook_secret, port))
}
