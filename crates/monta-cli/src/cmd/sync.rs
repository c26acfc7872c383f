use anyhow::Context;
use std::path::Path;

use monta_client::MontaClient;
use monta_core::reconciler;
use monta_core::settings::{FileSettings, MontaConfig};
use monta_core::store::SyncDb;

use crate::output;

/// `monta sync`: fetch orders from Monta and reconcile the batch.
///
/// A payload that fails to map is logged and skipped; the batch continues.
pub fn run(db_path: &Path, settings_path: &Path, search: Option<&str>, json: bool) -> anyhow::Result<()> {
    let settings = FileSettings::load(settings_path)
        .with_context(|| format!("failed to load settings from {}", settings_path.display()))?;
    let config = MontaConfig::from_store(&settings)?;
    let client = MontaClient::new(config)?;
    let db = SyncDb::open(db_path)?;

    let payloads = client
        .fetch_orders(search)
        .context("failed to fetch orders from Monta")?;
    let summary = reconciler::reconcile_payloads(&db, &payloads)?;

    if json {
        output::print_json(&summary)?;
    } else {
        println!("Synced {} orders: {summary}", payloads.len());
    }
    Ok(())
}
