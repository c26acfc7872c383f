use anyhow::Context;
use std::path::Path;

use monta_client::{MontaClient, StatusResolver};
use monta_core::reconciler;
use monta_core::settings::{FileSettings, MontaConfig};
use monta_core::store::SyncDb;

use crate::output;

/// `monta refresh`: re-resolve unsettled records through the status ladder.
///
/// Settled orders (shipped, delivered, cancelled) have left the pipeline and
/// are skipped. The ladder treats per-order failures as misses, so one bad
/// order never stops the run.
pub fn run(db_path: &Path, settings_path: &Path, limit: usize, json: bool) -> anyhow::Result<()> {
    let settings = FileSettings::load(settings_path)
        .with_context(|| format!("failed to load settings from {}", settings_path.display()))?;
    let config = MontaConfig::from_store(&settings)?;
    let client = MontaClient::new(config)?;
    let db = SyncDb::open(db_path)?;

    let candidates: Vec<String> = db
        .list_orders()?
        .into_iter()
        .filter(|record| !record.is_settled())
        .take(limit)
        .map(|record| record.reference)
        .collect();

    let resolver = StatusResolver::new(&client);
    let orders: Vec<_> = candidates
        .iter()
        .map(|reference| resolver.resolve_order(reference))
        .collect();
    let summary = reconciler::reconcile(&db, &orders)?;

    if json {
        output::print_json(&summary)?;
    } else {
        println!("Refreshed {} orders: {summary}", candidates.len());
    }
    Ok(())
}
