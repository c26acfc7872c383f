//! Reconcile fetched Monta orders into the local mirror.
//!
//! Entries are applied in input order, so a later entry for the same
//! reference wins over an earlier one. A failure on one entry is logged and
//! counted, and the rest of the batch still runs. Reprocessing the same
//! batch converges to the same store state.

use serde::Serialize;
use serde_json::{json, Value};

use crate::error::Result;
use crate::log::LogLevel;
use crate::mapper::map_order;
use crate::order::ExternalOrder;
use crate::store::{SyncDb, Upserted};

pub const LOG_TAG: &str = "monta.sync";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileSummary {
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
}

impl ReconcileSummary {
    pub fn total(&self) -> usize {
        self.created + self.updated + self.failed
    }
}

impl std::fmt::Display for ReconcileSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} created, {} updated, {} failed",
            self.created, self.updated, self.failed
        )
    }
}

/// Apply a batch of already-mapped orders to the store.
pub fn reconcile(db: &SyncDb, orders: &[ExternalOrder]) -> Result<ReconcileSummary> {
    let mut summary = ReconcileSummary::default();
    for order in orders {
        apply(db, order, &mut summary)?;
    }
    tracing::info!(%summary, "reconciled {} orders", orders.len());
    Ok(summary)
}

/// Map and apply a batch of raw Monta payloads.
///
/// A payload that fails to map is logged (redacted) and skipped; the batch
/// continues (isolate-per-item).
pub fn reconcile_payloads(db: &SyncDb, payloads: &[Value]) -> Result<ReconcileSummary> {
    let mut summary = ReconcileSummary::default();
    for payload in payloads {
        match map_order(payload) {
            Ok(order) => apply(db, &order, &mut summary)?,
            Err(err) => {
                summary.failed += 1;
                tracing::warn!(error = %err, "skipping unmappable order payload");
                db.log(
                    LogLevel::Error,
                    LOG_TAG,
                    &json!({ "error": err.to_string(), "payload": payload }),
                )?;
            }
        }
    }
    tracing::info!(%summary, "reconciled {} payloads", payloads.len());
    Ok(summary)
}

fn apply(db: &SyncDb, order: &ExternalOrder, summary: &mut ReconcileSummary) -> Result<()> {
    match db.upsert_order(order) {
        Ok(Upserted::Created) => summary.created += 1,
        Ok(Upserted::Updated) => summary.updated += 1,
        Err(err) => {
            summary.failed += 1;
            tracing::warn!(reference = %order.reference, error = %err, "upsert failed");
            db.log(
                LogLevel::Error,
                LOG_TAG,
                &json!({ "reference": order.reference, "error": err.to_string() }),
            )?;
        }
    }
    Ok(())
}
