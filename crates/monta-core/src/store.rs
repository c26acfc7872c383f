//! Persistent mirror of Monta orders, backed by redb.
//!
//! # Table design
//!
//! `ORDERS` maps the order reference (exact string) to a JSON-encoded
//! [`OrderRecord`]. Reference matching is byte-exact (no trimming, no case
//! folding) so reconciliation is deterministic across tenants. A second
//! `sync_log` table lives in the same database file (see [`crate::log`]).

use std::path::Path;

use chrono::Utc;
use redb::{Database, ReadableTable, TableDefinition};

use crate::error::{MontaError, Result};
use crate::order::{ExternalOrder, OrderRecord};

/// Key: order reference. Value: JSON-encoded `OrderRecord`.
const ORDERS: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");

/// Outcome of an upsert: whether a record was created or an existing one
/// had its mirrored fields updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upserted {
    Created,
    Updated,
}

pub(crate) fn store_err(e: impl std::fmt::Display) -> MontaError {
    MontaError::Store(e.to_string())
}

/// Order mirror + sync log database.
pub struct SyncDb {
    pub(crate) db: Database,
}

impl SyncDb {
    /// Open or create the database at `path`, ensuring all tables exist.
    pub fn open(path: &Path) -> Result<Self> {
        let db = Database::create(path).map_err(store_err)?;
        let wt = db.begin_write().map_err(store_err)?;
        wt.open_table(ORDERS).map_err(store_err)?;
        wt.open_table(crate::log::LOG).map_err(store_err)?;
        wt.commit().map_err(store_err)?;
        Ok(Self { db })
    }

    /// Look up a record by exact reference.
    pub fn get_order(&self, reference: &str) -> Result<Option<OrderRecord>> {
        let rt = self.db.begin_read().map_err(store_err)?;
        let table = rt.open_table(ORDERS).map_err(store_err)?;
        let Some(raw) = table.get(reference).map_err(store_err)? else {
            return Ok(None);
        };
        let record: OrderRecord = serde_json::from_slice(raw.value())?;
        Ok(Some(record))
    }

    /// Create the record for `order.reference`, or mirror the mutable fields
    /// onto the existing one. The stored reference is never rewritten.
    pub fn upsert_order(&self, order: &ExternalOrder) -> Result<Upserted> {
        let now = Utc::now();
        let wt = self.db.begin_write().map_err(store_err)?;
        let outcome;
        {
            let mut table = wt.open_table(ORDERS).map_err(store_err)?;
            let existing = match table
                .get(order.reference.as_str())
                .map_err(store_err)?
            {
                Some(raw) => Some(serde_json::from_slice::<OrderRecord>(raw.value())?),
                None => None,
            };
            let record = match existing {
                Some(mut record) => {
                    record.mirror(order, now);
                    outcome = Upserted::Updated;
                    record
                }
                None => {
                    outcome = Upserted::Created;
                    OrderRecord::from_external(order, now)
                }
            };
            let value = serde_json::to_vec(&record)?;
            table
                .insert(order.reference.as_str(), value.as_slice())
                .map_err(store_err)?;
        }
        wt.commit().map_err(store_err)?;
        Ok(outcome)
    }

    /// All records, in reference order.
    pub fn list_orders(&self) -> Result<Vec<OrderRecord>> {
        let rt = self.db.begin_read().map_err(store_err)?;
        let table = rt.open_table(ORDERS).map_err(store_err)?;
        let mut records = Vec::new();
        for entry in table.iter().map_err(store_err)? {
            let (_, raw) = entry.map_err(store_err)?;
            records.push(serde_json::from_slice(raw.value())?);
        }
        Ok(records)
    }
}
