//! Durable sync/API audit log, stored next to the order mirror.
//!
//! # Table design
//!
//! The `sync_log` table uses a 24-byte composite key:
//! ```text
//! [ timestamp_ms: u64 big-endian (8 bytes) | uuid: 16 bytes ]
//! ```
//! The timestamp occupies the high bytes, so byte ordering equals time
//! ordering and "most recent N" is a single reverse scan.
//!
//! Every entry is passed through [`crate::redact::redact_json`] before it is
//! written; credentials never reach the log in the clear.

use chrono::{DateTime, Utc};
use redb::{ReadableTable, TableDefinition};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::Result;
use crate::redact::redact_json;
use crate::store::{store_err, SyncDb};

/// Key: 24-byte composite (timestamp_ms big-endian ++ uuid bytes).
/// Value: JSON-encoded `LogEntry`.
pub(crate) const LOG: TableDefinition<&[u8], &[u8]> = TableDefinition::new("sync_log");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Info,
    Error,
}

/// One redacted audit entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: Uuid,
    pub level: LogLevel,
    /// Short origin marker, e.g. `monta.sync` or `monta.webhook`.
    pub tag: String,
    pub data: Value,
    pub created_at: DateTime<Utc>,
}

fn entry_key(ts: DateTime<Utc>, id: Uuid) -> [u8; 24] {
    let mut key = [0u8; 24];
    let ms = ts.timestamp_millis().max(0) as u64;
    key[..8].copy_from_slice(&ms.to_be_bytes());
    key[8..].copy_from_slice(id.as_bytes());
    key
}

impl SyncDb {
    /// Append an audit entry. `data` is redacted before being stored.
    pub fn log(&self, level: LogLevel, tag: &str, data: &Value) -> Result<LogEntry> {
        let entry = LogEntry {
            id: Uuid::new_v4(),
            level,
            tag: tag.to_string(),
            data: redact_json(data),
            created_at: Utc::now(),
        };
        let key = entry_key(entry.created_at, entry.id);
        let value = serde_json::to_vec(&entry)?;
        let wt = self.db.begin_write().map_err(store_err)?;
        {
            let mut table = wt.open_table(LOG).map_err(store_err)?;
            table
                .insert(key.as_slice(), value.as_slice())
                .map_err(store_err)?;
        }
        wt.commit().map_err(store_err)?;
        Ok(entry)
    }

    /// The most recent `limit` entries, newest first.
    pub fn recent_logs(&self, limit: usize) -> Result<Vec<LogEntry>> {
        let rt = self.db.begin_read().map_err(store_err)?;
        let table = rt.open_table(LOG).map_err(store_err)?;
        let mut entries = Vec::new();
        for entry in table.iter().map_err(store_err)?.rev().take(limit) {
            let (_, raw) = entry.map_err(store_err)?;
            entries.push(serde_json::from_slice(raw.value())?);
        }
        Ok(entries)
    }
}
