//! Order domain types: what Monta reports, and the local mirror record.

use crate::status::{normalize, NormalizedStatus};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which Monta API surface produced a status value.
///
/// The resolution ladder prefers shipments over order events over the
/// order header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusSource {
    Shipments,
    OrderEvents,
    Orders,
}

impl fmt::Display for StatusSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StatusSource::Shipments => "shipments",
            StatusSource::OrderEvents => "orderevents",
            StatusSource::Orders => "orders",
        };
        write!(f, "{s}")
    }
}

/// One order as reported by Monta.
///
/// Immutable from this system's perspective; a fresh value arrives on every
/// poll, webhook, or ladder resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalOrder {
    pub reference: String,
    pub status: Option<String>,
    pub status_code: Option<String>,
    pub track_trace: Option<String>,
    pub delivery_message: Option<String>,
    pub delivery_date: Option<NaiveDate>,
    pub source: Option<StatusSource>,
}

impl ExternalOrder {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            status: None,
            status_code: None,
            track_trace: None,
            delivery_message: None,
            delivery_date: None,
            source: None,
        }
    }
}

/// Local mirror of a Monta order, keyed by reference.
///
/// The reference is written once at create time and never rewritten; every
/// other field is mirrored from the latest [`ExternalOrder`]. Records are
/// never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRecord {
    pub reference: String,
    pub status: Option<String>,
    pub status_code: Option<String>,
    #[serde(default)]
    pub normalized: NormalizedStatus,
    pub track_trace: Option<String>,
    pub delivery_message: Option<String>,
    pub delivery_date: Option<NaiveDate>,
    pub source: Option<StatusSource>,
    pub created_at: DateTime<Utc>,
    pub last_sync: DateTime<Utc>,
}

impl OrderRecord {
    pub fn from_external(order: &ExternalOrder, now: DateTime<Utc>) -> Self {
        let mut record = Self {
            reference: order.reference.clone(),
            status: None,
            status_code: None,
            normalized: NormalizedStatus::Unknown,
            track_trace: None,
            delivery_message: None,
            delivery_date: None,
            source: None,
            created_at: now,
            last_sync: now,
        };
        record.mirror(order, now);
        record
    }

    /// Copy the mirrored fields from `order`. Last write wins; the reference
    /// and `created_at` stay as created.
    pub fn mirror(&mut self, order: &ExternalOrder, now: DateTime<Utc>) {
        self.status = order.status.clone();
        self.status_code = order.status_code.clone();
        self.normalized = normalize(order.status.as_deref());
        self.track_trace = order.track_trace.clone();
        self.delivery_message = order.delivery_message.clone();
        self.delivery_date = order.delivery_date;
        self.source = order.source;
        self.last_sync = now;
    }

    /// Settled orders have left the fulfilment pipeline and are skipped by
    /// the refresh loop.
    pub fn is_settled(&self) -> bool {
        matches!(
            self.normalized,
            NormalizedStatus::Shipped | NormalizedStatus::Delivered | NormalizedStatus::Cancelled
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirror_keeps_reference_and_created_at() {
        let now = Utc::now();
        let first = ExternalOrder {
            status: Some("Processing".to_string()),
            ..ExternalOrder::new("BC00013")
        };
        let mut record = OrderRecord::from_external(&first, now);

        let later = now + chrono::Duration::minutes(30);
        let mut update = ExternalOrder::new("SHOULD-NOT-APPLY");
        update.status = Some("Shipped".to_string());
        update.track_trace = Some("https://t.example/3STEST".to_string());
        record.mirror(&update, later);

        assert_eq!(record.reference, "BC00013");
        assert_eq!(record.created_at, now);
        assert_eq!(record.last_sync, later);
        assert_eq!(record.status.as_deref(), Some("Shipped"));
        assert_eq!(record.normalized, NormalizedStatus::Shipped);
    }

    #[test]
    fn settled_covers_terminal_buckets() {
        let now = Utc::now();
        let mut order = ExternalOrder::new("BC1");
        order.status = Some("Shipped".to_string());
        assert!(OrderRecord::from_external(&order, now).is_settled());

        order.status = Some("Picking in progress".to_string());
        assert!(!OrderRecord::from_external(&order, now).is_settled());
    }
}
