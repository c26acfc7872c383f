//! Normalize tenant-specific Monta status strings into a compact selection.
//!
//! Monta tenants surface many spellings for the same lifecycle step
//! ("despatched", "Shipped (T&T: …)", "picking done"). Downstream code that
//! wants to branch on lifecycle uses [`NormalizedStatus`] instead of the raw
//! string; the raw string is still mirrored verbatim on the record.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NormalizedStatus {
    Processing,
    Received,
    Picked,
    Shipped,
    Delivered,
    Backorder,
    Cancelled,
    Error,
    #[default]
    Unknown,
}

impl fmt::Display for NormalizedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NormalizedStatus::Processing => "processing",
            NormalizedStatus::Received => "received",
            NormalizedStatus::Picked => "picked",
            NormalizedStatus::Shipped => "shipped",
            NormalizedStatus::Delivered => "delivered",
            NormalizedStatus::Backorder => "backorder",
            NormalizedStatus::Cancelled => "cancelled",
            NormalizedStatus::Error => "error",
            NormalizedStatus::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

/// Known spellings per bucket. Exact match wins over substring containment,
/// and bucket order is the tie-break for containment.
const BUCKETS: &[(NormalizedStatus, &[&str])] = &[
    (
        NormalizedStatus::Processing,
        &["processing", "in progress", "verified", "queued", "open"],
    ),
    (NormalizedStatus::Received, &["received", "inbound received"]),
    (NormalizedStatus::Picked, &["picked", "picking done"]),
    (
        NormalizedStatus::Shipped,
        &["shipped", "sent", "despatched", "dispatch"],
    ),
    (
        NormalizedStatus::Delivered,
        &["delivered", "complete", "completed"],
    ),
    (
        NormalizedStatus::Backorder,
        &["backorder", "bo", "awaiting stock"],
    ),
    (NormalizedStatus::Cancelled, &["cancelled", "canceled"]),
    (NormalizedStatus::Error, &["error", "failed", "rejected"]),
];

fn letters_only(raw: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"[^a-z]+").expect("static regex"));
    re.replace_all(&raw.to_lowercase(), " ").trim().to_string()
}

/// Bucket a raw Monta status string.
pub fn normalize(raw: Option<&str>) -> NormalizedStatus {
    let Some(raw) = raw else {
        return NormalizedStatus::Unknown;
    };
    let cleaned = letters_only(raw);
    if cleaned.is_empty() {
        return NormalizedStatus::Unknown;
    }
    for (status, bucket) in BUCKETS {
        if bucket.contains(&cleaned.as_str()) {
            return *status;
        }
    }
    for (status, bucket) in BUCKETS {
        if bucket.iter().any(|token| cleaned.contains(token)) {
            return *status;
        }
    }
    NormalizedStatus::Unknown
}
