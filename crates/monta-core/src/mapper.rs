//! Tolerant mapping from Monta payloads to [`ExternalOrder`].
//!
//! Field names vary across tenants and API surfaces, so every target field
//! is resolved through a preference ladder of known keys. Only the order
//! reference is mandatory; everything else degrades to `None`.

use crate::error::{MontaError, Result};
use crate::order::ExternalOrder;
use chrono::NaiveDate;
use serde_json::Value;

const REFERENCE_KEYS: &[&str] = &["WebshopOrderId", "ClientReference", "Reference"];
const STATUS_KEYS: &[&str] = &["DeliveryStatusDescription", "Status", "CurrentStatus"];
const STATUS_CODE_KEYS: &[&str] = &["StatusID", "DeliveryStatusCode", "Code"];
const TRACK_TRACE_KEYS: &[&str] = &[
    "TrackAndTraceLink",
    "TrackAndTraceUrl",
    "TrackAndTrace",
    "TrackAndTraceCode",
];
const DELIVERY_MESSAGE_KEYS: &[&str] = &["DeliveryMessage", "Message", "Remark"];
const DELIVERY_DATE_KEYS: &[&str] = &["DeliveryDate", "EstimatedDeliveryTo", "LatestDeliveryDate"];

/// Map one order/status payload into an [`ExternalOrder`].
///
/// Fails with [`MontaError::Mapping`] when the payload is not an object or
/// carries no usable reference.
pub fn map_order(payload: &Value) -> Result<ExternalOrder> {
    if !payload.is_object() {
        return Err(MontaError::Mapping("payload is not an object".to_string()));
    }
    let reference = first_string(payload, REFERENCE_KEYS)
        .ok_or_else(|| MontaError::Mapping("no order reference in payload".to_string()))?;

    Ok(ExternalOrder {
        reference,
        status: first_string(payload, STATUS_KEYS),
        status_code: first_string(payload, STATUS_CODE_KEYS),
        track_trace: first_string(payload, TRACK_TRACE_KEYS),
        delivery_message: first_string(payload, DELIVERY_MESSAGE_KEYS),
        delivery_date: first_date(payload, DELIVERY_DATE_KEYS),
        source: None,
    })
}

/// First non-empty scalar among `keys`, rendered as a string.
pub fn first_string(payload: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| scalar_string(payload.get(*key)?))
}

/// A non-empty string or a number, rendered as a trimmed string.
pub fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Dates arrive as `YYYY-MM-DD` or full ISO timestamps; only the date part
/// is kept, and unparseable values degrade to `None`.
fn first_date(payload: &Value, keys: &[&str]) -> Option<NaiveDate> {
    let raw = first_string(payload, keys)?;
    let prefix = raw.get(..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}
