//! Deep status resolution for a single order reference.
//!
//! Signal preference: shipments > order events > order header (derived).
//! The header is fetched first to build the reference set (Monta accepts
//! five different identifiers, and which one a tenant fills in varies),
//! then each rung of the ladder is tried across that set. A transport
//! failure or empty answer on one rung is a logged miss, not an abort; the
//! ladder only gives up after the header fallback.

use monta_core::order::{ExternalOrder, StatusSource};
use serde_json::Value;

use crate::client::MontaClient;

/// Everything learned alongside the resolved status text.
#[derive(Debug, Clone, Default)]
pub struct ResolveMeta {
    pub source: Option<StatusSource>,
    pub order_id: Option<i64>,
    pub status_code: Option<String>,
    pub track_trace: Option<String>,
    /// Populated when no status could be resolved.
    pub reason: Option<String>,
}

pub struct StatusResolver<'a> {
    client: &'a MontaClient,
}

impl<'a> StatusResolver<'a> {
    pub fn new(client: &'a MontaClient) -> Self {
        Self { client }
    }

    /// Resolve the freshest delivery status for `reference`.
    pub fn resolve(&self, reference: &str) -> (Option<String>, ResolveMeta) {
        if reference.trim().is_empty() {
            return (
                None,
                ResolveMeta {
                    reason: Some("empty reference".to_string()),
                    ..Default::default()
                },
            );
        }

        let Some(mut order) = self.first_order(reference) else {
            tracing::warn!(reference, "no monta order found");
            return (
                None,
                ResolveMeta {
                    source: Some(StatusSource::Orders),
                    reason: Some("order not found".to_string()),
                    ..Default::default()
                },
            );
        };

        // Re-fetch the canonical record when the search row carries an id;
        // search results can lag behind the order itself.
        let order_id = order.get("Id").and_then(Value::as_i64);
        if let Some(id) = order_id {
            match self.client.fetch_order(id) {
                Ok(canonical) if canonical.is_object() => order = canonical,
                Ok(_) => {}
                Err(err) => {
                    tracing::debug!(reference, error = %err, "canonical order fetch missed")
                }
            }
        }

        let refs = RefSet::from_header(&order, reference);

        if let Some(found) = self.from_shipments(&refs) {
            return (Some(found.0), found.1);
        }
        if let Some(found) = self.from_events(&refs) {
            return (Some(found.0), found.1);
        }

        // Header fallback: explicit status key, or derived from the
        // workflow booleans.
        let status = pick_status(&order).unwrap_or_else(|| derive_header_status(&order));
        let meta = ResolveMeta {
            source: Some(StatusSource::Orders),
            order_id: refs.order_id,
            status_code: scalar(order.get("StatusID")),
            track_trace: scalar(order.get("TrackAndTraceCode")),
            reason: None,
        };
        (Some(status), meta)
    }

    /// Resolve into an [`ExternalOrder`] keyed by the local reference, ready
    /// for the reconciler. An unresolvable order carries the reason in
    /// `delivery_message`.
    pub fn resolve_order(&self, reference: &str) -> ExternalOrder {
        let (status, meta) = self.resolve(reference);
        ExternalOrder {
            reference: reference.to_string(),
            status,
            status_code: meta.status_code,
            track_trace: meta.track_trace,
            delivery_message: meta.reason,
            delivery_date: None,
            source: meta.source,
        }
    }

    fn first_order(&self, reference: &str) -> Option<Value> {
        match self.client.fetch_orders(Some(reference)) {
            Ok(rows) => {
                if let Some(first) = rows.into_iter().find(Value::is_object) {
                    return Some(first);
                }
            }
            Err(err) => tracing::debug!(reference, error = %err, "orders search missed"),
        }
        match self.client.fetch_orders_by_client_reference(reference) {
            Ok(rows) => rows.into_iter().find(Value::is_object),
            Err(err) => {
                tracing::debug!(reference, error = %err, "client-reference search missed");
                None
            }
        }
    }

    fn from_shipments(&self, refs: &RefSet) -> Option<(String, ResolveMeta)> {
        for params in refs.param_sets() {
            let rows = match self.client.shipments(&as_query(&params)) {
                Ok(rows) => rows,
                Err(err) => {
                    tracing::debug!(error = %err, "shipments rung missed");
                    continue;
                }
            };
            for shipment in rows.iter().filter(|row| row.is_object()) {
                let Some(mut status) = pick_status(shipment).or_else(|| {
                    (truthy(shipment, "IsShipped") || scalar(shipment.get("ShippedDate")).is_some())
                        .then(|| "Shipped".to_string())
                }) else {
                    continue;
                };

                let track_trace = scalar(shipment.get("TrackAndTraceCode"));
                if status.eq_ignore_ascii_case("shipped") {
                    if let Some(tt) = &track_trace {
                        status.push_str(&format!(" (T&T: {tt})"));
                    }
                    if let Some(date) = scalar(shipment.get("ShippedDate")) {
                        status.push_str(&format!(" on {date}"));
                    }
                }
                return Some((
                    status,
                    ResolveMeta {
                        source: Some(StatusSource::Shipments),
                        order_id: refs.order_id,
                        status_code: scalar(shipment.get("ShipmentStatus")),
                        track_trace,
                        reason: None,
                    },
                ));
            }
        }
        None
    }

    fn from_events(&self, refs: &RefSet) -> Option<(String, ResolveMeta)> {
        for params in refs.param_sets() {
            let event = match self.client.latest_order_event(&as_query(&params)) {
                Ok(Some(event)) => event,
                Ok(None) => continue,
                Err(err) => {
                    tracing::debug!(error = %err, "order-events rung missed");
                    continue;
                }
            };
            let status = pick_status(&event)
                .or_else(|| event.get("Order").and_then(pick_status))
                .or_else(|| event.get("Shipment").and_then(pick_status));
            if let Some(status) = status {
                return Some((
                    status,
                    ResolveMeta {
                        source: Some(StatusSource::OrderEvents),
                        order_id: refs.order_id,
                        status_code: scalar(event.get("Status")),
                        track_trace: None,
                        reason: None,
                    },
                ));
            }
        }
        None
    }
}

// ---------------------------------------------------------------------------
// Reference set
// ---------------------------------------------------------------------------

/// The identifiers Monta accepts for shipment/event lookups, harvested from
/// the order header with the search reference as fallback.
struct RefSet {
    order_id: Option<i64>,
    order_reference: String,
    client_reference: String,
    order_guid: Option<String>,
    webshop_order_id: Option<String>,
}

impl RefSet {
    fn from_header(order: &Value, fallback: &str) -> Self {
        Self {
            order_id: order.get("Id").and_then(Value::as_i64),
            order_reference: scalar(order.get("Reference"))
                .unwrap_or_else(|| fallback.to_string()),
            client_reference: scalar(order.get("ClientReference"))
                .unwrap_or_else(|| fallback.to_string()),
            order_guid: scalar(order.get("EorderGUID"))
                .or_else(|| scalar(order.get("EorderGuid"))),
            webshop_order_id: scalar(order.get("WebshopOrderId"))
                .or_else(|| scalar(order.get("InternalWebshopOrderId"))),
        }
    }

    /// Lookup parameter sets in preference order, skipping empty ids.
    fn param_sets(&self) -> Vec<Vec<(&'static str, String)>> {
        let mut sets = Vec::new();
        if let Some(id) = self.order_id {
            sets.push(vec![("orderId", id.to_string())]);
        }
        if !self.order_reference.is_empty() {
            sets.push(vec![("orderReference", self.order_reference.clone())]);
        }
        if !self.client_reference.is_empty() {
            sets.push(vec![("clientReference", self.client_reference.clone())]);
        }
        if let Some(guid) = &self.order_guid {
            sets.push(vec![("orderGuid", guid.clone())]);
        }
        if let Some(id) = &self.webshop_order_id {
            sets.push(vec![("webshopOrderId", id.clone())]);
        }
        sets
    }
}

fn as_query<'a>(params: &'a [(&'static str, String)]) -> Vec<(&'static str, &'a str)> {
    params.iter().map(|(k, v)| (*k, v.as_str())).collect()
}

// ---------------------------------------------------------------------------
// Status extraction
// ---------------------------------------------------------------------------

/// Keys that may carry a status, across all three API surfaces.
const STATUS_KEYS: &[&str] = &[
    "DeliveryStatusDescription",
    "DeliveryStatusCode",
    "Status",
    "State",
    "OrderStatus",
    "ActionCode",
    "ShipmentStatus",
    "CurrentStatus",
];

fn pick_status(value: &Value) -> Option<String> {
    STATUS_KEYS.iter().find_map(|key| scalar(value.get(*key)))
}

fn scalar(value: Option<&Value>) -> Option<String> {
    value.and_then(monta_core::mapper::scalar_string)
}

fn truthy(value: &Value, key: &str) -> bool {
    value.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// Derive a human-readable status from the order-header workflow booleans.
/// Priority ladder based on the common Monta flags.
fn derive_header_status(order: &Value) -> String {
    if truthy(order, "IsBlocked") {
        return match scalar(order.get("BlockedMessage")) {
            Some(msg) => format!("Blocked: {msg}"),
            None => "Blocked".to_string(),
        };
    }
    if truthy(order, "IsShipped") {
        let mut status = "Shipped".to_string();
        if let Some(tt) = scalar(order.get("TrackAndTraceCode")) {
            status.push_str(&format!(" (T&T: {tt})"));
        }
        if let Some(date) = scalar(order.get("ShippedDate")) {
            status.push_str(&format!(" on {date}"));
        }
        return status;
    }
    if truthy(order, "Picked") {
        return "Picked".to_string();
    }
    if truthy(order, "IsPicking") {
        return "Picking in progress".to_string();
    }
    let ready = order.get("ReadyToPick");
    let ready_to_pick = match ready {
        Some(Value::Bool(b)) => *b,
        Some(other) => scalar(Some(other)).is_some_and(|s| s != "NotReady"),
        None => false,
    };
    if ready_to_pick {
        return "Ready to pick".to_string();
    }
    if truthy(order, "IsBackorder") {
        return "Backorder".to_string();
    }
    for key in ["EstimatedDeliveryTo", "EstimatedDeliveryFrom", "LatestDeliveryDate"] {
        if let Some(eta) = scalar(order.get(key)) {
            return format!("In progress, ETA {eta}");
        }
    }
    if let Some(id) = scalar(order.get("StatusID")) {
        return format!("StatusID={id}");
    }
    if let Some(id) = scalar(order.get("DeliveryStatusId")) {
        return format!("DeliveryStatusId={id}");
    }
    "Received / Pending workflow".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use monta_core::settings::MontaConfig;
    use serde_json::json;
    use std::time::Duration;

    fn client(base_url: String) -> MontaClient {
        MontaClient::new(MontaConfig {
            username: "acme".to_string(),
            password: "hunter2".to_string(),
            base_url,
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    fn mock_header(server: &mut mockito::Server, header: serde_json::Value) {
        let id = header["Id"].as_i64().unwrap();
        server
            .mock("GET", "/orders")
            .match_query(mockito::Matcher::Any)
            .with_body(json!([header.clone()]).to_string())
            .create();
        server
            .mock("GET", format!("/orders/{id}").as_str())
            .match_query(mockito::Matcher::Any)
            .with_body(header.to_string())
            .create();
    }

    fn mock_empty(server: &mut mockito::Server, path: &str) {
        server
            .mock("GET", path)
            .match_query(mockito::Matcher::Any)
            .with_body("[]")
            .create();
    }

    #[test]
    fn shipments_rung_wins_and_decorates_shipped() {
        let mut server = mockito::Server::new();
        mock_header(&mut server, json!({ "Id": 7, "Reference": "BC1" }));
        server
            .mock("GET", "/shipments")
            .match_query(mockito::Matcher::AllOf(vec![mockito::Matcher::UrlEncoded(
                "orderId".into(),
                "7".into(),
            )]))
            .with_body(
                json!([{
                    "DeliveryStatusDescription": "Shipped",
                    "ShipmentStatus": 5,
                    "TrackAndTraceCode": "3STEST123",
                    "ShippedDate": "2025-08-30",
                }])
                .to_string(),
            )
            .create();

        let client = client(server.url());
        let (status, meta) = StatusResolver::new(&client).resolve("BC1");
        assert_eq!(
            status.as_deref(),
            Some("Shipped (T&T: 3STEST123) on 2025-08-30")
        );
        assert_eq!(meta.source, Some(StatusSource::Shipments));
        assert_eq!(meta.status_code.as_deref(), Some("5"));
        assert_eq!(meta.track_trace.as_deref(), Some("3STEST123"));
    }

    #[test]
    fn events_rung_fires_when_shipments_are_empty() {
        let mut server = mockito::Server::new();
        mock_header(&mut server, json!({ "Id": 7, "Reference": "BC1" }));
        mock_empty(&mut server, "/shipments");
        server
            .mock("GET", "/orderevents")
            .match_query(mockito::Matcher::AllOf(vec![mockito::Matcher::UrlEncoded(
                "orderId".into(),
                "7".into(),
            )]))
            .with_body(json!([{ "ActionCode": "PICKED" }]).to_string())
            .create();

        let client = client(server.url());
        let (status, meta) = StatusResolver::new(&client).resolve("BC1");
        assert_eq!(status.as_deref(), Some("PICKED"));
        assert_eq!(meta.source, Some(StatusSource::OrderEvents));
    }

    #[test]
    fn header_fallback_derives_from_workflow_flags() {
        let mut server = mockito::Server::new();
        mock_header(
            &mut server,
            json!({
                "Id": 7,
                "Reference": "BC1",
                "IsShipped": true,
                "TrackAndTraceCode": "3STEST123",
                "ShippedDate": "2025-08-30",
            }),
        );
        mock_empty(&mut server, "/shipments");
        mock_empty(&mut server, "/orderevents");

        let client = client(server.url());
        let (status, meta) = StatusResolver::new(&client).resolve("BC1");
        assert_eq!(
            status.as_deref(),
            Some("Shipped (T&T: 3STEST123) on 2025-08-30")
        );
        assert_eq!(meta.source, Some(StatusSource::Orders));
        assert_eq!(meta.track_trace.as_deref(), Some("3STEST123"));
    }

    #[test]
    fn unknown_reference_reports_not_found() {
        let mut server = mockito::Server::new();
        mock_empty(&mut server, "/orders");

        let client = client(server.url());
        let (status, meta) = StatusResolver::new(&client).resolve("NOPE");
        assert_eq!(status, None);
        assert_eq!(meta.reason.as_deref(), Some("order not found"));
    }

    #[test]
    fn resolve_order_keeps_the_local_reference() {
        let mut server = mockito::Server::new();
        mock_header(
            &mut server,
            json!({ "Id": 7, "Reference": "MONTA-REF", "StatusID": 30 }),
        );
        mock_empty(&mut server, "/shipments");
        mock_empty(&mut server, "/orderevents");

        let client = client(server.url());
        let order = StatusResolver::new(&client).resolve_order("BC1");
        assert_eq!(order.reference, "BC1");
        assert_eq!(order.status.as_deref(), Some("StatusID=30"));
        assert_eq!(order.source, Some(StatusSource::Orders));
    }

    #[test]
    fn derive_prefers_blocked_over_everything() {
        let order = json!({
            "IsBlocked": true,
            "BlockedMessage": "address check",
            "IsShipped": true,
        });
        assert_eq!(derive_header_status(&order), "Blocked: address check");
    }

    #[test]
    fn derive_bottoms_out_at_pending() {
        assert_eq!(
            derive_header_status(&json!({})),
            "Received / Pending workflow"
        );
    }
}
