//! Typed wrappers over the Monta endpoints the bridge consumes.
//!
//! Responses stay as `serde_json::Value` rows here; tenant-tolerant typing
//! happens in `monta_core::mapper` and in the resolution ladder.

use monta_core::settings::MontaConfig;
use serde_json::Value;

use crate::error::Result;
use crate::http::MontaHttp;

pub struct MontaClient {
    http: MontaHttp,
}

impl MontaClient {
    pub fn new(config: MontaConfig) -> Result<Self> {
        Ok(Self {
            http: MontaHttp::new(config)?,
        })
    }

    /// Orders matching a free-text search; all recent orders when `search`
    /// is `None`.
    pub fn fetch_orders(&self, search: Option<&str>) -> Result<Vec<Value>> {
        let params = match search {
            Some(term) => vec![("search", term)],
            None => Vec::new(),
        };
        Ok(rows(self.http.get_json("orders", &params)?))
    }

    /// Orders carrying `reference` as their client reference.
    pub fn fetch_orders_by_client_reference(&self, reference: &str) -> Result<Vec<Value>> {
        Ok(rows(
            self.http
                .get_json("orders", &[("clientReference", reference)])?,
        ))
    }

    /// The canonical order record for a known Monta order id.
    pub fn fetch_order(&self, id: i64) -> Result<Value> {
        self.http.get_json(&format!("orders/{id}"), &[])
    }

    /// Shipments filtered by one of the reference-set keys.
    pub fn shipments(&self, params: &[(&str, &str)]) -> Result<Vec<Value>> {
        Ok(rows(self.http.get_json("shipments", params)?))
    }

    /// Most recent order event for one of the reference-set keys.
    pub fn latest_order_event(&self, params: &[(&str, &str)]) -> Result<Option<Value>> {
        let mut query: Vec<(&str, &str)> = params.to_vec();
        query.push(("limit", "1"));
        query.push(("sort", "desc"));
        Ok(rows(self.http.get_json("orderevents", &query)?)
            .into_iter()
            .next())
    }
}

/// The API sometimes answers with a list, sometimes with a single object,
/// and with an empty body on no results.
fn rows(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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

    #[test]
    fn fetch_orders_returns_rows() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/orders")
            .match_query(mockito::Matcher::UrlEncoded("search".into(), "BC1".into()))
            .with_body(r#"[{"Id": 1}, {"Id": 2}]"#)
            .create();

        let orders = client(server.url()).fetch_orders(Some("BC1")).unwrap();
        assert_eq!(orders.len(), 2);
    }

    #[test]
    fn single_object_answer_becomes_one_row() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/orders")
            .match_query(mockito::Matcher::Any)
            .with_body(r#"{"Id": 1}"#)
            .create();

        let orders = client(server.url()).fetch_orders(None).unwrap();
        assert_eq!(orders.len(), 1);
    }

    #[test]
    fn latest_order_event_requests_one_descending() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/orderevents")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("orderId".into(), "7".into()),
                mockito::Matcher::UrlEncoded("limit".into(), "1".into()),
                mockito::Matcher::UrlEncoded("sort".into(), "desc".into()),
            ]))
            .with_body(r#"[{"ActionCode": "SHIPPED"}]"#)
            .create();

        let event = client(server.url())
            .latest_order_event(&[("orderId", "7")])
            .unwrap();
        mock.assert();
        assert_eq!(event.unwrap()["ActionCode"], "SHIPPED");
    }
}
