//! Client for the host's generic RPC call endpoint.
//!
//! The host accepts `{model, method, args, kwargs}` and answers with
//! `{result}` on success or `{error: {message}}` on failure.

use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("rpc request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("rpc endpoint returned {status}")]
    Http { status: u16 },

    /// The host executed the call and reported an error payload.
    #[error("rpc error: {0}")]
    Remote(String),

    #[error("rpc response carried no result")]
    MissingResult,
}

pub struct RpcClient {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl RpcClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, RpcError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(RpcError::Request)?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    /// One call against the generic endpoint.
    pub fn call(&self, model: &str, method: &str, args: Value, kwargs: Value) -> Result<Value, RpcError> {
        let payload = json!({
            "model": model,
            "method": method,
            "args": args,
            "kwargs": kwargs,
        });
        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .map_err(RpcError::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RpcError::Http {
                status: status.as_u16(),
            });
        }

        let body: Value = response.json().map_err(RpcError::Request)?;
        if let Some(error) = body.get("error") {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown rpc error");
            return Err(RpcError::Remote(message.to_string()));
        }
        body.get("result").cloned().ok_or(RpcError::MissingResult)
    }

    /// Read a single field of one record.
    ///
    /// The host returns a list of records for `read`; a bare object is also
    /// accepted. A missing field or empty record degrades to `Null`.
    pub fn read_field(&self, model: &str, id: u64, field: &str) -> Result<Value, RpcError> {
        let result = self.call(model, "read", json!([[id], [field]]), json!({}))?;
        let record = match result {
            Value::Array(mut rows) => {
                if rows.is_empty() {
                    return Ok(Value::Null);
                }
                rows.remove(0)
            }
            other => other,
        };
        Ok(record.get(field).cloned().unwrap_or(Value::Null))
    }
}
