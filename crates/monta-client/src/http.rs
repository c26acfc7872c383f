//! Blocking HTTP adapter for the Monta API.
//!
//! Basic auth and per-request timeout come from the injected
//! [`MontaConfig`]. GETs carry no-cache headers plus a `_ts` cache-buster
//! query parameter so intermediary caches never serve a stale order status.
//! Request logging records method, path, status, and elapsed time, never
//! credentials.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use monta_core::settings::MontaConfig;
use reqwest::blocking::{Client, Response};
use serde_json::Value;

use crate::error::{ClientError, Result};

pub struct MontaHttp {
    config: MontaConfig,
    client: Client,
}

impl MontaHttp {
    pub fn new(config: MontaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ClientError::Request)?;
        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url, path.trim_start_matches('/'))
    }

    /// GET `path` and decode the JSON body. Params with empty values are
    /// dropped, matching how the reference-set ladder builds its queries.
    pub fn get_json(&self, path: &str, params: &[(&str, &str)]) -> Result<Value> {
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
            .to_string();
        let mut query: Vec<(&str, &str)> = params
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .copied()
            .collect();
        query.push(("_ts", ts.as_str()));

        let started = Instant::now();
        let response = self
            .client
            .get(self.url(path))
            .basic_auth(&self.config.username, Some(&self.config.password))
            .header("Accept", "application/json")
            .header("Cache-Control", "no-cache")
            .header("Pragma", "no-cache")
            .query(&query)
            .send()
            .map_err(ClientError::Request)?;
        decode("GET", path, response, started)
    }

    /// POST a JSON payload to `path` and decode the JSON body.
    pub fn post_json(&self, path: &str, payload: &Value) -> Result<Value> {
        let started = Instant::now();
        let response = self
            .client
            .post(self.url(path))
            .basic_auth(&self.config.username, Some(&self.config.password))
            .header("Accept", "application/json")
            .json(payload)
            .send()
            .map_err(ClientError::Request)?;
        decode("POST", path, response, started)
    }
}

fn decode(method: &'static str, path: &str, response: Response, started: Instant) -> Result<Value> {
    let status = response.status();
    let elapsed = started.elapsed();
    if !status.is_success() {
        tracing::error!(
            method,
            path,
            status = status.as_u16(),
            ?elapsed,
            "monta api call failed"
        );
        return Err(ClientError::Api {
            method,
            path: path.to_string(),
            status: status.as_u16(),
        });
    }
    tracing::debug!(method, path, status = status.as_u16(), ?elapsed, "monta api call");

    let body = response.text().map_err(ClientError::Request)?;
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&body).map_err(|source| ClientError::Decode {
        path: path.to_string(),
        source,
    })
}
