//! Call-time configuration for the Monta API.
//!
//! Credentials live in a key-value settings store owned by the host system.
//! They are read into an explicitly passed [`MontaConfig`] when a run starts;
//! nothing in this crate holds configuration as process-wide state.

use crate::error::{MontaError, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

pub const KEY_USERNAME: &str = "monta.username";
pub const KEY_PASSWORD: &str = "monta.password";
pub const KEY_BASE_URL: &str = "monta.base_url";
pub const KEY_TIMEOUT: &str = "monta.timeout";

pub const DEFAULT_BASE_URL: &str = "https://api-v6.monta.nl";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

// ---------------------------------------------------------------------------
// SettingsStore
// ---------------------------------------------------------------------------

/// Read access to the host's key-value settings store.
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<String>;
}

impl SettingsStore for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        BTreeMap::get(self, key).cloned()
    }
}

impl SettingsStore for std::collections::HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        std::collections::HashMap::get(self, key).cloned()
    }
}

/// Flat YAML file of `key: value` pairs.
#[derive(Debug, Default)]
pub struct FileSettings {
    values: BTreeMap<String, String>,
}

impl FileSettings {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let raw: BTreeMap<String, serde_yaml::Value> = serde_yaml::from_str(&content)?;
        // Settings are strings to the consumer; unquoted YAML numbers and
        // booleans are rendered, nested structures are dropped.
        let values = raw
            .into_iter()
            .filter_map(|(key, value)| yaml_scalar(value).map(|v| (key, v)))
            .collect();
        Ok(Self { values })
    }
}

fn yaml_scalar(value: serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl SettingsStore for FileSettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

// ---------------------------------------------------------------------------
// MontaConfig
// ---------------------------------------------------------------------------

/// Validated API configuration, resolved from the settings store at call time.
#[derive(Clone)]
pub struct MontaConfig {
    pub username: String,
    pub password: String,
    /// Base URL without trailing slash. Always `https://`.
    pub base_url: String,
    pub timeout: Duration,
}

impl MontaConfig {
    /// Resolve and validate configuration from a settings store.
    ///
    /// `monta.username` and `monta.password` are required. `monta.base_url`
    /// defaults to the public v6 endpoint and must be HTTPS. A malformed
    /// `monta.timeout` falls back to the default rather than aborting a run.
    pub fn from_store(store: &dyn SettingsStore) -> Result<Self> {
        let username = required(store, KEY_USERNAME)?;
        let password = required(store, KEY_PASSWORD)?;

        let base_url = store
            .get(KEY_BASE_URL)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = base_url.trim_end_matches('/').to_string();
        if !base_url.starts_with("https://") {
            return Err(MontaError::InvalidSetting {
                key: KEY_BASE_URL.to_string(),
                reason: "must be an https:// URL".to_string(),
            });
        }

        let timeout = match store.get(KEY_TIMEOUT) {
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    tracing::warn!(
                        value = %raw,
                        "ignoring malformed {}, using {}s default",
                        KEY_TIMEOUT,
                        DEFAULT_TIMEOUT_SECS
                    );
                    Duration::from_secs(DEFAULT_TIMEOUT_SECS)
                }
            },
        };

        Ok(Self {
            username,
            password,
            base_url,
            timeout,
        })
    }
}

// Manual impl: the password must never reach logs through `{:?}`.
impl fmt::Debug for MontaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MontaConfig")
            .field("username", &self.username)
            .field("password", &"***")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn required(store: &dyn SettingsStore, key: &str) -> Result<String> {
    store
        .get(key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| MontaError::MissingSetting(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_settings() -> HashMap<String, String> {
        HashMap::from([
            (KEY_USERNAME.to_string(), "acme".to_string()),
            (KEY_PASSWORD.to_string(), "hunter2".to_string()),
        ])
    }

    #[test]
    fn defaults_applied_for_url_and_timeout() {
        let config = MontaConfig::from_store(&base_settings()).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn missing_credentials_are_an_error() {
        let mut settings = base_settings();
        settings.remove(KEY_PASSWORD);
        let err = MontaConfig::from_store(&settings).unwrap_err();
        assert!(matches!(err, MontaError::MissingSetting(k) if k == KEY_PASSWORD));
    }

    #[test]
    fn plain_http_base_url_is_rejected() {
        let mut settings = base_settings();
        settings.insert(KEY_BASE_URL.to_string(), "http://api.monta.nl".to_string());
        let err = MontaConfig::from_store(&settings).unwrap_err();
        assert!(matches!(err, MontaError::InvalidSetting { key, .. } if key == KEY_BASE_URL));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let mut settings = base_settings();
        settings.insert(
            KEY_BASE_URL.to_string(),
            "https://api-v6.monta.nl/".to_string(),
        );
        let config = MontaConfig::from_store(&settings).unwrap();
        assert_eq!(config.base_url, "https://api-v6.monta.nl");
    }

    #[test]
    fn malformed_timeout_falls_back_to_default() {
        let mut settings = base_settings();
        settings.insert(KEY_TIMEOUT.to_string(), "soon".to_string());
        let config = MontaConfig::from_store(&settings).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn debug_output_masks_password() {
        let config = MontaConfig::from_store(&base_settings()).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("***"));
    }
}
