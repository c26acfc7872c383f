//! Masking of sensitive values before anything reaches a log sink.

use serde_json::Value;

pub const MASK: &str = "***";

/// Key fragments whose values are masked at any nesting depth. Matching is
/// case-insensitive substring containment, so `auth` also covers
/// `Authorization` and `auth_user`.
const SENSITIVE_KEY_FRAGMENTS: &[&str] = &["password", "secret", "token", "auth", "credential"];

fn is_sensitive(key: &str) -> bool {
    let key = key.to_lowercase();
    SENSITIVE_KEY_FRAGMENTS
        .iter()
        .any(|fragment| key.contains(fragment))
}

/// Return a copy of `value` with every sensitive field replaced by [`MASK`].
pub fn redact_json(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| {
                    if is_sensitive(k) {
                        (k.clone(), Value::String(MASK.to_string()))
                    } else {
                        (k.clone(), redact_json(v))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redact_json).collect()),
        other => other.clone(),
    }
}
