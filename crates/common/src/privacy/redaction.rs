//! Masking of credentials in diagnostic output
//!
//! Passwords and bearer tokens are sent in clear text on the wire, but every
//! rendering meant for humans (log lines, error messages) goes through these
//! helpers first. Usernames are deliberately left untouched.

use serde_json::Value;

/// Replacement rendered instead of a secret value.
pub const MASK: &str = "**********";

/// Keys whose values are secrets, compared case-insensitively.
const SENSITIVE_KEYS: &[&str] = &[
    "authorization",
    "password",
    "access_token",
    "refresh_token",
    "kelvin_password_hashes",
];

/// Whether the value stored under `key` must be masked.
pub fn is_sensitive_key(key: &str) -> bool {
    SENSITIVE_KEYS.iter().any(|sensitive| sensitive.eq_ignore_ascii_case(key))
}

/// Mask a single key/value pair (header, form field, query parameter).
pub fn mask_value<'a>(key: &str, value: &'a str) -> &'a str {
    if is_sensitive_key(key) {
        MASK
    } else {
        value
    }
}

/// Mask a sequence of key/value pairs, keeping their order.
pub fn mask_pairs<'a, I>(pairs: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), mask_value(key, value).to_string()))
        .collect()
}

/// Return a copy of a JSON document with all sensitive values masked.
///
/// Nested objects and arrays are walked recursively.
pub fn mask_json(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, inner)| {
                    let masked = if is_sensitive_key(key) && !inner.is_null() {
                        Value::String(MASK.to_string())
                    } else {
                        mask_json(inner)
                    };
                    (key.clone(), masked)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(mask_json).collect()),
        other => other.clone(),
    }
}
