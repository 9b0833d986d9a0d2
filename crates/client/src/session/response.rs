//! Response classification shared by every request

use kelvin_domain::{KelvinError, Result};
use reqwest::{Method, Response, StatusCode};
use serde_json::Value;
use tracing::debug;

use super::request::Payload;
use crate::errors::TransportError;

/// Body handling for successful responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyMode {
    Json,
    Text,
}

/// Read the body of `response` and classify it by status code.
pub(crate) async fn classify(
    method: &Method,
    url: &str,
    response: Response,
    mode: BodyMode,
) -> Result<Payload> {
    let status = response.status();
    let body = response.text().await.map_err(|err| KelvinError::from(TransportError::from(err)))?;
    classify_parts(method, url, status, &body, mode)
}

/// Map status and body to a payload or an error.
///
/// | status | outcome |
/// |---|---|
/// | 2xx | JSON (empty body is `null`) or raw text |
/// | 404 | [`KelvinError::NoObject`] |
/// | other 4xx | [`KelvinError::InvalidRequest`] with the body's `detail` |
/// | anything else | [`KelvinError::ServerError`] |
pub fn classify_parts(
    method: &Method,
    url: &str,
    status: StatusCode,
    body: &str,
    mode: BodyMode,
) -> Result<Payload> {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let detail = parsed.as_ref().and_then(detail_of).unwrap_or_default();
    let reason = status.canonical_reason().map(str::to_string);
    let code = status.as_u16();
    let suffix = if detail.is_empty() { String::new() } else { format!(" ({detail})") };

    debug!(
        %method,
        url,
        status = code,
        reason = reason.as_deref().unwrap_or_default(),
        detail = %detail,
        "{method} {url} -> {code}{suffix}"
    );

    if status.is_success() {
        return match mode {
            BodyMode::Text => Ok(Payload::Text(body.to_string())),
            BodyMode::Json if body.trim().is_empty() => Ok(Payload::Json(Value::Null)),
            BodyMode::Json => parsed.map(Payload::Json).ok_or_else(|| {
                KelvinError::Decode(format!("{method} {url:?} returned a body that is not JSON"))
            }),
        };
    }

    let url_owned = Some(url.to_string());
    match code {
        404 => Err(KelvinError::NoObject {
            message: format!("Object not found ({method} {url:?})."),
            reason,
            status: Some(code),
            url: url_owned,
        }),
        400..=499 => Err(KelvinError::InvalidRequest {
            message: format!(
                "Kelvin REST API returned status {code}, reason {:?}{suffix} for {method} {url:?}.",
                reason.as_deref().unwrap_or_default()
            ),
            reason,
            status: Some(code),
            url: url_owned,
        }),
        _ => Err(KelvinError::ServerError {
            message: format!(
                "Kelvin REST API returned status {code}, reason {:?}{suffix} for {method} {url:?}.",
                reason.as_deref().unwrap_or_default()
            ),
            reason,
            status: Some(code),
            url: url_owned,
        }),
    }
}

fn detail_of(body: &Value) -> Option<String> {
    match body.get("detail")? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}
