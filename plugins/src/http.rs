//! Response handling shared by HTTP-backed providers.

use framecast_core::api::{NetworkErrorKind, ProviderError};
use serde_json::Value;

const BODY_PREVIEW_LIMIT: usize = 512;

pub(crate) fn network_error(err: reqwest::Error, url: &str) -> ProviderError {
    let kind = if err.is_timeout() {
        NetworkErrorKind::Timeout
    } else if err.is_connect() {
        NetworkErrorKind::Connect
    } else if err.is_request() {
        NetworkErrorKind::Request
    } else if err.is_body() || err.is_decode() {
        NetworkErrorKind::Body
    } else {
        NetworkErrorKind::Unknown
    };
    ProviderError::network(kind, format!("{err} (url={url})"))
}

pub(crate) fn preview_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }

    let mut out = String::new();
    let mut truncated = false;
    for (idx, ch) in trimmed.chars().enumerate() {
        if idx >= BODY_PREVIEW_LIMIT {
            truncated = true;
            break;
        }
        out.push(ch);
    }

    if truncated {
        out.push_str("...");
    }

    out
}

/// Flatten a vendor `error` field, which is either a string or
/// `{ "code": .., "message": .. }`.
pub(crate) fn error_text(error: &Value) -> Option<String> {
    match error {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => {
            let message = map.get("message").and_then(Value::as_str);
            let code = map.get("code").and_then(Value::as_str);
            match (code, message) {
                (Some(code), Some(message)) => Some(format!("{code}: {message}")),
                (None, Some(message)) => Some(message.to_string()),
                (Some(code), None) => Some(code.to_string()),
                (None, None) => Some(error.to_string()),
            }
        }
        other => Some(other.to_string()),
    }
}

/// Read the body and map non-2xx statuses to [`ProviderError::Remote`].
///
/// The remote message is the body's `error` text when present, the raw body
/// preview for non-JSON bodies, else a generic status message.
pub(crate) async fn read_json(resp: reqwest::Response, op: &str) -> Result<Value, ProviderError> {
    let status = resp.status();
    let url = resp.url().to_string();
    let body = resp.text().await.map_err(|err| network_error(err, &url))?;

    if !status.is_success() {
        let parsed = serde_json::from_str::<Value>(&body).ok();
        let message = match parsed {
            Some(v) => v.get("error").and_then(error_text),
            None if !body.trim().is_empty() => Some(preview_body(&body)),
            None => None,
        }
        .unwrap_or_else(|| format!("{op} failed (HTTP {})", status.as_u16()));
        return Err(ProviderError::remote(status.as_u16(), message));
    }

    serde_json::from_str::<Value>(&body).map_err(|err| {
        ProviderError::Decode(format!(
            "{op}: failed to decode response body: {err} | body={}",
            preview_body(&body)
        ))
    })
}
