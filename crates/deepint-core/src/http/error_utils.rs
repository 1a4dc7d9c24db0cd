//! Mapping of failed API responses onto [`DeepintError`]

use crate::error::DeepintError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

const MAX_ERROR_TEXT_CHARS: usize = 1_024;
const REDACTED: &str = "[REDACTED]";

static BEARER_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bBearer\s+[A-Za-z0-9._\-+/=]{8,}").expect("valid bearer token regex")
});

static KEY_VALUE_SECRET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)\b(x-auth-token|auth[_-]?token|api[_-]?key|access[_-]?token|token|secret|password|authorization)\b\s*[:=]\s*["']?[^"',\s}]+"#,
    )
    .expect("valid key/value secret regex")
});

/// Redact secrets and truncate large payloads in a server error body.
pub fn sanitize_error_text(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "<empty error response body>".to_string();
    }

    if let Ok(mut json) = serde_json::from_str::<Value>(trimmed) {
        redact_json_value(&mut json);
        let serialized =
            serde_json::to_string(&json).unwrap_or_else(|_| "<unserializable error>".to_string());
        return truncate_with_suffix(serialized);
    }

    truncate_with_suffix(redact_inline_secrets(trimmed))
}

fn redact_json_value(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, val) in map.iter_mut() {
                if is_sensitive_key(key) {
                    *val = Value::String(REDACTED.to_string());
                } else {
                    redact_json_value(val);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact_json_value),
        Value::String(s) => *s = redact_inline_secrets(s),
        _ => {}
    }
}

fn is_sensitive_key(key: &str) -> bool {
    let normalized = key.to_ascii_lowercase().replace(['-', ' '], "_");
    ["token", "api_key", "secret", "password", "authorization", "cookie"]
        .iter()
        .any(|needle| normalized.contains(needle))
}

fn redact_inline_secrets(input: &str) -> String {
    let redacted_bearer = BEARER_TOKEN_RE.replace_all(input, "Bearer [REDACTED]");
    KEY_VALUE_SECRET_RE
        .replace_all(&redacted_bearer, "$1=[REDACTED]")
        .into_owned()
}

fn truncate_with_suffix(input: String) -> String {
    let char_count = input.chars().count();
    if char_count <= MAX_ERROR_TEXT_CHARS {
        return input;
    }

    let truncated: String = input.chars().take(MAX_ERROR_TEXT_CHARS).collect();
    format!(
        "{}... [truncated {} chars]",
        truncated,
        char_count - MAX_ERROR_TEXT_CHARS
    )
}

/// The API reports failures as `{"code": ..., "message": ...}`
fn server_code_and_message(body: &str) -> Option<(String, String)> {
    let json: Value = serde_json::from_str(body.trim()).ok()?;
    let code = match json.get("code")? {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let message = json
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Some((code, message))
}

/// Build an error from a non-success status and its body.
///
/// 404 is `NotFound`, other 4xx are `Validation` with the server's code and
/// message passed through, everything else is `Transport`.
pub fn error_from_status(status: u16, method: &str, url: &str, body: &str) -> DeepintError {
    match status {
        404 => DeepintError::not_found_url(
            format!("{} {} returned 404: {}", method, url, sanitize_error_text(body)),
            url,
        ),
        400..=499 => {
            let (code, message) = server_code_and_message(body)
                .unwrap_or_else(|| (status.to_string(), sanitize_error_text(body)));
            DeepintError::validation_for_request(code, message, method, url)
        }
        _ => DeepintError::Transport {
            message: format!(
                "{} {} failed with status {}: {}",
                method,
                url,
                status,
                sanitize_error_text(body)
            ),
            status_code: Some(status),
            url: Some(url.to_string()),
            context: None,
        },
    }
}
