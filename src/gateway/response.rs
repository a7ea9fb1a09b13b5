//! Classification of raw API responses into results or errors.

use serde_json::{Map, Value};

use crate::error::BotListError;

/// Parses a response body, falling back to an empty JSON object when the body
/// is not valid JSON.
pub fn parse_body(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::Object(Map::new()))
}

/// Maps an HTTP status and raw body to the parsed JSON or a [`BotListError`].
///
/// Checks run in a fixed order:
/// 1. Empty JSON object and blank body → [`BotListError::EmptyResponse`], whatever the status
/// 2. Status 429 → [`BotListError::RateLimited`]
/// 3. Any status other than 200 → [`BotListError::RequestFailed`]
/// 4. Otherwise the parsed JSON is returned
pub fn classify(status: u16, text: &str) -> Result<Value, BotListError> {
    let json = parse_body(text);

    if is_empty_object(&json) && text.trim().is_empty() {
        return Err(BotListError::EmptyResponse);
    }

    if status == 429 {
        return Err(BotListError::RateLimited {
            retry_after: json.get("retry_after").and_then(Value::as_f64),
        });
    }

    if status != 200 {
        return Err(BotListError::RequestFailed {
            status,
            text: text.to_string(),
        });
    }

    Ok(json)
}

fn is_empty_object(value: &Value) -> bool {
    matches!(value, Value::Object(map) if map.is_empty())
}

/// Loose truthiness of a JSON value: null, false, zero, and empty strings,
/// arrays or objects are all falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
