//! Image normalization and JSON extraction from free-text model output.

use serde_json::{Map, Value};

use crate::error::{RelayError, RelayResult};

const JPEG_DATA_PREFIX: &str = "data:image/jpeg;base64,";

/// Wrap a raw base64 payload as a JPEG data URI. Data URIs pass through.
pub fn normalize_image(payload: &str) -> String {
    if payload.starts_with("data:") {
        payload.to_string()
    } else {
        format!("{}{}", JPEG_DATA_PREFIX, payload)
    }
}

/// The substring from the first `{` through the last `}`, if any.
pub fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Parse the brace span of `text` as a JSON object.
pub fn extract_json_object(text: &str) -> RelayResult<Map<String, Value>> {
    let span = brace_span(text).ok_or(RelayError::MalformedUpstreamPayload)?;
    match serde_json::from_str::<Value>(span) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(RelayError::MalformedUpstreamPayload),
    }
}
