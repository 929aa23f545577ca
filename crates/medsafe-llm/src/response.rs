//! Locating the JSON payload inside raw generated text.

use serde_json::Value;

use crate::client::{GenerationError, GenerationResult};

/// Parse the JSON value carried by a generation response.
///
/// The service is asked for JSON, but models still wrap it in code fences or add
/// prose around it. When the text is not JSON as a whole, every `{` or `[` is tried
/// as a starting point and the longest value that parses is taken, so a stray
/// bracket in the prose does not shadow the payload.
pub fn parse_json_payload(raw: &str) -> GenerationResult<Value> {
    let text = strip_code_fence(raw.trim());
    if text.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }

    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return Ok(value);
    }

    let mut starts = text.match_indices(['{', '[']).map(|(index, _)| index).peekable();
    if starts.peek().is_none() {
        return Err(GenerationError::Parse("No JSON object or array found in response".into()));
    }

    let mut best: Option<(usize, Value)> = None;
    for start in starts {
        let mut values = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
        let Some(Ok(value)) = values.next() else {
            continue;
        };
        let consumed = values.byte_offset();
        if best.as_ref().map_or(true, |(len, _)| consumed > *len) {
            best = Some((consumed, value));
        }
    }

    best.map(|(_, value)| value)
        .ok_or_else(|| GenerationError::Parse("No complete JSON value found in response".into()))
}

/// Remove a surrounding Markdown code fence, if any.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string ("json") on the opening line.
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
