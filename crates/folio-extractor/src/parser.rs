//! Recover a JSON object from raw model output

use crate::config::DEFAULT_EXCERPT_CHARS;
use crate::error::ExtractorError;
use crate::types::{fields_from_map, Fields};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

// Greedy: from the first '{' to the last '}', across newlines.
static OBJECT_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("object block pattern is valid"));

/// Parse a model response into a field record
pub fn parse_response(response: &str) -> Result<Fields, ExtractorError> {
    parse_response_with_limit(response, DEFAULT_EXCERPT_CHARS)
}

/// Parse a model response, quoting at most `excerpt_chars` of it on failure
///
/// Fallback chain: strip markdown fences, parse directly, then parse the
/// greedy brace-delimited block. A list is reduced to its first element
/// (or an empty object); any other non-object value is rejected.
pub fn parse_response_with_limit(
    response: &str,
    excerpt_chars: usize,
) -> Result<Fields, ExtractorError> {
    let cleaned = strip_fences(response);

    let value = match serde_json::from_str::<Value>(&cleaned) {
        Ok(value) => value,
        Err(e) => {
            debug!("Direct JSON parse failed ({}), scanning for an object block", e);
            recover_object(&cleaned).ok_or_else(|| ExtractorError::UnparseableResponse {
                excerpt: excerpt(response, excerpt_chars),
            })?
        }
    };

    match first_if_list(value) {
        Value::Object(map) => Ok(fields_from_map(map)),
        other => Err(ExtractorError::UnexpectedType(json_type_name(&other).to_string())),
    }
}

fn strip_fences(response: &str) -> String {
    response
        .trim()
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

fn recover_object(text: &str) -> Option<Value> {
    let block = OBJECT_BLOCK.find(text)?;
    match serde_json::from_str(block.as_str()) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("Object block is not valid JSON: {}", e);
            None
        }
    }
}

fn first_if_list(value: Value) -> Value {
    match value {
        Value::Array(items) => items
            .into_iter()
            .next()
            .unwrap_or_else(|| Value::Object(Map::new())),
        other => other,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn excerpt(response: &str, max_chars: usize) -> String {
    response.chars().take(max_chars).collect()
}
