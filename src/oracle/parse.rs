//! Lenient parsing of model output.

use super::OracleError;
use serde_json::{Map, Value};

/// Strip a surrounding Markdown code fence, with or without a language tag.
///
/// ```
/// use atlas::oracle::parse::strip_code_fences;
///
/// assert_eq!(strip_code_fences("```json\n[\"a\"]\n```"), "[\"a\"]");
/// assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
/// assert_eq!(strip_code_fences("  [1] "), "[1]");
/// ```
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json", "JSON", ...) on the opening line.
    let body = match rest.find('\n') {
        Some(newline) if rest[..newline].chars().all(|c| c.is_ascii_alphanumeric()) => {
            &rest[newline + 1..]
        }
        _ => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };
    body.trim().trim_end_matches("```").trim()
}

/// Parse a JSON object, tolerating code fences.
pub fn parse_object(text: &str) -> Result<Map<String, Value>, OracleError> {
    match serde_json::from_str::<Value>(strip_code_fences(text)) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(OracleError::Malformed(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(OracleError::Malformed(e.to_string())),
    }
}

/// Parse a JSON list of strings, tolerating code fences.
pub fn parse_id_list(text: &str) -> Result<Vec<String>, OracleError> {
    let value: Value = serde_json::from_str(strip_code_fences(text))
        .map_err(|e| OracleError::Malformed(e.to_string()))?;

    let Value::Array(items) = value else {
        return Err(OracleError::Malformed(format!(
            "expected a JSON list, got {}",
            json_kind(&value)
        )));
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::String(id) => Ok(id),
            other => Err(OracleError::Malformed(format!(
                "list item is {}, not a string",
                json_kind(&other)
            ))),
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
