//! Field helpers for structured logging

use crate::slots::SlotField;

const PREVIEW_CHARS: usize = 100;

/// Preview of user or model text for debug logs.
///
/// Returns None unless conversation logging is enabled. Truncates on a
/// character boundary so multi-byte input (e.g. "Medellín") never panics.
///
/// # Examples
///
/// ```
/// use atlas::logging::message_preview;
///
/// assert_eq!(message_preview("Hola", false), None);
/// assert_eq!(message_preview("Hola", true).as_deref(), Some("Hola"));
/// ```
pub fn message_preview(text: &str, log_conversation: bool) -> Option<String> {
    if !log_conversation || text.trim().is_empty() {
        return None;
    }
    Some(truncate_chars(text.trim(), PREVIEW_CHARS))
}

/// Comma-separated field names, for `missing = %...` style log fields.
pub fn field_list(fields: &[SlotField]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
