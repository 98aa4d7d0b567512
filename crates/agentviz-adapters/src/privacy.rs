//! Helpers that decide what may cross the privacy boundary.
//!
//! Free-form text never leaves an adapter. The helpers here reduce inputs
//! to the few derived strings the tool tables allow: basenames, bounded
//! one-line labels and item counts.

use serde_json::Value;

/// Literal text Claude Code writes for an assistant turn with no visible output.
pub const NO_CONTENT_SENTINEL: &str = "(no content)";

/// Upper bound, in chars, for any derived context string.
pub const MAX_CONTEXT_CHARS: usize = 80;

/// Substring that marks a tool result as failed.
///
/// Known to misfire on successful output that mentions the word.
pub const ERROR_MARKER: &str = "Error";

/// Final path segment of a Unix or Windows path.
pub fn basename(path: &str) -> Option<String> {
    path.rsplit(|c| c == '/' || c == '\\')
        .find(|segment| !segment.trim().is_empty())
        .map(|segment| segment.trim().to_string())
}

/// First non-empty line of `text`, trimmed and cut to [`MAX_CONTEXT_CHARS`].
pub fn bounded_line(text: &str) -> Option<String> {
    let line = text.lines().map(str::trim).find(|l| !l.is_empty())?;
    Some(truncate_chars(line, MAX_CONTEXT_CHARS))
}

/// "1 item" / "N items".
pub fn item_count(count: usize) -> String {
    if count == 1 {
        "1 item".to_string()
    } else {
        format!("{} items", count)
    }
}

/// Text that only signals "the model produced nothing visible".
pub fn is_no_content(text: &str) -> bool {
    text.trim() == NO_CONTENT_SENTINEL
}

/// Tool-result status heuristic: an explicit flag, or `Error` anywhere in
/// the textual output.
pub fn result_is_error(explicit_flag: bool, output: &Value) -> bool {
    explicit_flag || value_mentions_error(output)
}

fn value_mentions_error(value: &Value) -> bool {
    match value {
        Value::String(s) => s.contains(ERROR_MARKER),
        Value::Array(items) => items.iter().any(value_mentions_error),
        Value::Object(map) => map.values().any(value_mentions_error),
        _ => false,
    }
}

fn truncate_chars(input: &str, max_chars: usize) -> String {
    match input.char_indices().nth(max_chars) {
        Some((idx, _)) => input[..idx].to_string(),
        None => input.to_string(),
    }
}

/// Read a string field from a tool input object.
pub(crate) fn str_field<'a>(input: &'a Value, key: &str) -> Option<&'a str> {
    input.get(key).and_then(Value::as_str)
}
