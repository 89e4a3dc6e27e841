//! Tool-result formatting.

use serde_json::Value;

use crate::event::is_set;
use crate::format::{ClampedLines, LineBudget, clamp_lines};

/// Result echoes show at most 5 lines of 120 characters.
pub const RESULT_BUDGET: LineBudget = LineBudget {
    max_lines: 5,
    max_line_len: 120,
};

/// Pull the displayable text out of a tool-result payload.
///
/// Accepts a plain string, an object with a `text` field, or a list of
/// content blocks where only `text` blocks count.
pub fn result_text(payload: &Value) -> Option<String> {
    if !is_set(payload) {
        return None;
    }

    let text = match payload {
        Value::String(s) => s.clone(),
        Value::Array(blocks) => blocks
            .iter()
            .filter(|b| b.get("type").and_then(Value::as_str) == Some("text"))
            .filter_map(|b| b.get("text").and_then(Value::as_str))
            .collect(),
        Value::Object(_) => payload.get("text").and_then(Value::as_str)?.to_string(),
        _ => return None,
    };

    if text.is_empty() { None } else { Some(text) }
}

/// Format a tool-result payload into at most [`RESULT_BUDGET`] non-blank lines.
///
/// Returns `None` when the payload carries no text.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use stream_transcript::format_tool_result;
///
/// let preview = format_tool_result(&json!([
///     {"type": "text", "text": "line one\n\nline two\n"},
///     {"type": "image", "source": {}}
/// ]))
/// .unwrap();
/// assert_eq!(preview.lines, vec!["line one", "line two"]);
/// assert_eq!(preview.hidden, 0);
/// ```
pub fn format_tool_result(payload: &Value) -> Option<ClampedLines> {
    let text = result_text(payload)?;
    let lines: Vec<&str> = text
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .collect();
    if lines.is_empty() {
        return None;
    }
    Some(clamp_lines(&lines, RESULT_BUDGET))
}
