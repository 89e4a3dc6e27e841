//! Pure formatting functions for transcript output.
//!
//! All colored/styled output uses `format_*` helper functions defined here.
//! This keeps formatting testable, centralized, and out of the state machine.
//!
//! # Categories
//!
//! ## Tool Output Formatters
//! - [`format_tool_header`] - Tool start line (`🔧 name`)
//! - [`format_tool_detail`] - Indented, truncated echo of the tool input
//! - [`format_result_marker`] - `↳ Result` / `✗ Error` marker line
//! - [`format_result_lines`] - Indented result content
//!
//! ## Other Formatters
//! - [`format_error_event`] - Upstream error records
//! - [`format_system_message`] - Informational system records
//! - [`format_subagent_status`] - Subagent status marker

use colored::Colorize;
use serde_json::Value;

use crate::event::{Subagent, field};

// ============================================================================
// Truncation
// ============================================================================

/// How much of a multi-line text to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineBudget {
    pub max_lines: usize,
    /// Maximum characters per line, including the `...` of a cut line.
    pub max_line_len: usize,
}

/// Tool-input echoes show at most 3 lines of 100 characters.
pub const DETAIL_BUDGET: LineBudget = LineBudget {
    max_lines: 3,
    max_line_len: 100,
};

/// Lines kept under a [`LineBudget`], plus how many were cut off the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClampedLines {
    pub lines: Vec<String>,
    pub hidden: usize,
}

/// Cut `line` to `max_len` characters, ending in `...` when shortened.
pub fn truncate_line(line: &str, max_len: usize) -> String {
    if line.chars().count() <= max_len {
        return line.to_string();
    }
    let kept: String = line.chars().take(max_len.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Apply a line budget. Clamping already-clamped lines changes nothing.
pub fn clamp_lines(lines: &[&str], budget: LineBudget) -> ClampedLines {
    ClampedLines {
        lines: lines
            .iter()
            .take(budget.max_lines)
            .map(|line| truncate_line(line, budget.max_line_len))
            .collect(),
        hidden: lines.len().saturating_sub(budget.max_lines),
    }
}

fn more_lines_marker(indent: &str, hidden: usize) -> String {
    format!("{indent}... +{hidden} more lines")
}

// ============================================================================
// Tool Formatting
// ============================================================================

const DETAIL_INDENT: &str = "   ";
const RESULT_INDENT: &str = "     ";

/// Format the header printed when a tool call opens.
///
/// Starts with a newline so the header never shares a line with streamed text.
///
/// # Example
///
/// ```
/// use stream_transcript::format_tool_header;
///
/// colored::control::set_override(false);
/// assert_eq!(format_tool_header("Bash"), "\n🔧 Bash");
/// colored::control::unset_override();
/// ```
pub fn format_tool_header(name: &str) -> String {
    format!("\n{}", format!("🔧 {name}").cyan())
}

/// Format a tool-input description as indented, dimmed lines.
///
/// Blank lines are kept here (a command may contain them), unlike result
/// content.
pub fn format_tool_detail(details: &str) -> Vec<String> {
    let lines: Vec<&str> = details.split('\n').collect();
    let clamped = clamp_lines(&lines, DETAIL_BUDGET);

    let mut out: Vec<String> = clamped
        .lines
        .iter()
        .map(|line| format!("{DETAIL_INDENT}{line}").dimmed().to_string())
        .collect();
    if clamped.hidden > 0 {
        out.push(
            more_lines_marker(DETAIL_INDENT, clamped.hidden)
                .dimmed()
                .to_string(),
        );
    }
    out
}

/// Format the marker line that precedes a tool result.
pub fn format_result_marker(tool_name: &str, is_error: bool) -> String {
    if is_error {
        format!("   ✗ Error ({tool_name}):").red().to_string()
    } else {
        format!("   ↳ Result ({tool_name}):").green().to_string()
    }
}

/// Format result content lines in gray, with a dimmed overflow marker.
pub fn format_result_lines(preview: &ClampedLines) -> Vec<String> {
    let mut out: Vec<String> = preview
        .lines
        .iter()
        .map(|line| format!("{RESULT_INDENT}{line}").bright_black().to_string())
        .collect();
    if preview.hidden > 0 {
        out.push(format!(
            "{RESULT_INDENT}{}",
            more_lines_marker("", preview.hidden).dimmed()
        ));
    }
    out
}

// ============================================================================
// Other Formatters
// ============================================================================

/// Format an upstream error record.
///
/// Shows the payload's `message`, the payload itself when it is a string, or
/// the payload serialized as JSON.
pub fn format_error_event(payload: &Value) -> String {
    let message = match payload {
        Value::String(s) => s.clone(),
        _ => match field(payload, "message") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => payload.to_string(),
        },
    };
    format!("\n{}", format!("❌ Error: {message}").red())
}

/// Format an informational system message.
pub fn format_system_message(message: &Value) -> String {
    let text = match message {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    format!("ℹ️  {text}").yellow().to_string()
}

/// Format a subagent status marker, e.g. `↳ [Explore] running`.
pub fn format_subagent_status(subagent: &Subagent<'_>) -> String {
    format!(
        "\n{}",
        format!("  ↳ [{}] {}", subagent.kind, subagent.status).magenta()
    )
}

/// Remove ANSI CSI sequences, for assertions on rendered text.
#[doc(hidden)]
pub fn strip_ansi(s: &str) -> String {
    let mut out = String::new();
    let mut in_escape = false;
    for c in s.chars() {
        if c == '\x1b' {
            in_escape = true;
        } else if in_escape {
            in_escape = !c.is_ascii_alphabetic();
        } else {
            out.push(c);
        }
    }
    out
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // =========================================
    // Truncation tests
    // =========================================

    #[test]
    fn test_truncate_line_boundaries() {
        assert_eq!(truncate_line(&"a".repeat(99), 100), "a".repeat(99));
        assert_eq!(truncate_line(&"a".repeat(100), 100), "a".repeat(100));
        assert_eq!(
            truncate_line(&"a".repeat(101), 100),
            format!("{}...", "a".repeat(97))
        );
    }

    #[test]
    fn test_truncate_line_counts_characters_not_bytes() {
        let line = "日本語".repeat(40);
        let cut = truncate_line(&line, 100);
        assert_eq!(cut.chars().count(), 100);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn test_clamp_lines() {
        let clamped = clamp_lines(&["1", "2", "3", "4"], DETAIL_BUDGET);
        assert_eq!(clamped.lines, vec!["1", "2", "3"]);
        assert_eq!(clamped.hidden, 1);

        let clamped = clamp_lines(&["only"], DETAIL_BUDGET);
        assert_eq!(clamped.hidden, 0);
    }

    // =========================================
    // Tool format tests
    // =========================================

    #[test]
    fn test_format_tool_detail_single_line() {
        colored::control::set_override(false);
        assert_eq!(format_tool_detail("$ ls -la"), vec!["   $ ls -la"]);
        colored::control::unset_override();
    }

    #[test]
    fn test_format_tool_detail_truncates() {
        colored::control::set_override(false);
        let details = format!("$ echo {}\nline 2\n\nline 4\nline 5", "x".repeat(120));
        let out = format_tool_detail(&details);
        assert_eq!(
            out,
            vec![
                format!("   $ echo {}...", "x".repeat(90)),
                "   line 2".to_string(),
                "   ".to_string(),
                "   ... +2 more lines".to_string(),
            ]
        );
        colored::control::unset_override();
    }

    #[test]
    fn test_format_result_marker() {
        colored::control::set_override(false);
        assert_eq!(format_result_marker("Bash", false), "   ↳ Result (Bash):");
        assert_eq!(format_result_marker("tool", true), "   ✗ Error (tool):");
        colored::control::unset_override();
    }

    #[test]
    fn test_format_result_lines_with_overflow() {
        colored::control::set_override(false);
        let preview = ClampedLines {
            lines: vec!["a".to_string(), "b".to_string()],
            hidden: 4,
        };
        assert_eq!(
            format_result_lines(&preview),
            vec!["     a", "     b", "     ... +4 more lines"]
        );
        colored::control::unset_override();
    }

    // =========================================
    // Other format tests
    // =========================================

    #[test]
    fn test_format_error_event() {
        colored::control::set_override(false);
        assert_eq!(
            format_error_event(&json!({"message": "Overloaded"})),
            "\n❌ Error: Overloaded"
        );
        assert_eq!(
            format_error_event(&json!("stream closed")),
            "\n❌ Error: stream closed"
        );
        assert_eq!(
            format_error_event(&json!({"code": 529})),
            "\n❌ Error: {\"code\":529}"
        );
        colored::control::unset_override();
    }

    #[test]
    fn test_format_system_message() {
        colored::control::set_override(false);
        assert_eq!(
            format_system_message(&json!("Session resumed")),
            "ℹ️  Session resumed"
        );
        colored::control::unset_override();
    }

    #[test]
    fn test_format_subagent_status() {
        colored::control::set_override(false);
        let sub = Subagent {
            kind: "Explore",
            status: "done",
        };
        assert_eq!(format_subagent_status(&sub), "\n  ↳ [Explore] done");
        colored::control::unset_override();
    }
}
