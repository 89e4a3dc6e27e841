//! Tool-input formatting.
//!
//! Each known tool has one designated input field worth echoing (the shell
//! command, the file path, the search pattern...). [`ToolKind`] names those
//! tools, and [`ToolKind::Other`] covers everything else by showing the first
//! short string argument, since tool vocabularies keep growing.

use serde_json::Value;

/// Longest string value the fallback will show, exclusive.
const MAX_FALLBACK_VALUE_LEN: usize = 80;

/// Tool kinds with a dedicated one-line description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolKind {
    Bash,
    Task,
    Read,
    Write,
    Edit,
    Glob,
    Grep,
    WebFetch,
    WebSearch,
    /// `TodoWrite` and `TaskCreate` share a task-count summary.
    TodoList,
    Other,
}

impl ToolKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "Bash" => ToolKind::Bash,
            "Task" => ToolKind::Task,
            "Read" => ToolKind::Read,
            "Write" => ToolKind::Write,
            "Edit" => ToolKind::Edit,
            "Glob" => ToolKind::Glob,
            "Grep" => ToolKind::Grep,
            "WebFetch" => ToolKind::WebFetch,
            "WebSearch" => ToolKind::WebSearch,
            "TodoWrite" | "TaskCreate" => ToolKind::TodoList,
            _ => ToolKind::Other,
        }
    }

    /// Describe a tool call from its parsed input, or `None` if there is
    /// nothing worth showing.
    pub fn describe(&self, params: &Value) -> Option<String> {
        match self {
            ToolKind::Bash => text(params, "command").map(|c| format!("$ {c}")),
            ToolKind::Task => {
                let desc = text(params, "description");
                match text(params, "subagent_type") {
                    Some(kind) => Some(format!("{kind}({})", desc.unwrap_or(""))),
                    None => desc.map(str::to_string),
                }
            }
            ToolKind::Read => text(params, "file_path").map(|p| format!("📄 {p}")),
            ToolKind::Write => text(params, "file_path").map(|p| format!("✏️  {p}")),
            ToolKind::Edit => text(params, "file_path").map(|p| format!("🔨 {p}")),
            ToolKind::Glob => text(params, "pattern").map(|p| format!("🔍 {p}")),
            ToolKind::Grep => text(params, "pattern").map(|p| format!("🔎 \"{p}\"")),
            ToolKind::WebFetch => text(params, "url").map(|u| format!("🌐 {u}")),
            ToolKind::WebSearch => text(params, "query").map(|q| format!("🔍 \"{q}\"")),
            ToolKind::TodoList => params
                .get("todos")
                .and_then(Value::as_array)
                .map(|todos| format!("{} tasks", todos.len())),
            ToolKind::Other => describe_first_arg(params),
        }
    }
}

fn text<'a>(params: &'a Value, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// `key: value` for the first argument, if it is a short string.
fn describe_first_arg(params: &Value) -> Option<String> {
    let (key, value) = params.as_object()?.iter().next()?;
    let value = value.as_str()?;
    if value.chars().count() < MAX_FALLBACK_VALUE_LEN {
        Some(format!("{key}: {value}"))
    } else {
        None
    }
}

/// Format a tool call's accumulated input for display.
///
/// `raw_input` is the concatenation of every streamed input fragment. Input
/// that is not complete JSON yields `None`.
///
/// # Example
///
/// ```
/// use stream_transcript::format_tool_input;
///
/// assert_eq!(
///     format_tool_input("Bash", r#"{"command":"cargo fmt"}"#).as_deref(),
///     Some("$ cargo fmt")
/// );
/// assert_eq!(format_tool_input("Bash", r#"{"comm"#), None);
/// ```
pub fn format_tool_input(name: &str, raw_input: &str) -> Option<String> {
    let params: Value = serde_json::from_str(raw_input).ok()?;
    ToolKind::from_name(name).describe(&params)
}
