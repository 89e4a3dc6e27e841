//! Line decoding and the typed view over decoded records.
//!
//! [`decode_line`] turns one raw input line into a JSON value, a malformed
//! line to pass through, or nothing. [`Event::classify`] then borrows from the
//! value and exposes only the fields the state machine reads. Records are
//! never validated: a missing or mistyped field simply reads as absent.

use serde_json::Value;

// ============================================================================
// Line Decoding
// ============================================================================

/// Outcome of decoding one input line.
#[derive(Debug, PartialEq)]
pub enum Decoded {
    /// The line parsed as JSON.
    Record(Value),
    /// The line is not JSON; it goes to the passthrough stream verbatim.
    Malformed,
    /// Blank or whitespace-only line that is not JSON. Produces no output.
    Blank,
}

/// Parse one newline-stripped input line.
pub fn decode_line(line: &str) -> Decoded {
    match serde_json::from_str(line) {
        Ok(value) => Decoded::Record(value),
        Err(_) if line.trim().is_empty() => Decoded::Blank,
        Err(_) => Decoded::Malformed,
    }
}

/// Whether a value counts as present: not null, false, zero, or empty string.
///
/// Producers omit fields, null them, or zero them interchangeably, so every
/// "is this field set" check goes through here.
pub(crate) fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Field lookup that treats unset values as missing.
pub(crate) fn field<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key).filter(|v| is_set(v))
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

// ============================================================================
// Typed Event View
// ============================================================================

/// A decoded record, classified by its top-level `type`.
#[derive(Debug, PartialEq)]
pub enum Event<'a> {
    Stream(StreamEvent<'a>),
    ToolResult(ToolResult<'a>),
    /// A `user` message; only its embedded tool results matter.
    User(Vec<ToolResult<'a>>),
    Assistant {
        subagent: Option<Subagent<'a>>,
    },
    /// An upstream error; `payload` is the `error` field or the whole record.
    Error {
        payload: &'a Value,
    },
    System {
        message: Option<&'a Value>,
    },
    /// Final summary record.
    Result(&'a Value),
    Unknown,
}

/// The nested `event` of a `stream_event` record.
#[derive(Debug, PartialEq)]
pub enum StreamEvent<'a> {
    ContentBlockStart {
        index: Option<u64>,
        block: ContentBlock<'a>,
    },
    ContentBlockDelta {
        index: Option<u64>,
        text: Option<&'a str>,
        partial_json: Option<&'a str>,
    },
    ContentBlockStop {
        index: Option<u64>,
    },
    MessageStart,
    MessageStop,
    Other,
}

#[derive(Debug, PartialEq)]
pub enum ContentBlock<'a> {
    ToolUse {
        id: Option<&'a str>,
        name: &'a str,
    },
    Other,
}

/// A tool result, either a top-level record or a block inside a `user` message.
#[derive(Debug, PartialEq)]
pub struct ToolResult<'a> {
    pub tool_name: Option<&'a str>,
    /// Id of the `tool_use` block this result answers.
    pub tool_use_id: Option<&'a str>,
    pub payload: Option<&'a Value>,
    pub is_error: bool,
}

#[derive(Debug, PartialEq)]
pub struct Subagent<'a> {
    pub kind: &'a str,
    pub status: &'a str,
}

/// Placeholder for tool names the stream never supplied.
pub const UNNAMED_TOOL: &str = "tool";

impl<'a> Event<'a> {
    /// Classify a decoded record. Non-objects and unknown types are `Unknown`.
    pub fn classify(record: &'a Value) -> Self {
        let Some(kind) = record.get("type").and_then(Value::as_str) else {
            return Event::Unknown;
        };

        match kind {
            "stream_event" => match record.get("event") {
                Some(inner) => Event::Stream(StreamEvent::classify(inner)),
                None => Event::Stream(StreamEvent::Other),
            },
            "tool_result" => Event::ToolResult(ToolResult {
                tool_name: str_field(record, "tool_name"),
                tool_use_id: str_field(record, "tool_use_id"),
                payload: field(record, "result").or_else(|| field(record, "content")),
                is_error: is_error(record),
            }),
            "user" => Event::User(user_tool_results(record)),
            "assistant" => Event::Assistant {
                subagent: record
                    .get("message")
                    .and_then(|m| field(m, "subagent"))
                    .map(|sub| Subagent {
                        kind: str_field(sub, "type").unwrap_or("subagent"),
                        status: str_field(sub, "status").unwrap_or(""),
                    }),
            },
            "error" => Event::Error {
                payload: field(record, "error").unwrap_or(record),
            },
            "system" => Event::System {
                message: field(record, "message"),
            },
            "result" => Event::Result(record),
            _ => Event::Unknown,
        }
    }
}

impl<'a> StreamEvent<'a> {
    fn classify(inner: &'a Value) -> Self {
        let index = inner.get("index").and_then(Value::as_u64);
        match inner.get("type").and_then(Value::as_str) {
            Some("content_block_start") => {
                let block = match inner.get("content_block") {
                    Some(b) if b.get("type").and_then(Value::as_str) == Some("tool_use") => {
                        ContentBlock::ToolUse {
                            id: str_field(b, "id"),
                            name: str_field(b, "name").unwrap_or(UNNAMED_TOOL),
                        }
                    }
                    _ => ContentBlock::Other,
                };
                StreamEvent::ContentBlockStart { index, block }
            }
            Some("content_block_delta") => {
                let delta = inner.get("delta");
                StreamEvent::ContentBlockDelta {
                    index,
                    text: delta.and_then(|d| str_field(d, "text")),
                    partial_json: delta
                        .and_then(|d| d.get("partial_json"))
                        .and_then(Value::as_str),
                }
            }
            Some("content_block_stop") => StreamEvent::ContentBlockStop { index },
            Some("message_start") => StreamEvent::MessageStart,
            Some("message_stop") => StreamEvent::MessageStop,
            _ => StreamEvent::Other,
        }
    }
}

fn is_error(value: &Value) -> bool {
    value.get("is_error").is_some_and(is_set)
}

fn user_tool_results(record: &Value) -> Vec<ToolResult<'_>> {
    let Some(blocks) = record
        .get("message")
        .and_then(|m| m.get("content"))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    blocks
        .iter()
        .filter(|b| b.get("type").and_then(Value::as_str) == Some("tool_result"))
        .map(|b| ToolResult {
            tool_name: None,
            tool_use_id: str_field(b, "tool_use_id"),
            payload: field(b, "content"),
            is_error: is_error(b),
        })
        .collect()
}
