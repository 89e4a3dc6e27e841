//! Shared test helpers for stream-transcript tests.

// Not every test file uses every helper
#![allow(dead_code)]

use serde_json::{Value, json};
pub use stream_transcript::format::strip_ansi;
use stream_transcript::{CaptureSink, RenderOptions, SessionCounters, run};

// =============================================================================
// RAII Guards
// =============================================================================

/// RAII guard that disables colored output for the duration of a test.
pub struct DisableColors;

impl DisableColors {
    pub fn new() -> Self {
        colored::control::set_override(false);
        Self
    }
}

impl Default for DisableColors {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for DisableColors {
    fn drop(&mut self) {
        colored::control::unset_override();
    }
}

// =============================================================================
// Record Builders
// =============================================================================

pub fn stream(event: Value) -> Value {
    json!({"type": "stream_event", "event": event})
}

pub fn message_start() -> Value {
    stream(json!({"type": "message_start", "message": {"role": "assistant"}}))
}

pub fn message_stop() -> Value {
    stream(json!({"type": "message_stop"}))
}

pub fn text_start(index: u64) -> Value {
    stream(json!({"type": "content_block_start", "index": index, "content_block": {"type": "text", "text": ""}}))
}

pub fn text_delta(index: u64, text: &str) -> Value {
    stream(json!({"type": "content_block_delta", "index": index, "delta": {"type": "text_delta", "text": text}}))
}

pub fn tool_start(index: u64, name: &str) -> Value {
    stream(json!({
        "type": "content_block_start",
        "index": index,
        "content_block": {"type": "tool_use", "id": format!("toolu_{index}"), "name": name, "input": {}}
    }))
}

pub fn input_delta(index: u64, fragment: &str) -> Value {
    stream(json!({"type": "content_block_delta", "index": index, "delta": {"type": "input_json_delta", "partial_json": fragment}}))
}

pub fn block_stop(index: u64) -> Value {
    stream(json!({"type": "content_block_stop", "index": index}))
}

/// Split a JSON tool input into fragments of at most `size` characters,
/// the way a producer streams `partial_json`.
pub fn fragments(input: &str, size: usize) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    chars.chunks(size).map(|c| c.iter().collect()).collect()
}

/// The full record sequence for one streamed tool call.
pub fn tool_call(index: u64, name: &str, input: &Value, fragment_size: usize) -> Vec<Value> {
    let mut records = vec![tool_start(index, name)];
    for fragment in fragments(&input.to_string(), fragment_size) {
        records.push(input_delta(index, &fragment));
    }
    records.push(block_stop(index));
    records
}

// =============================================================================
// Running
// =============================================================================

/// Serialize records as NDJSON input.
pub fn ndjson(records: &[Value]) -> String {
    records.iter().map(|r| format!("{r}\n")).collect()
}

/// Run raw input through the library and return (transcript, passthrough, counters),
/// with ANSI codes stripped.
pub fn render(input: &str) -> (String, String, SessionCounters) {
    let mut sink = CaptureSink::new();
    let counters = run(input.as_bytes(), &mut sink, &RenderOptions::default())
        .expect("in-memory run cannot fail");
    (
        strip_ansi(sink.transcript()),
        sink.passthrough().to_string(),
        counters,
    )
}

/// Run records through the library and return the stripped transcript.
pub fn render_records(records: &[Value]) -> String {
    render(&ndjson(records)).0
}
