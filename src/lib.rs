//! Live terminal transcripts for LLM agent event streams.
//!
//! stream-transcript reads the newline-delimited JSON events an agent runtime
//! emits (text deltas, streamed tool input, tool results, a final summary)
//! and renders them as a readable, colorized transcript while the agent runs.
//!
//! # Modules
//!
//! - [`event`] - Line decoding and the typed view over records
//! - [`state`] - Tool-call accumulation and the record processor
//! - [`tools`] - Tool-input descriptions per tool kind
//! - [`result`] - Tool-result previews
//! - [`mod@format`] - Pure formatting functions for every marker line
//! - [`summary`] - Final totals line
//! - [`sink`] - Output sinks (stdout/stderr, in-memory capture)
//! - [`markdown`] - Opt-in markdown rendering of assistant text
//! - [`config`] - Render options
//!
//! # Example
//!
//! ```
//! use stream_transcript::{CaptureSink, RenderOptions, run};
//!
//! colored::control::set_override(false);
//! let input = concat!(
//!     r#"{"type":"stream_event","event":{"type":"content_block_start","index":0,"content_block":{"type":"tool_use","name":"Bash"}}}"#, "\n",
//!     r#"{"type":"stream_event","event":{"type":"content_block_delta","delta":{"partial_json":"{\"command\":\"ls -la\"}"}}}"#, "\n",
//!     r#"{"type":"stream_event","event":{"type":"content_block_stop"}}"#, "\n",
//! );
//!
//! let mut sink = CaptureSink::new();
//! let counters = run(input.as_bytes(), &mut sink, &RenderOptions::default()).unwrap();
//! assert_eq!(counters.tool_use_count, 1);
//! assert_eq!(sink.transcript(), "\n🔧 Bash\n   $ ls -la\n");
//! colored::control::unset_override();
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod format;
pub mod markdown;
pub mod result;
pub mod sink;
pub mod state;
pub mod summary;
pub mod tools;

use std::io::BufRead;

// Re-export commonly used types
pub use config::{ColorMode, RenderOptions};
pub use error::StreamError;
pub use event::{Decoded, Event, decode_line};
pub use format::{
    ClampedLines, LineBudget, format_error_event, format_result_lines, format_result_marker,
    format_subagent_status, format_system_message, format_tool_detail, format_tool_header,
};
pub use result::format_tool_result;
pub use sink::{CaptureSink, OutputSink, StdioSink};
pub use state::{SessionCounters, StreamProcessor, StreamState, ToolCall};
pub use summary::{RunTotals, format_summary};
pub use tools::{ToolKind, format_tool_input};

/// Render every line of `reader` to `sink` until end of input.
///
/// Lines are split on `\n` with a trailing `\r` removed; bytes that are not
/// UTF-8 are replaced, and such a line then passes through as malformed.
/// Returns the session counters once input is exhausted.
pub fn run<R, S>(
    reader: R,
    sink: S,
    options: &RenderOptions,
) -> Result<SessionCounters, StreamError>
where
    R: BufRead,
    S: OutputSink,
{
    let mut processor = StreamProcessor::new(sink, options);
    for chunk in reader.split(b'\n') {
        let bytes = chunk.map_err(StreamError::Read)?;
        let line = String::from_utf8_lossy(&bytes);
        let line = line.strip_suffix('\r').unwrap_or(&line);
        processor.process_line(line)?;
    }
    let (counters, _sink) = processor.finish()?;
    Ok(counters)
}
