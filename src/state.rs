//! Stream state machine.
//!
//! [`StreamState`] holds everything that must survive from one record to the
//! next: the tool calls whose input is still streaming, the name of the last
//! tool opened, and the session counters. [`StreamProcessor`] feeds decoded
//! records through it and renders the result to an [`OutputSink`].
//!
//! Tool input arrives as `partial_json` fragments that are only valid JSON
//! once concatenated, so fragments are appended untouched and parsed once, at
//! `content_block_stop`.

use std::collections::{BTreeMap, HashMap};
use std::io;

use serde_json::Value;

use crate::config::RenderOptions;
use crate::event::{
    ContentBlock, Decoded, Event, StreamEvent, ToolResult, UNNAMED_TOOL, decode_line,
};
use crate::format::{
    format_error_event, format_result_lines, format_result_marker, format_subagent_status,
    format_system_message, format_tool_detail, format_tool_header,
};
use crate::markdown::MarkdownText;
use crate::result::format_tool_result;
use crate::sink::OutputSink;
use crate::summary::{RunTotals, format_summary};
use crate::tools::format_tool_input;

// ============================================================================
// State
// ============================================================================

/// A tool call whose input is still streaming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCall {
    pub name: String,
    pub input: String,
}

/// Counters kept for the whole session. Never reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionCounters {
    pub message_count: u64,
    pub tool_use_count: u64,
}

/// Accumulation state across records.
///
/// Open tool calls are keyed by their content-block index, so interleaved
/// tool blocks accumulate independently. Records without an `index` address
/// block 0 on open and the most recently opened block otherwise.
#[derive(Debug, Default)]
pub struct StreamState {
    open_tools: BTreeMap<u64, ToolCall>,
    current: Option<u64>,
    last_tool_name: Option<String>,
    /// Tool names by `tool_use` id, kept for the whole session.
    tool_names: HashMap<String, String>,
    counters: SessionCounters,
}

impl StreamState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counters(&self) -> SessionCounters {
        self.counters
    }

    /// Name of the most recently opened tool, kept after it closes.
    pub fn last_tool_name(&self) -> Option<&str> {
        self.last_tool_name.as_deref()
    }

    /// The most recently opened tool call that is still open.
    pub fn current_tool(&self) -> Option<&ToolCall> {
        self.current.and_then(|i| self.open_tools.get(&i))
    }

    /// Open a tool call. Reopening an index discards its previous input.
    pub fn open_tool(&mut self, index: Option<u64>, id: Option<&str>, name: &str) {
        let index = index.unwrap_or(0);
        if let Some(id) = id {
            self.tool_names.insert(id.to_string(), name.to_string());
        }
        self.open_tools.insert(
            index,
            ToolCall {
                name: name.to_string(),
                input: String::new(),
            },
        );
        self.current = Some(index);
        self.last_tool_name = Some(name.to_string());
        self.counters.tool_use_count += 1;
    }

    /// Append an input fragment. Returns false if no tool call is open there.
    pub fn append_input(&mut self, index: Option<u64>, fragment: &str) -> bool {
        let Some(index) = index.or(self.current) else {
            return false;
        };
        match self.open_tools.get_mut(&index) {
            Some(call) => {
                call.input.push_str(fragment);
                true
            }
            None => false,
        }
    }

    /// Close a content block, returning the tool call it held, if any.
    pub fn close_block(&mut self, index: Option<u64>) -> Option<ToolCall> {
        let index = index.or(self.current)?;
        let call = self.open_tools.remove(&index)?;
        if self.current == Some(index) {
            self.current = self.open_tools.keys().next_back().copied();
        }
        Some(call)
    }

    pub fn begin_message(&mut self) {
        self.counters.message_count += 1;
    }

    /// Label for a tool result: its own name, else the tool its id answers,
    /// else the last tool opened.
    pub fn result_label<'a>(
        &'a self,
        tool_name: Option<&'a str>,
        tool_use_id: Option<&str>,
    ) -> &'a str {
        tool_name
            .or_else(|| {
                tool_use_id
                    .and_then(|id| self.tool_names.get(id))
                    .map(String::as_str)
            })
            .or(self.last_tool_name.as_deref())
            .unwrap_or(UNNAMED_TOOL)
    }
}

// ============================================================================
// Processor
// ============================================================================

/// Drives records through [`StreamState`] and renders them to a sink.
pub struct StreamProcessor<S> {
    state: StreamState,
    sink: S,
    markdown: Option<MarkdownText>,
}

impl<S: OutputSink> StreamProcessor<S> {
    pub fn new(sink: S, options: &RenderOptions) -> Self {
        Self {
            state: StreamState::new(),
            sink,
            markdown: options.markdown.then(|| MarkdownText::new(options.width)),
        }
    }

    pub fn state(&self) -> &StreamState {
        &self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Decode and process one newline-stripped input line.
    ///
    /// Lines that are not JSON go to the passthrough stream unchanged.
    pub fn process_line(&mut self, line: &str) -> io::Result<()> {
        match decode_line(line) {
            Decoded::Record(record) => self.process_record(&record),
            Decoded::Malformed => self.sink.emit_passthrough(line),
            Decoded::Blank => Ok(()),
        }
    }

    /// Process one decoded record.
    pub fn process_record(&mut self, record: &Value) -> io::Result<()> {
        match Event::classify(record) {
            Event::Stream(event) => self.on_stream_event(event),
            Event::ToolResult(result) => self.on_tool_result(&result),
            Event::User(results) => results
                .iter()
                .try_for_each(|result| self.on_tool_result(result)),
            Event::Assistant { subagent } => match subagent {
                Some(sub) => self.line(&format_subagent_status(&sub)),
                None => Ok(()),
            },
            Event::Error { payload } => self.line(&format_error_event(payload)),
            Event::System { message } => match message {
                Some(message) => self.line(&format_system_message(message)),
                None => Ok(()),
            },
            Event::Result(record) => {
                let totals = RunTotals::from_record(record);
                let tool_uses = self.state.counters().tool_use_count;
                self.lines(&format_summary(&totals, tool_uses))
            }
            Event::Unknown => Ok(()),
        }
    }

    /// Render anything still pending, flush the sink, and hand back the
    /// final counters together with the sink.
    pub fn finish(mut self) -> io::Result<(SessionCounters, S)> {
        self.flush_markdown()?;
        self.sink.flush()?;
        Ok((self.state.counters(), self.sink))
    }

    fn on_stream_event(&mut self, event: StreamEvent<'_>) -> io::Result<()> {
        match event {
            StreamEvent::ContentBlockStart {
                index,
                block: ContentBlock::ToolUse { id, name },
            } => {
                self.state.open_tool(index, id, name);
                self.line(&format_tool_header(name))
            }
            StreamEvent::ContentBlockStart { .. } => Ok(()),
            StreamEvent::ContentBlockDelta {
                index,
                text,
                partial_json,
            } => {
                if let Some(text) = text {
                    self.text(text)?;
                }
                if let Some(fragment) = partial_json {
                    self.state.append_input(index, fragment);
                }
                Ok(())
            }
            StreamEvent::ContentBlockStop { index } => match self.state.close_block(index) {
                Some(call) => self.render_tool_input(&call),
                None => self.flush_markdown(),
            },
            StreamEvent::MessageStart => {
                self.state.begin_message();
                Ok(())
            }
            StreamEvent::MessageStop | StreamEvent::Other => Ok(()),
        }
    }

    fn render_tool_input(&mut self, call: &ToolCall) -> io::Result<()> {
        if call.input.is_empty() {
            return Ok(());
        }
        match format_tool_input(&call.name, &call.input) {
            Some(details) => self.lines(&format_tool_detail(&details)),
            None => Ok(()),
        }
    }

    fn on_tool_result(&mut self, result: &ToolResult<'_>) -> io::Result<()> {
        let label = self
            .state
            .result_label(result.tool_name, result.tool_use_id);
        let marker = format_result_marker(label, result.is_error);
        self.line(&marker)?;
        match result.payload.and_then(format_tool_result) {
            Some(preview) => self.lines(&format_result_lines(&preview)),
            None => Ok(()),
        }
    }

    fn text(&mut self, text: &str) -> io::Result<()> {
        match self.markdown.as_mut() {
            Some(pending) => {
                pending.push(text);
                Ok(())
            }
            None => self.sink.emit(text),
        }
    }

    fn flush_markdown(&mut self) -> io::Result<()> {
        match self.markdown.as_mut().and_then(MarkdownText::take_rendered) {
            Some(rendered) => self.sink.emit_line(&rendered),
            None => Ok(()),
        }
    }

    fn line(&mut self, line: &str) -> io::Result<()> {
        self.flush_markdown()?;
        self.sink.emit_line(line)
    }

    fn lines(&mut self, lines: &[String]) -> io::Result<()> {
        self.flush_markdown()?;
        lines.iter().try_for_each(|line| self.sink.emit_line(line))
    }
}
