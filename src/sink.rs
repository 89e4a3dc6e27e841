//! Output sinks for the rendered transcript.
//!
//! Everything the processor produces goes through an [`OutputSink`]: raw
//! assistant text, formatted marker lines, and the verbatim passthrough of
//! lines that could not be decoded. The binary wires [`StdioSink`] to
//! stdout/stderr; tests and embedders use [`CaptureSink`].
//!
//! # Usage
//!
//! ```
//! use stream_transcript::{CaptureSink, OutputSink};
//!
//! let mut sink = CaptureSink::new();
//! sink.emit("partial ").unwrap();
//! sink.emit("sentence").unwrap();
//! sink.emit_line("").unwrap();
//! sink.emit_passthrough("not json").unwrap();
//!
//! assert_eq!(sink.transcript(), "partial sentence\n");
//! assert_eq!(sink.passthrough(), "not json\n");
//! ```

use std::io::{self, Write};

/// Destination for transcript output.
///
/// # Methods
///
/// * `emit` - Raw text with no added line break (streamed assistant text)
/// * `emit_line` - A complete line; the sink appends the line terminator
/// * `emit_passthrough` - A line for the secondary (error) stream
pub trait OutputSink {
    /// Write text exactly as given.
    fn emit(&mut self, text: &str) -> io::Result<()>;
    /// Write a line followed by `\n`.
    fn emit_line(&mut self, line: &str) -> io::Result<()>;
    /// Write a line to the passthrough stream followed by `\n`.
    fn emit_passthrough(&mut self, line: &str) -> io::Result<()>;
    /// Flush any buffered output.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: OutputSink + ?Sized> OutputSink for &mut S {
    fn emit(&mut self, text: &str) -> io::Result<()> {
        (**self).emit(text)
    }

    fn emit_line(&mut self, line: &str) -> io::Result<()> {
        (**self).emit_line(line)
    }

    fn emit_passthrough(&mut self, line: &str) -> io::Result<()> {
        (**self).emit_passthrough(line)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

// ============================================================================
// Standard streams
// ============================================================================

/// Sink writing the transcript to stdout and passthrough lines to stderr.
///
/// Stdout is flushed after every raw text write so that a sentence streamed
/// in fragments shows up as it arrives, not when the next newline does.
pub struct StdioSink {
    out: io::Stdout,
    err: io::Stderr,
}

impl StdioSink {
    pub fn new() -> Self {
        Self {
            out: io::stdout(),
            err: io::stderr(),
        }
    }
}

impl Default for StdioSink {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputSink for StdioSink {
    fn emit(&mut self, text: &str) -> io::Result<()> {
        let mut out = self.out.lock();
        out.write_all(text.as_bytes())?;
        out.flush()
    }

    fn emit_line(&mut self, line: &str) -> io::Result<()> {
        let mut out = self.out.lock();
        out.write_all(line.as_bytes())?;
        out.write_all(b"\n")?;
        out.flush()
    }

    fn emit_passthrough(&mut self, line: &str) -> io::Result<()> {
        let mut err = self.err.lock();
        err.write_all(line.as_bytes())?;
        err.write_all(b"\n")
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()?;
        self.err.flush()
    }
}

// ============================================================================
// In-memory capture
// ============================================================================

/// Sink that keeps both streams in memory.
#[derive(Debug, Default, Clone)]
pub struct CaptureSink {
    transcript: String,
    passthrough: String,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written to the primary stream, in order.
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// Everything written to the passthrough stream, in order.
    pub fn passthrough(&self) -> &str {
        &self.passthrough
    }
}

impl OutputSink for CaptureSink {
    fn emit(&mut self, text: &str) -> io::Result<()> {
        self.transcript.push_str(text);
        Ok(())
    }

    fn emit_line(&mut self, line: &str) -> io::Result<()> {
        self.transcript.push_str(line);
        self.transcript.push('\n');
        Ok(())
    }

    fn emit_passthrough(&mut self, line: &str) -> io::Result<()> {
        self.passthrough.push_str(line);
        self.passthrough.push('\n');
        Ok(())
    }
}
