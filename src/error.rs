//! Error type for stream processing.
//!
//! Almost nothing in the transcript pipeline can fail: malformed lines,
//! unparsable tool input and unexpected payload shapes all degrade to "no
//! display". The only errors that end a run early come from the line source
//! or the output sink.

use std::io;

use thiserror::Error;

/// Errors that stop [`crate::run`] before end of input.
#[derive(Debug, Error)]
pub enum StreamError {
    /// Reading the next line from the input failed.
    #[error("failed to read input line: {0}")]
    Read(#[source] io::Error),

    /// Writing to the transcript or passthrough stream failed.
    #[error("failed to write output: {0}")]
    Write(#[from] io::Error),
}

impl StreamError {
    /// True when the failure is a closed downstream pipe (e.g. `| head`).
    ///
    /// Callers usually treat this as a normal exit.
    pub fn is_broken_pipe(&self) -> bool {
        match self {
            StreamError::Read(_) => false,
            StreamError::Write(e) => e.kind() == io::ErrorKind::BrokenPipe,
        }
    }
}
