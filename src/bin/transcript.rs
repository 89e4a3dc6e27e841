//! Render an agent's NDJSON event stream from stdin as a live transcript.
//!
//! ```text
//! claude -p "..." --output-format stream-json --verbose | stream-transcript
//! ```

use std::io;

use anyhow::Context;
use clap::Parser;
use stream_transcript::{ColorMode, RenderOptions, StdioSink, run};

#[derive(Debug, Parser)]
#[command(name = "stream-transcript", version, about)]
struct Args {
    /// When to use ANSI colors: auto, always or never.
    #[arg(long, default_value_t = ColorMode::Auto)]
    color: ColorMode,

    /// Render assistant text as markdown at block boundaries instead of
    /// echoing it as it streams.
    #[arg(long)]
    markdown: bool,

    /// Wrap width for --markdown (defaults to the terminal width).
    #[arg(long, value_name = "COLUMNS")]
    width: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let options = RenderOptions {
        color: args.color,
        markdown: args.markdown,
        width: args.width,
    };
    options.color.apply();

    let stdin = io::stdin();
    match run(stdin.lock(), StdioSink::new(), &options) {
        Ok(_) => Ok(()),
        // Downstream closed early (e.g. `| head`); nothing left to show.
        Err(e) if e.is_broken_pipe() => Ok(()),
        Err(e) => Err(e).context("transcript rendering stopped"),
    }
}
