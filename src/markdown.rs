//! Markdown mode: assistant text is held back until a block boundary and
//! rendered through a termimad skin instead of being echoed per delta.

use std::sync::LazyLock;

use termimad::{Alignment, FmtText, MadSkin};

/// Wrap width used when the terminal size is unknown (piped output).
const FALLBACK_WIDTH: usize = 100;

static SKIN: LazyLock<MadSkin> = LazyLock::new(|| {
    let mut skin = MadSkin::default();
    for header in &mut skin.headers {
        header.align = Alignment::Left;
    }
    skin
});

fn terminal_width() -> usize {
    match termimad::terminal_size() {
        (0, _) => FALLBACK_WIDTH,
        (cols, _) => cols as usize,
    }
}

/// Render `text` as terminal markdown wrapped to `width` columns.
pub fn render_markdown(text: &str, width: usize) -> String {
    FmtText::from(&SKIN, text, Some(width)).to_string()
}

/// Pending assistant text for markdown mode.
#[derive(Debug, Default)]
pub struct MarkdownText {
    pending: String,
    width: Option<usize>,
}

impl MarkdownText {
    /// `width` of `None` re-reads the terminal size at every render.
    pub fn new(width: Option<usize>) -> Self {
        Self {
            pending: String::new(),
            width: width.filter(|w| *w > 0),
        }
    }

    pub fn push(&mut self, fragment: &str) {
        self.pending.push_str(fragment);
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Render and clear the pending text.
    ///
    /// Trailing newlines are stripped so the caller controls spacing. Returns
    /// `None` when nothing visible was pending.
    pub fn take_rendered(&mut self) -> Option<String> {
        if self.pending.trim().is_empty() {
            self.pending.clear();
            return None;
        }
        let text = std::mem::take(&mut self.pending);
        let width = self.width.unwrap_or_else(terminal_width);
        let rendered = render_markdown(&text, width);
        Some(rendered.trim_end_matches('\n').to_string())
    }
}
