use serde::{Deserialize, Serialize};

use crate::alignment::{excerpt, AlignedToken};

/// Default number of lines kept per side in a highlight.
pub const DEFAULT_MAX_LINES: usize = 50;

/// How matched runs are marked up in a rendered excerpt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightStyle {
    pub open_tag: String,
    pub close_tag: String,
    /// Escape `& < > " '` in token text so the excerpt is safe to embed in HTML.
    pub escape_html: bool,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            open_tag: r#"<font color="red">"#.into(),
            close_tag: "</font>".into(),
            escape_html: true,
        }
    }
}

impl HighlightStyle {
    /// Markers without HTML semantics, e.g. for terminal output.
    pub fn plain(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open_tag: open.into(),
            close_tag: close.into(),
            escape_html: false,
        }
    }

    /// Render tokens, wrapping each contiguous matched run in the tags.
    ///
    /// A run is closed before a newline and reopened after it, so every line
    /// of the output is balanced on its own. Newline tokens are never wrapped.
    pub fn render(&self, tokens: &[AlignedToken]) -> String {
        let mut out = String::new();
        let mut open = false;

        for token in tokens {
            let wrap = token.matched && !token.is_newline();
            if wrap && !open {
                out.push_str(&self.open_tag);
                open = true;
            } else if !wrap && open {
                out.push_str(&self.close_tag);
                open = false;
            }
            if self.escape_html {
                escape_html_into(&token.text, &mut out);
            } else {
                out.push_str(&token.text);
            }
        }

        if open {
            out.push_str(&self.close_tag);
        }
        out
    }

    /// [`excerpt`] then [`render`](Self::render).
    pub fn render_excerpt(&self, side: &[AlignedToken], max_lines: usize) -> String {
        self.render(excerpt(side, max_lines))
    }
}

fn escape_html_into(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
}
