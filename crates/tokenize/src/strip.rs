//! Comment removal driven by [`CommentSyntax`].
use crate::syntax::CommentSyntax;

const TRIPLE_QUOTES: [&str; 2] = ["\"\"\"", "'''"];

/// Remove comments from `text` according to `syntax`.
///
/// - A line comment is dropped up to, but not including, its newline. A line
///   comment on the last line runs to the end of the text.
/// - A terminated block comment is replaced by a single `\n`.
/// - An unterminated block opener is kept as plain text and scanning resumes
///   after it.
/// - Markers inside string literals are not comments.
///
/// The output is not trimmed; see [`tokenize_source`](crate::tokenize_source).
pub fn strip_comments(text: &str, syntax: &CommentSyntax) -> String {
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < text.len() {
        let rest = &text[i..];

        if syntax.triple_quotes {
            if let Some(delim) = TRIPLE_QUOTES.iter().find(|d| rest.starts_with(**d)) {
                let end = rest[3..].find(delim).map_or(rest.len(), |pos| pos + 6);
                out.push_str(&rest[..end]);
                i += end;
                continue;
            }
        }

        if let Some(&(open, close)) = syntax.block.iter().find(|(open, _)| rest.starts_with(open)) {
            match rest[open.len()..].find(close) {
                Some(pos) => {
                    out.push('\n');
                    i += open.len() + pos + close.len();
                }
                None => {
                    out.push_str(open);
                    i += open.len();
                }
            }
            continue;
        }

        if syntax.line.iter().any(|marker| rest.starts_with(marker)) {
            i += rest.find('\n').unwrap_or(rest.len());
            continue;
        }

        let Some(ch) = rest.chars().next() else {
            break;
        };
        if syntax.quotes.contains(&ch) {
            let len = string_literal_len(rest, ch, syntax.multiline_quotes.contains(&ch));
            out.push_str(&rest[..len]);
            i += len;
            continue;
        }

        out.push(ch);
        i += ch.len_utf8();
    }

    out
}

/// Byte length of the string literal at the start of `rest`, opening quote
/// included. Unterminated literals end at the newline (or at the end of the
/// text for multi-line quotes).
fn string_literal_len(rest: &str, quote: char, multiline: bool) -> usize {
    let mut chars = rest.char_indices().skip(1);
    while let Some((idx, ch)) = chars.next() {
        if ch == '\\' {
            chars.next();
            continue;
        }
        if ch == quote {
            return idx + ch.len_utf8();
        }
        if ch == '\n' && !multiline {
            return idx;
        }
    }
    rest.len()
}
