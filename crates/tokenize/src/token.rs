use serde::{Deserialize, Serialize};

/// A token with its UTF-8 byte offsets in the stripped text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Token {
    /// The token text content.
    pub text: String,
    /// Byte offset (inclusive) in the stripped text.
    pub start: usize,
    /// Byte offset (exclusive) in the stripped text.
    pub end: usize,
}

impl Token {
    /// `true` for a single whitespace character token.
    pub fn is_whitespace(&self) -> bool {
        self.text.chars().all(char::is_whitespace)
    }

    pub fn is_newline(&self) -> bool {
        self.text == "\n"
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        self.text.as_str()
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Split `text` into a lossless token stream.
///
/// A maximal run of alphanumeric or `_` characters is one token. Every other
/// character, whitespace included, is a token of its own. Concatenating the
/// token texts gives back `text` exactly.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word_start: Option<usize> = None;

    for (idx, ch) in text.char_indices() {
        if is_word_char(ch) {
            if word_start.is_none() {
                word_start = Some(idx);
            }
            continue;
        }
        if let Some(start) = word_start.take() {
            tokens.push(Token {
                text: text[start..idx].to_string(),
                start,
                end: idx,
            });
        }
        let end = idx + ch.len_utf8();
        tokens.push(Token {
            text: text[idx..end].to_string(),
            start: idx,
            end,
        });
    }

    if let Some(start) = word_start {
        tokens.push(Token {
            text: text[start..].to_string(),
            start,
            end: text.len(),
        });
    }

    tokens
}

/// Concatenate token texts.
pub fn reconstruct<T: AsRef<str>>(tokens: &[T]) -> String {
    let mut out = String::with_capacity(tokens.iter().map(|t| t.as_ref().len()).sum());
    for token in tokens {
        out.push_str(token.as_ref());
    }
    out
}

/// Prefix of `text` covering its first `max` non-whitespace tokens.
///
/// Used to cap provider input. Returns `text` unchanged when it has `max`
/// or fewer such tokens; returns `""` when `max` is zero.
pub fn truncate_to_tokens(text: &str, max: usize) -> &str {
    if max == 0 {
        return "";
    }
    let mut seen = 0;
    let mut in_word = false;

    for (idx, ch) in text.char_indices() {
        if is_word_char(ch) {
            if !in_word {
                in_word = true;
                seen += 1;
            }
            continue;
        }
        if in_word && seen == max {
            return &text[..idx];
        }
        in_word = false;
        if !ch.is_whitespace() {
            seen += 1;
            if seen == max {
                return &text[..idx + ch.len_utf8()];
            }
        }
    }

    text
}
