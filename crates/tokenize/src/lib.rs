//! codesim tokenizer.
//!
//! Turns a source file into the token stream the alignment engine compares.
//!
//! ## What we do
//!
//! - Strip comments using a per-language [`CommentSyntax`] table, leaving
//!   string literals alone
//! - Trim leading and trailing whitespace
//! - Split into tokens: identifier/number runs, and every other character on
//!   its own (whitespace included)
//!
//! ## Invariants worth knowing
//!
//! - Lossless: concatenating [`TokenizedSource::tokens`] gives
//!   [`TokenizedSource::stripped`] byte for byte
//! - Idempotent: tokenizing `stripped` again yields the same tokens
//! - Pure: no I/O, no locale dependence, never fails
//!
//! ```
//! use ingest::Language;
//! use tokenize::tokenize_source;
//!
//! let out = tokenize_source("def f(): pass  # stub\n", Language::Py);
//! assert_eq!(out.stripped, "def f(): pass");
//! assert_eq!(out.tokens.len(), 8);
//! ```

mod strip;
mod syntax;
mod token;

use ingest::Language;
use serde::{Deserialize, Serialize};

pub use crate::strip::strip_comments;
pub use crate::syntax::CommentSyntax;
pub use crate::token::{reconstruct, tokenize, truncate_to_tokens, Token};

/// Comment-free text of one file and its token stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizedSource {
    /// Source with comments removed and outer whitespace trimmed.
    pub stripped: String,
    /// Tokens of `stripped`, offsets relative to it.
    pub tokens: Vec<Token>,
}

impl TokenizedSource {
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token texts in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.tokens.iter().map(|t| t.text.as_str())
    }
}

/// Strip comments for `language`, trim, and tokenize.
pub fn tokenize_source(text: &str, language: Language) -> TokenizedSource {
    let stripped = strip_comments(text, CommentSyntax::for_language(language))
        .trim()
        .to_string();
    let tokens = tokenize(&stripped);
    TokenizedSource { stripped, tokens }
}
