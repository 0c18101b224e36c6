//! Comment syntax per language.
//!
//! The whole language-specific surface of the tokenizer lives in this table.
//! Adding a language means adding a row here and a variant to
//! [`Language`](ingest::Language).

use ingest::Language;

/// How comments and string literals look in one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentSyntax {
    /// Markers that start a comment running to the end of the line.
    pub line: &'static [&'static str],
    /// `(open, close)` delimiters of block comments.
    pub block: &'static [(&'static str, &'static str)],
    /// Characters that open and close a string literal. Comment markers
    /// inside a literal are plain text.
    pub quotes: &'static [char],
    /// Quotes whose literals may span lines. Other literals end at an
    /// unescaped newline.
    pub multiline_quotes: &'static [char],
    /// Python-style `'''` / `"""` strings.
    pub triple_quotes: bool,
}

const PY: CommentSyntax = CommentSyntax {
    line: &["#"],
    block: &[],
    quotes: &['\'', '"'],
    multiline_quotes: &[],
    triple_quotes: true,
};

const C_FAMILY: CommentSyntax = CommentSyntax {
    line: &["//"],
    block: &[("/*", "*/")],
    quotes: &['\'', '"'],
    multiline_quotes: &[],
    triple_quotes: false,
};

const JS: CommentSyntax = CommentSyntax {
    line: &["//"],
    block: &[("/*", "*/")],
    quotes: &['\'', '"', '`'],
    multiline_quotes: &['`'],
    triple_quotes: false,
};

const PHP: CommentSyntax = CommentSyntax {
    line: &["//", "#"],
    block: &[("/*", "*/")],
    quotes: &['\'', '"'],
    multiline_quotes: &[],
    triple_quotes: false,
};

impl CommentSyntax {
    /// Look up the syntax row for `language`.
    pub fn for_language(language: Language) -> &'static CommentSyntax {
        match language {
            Language::Py => &PY,
            Language::C | Language::Cpp | Language::Java => &C_FAMILY,
            Language::Js => &JS,
            Language::Php => &PHP,
        }
    }
}
