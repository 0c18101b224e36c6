//! Submission types for the ingest stage.
//!
//! Two shapes exist:
//!
//! - [`RawSourceFile`]: what callers hand in. The language is an unchecked
//!   tag and the content may be text or raw bytes.
//! - [`SourceFile`]: what downstream stages see. The language is parsed, the
//!   content is UTF-8, and the file carries its position in the batch.
//!
//! # Examples
//!
//! ```rust
//! use ingest::{RawSourceFile, SourceContent};
//!
//! let raw = RawSourceFile::text("a.py", "print(1)\n", "py");
//! assert_eq!(raw.content.len(), 9);
//!
//! let bytes = RawSourceFile {
//!     filename: "b.c".into(),
//!     content: SourceContent::Bytes(b"int x;".to_vec()),
//!     language: "c".into(),
//! };
//! assert_eq!(bytes.content.len(), 6);
//! ```
use serde::{Deserialize, Serialize};

use crate::language::Language;

/// Submission content as received.
///
/// Deserializes untagged: a JSON string becomes [`Text`](SourceContent::Text)
/// and an array of integers becomes [`Bytes`](SourceContent::Bytes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceContent {
    /// Already-decoded text.
    Text(String),
    /// Raw bytes in an unknown encoding; decoded lossily during ingest.
    Bytes(Vec<u8>),
}

impl SourceContent {
    /// Size in bytes before decoding.
    pub fn len(&self) -> usize {
        match self {
            SourceContent::Text(text) => text.len(),
            SourceContent::Bytes(bytes) => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<String> for SourceContent {
    fn from(value: String) -> Self {
        SourceContent::Text(value)
    }
}

impl From<&str> for SourceContent {
    fn from(value: &str) -> Self {
        SourceContent::Text(value.to_string())
    }
}

impl From<Vec<u8>> for SourceContent {
    fn from(value: Vec<u8>) -> Self {
        SourceContent::Bytes(value)
    }
}

/// One unvalidated submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSourceFile {
    pub filename: String,
    pub content: SourceContent,
    /// Language tag such as `"py"`; parsed by [`Language::from_tag`].
    pub language: String,
}

impl RawSourceFile {
    /// Convenience constructor for text submissions.
    pub fn text(
        filename: impl Into<String>,
        content: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content: SourceContent::Text(content.into()),
            language: language.into(),
        }
    }
}

/// A validated submission, ready for tokenization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Position of the file in the submitted batch. Pairs are reported with
    /// the lower id first.
    pub id: usize,
    pub filename: String,
    /// UTF-8 content; invalid byte sequences have become U+FFFD.
    pub content: String,
    pub language: Language,
}
