//! Supported submission languages.
//!
//! The language tag is the only per-file hint the engine receives about how
//! to read a submission. It selects the comment syntax used by the tokenizer
//! and is passed through to the embedding provider untouched.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IngestError;

/// Language tag attached to every submission.
///
/// Tags are the lowercase file extensions accepted by the intake layer:
/// `py`, `java`, `cpp`, `c`, `js`, `php`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Py,
    Java,
    Cpp,
    C,
    Js,
    Php,
}

impl Language {
    /// Every supported language, in declaration order.
    pub const ALL: [Language; 6] = [
        Language::Py,
        Language::Java,
        Language::Cpp,
        Language::C,
        Language::Js,
        Language::Php,
    ];

    /// Parse a tag such as `"py"` or `".PY"`.
    ///
    /// Matching ignores ASCII case and a single leading dot so that file
    /// extensions can be passed straight through.
    pub fn from_tag(tag: &str) -> Result<Self, IngestError> {
        let trimmed = tag.trim();
        let bare = trimmed.strip_prefix('.').unwrap_or(trimmed);
        match bare.to_ascii_lowercase().as_str() {
            "py" => Ok(Language::Py),
            "java" => Ok(Language::Java),
            "cpp" => Ok(Language::Cpp),
            "c" => Ok(Language::C),
            "js" => Ok(Language::Js),
            "php" => Ok(Language::Php),
            _ => Err(IngestError::UnsupportedLanguage(tag.to_string())),
        }
    }

    /// Canonical tag, which doubles as the file extension.
    pub fn tag(self) -> &'static str {
        match self {
            Language::Py => "py",
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::C => "c",
            Language::Js => "js",
            Language::Php => "php",
        }
    }

    /// Comma separated list of accepted tags, for error messages and help text.
    pub fn supported_tags() -> String {
        Self::ALL
            .iter()
            .map(|lang| lang.tag())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Language {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_tag(s)
    }
}
