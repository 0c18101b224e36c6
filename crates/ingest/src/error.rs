//! Error types produced by the ingest crate.
//!
//! Every way a batch can be rejected before tokenization is a variant of
//! [`IngestError`]. Errors are typed, cloneable, and comparable so callers can
//! map them to exit codes or HTTP statuses and tests can assert on them
//! directly.
//!
//! # Error Categories
//!
//! | Error | Category | Description |
//! |-------|----------|-------------|
//! | [`UnsupportedLanguage`](IngestError::UnsupportedLanguage) | Validation | Language tag outside the supported set |
//! | [`InsufficientInput`](IngestError::InsufficientInput) | Validation | Fewer files than a comparison needs |
//! | [`MissingFilename`](IngestError::MissingFilename) | Validation | Submission has an empty filename |
//! | [`FileTooLarge`](IngestError::FileTooLarge) | Validation | Submission exceeds the byte limit |
//! | [`DirectoryRead`](IngestError::DirectoryRead) | I/O | Directory or file could not be read |
//!
//! # HTTP Status Code Mapping
//!
//! ```rust
//! use ingest::IngestError;
//!
//! fn to_http_status(error: &IngestError) -> u16 {
//!     match error {
//!         IngestError::FileTooLarge { .. } => 413,
//!         IngestError::DirectoryRead { .. } => 500,
//!         _ => 400,
//!     }
//! }
//! ```
use thiserror::Error;

use crate::language::Language;

/// Errors that can occur while turning raw submissions into a validated batch.
///
/// The enum is `#[non_exhaustive]`; match with a catch-all arm.
///
/// # Examples
///
/// ```rust
/// use ingest::IngestError;
///
/// let err = IngestError::InsufficientInput { found: 1, required: 2 };
/// assert_eq!(
///     err.to_string(),
///     "at least 2 files are required for comparison, got 1"
/// );
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IngestError {
    /// The language tag is not one of the supported tags.
    ///
    /// Raised before any tokenization happens, so an unsupported tag never
    /// reaches the comment-syntax table.
    #[error("unsupported language `{0}` (expected one of: {supported})", supported = Language::supported_tags())]
    UnsupportedLanguage(String),

    /// The batch holds fewer files than a pairwise comparison needs.
    #[error("at least {required} files are required for comparison, got {found}")]
    InsufficientInput { found: usize, required: usize },

    /// A submission arrived without a usable filename.
    ///
    /// `index` is the position of the offending submission in the batch.
    #[error("submission #{index} has an empty filename")]
    MissingFilename { index: usize },

    /// A submission exceeds [`IngestConfig::max_file_bytes`](crate::IngestConfig::max_file_bytes).
    #[error("file `{filename}` is {size} bytes, limit is {limit}")]
    FileTooLarge {
        filename: String,
        size: usize,
        limit: usize,
    },

    /// Reading a directory of submissions failed.
    ///
    /// Carries the path and the rendered I/O error so the enum stays `Clone`.
    #[error("failed to read `{path}`: {message}")]
    DirectoryRead { path: String, message: String },
}

impl IngestError {
    /// Whether the error is the caller's fault (bad input) rather than an
    /// environment failure.
    pub fn is_validation(&self) -> bool {
        !matches!(self, IngestError::DirectoryRead { .. })
    }
}
