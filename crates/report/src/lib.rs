//! codesim report model.
//!
//! The report is the only artifact a batch produces: how many files were
//! compared, how many pairs that made, and every pair ranked from most to
//! least similar. Pairs above the highlight threshold carry rendered
//! excerpts of both files. Turning this into PDF or HTML is left to
//! whoever consumes the JSON.
//!
//! ```
//! use report::{ReportBuilder, SimilarityPair};
//!
//! let mut builder = ReportBuilder::new(3);
//! builder.push(SimilarityPair::new((0, 1), "a.py", "b.py", 0.2));
//! builder.push(SimilarityPair::new((0, 2), "a.py", "c.py", 0.9));
//! builder.push(SimilarityPair::new((1, 2), "b.py", "c.py", 0.2));
//! let report = builder.build();
//!
//! assert_eq!(report.comparison_count, 3);
//! assert_eq!(report.pairs[0].file2, "c.py");
//! // Ties keep their submission order.
//! assert_eq!(report.pairs[1].file2, "b.py");
//! ```

use std::cmp::Ordering;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use score::comparison_count;
use thiserror::Error;

/// Errors raised while writing or reading report JSON.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReportError {
    #[error("failed to serialize report: {0}")]
    Serialize(String),
    #[error("failed to write report to `{path}`: {message}")]
    Write { path: String, message: String },
}

/// Rendered excerpts of a suspicious pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    pub file1: String,
    pub file2: String,
    /// Excerpt of `file1` with matched runs marked up.
    pub code1: String,
    /// Excerpt of `file2` with matched runs marked up.
    pub code2: String,
}

/// One unordered pair of files and its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityPair {
    /// Batch indices `(a, b)` with `a < b`. Not serialized.
    #[serde(skip)]
    pub ids: (usize, usize),
    pub file1: String,
    pub file2: String,
    /// Cosine similarity in `[0, 1]`.
    pub score: f32,
    /// Present only when the score exceeds the highlight threshold.
    pub highlight: Option<Highlight>,
}

impl SimilarityPair {
    pub fn new(
        ids: (usize, usize),
        file1: impl Into<String>,
        file2: impl Into<String>,
        score: f32,
    ) -> Self {
        Self {
            ids,
            file1: file1.into(),
            file2: file2.into(),
            score,
            highlight: None,
        }
    }

    pub fn with_highlight(mut self, highlight: Highlight) -> Self {
        self.highlight = Some(highlight);
        self
    }
}

/// Final result of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub file_count: usize,
    pub comparison_count: usize,
    /// Sorted by descending score; equal scores keep canonical pair order.
    pub pairs: Vec<SimilarityPair>,
}

impl Report {
    pub fn to_json_pretty(&self) -> Result<String, ReportError> {
        serde_json::to_string_pretty(self).map_err(|e| ReportError::Serialize(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, ReportError> {
        serde_json::from_str(json).map_err(|e| ReportError::Serialize(e.to_string()))
    }

    /// Write pretty JSON to `path`, replacing any existing file.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ReportError> {
        let path = path.as_ref();
        let json = self.to_json_pretty()?;
        fs::write(path, json).map_err(|e| ReportError::Write {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Pairs that carry a highlight, highest score first.
    pub fn highlighted(&self) -> impl Iterator<Item = &SimilarityPair> + '_ {
        self.pairs.iter().filter(|p| p.highlight.is_some())
    }
}

/// Collects scored pairs and produces a ranked [`Report`].
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    file_count: usize,
    pairs: Vec<SimilarityPair>,
}

impl ReportBuilder {
    pub fn new(file_count: usize) -> Self {
        Self {
            file_count,
            pairs: Vec::with_capacity(comparison_count(file_count)),
        }
    }

    /// Add a pair. Push in canonical order so ties rank deterministically.
    pub fn push(&mut self, pair: SimilarityPair) -> &mut Self {
        self.pairs.push(pair);
        self
    }

    pub fn build(self) -> Report {
        let mut pairs = self.pairs;
        // Stable: equal scores stay in push order.
        pairs.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        Report {
            file_count: self.file_count,
            comparison_count: comparison_count(self.file_count),
            pairs,
        }
    }
}
