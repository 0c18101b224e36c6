//! codesim ingest layer
//!
//! Submissions enter the pipeline here. A batch of raw files (filename,
//! content, language tag) is checked and turned into [`SourceFile`]s that the
//! tokenizer and embedding stages can rely on.
//!
//! ## What we do here
//!
//! - **Check batch size** - a comparison needs at least two files; very large
//!   batches are allowed but logged, because pair count grows quadratically.
//! - **Parse language tags** - unsupported tags are rejected before any file
//!   is tokenized.
//! - **Decode content** - raw bytes are decoded lossily, so bad encodings never
//!   fail a batch.
//! - **Enforce limits** - empty filenames and oversized files are rejected.
//! - **Read directories** - [`collect_directory`] gathers `*.<lang>` files for
//!   the CLI.
//!
//! ## Main entry point
//!
//! Call [`ingest_batch`] with the raw files and an [`IngestConfig`]. Any
//! failure rejects the whole batch.
//!
//! ## Example
//!
//! ```
//! use ingest::{ingest_batch, IngestConfig, Language, RawSourceFile};
//!
//! let batch = vec![
//!     RawSourceFile::text("a.py", "def f(): pass", "py"),
//!     RawSourceFile::text("b.py", "def g(): pass", "py"),
//! ];
//!
//! let files = ingest_batch(batch, &IngestConfig::default()).unwrap();
//! assert_eq!(files.len(), 2);
//! assert_eq!(files[1].id, 1);
//! assert_eq!(files[0].language, Language::Py);
//! ```
use std::time::Instant;

use tracing::{debug, info, warn, Level};

mod collect;
mod config;
mod error;
mod language;
mod payload;
mod types;

pub use crate::collect::collect_directory;
pub use crate::config::{
    ConfigError, IngestConfig, DEFAULT_MAX_FILES_WARNING, DEFAULT_MAX_FILE_BYTES, MIN_FILES,
};
pub use crate::error::IngestError;
pub use crate::language::Language;
pub use crate::payload::{decode_content, validate_file};
pub use crate::types::{RawSourceFile, SourceContent, SourceFile};

/// Validate a batch of raw submissions.
///
/// The batch size is checked first, then every file in order. Files keep
/// their submission order and receive their index as `id`.
pub fn ingest_batch(
    raw: Vec<RawSourceFile>,
    cfg: &IngestConfig,
) -> Result<Vec<SourceFile>, IngestError> {
    let start = Instant::now();
    let file_count = raw.len();

    let span = tracing::span!(Level::INFO, "ingest.batch", file_count);
    let _guard = span.enter();

    match ingest_inner(raw, cfg) {
        Ok(files) => {
            let elapsed_micros = start.elapsed().as_micros();
            info!(
                file_count,
                total_bytes = files.iter().map(|f| f.content.len()).sum::<usize>(),
                elapsed_micros,
                "ingest_success"
            );
            Ok(files)
        }
        Err(err) => {
            let elapsed_micros = start.elapsed().as_micros();
            warn!(error = %err, file_count, elapsed_micros, "ingest_failure");
            Err(err)
        }
    }
}

fn ingest_inner(
    raw: Vec<RawSourceFile>,
    cfg: &IngestConfig,
) -> Result<Vec<SourceFile>, IngestError> {
    if raw.len() < MIN_FILES {
        return Err(IngestError::InsufficientInput {
            found: raw.len(),
            required: MIN_FILES,
        });
    }

    if raw.len() > cfg.max_files_warning {
        warn!(
            file_count = raw.len(),
            max_files_warning = cfg.max_files_warning,
            "large batch; pairwise comparison may take a while"
        );
    }

    raw.into_iter()
        .enumerate()
        .map(|(id, file)| {
            let file = validate_file(id, file, cfg)?;
            debug!(id, filename = %file.filename, language = %file.language, bytes = file.content.len(), "file_accepted");
            Ok(file)
        })
        .collect()
}
