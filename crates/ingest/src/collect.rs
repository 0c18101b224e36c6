//! Directory intake: gather every `*.<lang>` file from one folder.
use std::path::Path;

use walkdir::WalkDir;

use crate::error::IngestError;
use crate::language::Language;
use crate::types::{RawSourceFile, SourceContent};

/// Collect the submissions for `language` directly inside `dir`.
///
/// Only regular files whose extension equals the language tag are picked up;
/// subdirectories are not descended into. Contents are read as raw bytes and
/// decoded later, so files in odd encodings still make it into the batch.
/// The result is sorted by filename so batch ids are stable across runs.
pub fn collect_directory(
    dir: impl AsRef<Path>,
    language: Language,
) -> Result<Vec<RawSourceFile>, IngestError> {
    let dir = dir.as_ref();
    let read_error = |path: &Path, message: String| IngestError::DirectoryRead {
        path: path.display().to_string(),
        message,
    };

    if !dir.is_dir() {
        return Err(read_error(dir, "not a directory".into()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|err| read_error(dir, err.to_string()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !path.extension().is_some_and(|ext| ext == language.tag()) {
            continue;
        }
        let bytes = std::fs::read(path).map_err(|err| read_error(path, err.to_string()))?;
        files.push(RawSourceFile {
            filename: entry.file_name().to_string_lossy().into_owned(),
            content: SourceContent::Bytes(bytes),
            language: language.tag().to_string(),
        });
    }

    files.sort_by(|a, b| a.filename.cmp(&b.filename));
    Ok(files)
}
