//! Content decoding and per-file checks.
use crate::config::IngestConfig;
use crate::error::IngestError;
use crate::language::Language;
use crate::types::{RawSourceFile, SourceContent, SourceFile};

/// Decode submission content to UTF-8.
///
/// Text passes through untouched. Bytes are decoded lossily: every invalid
/// sequence becomes U+FFFD, so decoding never fails.
pub fn decode_content(content: SourceContent) -> String {
    match content {
        SourceContent::Text(text) => text,
        SourceContent::Bytes(bytes) => match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        },
    }
}

/// Validate one submission and turn it into a [`SourceFile`].
///
/// Checks run in a fixed order: filename, language tag, size. The size limit
/// applies to the content as received, before decoding.
pub fn validate_file(
    id: usize,
    raw: RawSourceFile,
    cfg: &IngestConfig,
) -> Result<SourceFile, IngestError> {
    let RawSourceFile {
        filename,
        content,
        language,
    } = raw;

    let filename = filename.trim().to_string();
    if filename.is_empty() {
        return Err(IngestError::MissingFilename { index: id });
    }

    let language = Language::from_tag(&language)?;

    if let Some(limit) = cfg.max_file_bytes {
        let size = content.len();
        if size > limit {
            return Err(IngestError::FileTooLarge {
                filename,
                size,
                limit,
            });
        }
    }

    Ok(SourceFile {
        id,
        filename,
        content: decode_content(content),
        language,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_content_passes_through() {
        let out = decode_content(SourceContent::Text("x = 1\n".into()));
        assert_eq!(out, "x = 1\n");
    }

    #[test]
    fn invalid_bytes_become_replacement_chars() {
        let out = decode_content(SourceContent::Bytes(vec![b'a', 0xff, b'b']));
        assert_eq!(out, "a\u{FFFD}b");
    }

    #[test]
    fn valid_bytes_decode_without_copying_through_lossy_path() {
        let out = decode_content(SourceContent::Bytes("é = 1".as_bytes().to_vec()));
        assert_eq!(out, "é = 1");
    }

    #[test]
    fn blank_filename_is_rejected_with_its_index() {
        let raw = RawSourceFile::text("   ", "x", "py");
        let err = validate_file(3, raw, &IngestConfig::default()).unwrap_err();
        assert_eq!(err, IngestError::MissingFilename { index: 3 });
    }

    #[test]
    fn language_is_checked_before_size() {
        let cfg = IngestConfig {
            max_file_bytes: Some(1),
            ..Default::default()
        };
        let raw = RawSourceFile::text("a.rb", "puts 1", "rb");
        let err = validate_file(0, raw, &cfg).unwrap_err();
        assert_eq!(err, IngestError::UnsupportedLanguage("rb".into()));
    }

    #[test]
    fn oversized_file_is_rejected() {
        let cfg = IngestConfig {
            max_file_bytes: Some(4),
            ..Default::default()
        };
        let raw = RawSourceFile::text("a.py", "print(1)", "py");
        let err = validate_file(0, raw, &cfg).unwrap_err();
        assert_eq!(
            err,
            IngestError::FileTooLarge {
                filename: "a.py".into(),
                size: 8,
                limit: 4,
            }
        );
    }

    #[test]
    fn filename_is_trimmed() {
        let raw = RawSourceFile::text(" a.py ", "x", "PY");
        let file = validate_file(0, raw, &IngestConfig::default()).unwrap();
        assert_eq!(file.filename, "a.py");
        assert_eq!(file.language, Language::Py);
    }
}
