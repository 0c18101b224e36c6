use std::sync::Arc;

use ingest::Language;

use crate::error::EmbedError;
use crate::vector::EmbeddingVector;

/// Anything that can turn source text into a fixed-length vector.
///
/// Implementations must be deterministic for identical `(text, language)`
/// input and must always return vectors of [`dimension`](Self::dimension)
/// components. They are shared across threads behind an `Arc` and called
/// once per file, so any expensive setup belongs in the constructor.
pub trait EmbeddingProvider: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Length of every vector this provider returns.
    fn dimension(&self) -> usize;

    /// Embed one file's comment-free text.
    fn embed(&self, text: &str, language: Language) -> Result<EmbeddingVector, EmbedError>;
}

impl<P: EmbeddingProvider + ?Sized> EmbeddingProvider for Arc<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn embed(&self, text: &str, language: Language) -> Result<EmbeddingVector, EmbedError> {
        (**self).embed(text, language)
    }
}

impl<P: EmbeddingProvider + ?Sized> EmbeddingProvider for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn embed(&self, text: &str, language: Language) -> Result<EmbeddingVector, EmbedError> {
        (**self).embed(text, language)
    }
}

/// Reject vectors whose length differs from `expected`.
pub fn check_dimension(vector: &EmbeddingVector, expected: usize) -> Result<(), EmbedError> {
    if vector.dimension() != expected {
        return Err(EmbedError::DimensionMismatch {
            expected,
            actual: vector.dimension(),
        });
    }
    Ok(())
}
