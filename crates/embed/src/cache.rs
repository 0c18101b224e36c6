use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use ingest::Language;
use sha2::{Digest, Sha256};

use crate::error::EmbedError;
use crate::provider::EmbeddingProvider;
use crate::vector::EmbeddingVector;

/// Content-hash key for one `(language, text)` input.
///
/// SHA-256 over `language || 0x00 || text`, hex encoded.
pub fn cache_key(text: &str, language: Language) -> String {
    let mut hasher = Sha256::new();
    hasher.update(language.tag().as_bytes());
    hasher.update([0u8]);
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

/// Memoizing wrapper around any provider.
///
/// Each key is written at most once; later writers for the same key get the
/// stored vector back. Failures are not cached.
#[derive(Debug)]
pub struct CachedProvider<P> {
    inner: P,
    name: String,
    entries: DashMap<String, EmbeddingVector>,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Hit/miss counters of a [`CachedProvider`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

impl<P: EmbeddingProvider> CachedProvider<P> {
    pub fn new(inner: P) -> Self {
        let name = format!("cached:{}", inner.name());
        Self {
            inner,
            name,
            entries: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl<P: EmbeddingProvider> EmbeddingProvider for CachedProvider<P> {
    fn name(&self) -> &str {
        &self.name
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn embed(&self, text: &str, language: Language) -> Result<EmbeddingVector, EmbedError> {
        let key = cache_key(text, language);
        if let Some(hit) = self.entries.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(hit.value().clone());
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let vector = self.inner.embed(text, language)?;
        let stored = self.entries.entry(key).or_insert(vector).value().clone();
        Ok(stored)
    }
}
