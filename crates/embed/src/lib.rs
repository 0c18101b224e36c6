//! codesim embedding providers
//!
//! The engine never looks inside an embedding model. It holds one
//! [`EmbeddingProvider`] for its whole lifetime and asks it for one vector
//! per file. This crate defines that contract and ships the providers the
//! CLI and server can be configured with:
//!
//! - **Stub** ([`StubProvider`]) - deterministic feature hashing of token
//!   unigrams and bigrams. No model files, no network. Good enough to rank
//!   near-copies and what the test suite runs on.
//! - **API** ([`ApiProvider`]) - blocking HTTP client for Hugging Face,
//!   OpenAI-style, or custom endpoints with bounded retry.
//! - **Cache** ([`CachedProvider`]) - wraps either one and memoizes vectors by
//!   content hash, so resubmitted files are not embedded twice.
//!
//! ## Threading notes
//!
//! Providers are `Send + Sync` and called from rayon workers. The API
//! provider blocks the calling thread; async callers should hop onto a
//! blocking pool first.
//!
//! ## Quick example
//!
//! ```
//! use embed::{EmbeddingProvider, StubProvider};
//! use ingest::Language;
//!
//! let provider = StubProvider::new(64, 512).unwrap();
//! let a = provider.embed("def f(): pass", Language::Py).unwrap();
//! let b = provider.embed("def f(): pass", Language::Py).unwrap();
//! assert_eq!(a, b);
//! assert_eq!(a.dimension(), 64);
//! ```

mod api;
mod cache;
mod config;
mod error;
mod provider;
pub mod retry;
mod serde_millis;
mod stub;
mod vector;

pub use crate::api::{ApiKind, ApiProvider, ApiSettings};
pub use crate::cache::{cache_key, CacheStats, CachedProvider};
pub use crate::config::{build_provider, EmbeddingConfig, ProviderKind};
pub use crate::error::EmbedError;
pub use crate::provider::{check_dimension, EmbeddingProvider};
pub use crate::retry::RetryConfig;
pub use crate::stub::StubProvider;
pub use crate::vector::{l2_normalize_in_place, EmbeddingVector};
