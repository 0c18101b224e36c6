use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::api::{ApiKind, ApiProvider, ApiSettings};
use crate::cache::CachedProvider;
use crate::error::EmbedError;
use crate::provider::EmbeddingProvider;
use crate::retry::RetryConfig;
use crate::stub::StubProvider;

/// Which provider implementation to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Deterministic feature hashing, no network.
    #[default]
    Stub,
    /// Remote HTTP endpoint.
    Api,
}

/// Runtime configuration for embedding generation.
///
/// # Example
/// ```
/// use embed::{build_provider, EmbeddingConfig, EmbeddingProvider};
///
/// let cfg = EmbeddingConfig { dimension: 128, ..Default::default() };
/// let provider = build_provider(&cfg).unwrap();
/// assert_eq!(provider.dimension(), 128);
/// assert_eq!(provider.name(), "cached:stub");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: ProviderKind,
    /// Length of every vector.
    pub dimension: usize,
    /// Inputs are cut to this many non-whitespace tokens before embedding.
    pub max_input_tokens: usize,
    /// Wrap the provider in a content-hash cache.
    pub cache: bool,
    /// Remote dialect when `provider` is `api`: `hf`, `openai`, or `custom`.
    pub api_kind: ApiKind,
    pub api_url: Option<String>,
    /// Authorization header (e.g., `"Bearer hf_xxx"`).
    pub api_auth_header: Option<String>,
    pub api_model: Option<String>,
    #[serde(with = "crate::serde_millis")]
    pub api_timeout: Duration,
    pub retry: RetryConfig,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Stub,
            dimension: 768,
            max_input_tokens: 512,
            cache: true,
            api_kind: ApiKind::Custom,
            api_url: None,
            api_auth_header: None,
            api_model: None,
            api_timeout: Duration::from_secs(30),
            retry: RetryConfig::default(),
        }
    }
}

impl EmbeddingConfig {
    pub fn validate(&self) -> Result<(), EmbedError> {
        if self.dimension == 0 {
            return Err(EmbedError::InvalidConfig(
                "dimension must be greater than zero".into(),
            ));
        }
        if self.max_input_tokens == 0 {
            return Err(EmbedError::InvalidConfig(
                "max_input_tokens must be greater than zero".into(),
            ));
        }
        if self.provider == ProviderKind::Api && self.api_url.is_none() {
            return Err(EmbedError::InvalidConfig(
                "api_url is required when provider is api".into(),
            ));
        }
        self.retry.validate().map_err(EmbedError::InvalidConfig)
    }

    fn api_settings(&self) -> Result<ApiSettings, EmbedError> {
        let url = self
            .api_url
            .clone()
            .ok_or_else(|| EmbedError::InvalidConfig("api_url is required when provider is api".into()))?;
        Ok(ApiSettings {
            kind: self.api_kind,
            url,
            auth_header: self.api_auth_header.clone(),
            model: self.api_model.clone(),
            timeout: self.api_timeout,
            retry: self.retry,
            dimension: self.dimension,
            max_input_tokens: self.max_input_tokens,
        })
    }
}

/// Build the configured provider, wrapped in a cache when requested.
///
/// Call once at startup and share the returned `Arc`.
pub fn build_provider(cfg: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingProvider>, EmbedError> {
    cfg.validate()?;
    let provider: Arc<dyn EmbeddingProvider> = match (cfg.provider, cfg.cache) {
        (ProviderKind::Stub, false) => Arc::new(StubProvider::new(cfg.dimension, cfg.max_input_tokens)?),
        (ProviderKind::Stub, true) => Arc::new(CachedProvider::new(StubProvider::new(
            cfg.dimension,
            cfg.max_input_tokens,
        )?)),
        (ProviderKind::Api, false) => Arc::new(ApiProvider::new(cfg.api_settings()?)?),
        (ProviderKind::Api, true) => {
            Arc::new(CachedProvider::new(ApiProvider::new(cfg.api_settings()?)?))
        }
    };
    tracing::info!(
        provider = provider.name(),
        dimension = provider.dimension(),
        "embedding_provider_ready"
    );
    Ok(provider)
}
