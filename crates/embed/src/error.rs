use thiserror::Error;

/// Errors surfaced by embedding providers.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum EmbedError {
    /// Provider configuration is inconsistent (e.g. `api` mode without a URL).
    #[error("invalid embedding config: {0}")]
    InvalidConfig(String),

    /// The request could not be sent, or the endpoint answered with a
    /// non-success status. `status` is `None` for transport failures.
    #[error("embedding request failed{}: {message}", status_suffix(.status))]
    Http {
        status: Option<u16>,
        message: String,
    },

    /// The endpoint answered, but not with something that parses as embeddings.
    #[error("invalid embedding response: {0}")]
    InvalidResponse(String),

    /// A vector came back with the wrong number of components.
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The provider gave up after exhausting its retries.
    #[error("embedding provider unavailable after {attempts} attempts: {last_error}")]
    Unavailable { attempts: u32, last_error: String },
}

fn status_suffix(status: &Option<u16>) -> String {
    status
        .map(|code| format!(" with status {code}"))
        .unwrap_or_default()
}

impl EmbedError {
    /// Whether a retry could plausibly succeed: transport failures, 429, and 5xx.
    pub fn is_retryable(&self) -> bool {
        match self {
            EmbedError::Http { status: None, .. } => true,
            EmbedError::Http {
                status: Some(code), ..
            } => *code == 429 || (500..600).contains(code),
            _ => false,
        }
    }
}
