//! Remote embedding over HTTP.
//!
//! Supports three payload dialects:
//!
//! | kind | request body | response |
//! |------|--------------|----------|
//! | `hf` | `{"inputs": text}` | vector, or per-token vectors (mean-pooled) |
//! | `openai` | `{"input": text, "model": model}` | `{"data": [{"embedding": [...]}]}` |
//! | `custom` | `{"text": text}` | `{"embeddings": [...]}` or a bare vector |
use std::time::Duration;

use ingest::Language;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokenize::truncate_to_tokens;
use tracing::debug;

use crate::error::EmbedError;
use crate::provider::{check_dimension, EmbeddingProvider};
use crate::retry::{execute_with_retry, RetryConfig};
use crate::vector::EmbeddingVector;

/// Remote provider dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiKind {
    #[serde(alias = "huggingface")]
    Hf,
    OpenAi,
    #[default]
    Custom,
}

/// Everything [`ApiProvider`] needs to reach an endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiSettings {
    pub kind: ApiKind,
    pub url: String,
    /// Sent verbatim as the `Authorization` header, e.g. `"Bearer hf_xxx"`.
    pub auth_header: Option<String>,
    /// Model name, required by the `openai` dialect.
    pub model: Option<String>,
    pub timeout: Duration,
    pub retry: RetryConfig,
    pub dimension: usize,
    pub max_input_tokens: usize,
}

/// Blocking HTTP embedding provider.
#[derive(Debug, Clone)]
pub struct ApiProvider {
    settings: ApiSettings,
    client: Client,
    name: String,
}

impl ApiProvider {
    pub fn new(settings: ApiSettings) -> Result<Self, EmbedError> {
        if settings.url.trim().is_empty() {
            return Err(EmbedError::InvalidConfig("api_url is required for api mode".into()));
        }
        if settings.dimension == 0 {
            return Err(EmbedError::InvalidConfig(
                "dimension must be greater than zero".into(),
            ));
        }
        if settings.kind == ApiKind::OpenAi && settings.model.is_none() {
            return Err(EmbedError::InvalidConfig(
                "api_model is required for the openai provider".into(),
            ));
        }
        settings.retry.validate().map_err(EmbedError::InvalidConfig)?;

        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| EmbedError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;
        let name = format!("api:{}", kind_label(settings.kind));

        Ok(Self {
            settings,
            client,
            name,
        })
    }

    fn send(&self, payload: &Value) -> Result<Value, EmbedError> {
        let mut request = self.client.post(&self.settings.url).json(payload);
        if let Some(header) = self.settings.auth_header.as_deref() {
            request = request.header("Authorization", header);
        }

        let response = request.send().map_err(|e| EmbedError::Http {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(EmbedError::Http {
                status: Some(status.as_u16()),
                message: body,
            });
        }

        response
            .json::<Value>()
            .map_err(|e| EmbedError::InvalidResponse(format!("invalid JSON: {e}")))
    }
}

impl EmbeddingProvider for ApiProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn dimension(&self) -> usize {
        self.settings.dimension
    }

    fn embed(&self, text: &str, language: Language) -> Result<EmbeddingVector, EmbedError> {
        let text = truncate_to_tokens(text, self.settings.max_input_tokens);
        let payload = build_payload(self.settings.kind, text, self.settings.model.as_deref());

        let outcome = execute_with_retry(
            &self.settings.retry,
            |attempt| {
                debug!(provider = %self.name, attempt, language = %language, "embedding_request");
                self.send(&payload)
            },
            EmbedError::is_retryable,
        );

        let response = match outcome.result {
            Ok(value) => value,
            Err(err) if err.is_retryable() => {
                return Err(EmbedError::Unavailable {
                    attempts: outcome.attempts,
                    last_error: err.to_string(),
                })
            }
            Err(err) => return Err(err),
        };

        let vector = pool_vectors(parse_embeddings_from_value(response)?)?;
        check_dimension(&vector, self.settings.dimension)?;
        Ok(vector)
    }
}

fn kind_label(kind: ApiKind) -> &'static str {
    match kind {
        ApiKind::Hf => "hf",
        ApiKind::OpenAi => "openai",
        ApiKind::Custom => "custom",
    }
}

fn build_payload(kind: ApiKind, text: &str, model: Option<&str>) -> Value {
    match kind {
        ApiKind::Hf => json!({ "inputs": text }),
        ApiKind::OpenAi => json!({ "input": text, "model": model }),
        ApiKind::Custom => json!({ "text": text }),
    }
}

/// One vector per input. Several vectors (per-token output) are mean-pooled.
fn pool_vectors(mut vectors: Vec<Vec<f32>>) -> Result<EmbeddingVector, EmbedError> {
    match vectors.len() {
        0 => Err(EmbedError::InvalidResponse(
            "response did not contain embeddings".into(),
        )),
        1 => Ok(EmbeddingVector::new(vectors.remove(0))),
        count => {
            let dim = vectors[0].len();
            if vectors.iter().any(|v| v.len() != dim) {
                return Err(EmbedError::InvalidResponse(
                    "per-token vectors have inconsistent lengths".into(),
                ));
            }
            let mut mean = vec![0f32; dim];
            for v in &vectors {
                for (acc, x) in mean.iter_mut().zip(v) {
                    *acc += x;
                }
            }
            for acc in mean.iter_mut() {
                *acc /= count as f32;
            }
            Ok(EmbeddingVector::new(mean))
        }
    }
}

fn parse_embeddings_from_value(value: Value) -> Result<Vec<Vec<f32>>, EmbedError> {
    match value {
        Value::Object(mut map) => {
            if let Some(embeddings) = map.remove("embeddings") {
                return collect_vectors(embeddings);
            }

            if let Some(Value::Array(items)) = map.remove("data") {
                let mut vectors = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::Object(mut obj) => match obj.remove("embedding") {
                            Some(embedding) => vectors.push(parse_embedding_vector(embedding)?),
                            None => {
                                return Err(EmbedError::InvalidResponse(
                                    "missing `embedding` field in data item".into(),
                                ))
                            }
                        },
                        _ => {
                            return Err(EmbedError::InvalidResponse(
                                "unexpected entry inside `data` array".into(),
                            ))
                        }
                    }
                }
                return Ok(vectors);
            }

            Err(EmbedError::InvalidResponse(
                "unsupported response shape".into(),
            ))
        }
        other => collect_vectors(other),
    }
}

/// Flatten nested arrays down to their innermost numeric vectors.
fn collect_vectors(value: Value) -> Result<Vec<Vec<f32>>, EmbedError> {
    match value {
        Value::Array(items) if items.iter().all(|item| item.is_array()) && !items.is_empty() => {
            let mut out = Vec::new();
            for item in items {
                out.extend(collect_vectors(item)?);
            }
            Ok(out)
        }
        other => parse_embedding_vector(other).map(|v| vec![v]),
    }
}

fn parse_embedding_vector(value: Value) -> Result<Vec<f32>, EmbedError> {
    match value {
        Value::Array(values) => values
            .into_iter()
            .map(|entry| match entry {
                Value::Number(num) => num
                    .as_f64()
                    .map(|f| f as f32)
                    .ok_or_else(|| EmbedError::InvalidResponse("non-finite embedding value".into())),
                other => Err(EmbedError::InvalidResponse(format!(
                    "embedding entries must be numbers, got {other}"
                ))),
            })
            .collect(),
        other => Err(EmbedError::InvalidResponse(format!(
            "embedding vector must be an array, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(kind: ApiKind) -> ApiSettings {
        ApiSettings {
            kind,
            url: "http://127.0.0.1:9/embed".into(),
            auth_header: None,
            model: Some("text-embedding-3-small".into()),
            timeout: Duration::from_millis(200),
            retry: RetryConfig::none(),
            dimension: 3,
            max_input_tokens: 512,
        }
    }

    #[test]
    fn payload_shapes_follow_provider_kind() {
        assert_eq!(build_payload(ApiKind::Hf, "x", None), json!({"inputs": "x"}));
        assert_eq!(
            build_payload(ApiKind::OpenAi, "x", Some("m")),
            json!({"input": "x", "model": "m"})
        );
        assert_eq!(build_payload(ApiKind::Custom, "x", None), json!({"text": "x"}));
    }

    #[test]
    fn parses_custom_embeddings_field() {
        let vectors = parse_embeddings_from_value(json!({"embeddings": [[0.1, 0.2]]})).unwrap();
        assert_eq!(vectors, vec![vec![0.1f32, 0.2]]);
    }

    #[test]
    fn parses_openai_data_array() {
        let value = json!({"data": [{"embedding": [1.0, 2.0, 3.0], "index": 0}]});
        assert_eq!(
            parse_embeddings_from_value(value).unwrap(),
            vec![vec![1.0f32, 2.0, 3.0]]
        );
    }

    #[test]
    fn parses_bare_and_nested_vectors() {
        assert_eq!(
            parse_embeddings_from_value(json!([0.5, 0.5])).unwrap(),
            vec![vec![0.5f32, 0.5]]
        );
        let nested = json!([[[1.0, 0.0], [3.0, 2.0]]]);
        assert_eq!(
            parse_embeddings_from_value(nested).unwrap(),
            vec![vec![1.0f32, 0.0], vec![3.0, 2.0]]
        );
    }

    #[test]
    fn rejects_non_numeric_entries() {
        let err = parse_embeddings_from_value(json!({"embeddings": ["a"]})).unwrap_err();
        assert!(matches!(err, EmbedError::InvalidResponse(_)));
    }

    #[test]
    fn per_token_vectors_are_mean_pooled() {
        let pooled = pool_vectors(vec![vec![1.0, 0.0], vec![3.0, 2.0]]).unwrap();
        assert_eq!(pooled.as_slice(), &[2.0, 1.0]);
        assert!(pool_vectors(Vec::new()).is_err());
    }

    #[test]
    fn construction_validates_settings() {
        let mut s = settings(ApiKind::Custom);
        s.url = " ".into();
        assert!(matches!(ApiProvider::new(s), Err(EmbedError::InvalidConfig(_))));

        let mut s = settings(ApiKind::OpenAi);
        s.model = None;
        assert!(matches!(ApiProvider::new(s), Err(EmbedError::InvalidConfig(_))));

        let p = ApiProvider::new(settings(ApiKind::Hf)).unwrap();
        assert_eq!(p.name(), "api:hf");
        assert_eq!(p.dimension(), 3);
    }

    #[test]
    fn unreachable_endpoint_is_unavailable() {
        let p = ApiProvider::new(settings(ApiKind::Custom)).unwrap();
        let err = p.embed("x = 1", Language::Py).unwrap_err();
        assert!(matches!(err, EmbedError::Unavailable { attempts: 1, .. }));
    }
}
