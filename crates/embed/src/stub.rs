use fxhash::hash64;
use ingest::Language;
use tokenize::{tokenize, truncate_to_tokens};

use crate::error::EmbedError;
use crate::provider::EmbeddingProvider;
use crate::vector::{l2_normalize_in_place, EmbeddingVector};

const BIGRAM_WEIGHT: f32 = 0.5;

/// Deterministic feature-hashing provider.
///
/// Every non-whitespace token and every adjacent token pair is hashed into
/// one of `dimension` buckets with a hash-derived sign, and the result is
/// L2-normalized. Files sharing many tokens in the same order end up close
/// in cosine terms. No model, no I/O, same vector on every machine.
#[derive(Debug, Clone)]
pub struct StubProvider {
    dimension: usize,
    max_input_tokens: usize,
}

impl StubProvider {
    pub fn new(dimension: usize, max_input_tokens: usize) -> Result<Self, EmbedError> {
        if dimension == 0 {
            return Err(EmbedError::InvalidConfig(
                "stub dimension must be greater than zero".into(),
            ));
        }
        if max_input_tokens == 0 {
            return Err(EmbedError::InvalidConfig(
                "max_input_tokens must be greater than zero".into(),
            ));
        }
        Ok(Self {
            dimension,
            max_input_tokens,
        })
    }

    fn bucket(&self, hash: u64) -> (usize, f32) {
        let index = (hash % self.dimension as u64) as usize;
        let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
        (index, sign)
    }
}

impl EmbeddingProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, text: &str, _language: Language) -> Result<EmbeddingVector, EmbedError> {
        let text = truncate_to_tokens(text, self.max_input_tokens);
        let tokens: Vec<String> = tokenize(text)
            .into_iter()
            .filter(|t| !t.is_whitespace())
            .map(|t| t.text)
            .collect();

        let mut v = vec![0f32; self.dimension];
        for token in &tokens {
            let (idx, sign) = self.bucket(hash64(token.as_str()));
            v[idx] += sign;
        }
        for pair in tokens.windows(2) {
            let (idx, sign) = self.bucket(hash64(&(pair[0].as_str(), pair[1].as_str())));
            v[idx] += sign * BIGRAM_WEIGHT;
        }
        l2_normalize_in_place(&mut v);
        Ok(EmbeddingVector::new(v))
    }
}
