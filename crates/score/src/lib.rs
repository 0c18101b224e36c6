//! codesim similarity scorer.
//!
//! Scores every unordered pair of files in a batch by the cosine of their
//! embeddings. Pairs are visited in canonical order, `(i, j)` with `i < j`,
//! ascending `i` then `j`, and the output keeps that order no matter how rayon
//! schedules the work.
//!
//! ```
//! use score::{comparison_count, score_pairs};
//!
//! let vectors = vec![vec![1.0f32, 0.0], vec![1.0, 0.0], vec![0.0, 1.0]];
//! let scores = score_pairs(&vectors).unwrap();
//! assert_eq!(scores.len(), comparison_count(3));
//! assert_eq!((scores[0].a, scores[0].b), (0, 1));
//! assert!((scores[0].score - 1.0).abs() < 1e-6);
//! assert_eq!(scores[1].score, 0.0);
//! ```

use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors raised while scoring a batch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScoreError {
    /// Vector `index` has a different length from vector 0.
    #[error("vector {index} has dimension {actual}, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },
}

/// Score of one canonical pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairScore {
    /// Index of the first file; always less than `b`.
    pub a: usize,
    pub b: usize,
    /// Cosine similarity clamped to `[0, 1]`.
    pub score: f32,
}

/// Cosine similarity clamped to `[0, 1]`.
///
/// Returns 0 when either vector has zero (or non-finite) magnitude, and
/// compares only the common prefix when lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    let denom = norm_a * norm_b;
    if denom == 0.0 || !denom.is_finite() {
        return 0.0;
    }
    let similarity = dot / denom;
    if similarity.is_nan() {
        return 0.0;
    }
    similarity.clamp(0.0, 1.0)
}

/// Canonical pairs for a batch of `n` files: `(i, j)` with `i < j`.
pub fn enumerate_pairs(n: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..n).flat_map(move |i| (i + 1..n).map(move |j| (i, j)))
}

/// Number of unordered pairs among `n` files.
pub fn comparison_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Score every canonical pair in parallel.
pub fn score_pairs<V>(vectors: &[V]) -> Result<Vec<PairScore>, ScoreError>
where
    V: AsRef<[f32]> + Sync,
{
    if let Some(first) = vectors.first() {
        let expected = first.as_ref().len();
        if let Some((index, v)) = vectors
            .iter()
            .enumerate()
            .find(|(_, v)| v.as_ref().len() != expected)
        {
            return Err(ScoreError::DimensionMismatch {
                index,
                expected,
                actual: v.as_ref().len(),
            });
        }
    }

    let start = Instant::now();
    let pairs: Vec<(usize, usize)> = enumerate_pairs(vectors.len()).collect();
    let scores: Vec<PairScore> = pairs
        .par_iter()
        .map(|&(a, b)| PairScore {
            a,
            b,
            score: cosine_similarity(vectors[a].as_ref(), vectors[b].as_ref()),
        })
        .collect();

    debug!(
        pair_count = scores.len(),
        elapsed_micros = start.elapsed().as_micros(),
        "score_pairs"
    );
    Ok(scores)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors_score_one() {
        let v = [0.3f32, -0.2, 0.9];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn orthogonal_vectors_score_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn negative_cosine_is_clamped_to_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]), 0.0);
    }

    #[test]
    fn zero_vector_scores_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn non_finite_input_scores_zero() {
        assert_eq!(cosine_similarity(&[f32::INFINITY, 1.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[f32::NAN, 1.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn scale_does_not_matter() {
        let a = [1.0f32, 2.0, 3.0];
        let b = [10.0f32, 20.0, 30.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn pairs_are_canonical_and_complete() {
        let pairs: Vec<_> = enumerate_pairs(4).collect();
        assert_eq!(
            pairs,
            vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]
        );
        for n in 0..12 {
            let pairs: Vec<_> = enumerate_pairs(n).collect();
            assert_eq!(pairs.len(), comparison_count(n));
            assert!(pairs.iter().all(|(i, j)| i < j));
        }
    }

    #[test]
    fn degenerate_batches_have_no_pairs() {
        assert_eq!(comparison_count(0), 0);
        assert_eq!(comparison_count(1), 0);
        assert_eq!(enumerate_pairs(1).count(), 0);
    }

    #[test]
    fn output_order_is_canonical() {
        let vectors: Vec<Vec<f32>> = (0..30).map(|i| vec![1.0, i as f32]).collect();
        let scores = score_pairs(&vectors).unwrap();
        let order: Vec<_> = scores.iter().map(|s| (s.a, s.b)).collect();
        let expected: Vec<_> = enumerate_pairs(30).collect();
        assert_eq!(order, expected);
    }

    #[test]
    fn mismatched_dimensions_are_reported() {
        let vectors = vec![vec![1.0f32, 0.0], vec![1.0, 0.0], vec![1.0]];
        assert_eq!(
            score_pairs(&vectors).unwrap_err(),
            ScoreError::DimensionMismatch {
                index: 2,
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn empty_input_scores_nothing() {
        let vectors: Vec<Vec<f32>> = Vec::new();
        assert!(score_pairs(&vectors).unwrap().is_empty());
    }

    #[test]
    fn pair_score_serializes() {
        let json = serde_json::to_value(PairScore {
            a: 0,
            b: 1,
            score: 0.5,
        })
        .unwrap();
        assert_eq!(json["score"], 0.5);
    }
}
