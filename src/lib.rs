//! Workspace umbrella crate for codesim, a source-code similarity checker.
//!
//! This crate stitches together ingest validation, tokenization, embedding,
//! pairwise scoring and alignment so callers can turn a batch of submissions
//! into a ranked [`Report`] with a single call.
//!
//! ```
//! use std::sync::Arc;
//! use codesim::{EngineConfig, RawSourceFile, SimilarityEngine, StubProvider};
//!
//! let provider = Arc::new(StubProvider::new(64, 512).unwrap());
//! let engine = SimilarityEngine::new(provider, EngineConfig::default());
//!
//! let report = engine
//!     .run(vec![
//!         RawSourceFile::text("a.py", "def f(x):\n    return x + 1\n", "py"),
//!         RawSourceFile::text("b.py", "def f(x):\n    return x + 1\n", "py"),
//!     ])
//!     .unwrap();
//!
//! assert_eq!(report.comparison_count, 1);
//! assert!(report.pairs[0].highlight.is_some());
//! ```

pub mod config;

pub use align::{align_tokens, AlignedToken, Alignment, HighlightStyle, DEFAULT_MAX_LINES};
pub use embed::{
    build_provider, ApiKind, ApiProvider, CachedProvider, EmbedError, EmbeddingConfig,
    EmbeddingProvider, EmbeddingVector, ProviderKind, StubProvider,
};
pub use ingest::{
    collect_directory, ingest_batch, IngestConfig, IngestError, Language, RawSourceFile,
    SourceContent, SourceFile,
};
pub use report::{Highlight, Report, ReportBuilder, ReportError, SimilarityPair};
pub use score::{comparison_count, cosine_similarity, PairScore, ScoreError};
pub use tokenize::{tokenize_source, Token, TokenizedSource};

pub use crate::config::{CodesimConfig, ConfigLoadError};

use std::path::Path;
use std::sync::{Arc, OnceLock, RwLock};
use std::time::{Duration, Instant};

use embed::check_dimension;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn, Level};

/// Pairs must score strictly above this to get a highlight.
pub const DEFAULT_THRESHOLD: f32 = 0.30;

/// Errors that can occur while processing a batch through the pipeline.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum PipelineError {
    #[error("ingest failure: {0}")]
    Ingest(#[from] IngestError),

    /// Embedding one file failed; the whole batch is abandoned.
    #[error("embedding failed for `{filename}`: {source}")]
    BatchFailure {
        filename: String,
        #[source]
        source: EmbedError,
    },

    #[error("scoring failure: {0}")]
    Score(#[from] ScoreError),
}

impl PipelineError {
    /// True when the caller sent something unusable, as opposed to a
    /// provider or internal failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, PipelineError::Ingest(err) if err.is_validation())
    }
}

/// Metrics observer for pipeline stages.
pub trait PipelineMetrics: Send + Sync {
    fn record_ingest(&self, latency: Duration, result: Result<(), IngestError>);
    fn record_embed(&self, latency: Duration, result: Result<(), PipelineError>);
    fn record_score(&self, latency: Duration, result: Result<(), ScoreError>);
    /// `highlighted` is the number of pairs that got an alignment.
    fn record_align(&self, latency: Duration, highlighted: usize);
}

/// Install or clear the global pipeline metrics recorder.
pub fn set_pipeline_metrics(recorder: Option<Arc<dyn PipelineMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn PipelineMetrics>>> {
    static METRICS: OnceLock<RwLock<Option<Arc<dyn PipelineMetrics>>>> = OnceLock::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

fn metrics_recorder() -> Option<Arc<dyn PipelineMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

struct MetricsSpan {
    recorder: Arc<dyn PipelineMetrics>,
    start: Instant,
}

impl MetricsSpan {
    fn start() -> Option<Self> {
        metrics_recorder().map(|recorder| Self {
            recorder,
            start: Instant::now(),
        })
    }

    fn record_ingest(self, result: Result<(), IngestError>) {
        self.recorder.record_ingest(self.start.elapsed(), result);
    }

    fn record_embed(self, result: Result<(), PipelineError>) {
        self.recorder.record_embed(self.start.elapsed(), result);
    }

    fn record_score(self, result: Result<(), ScoreError>) {
        self.recorder.record_score(self.start.elapsed(), result);
    }

    fn record_align(self, highlighted: usize) {
        self.recorder.record_align(self.start.elapsed(), highlighted);
    }
}

/// Runtime settings of a [`SimilarityEngine`].
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub ingest: IngestConfig,
    /// Highlight pairs whose score is strictly greater than this.
    pub threshold: f32,
    /// Lines kept per side in a highlight excerpt.
    pub max_lines: usize,
    pub style: HighlightStyle,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ingest: IngestConfig::default(),
            threshold: DEFAULT_THRESHOLD,
            max_lines: DEFAULT_MAX_LINES,
            style: HighlightStyle::default(),
        }
    }
}

/// One file after tokenization and embedding.
struct Prepared {
    tokenized: TokenizedSource,
    vector: EmbeddingVector,
}

/// Batch comparison engine.
///
/// Holds the embedding provider for its whole lifetime; build it once and
/// share it (it is `Send + Sync`) rather than per request.
pub struct SimilarityEngine {
    provider: Arc<dyn EmbeddingProvider>,
    config: EngineConfig,
}

impl std::fmt::Debug for SimilarityEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimilarityEngine")
            .field("provider", &self.provider.name())
            .field("config", &self.config)
            .finish()
    }
}

impl SimilarityEngine {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, config: EngineConfig) -> Self {
        Self { provider, config }
    }

    pub fn provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.provider
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compare every pair of files in the batch.
    ///
    /// All-or-nothing: any invalid file or provider failure aborts the batch
    /// and no partial report is produced. When several files fail, the one
    /// submitted first is reported.
    pub fn run(&self, raw: Vec<RawSourceFile>) -> Result<Report, PipelineError> {
        let start = Instant::now();
        let file_count = raw.len();
        let span = tracing::span!(
            Level::INFO,
            "codesim.run",
            file_count,
            provider = self.provider.name()
        );
        let _guard = span.enter();

        match self.run_inner(raw) {
            Ok(report) => {
                info!(
                    file_count,
                    comparison_count = report.comparison_count,
                    highlighted = report.highlighted().count(),
                    elapsed_micros = start.elapsed().as_micros(),
                    "run_success"
                );
                Ok(report)
            }
            Err(err) => {
                warn!(
                    error = %err,
                    file_count,
                    elapsed_micros = start.elapsed().as_micros(),
                    "run_failure"
                );
                Err(err)
            }
        }
    }

    /// Collect `*.<language>` files from `dir` and run them as one batch.
    pub fn compare_directory(
        &self,
        dir: impl AsRef<Path>,
        language: Language,
    ) -> Result<Report, PipelineError> {
        let raw = collect_directory(dir, language)?;
        self.run(raw)
    }

    fn run_inner(&self, raw: Vec<RawSourceFile>) -> Result<Report, PipelineError> {
        let ingest_metrics = MetricsSpan::start();
        let files = ingest_batch(raw, &self.config.ingest);
        if let Some(span) = ingest_metrics {
            span.record_ingest(files.as_ref().map(|_| ()).map_err(Clone::clone));
        }
        let files = files?;

        let embed_metrics = MetricsSpan::start();
        let prepared = self.prepare(&files);
        if let Some(span) = embed_metrics {
            span.record_embed(prepared.as_ref().map(|_| ()).map_err(Clone::clone));
        }
        let prepared = prepared?;

        let score_metrics = MetricsSpan::start();
        let vectors: Vec<&[f32]> = prepared.iter().map(|p| p.vector.as_slice()).collect();
        let scores = score::score_pairs(&vectors);
        if let Some(span) = score_metrics {
            span.record_score(scores.as_ref().map(|_| ()).map_err(Clone::clone));
        }
        let scores = scores?;

        let align_metrics = MetricsSpan::start();
        let pairs = self.build_pairs(&files, &prepared, &scores);
        let highlighted = pairs.iter().filter(|p| p.highlight.is_some()).count();
        if let Some(span) = align_metrics {
            span.record_align(highlighted);
        }

        let mut builder = ReportBuilder::new(files.len());
        for pair in pairs {
            builder.push(pair);
        }
        Ok(builder.build())
    }

    /// Tokenize and embed every file in parallel.
    fn prepare(&self, files: &[SourceFile]) -> Result<Vec<Prepared>, PipelineError> {
        let start = Instant::now();
        let expected = self.provider.dimension();

        let results: Vec<Result<Prepared, PipelineError>> = files
            .par_iter()
            .map(|file| {
                let tokenized = tokenize_source(&file.content, file.language);
                let vector = self
                    .provider
                    .embed(&tokenized.stripped, file.language)
                    .and_then(|vector| {
                        check_dimension(&vector, expected)?;
                        Ok(vector)
                    })
                    .map_err(|source| PipelineError::BatchFailure {
                        filename: file.filename.clone(),
                        source,
                    })?;
                debug!(
                    id = file.id,
                    filename = %file.filename,
                    tokens = tokenized.tokens.len(),
                    "file_embedded"
                );
                Ok(Prepared { tokenized, vector })
            })
            .collect();

        // Sequential pass keeps the reported failure independent of thread timing.
        let prepared = results.into_iter().collect::<Result<Vec<_>, _>>()?;
        info!(
            file_count = prepared.len(),
            dimension = expected,
            elapsed_micros = start.elapsed().as_micros(),
            "embed_success"
        );
        Ok(prepared)
    }

    /// Turn scores into report pairs, aligning those above the threshold.
    fn build_pairs(
        &self,
        files: &[SourceFile],
        prepared: &[Prepared],
        scores: &[PairScore],
    ) -> Vec<SimilarityPair> {
        let start = Instant::now();
        let pairs: Vec<SimilarityPair> = scores
            .par_iter()
            .map(|s| {
                let (left, right) = (&files[s.a], &files[s.b]);
                let pair =
                    SimilarityPair::new((s.a, s.b), &left.filename, &right.filename, s.score);
                if s.score > self.config.threshold {
                    pair.with_highlight(self.highlight(
                        left,
                        right,
                        &prepared[s.a].tokenized,
                        &prepared[s.b].tokenized,
                    ))
                } else {
                    pair
                }
            })
            .collect();

        debug!(
            pairs = pairs.len(),
            threshold = self.config.threshold,
            elapsed_micros = start.elapsed().as_micros(),
            "align_complete"
        );
        pairs
    }

    fn highlight(
        &self,
        left: &SourceFile,
        right: &SourceFile,
        left_tokens: &TokenizedSource,
        right_tokens: &TokenizedSource,
    ) -> Highlight {
        let alignment = align_tokens(&left_tokens.tokens, &right_tokens.tokens);
        let style = &self.config.style;
        Highlight {
            file1: left.filename.clone(),
            file2: right.filename.clone(),
            code1: style.render_excerpt(&alignment.left, self.config.max_lines),
            code2: style.render_excerpt(&alignment.right, self.config.max_lines),
        }
    }
}
