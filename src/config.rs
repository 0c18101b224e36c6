//! YAML configuration file support for codesim.
//!
//! One file configures every stage of a batch run. Every section and field is
//! optional; missing values fall back to the defaults shown below.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "cs101 spring"
//!
//! ingest:
//!   max_file_bytes: 1048576
//!   max_files_warning: 40
//!
//! embedding:
//!   provider: "stub"        # or "api"
//!   dimension: 768
//!   max_input_tokens: 512
//!   cache: true
//!   api_kind: "hf"          # hf | openai | custom
//!   api_url: "https://example.com/embed"
//!   api_auth_header: "Bearer hf_xxx"
//!   api_timeout: 30000      # milliseconds
//!   retry:
//!     max_retries: 3
//!     base_delay: 100
//!     max_delay: 5000
//!     backoff_multiplier: 2.0
//!     jitter: true
//!
//! scoring:
//!   threshold: 0.30
//!
//! highlight:
//!   max_lines: 50
//!   open_tag: "<font color=\"red\">"
//!   close_tag: "</font>"
//!   escape_html: true
//! ```

use std::fs;
use std::path::Path;

use align::{HighlightStyle, DEFAULT_MAX_LINES};
use embed::EmbeddingConfig;
use ingest::IngestConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{EngineConfig, DEFAULT_THRESHOLD};

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level YAML configuration for a codesim run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodesimConfig {
    /// Configuration format version
    #[serde(default = "default_config_version")]
    pub version: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub ingest: IngestConfig,

    #[serde(default)]
    pub embedding: EmbeddingConfig,

    #[serde(default)]
    pub scoring: ScoringConfig,

    #[serde(default)]
    pub highlight: HighlightConfig,
}

impl CodesimConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: CodesimConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.ingest
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("ingest: {e}")))?;
        self.embedding
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("embedding: {e}")))?;
        self.scoring.validate()?;
        self.highlight.validate()?;
        Ok(())
    }

    /// Engine settings derived from this file.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            ingest: self.ingest.clone(),
            threshold: self.scoring.threshold,
            max_lines: self.highlight.max_lines,
            style: self.highlight.style(),
        }
    }
}

impl Default for CodesimConfig {
    fn default() -> Self {
        Self {
            version: default_config_version(),
            name: None,
            ingest: IngestConfig::default(),
            embedding: EmbeddingConfig::default(),
            scoring: ScoringConfig::default(),
            highlight: HighlightConfig::default(),
        }
    }
}

/// Scoring YAML configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Pairs scoring strictly above this get a highlight.
    #[serde(default = "default_threshold")]
    pub threshold: f32,
}

impl ScoringConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigLoadError::Validation(format!(
                "scoring.threshold must be within [0, 1], got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
        }
    }
}

/// Highlight YAML configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightConfig {
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,

    #[serde(default = "default_open_tag")]
    pub open_tag: String,

    #[serde(default = "default_close_tag")]
    pub close_tag: String,

    #[serde(default = "true_value")]
    pub escape_html: bool,
}

impl HighlightConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.max_lines == 0 {
            return Err(ConfigLoadError::Validation(
                "highlight.max_lines must be >= 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn style(&self) -> HighlightStyle {
        HighlightStyle {
            open_tag: self.open_tag.clone(),
            close_tag: self.close_tag.clone(),
            escape_html: self.escape_html,
        }
    }
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            max_lines: default_max_lines(),
            open_tag: default_open_tag(),
            close_tag: default_close_tag(),
            escape_html: true,
        }
    }
}

fn default_config_version() -> String {
    "1.0".to_string()
}
fn default_threshold() -> f32 {
    DEFAULT_THRESHOLD
}
fn default_max_lines() -> usize {
    DEFAULT_MAX_LINES
}
fn default_open_tag() -> String {
    HighlightStyle::default().open_tag
}
fn default_close_tag() -> String {
    HighlightStyle::default().close_tag
}
fn true_value() -> bool {
    true
}
