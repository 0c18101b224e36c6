//! Configuration types for batch intake.
//!
//! [`IngestConfig`] bounds what a batch may contain: how many files it needs,
//! when it is large enough to warn about, and how big a single submission may
//! be. It is cheap to clone and deserializes from the `ingest` section of the
//! YAML configuration.
//!
//! # Quick Start
//!
//! ```rust
//! use ingest::IngestConfig;
//!
//! let config = IngestConfig::default();
//! config.validate().expect("default config is valid");
//! assert_eq!(config.max_files_warning, 40);
//! ```
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default per-file limit: 1 MiB of source is far beyond any classroom submission.
pub const DEFAULT_MAX_FILE_BYTES: usize = 1024 * 1024;
/// Batches larger than this still run, but a warning is logged.
pub const DEFAULT_MAX_FILES_WARNING: usize = 40;
/// A comparison needs at least one pair.
pub const MIN_FILES: usize = 2;

/// Runtime configuration for batch intake.
///
/// ```yaml
/// max_file_bytes: 1048576
/// max_files_warning: 40
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Maximum size of one submission in bytes, measured before decoding.
    /// `None` disables the check.
    pub max_file_bytes: Option<usize>,

    /// Batch size above which intake logs a warning. Pair count grows
    /// quadratically, so large batches are slow but not rejected.
    pub max_files_warning: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: Some(DEFAULT_MAX_FILE_BYTES),
            max_files_warning: DEFAULT_MAX_FILES_WARNING,
        }
    }
}

/// Invalid [`IngestConfig`] values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// `max_file_bytes` was set to zero, which would reject every file.
    #[error("max_file_bytes must be greater than zero")]
    ZeroFileLimit,

    /// `max_files_warning` is below the minimum batch size, so every batch would warn.
    #[error("max_files_warning ({value}) must be at least {min}")]
    WarningBelowMinimum { value: usize, min: usize },
}

impl IngestConfig {
    /// Check the configuration for values that can never work.
    ///
    /// ```rust
    /// use ingest::{ConfigError, IngestConfig};
    ///
    /// let bad = IngestConfig { max_file_bytes: Some(0), ..Default::default() };
    /// assert_eq!(bad.validate(), Err(ConfigError::ZeroFileLimit));
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_file_bytes == Some(0) {
            return Err(ConfigError::ZeroFileLimit);
        }
        if self.max_files_warning < MIN_FILES {
            return Err(ConfigError::WarningBelowMinimum {
                value: self.max_files_warning,
                min: MIN_FILES,
            });
        }
        Ok(())
    }
}
