//! Pipeline configuration.
//!
//! Everything a batch needs to know is carried in [`PipelineConfig`] and
//! handed to the pipeline explicitly. Missing fields deserialize to their
//! defaults, so callers can send `{}` or only the fields they care about.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::FilterType;
use crate::encode::{OutputFormat, DEFAULT_JPEG_QUALITY};

/// Default cap on the number of files processed per batch.
pub const MAX_FILES: usize = 5;

/// Default timeout for external background removal, in milliseconds.
pub const DEFAULT_REMOVAL_TIMEOUT_MS: u64 = 60_000;

/// Filename of the zip produced when more than one image succeeds.
pub const DEFAULT_ARCHIVE_NAME: &str = "background_removed_images.zip";

/// Errors from an invalid configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_files must be at least 1")]
    ZeroMaxFiles,

    #[error("jpeg_quality must be between 1 and 100, got {0}")]
    JpegQuality(u8),

    #[error("removal_timeout_ms must be at least 1")]
    ZeroTimeout,

    #[error("archive_name must not be empty")]
    EmptyArchiveName,
}

/// What to do when a single item fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Record the failure against the item and keep going.
    #[default]
    Isolate,
    /// Fail the whole batch on the first item that fails.
    AbortOnFirst,
}

/// Settings for one pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Items beyond this count are dropped with a warning.
    pub max_files: usize,
    pub removal_timeout_ms: u64,
    pub output_format: OutputFormat,
    /// Only used for JPEG output.
    pub jpeg_quality: u8,
    /// Resampling filter for rotate and scale.
    pub filter: FilterType,
    pub failure_policy: FailurePolicy,
    pub archive_name: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_files: MAX_FILES,
            removal_timeout_ms: DEFAULT_REMOVAL_TIMEOUT_MS,
            output_format: OutputFormat::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            filter: FilterType::default(),
            failure_policy: FailurePolicy::default(),
            archive_name: DEFAULT_ARCHIVE_NAME.to_string(),
        }
    }
}

impl PipelineConfig {
    /// Check that every field holds a usable value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_files == 0 {
            return Err(ConfigError::ZeroMaxFiles);
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConfigError::JpegQuality(self.jpeg_quality));
        }
        if self.removal_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.archive_name.trim().is_empty() {
            return Err(ConfigError::EmptyArchiveName);
        }
        Ok(())
    }

    pub fn removal_timeout(&self) -> Duration {
        Duration::from_millis(self.removal_timeout_ms)
    }
}
