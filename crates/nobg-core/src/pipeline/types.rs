//! Requests, results and errors of a batch.

use std::fmt;

use thiserror::Error;

use crate::archive::ArchiveError;
use crate::config::ConfigError;
use crate::decode::{DecodeError, ImageAsset};
use crate::encode::EncodeError;
use crate::remove::RemovalError;
use crate::transform::{Transform, TransformError};

/// One uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl BatchItem {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }
}

/// Everything one invocation of the pipeline works on.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRequest {
    /// Uploads in the order they were received.
    pub items: Vec<BatchItem>,
    /// Items past this count are dropped with a warning.
    pub max_items: usize,
    pub transform: Transform,
}

impl BatchRequest {
    pub fn new(items: Vec<BatchItem>, max_items: usize, transform: Transform) -> Self {
        Self {
            items,
            max_items,
            transform,
        }
    }
}

/// A successfully processed upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedItem {
    /// Position of the upload in the request.
    pub index: usize,
    /// The decoded upload, orientation corrected.
    pub original: ImageAsset,
    /// The cut-out after the transform.
    pub processed: ImageAsset,
    pub output_name: String,
    /// `processed` encoded in the configured output format.
    pub bytes: Vec<u8>,
}

/// An upload that did not make it through the pipeline.
#[derive(Debug)]
pub struct ItemFailure {
    pub index: usize,
    pub identifier: String,
    pub error: ItemError,
}

/// Something worth telling the caller that did not stop the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchWarning {
    /// More files were uploaded than the batch accepts.
    Truncated { received: usize, kept: usize },
}

impl fmt::Display for BatchWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchWarning::Truncated { received, kept } => write!(
                f,
                "Received {} files; only the first {} were processed",
                received, kept
            ),
        }
    }
}

/// The file handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutput {
    /// Exactly one item succeeded.
    Single {
        filename: String,
        mime: &'static str,
        bytes: Vec<u8>,
    },
    /// More than one item succeeded.
    Archive {
        filename: String,
        mime: &'static str,
        bytes: Vec<u8>,
    },
}

impl BatchOutput {
    pub fn filename(&self) -> &str {
        match self {
            BatchOutput::Single { filename, .. } | BatchOutput::Archive { filename, .. } => filename,
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            BatchOutput::Single { mime, .. } | BatchOutput::Archive { mime, .. } => mime,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            BatchOutput::Single { bytes, .. } | BatchOutput::Archive { bytes, .. } => bytes,
        }
    }

    pub fn is_archive(&self) -> bool {
        matches!(self, BatchOutput::Archive { .. })
    }
}

/// What a finished batch produced.
#[derive(Debug)]
pub struct BatchResult {
    /// Successes, in input order.
    pub items: Vec<ProcessedItem>,
    /// Failures, in input order.
    pub failures: Vec<ItemFailure>,
    pub warnings: Vec<BatchWarning>,
    /// `None` when every item failed.
    pub output: Option<BatchOutput>,
}

impl BatchResult {
    /// Whether every kept item succeeded.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Why a single item failed.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("Could not decode image: {0}")]
    Decode(#[from] DecodeError),

    #[error("Could not encode image: {0}")]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Removal(#[from] RemovalError),

    #[error("Could not transform image: {0}")]
    Transform(#[from] TransformError),
}

/// Why a whole batch failed.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("No files to process")]
    EmptyBatch,

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid transform: {0}")]
    InvalidTransform(#[from] TransformError),

    #[error("{identifier}: {source}")]
    ItemFailed {
        index: usize,
        identifier: String,
        source: ItemError,
    },

    #[error("Batch cancelled after {processed} items")]
    Cancelled { processed: usize },

    #[error("Could not bundle results: {0}")]
    Archive(#[from] ArchiveError),
}
