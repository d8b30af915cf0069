//! The batch pipeline.
//!
//! One call to [`BatchPipeline::process`] walks a request through
//! `Validating → Processing(1..N) → Bundling → Done`. Items are handled
//! one at a time, in input order:
//!
//! ```text
//! decode → normalized PNG → remove background → validate cut-out
//!        → transform → encode → claim output name
//! ```
//!
//! Nothing survives between calls. The remover is the only stage that can
//! block for long; the pipeline itself never spawns threads.

mod cancel;
mod events;
mod types;

pub use cancel::CancellationToken;
pub use events::{format_event, BatchEvent};
pub use types::{
    BatchError, BatchItem, BatchOutput, BatchRequest, BatchResult, BatchWarning, ItemError,
    ItemFailure, ProcessedItem,
};

use std::fmt;
use std::sync::mpsc::Sender;

use crate::archive::{bundle, output_filename, ArchiveEntry, NameRegistry, ARCHIVE_MIME};
use crate::config::{ConfigError, FailurePolicy, PipelineConfig};
use crate::decode::{decode, ImageAsset};
use crate::encode::{encode_png, encode_with_quality};
use crate::remove::{validate_output, BackgroundRemover};
use crate::transform::{apply_transform, Transform};

/// Where a batch currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    /// `index` is 1-based.
    Processing { index: usize, total: usize },
    Bundling,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Validating => write!(f, "validating"),
            Stage::Processing { index, total } => write!(f, "processing {}/{}", index, total),
            Stage::Bundling => write!(f, "bundling"),
            Stage::Done => write!(f, "done"),
        }
    }
}

/// Runs batches against one background remover.
pub struct BatchPipeline<R> {
    config: PipelineConfig,
    remover: R,
    events: Option<Sender<BatchEvent>>,
    cancel: Option<CancellationToken>,
}

#[cfg(not(target_arch = "wasm32"))]
impl BatchPipeline<crate::remove::CommandRemover> {
    /// A pipeline that shells out to `rembg`, honoring the configured timeout.
    pub fn rembg(config: PipelineConfig) -> Self {
        let remover = crate::remove::CommandRemover::rembg().with_timeout(config.removal_timeout());
        Self::new(config, remover)
    }
}

impl<R: BackgroundRemover> BatchPipeline<R> {
    pub fn new(config: PipelineConfig, remover: R) -> Self {
        Self {
            config,
            remover,
            events: None,
            cancel: None,
        }
    }

    /// Report progress on `events`.
    pub fn with_events(mut self, events: Sender<BatchEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Stop between items once `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Build a request capped at the configured `max_files`.
    pub fn request(&self, items: Vec<BatchItem>, transform: Transform) -> BatchRequest {
        BatchRequest::new(items, self.config.max_files, transform)
    }

    /// Shorthand for `process(request(items, transform))`.
    pub fn process_files(
        &self,
        items: Vec<BatchItem>,
        transform: Transform,
    ) -> Result<BatchResult, BatchError> {
        self.process(self.request(items, transform))
    }

    /// Run one batch to completion.
    ///
    /// # Errors
    ///
    /// - `EmptyBatch` when there is nothing to process
    /// - `Config` / `InvalidTransform` when validation fails, before any item is touched
    /// - `ItemFailed` on the first failing item under [`FailurePolicy::AbortOnFirst`]
    /// - `Cancelled` when the cancellation token fires between items
    /// - `Archive` when the zip writer fails
    pub fn process(&self, request: BatchRequest) -> Result<BatchResult, BatchError> {
        log::debug!("batch {}", Stage::Validating);
        self.config.validate()?;
        if request.max_items == 0 {
            return Err(ConfigError::ZeroMaxFiles.into());
        }
        if request.items.is_empty() {
            return Err(BatchError::EmptyBatch);
        }
        request.transform.validate()?;

        let received = request.items.len();
        let kept = received.min(request.max_items);
        let mut warnings = Vec::new();
        if received > kept {
            log::warn!("received {} files, keeping the first {}", received, kept);
            warnings.push(BatchWarning::Truncated { received, kept });
        }

        self.emit(BatchEvent::Started { total: kept });

        let mut names = NameRegistry::new();
        let mut items = Vec::with_capacity(kept);
        let mut failures = Vec::new();

        for (index, item) in request.items.iter().take(kept).enumerate() {
            if self.is_cancelled() {
                log::warn!("batch cancelled after {} of {} items", index, kept);
                return Err(BatchError::Cancelled { processed: index });
            }

            log::debug!(
                "batch {}: {}",
                Stage::Processing {
                    index: index + 1,
                    total: kept
                },
                item.filename
            );

            match self.process_item(item, &request.transform) {
                Ok((original, processed, bytes)) => {
                    let output_name = names.claim(&output_filename(
                        &item.filename,
                        self.config.output_format.extension(),
                    ));
                    self.emit(BatchEvent::ItemProcessed {
                        index,
                        identifier: item.filename.clone(),
                        output_name: output_name.clone(),
                    });
                    items.push(ProcessedItem {
                        index,
                        original,
                        processed,
                        output_name,
                        bytes,
                    });
                }
                Err(error) => {
                    log::warn!("{} failed: {}", item.filename, error);
                    self.emit(BatchEvent::ItemFailed {
                        index,
                        identifier: item.filename.clone(),
                        message: error.to_string(),
                    });
                    match self.config.failure_policy {
                        FailurePolicy::AbortOnFirst => {
                            return Err(BatchError::ItemFailed {
                                index,
                                identifier: item.filename.clone(),
                                source: error,
                            });
                        }
                        FailurePolicy::Isolate => failures.push(ItemFailure {
                            index,
                            identifier: item.filename.clone(),
                            error,
                        }),
                    }
                }
            }
        }

        log::debug!("batch {}", Stage::Bundling);
        let output = self.bundle(&items)?;
        if let Some(output) = &output {
            self.emit(BatchEvent::Bundled {
                filename: output.filename().to_string(),
                entries: items.len(),
            });
        }

        self.emit(BatchEvent::Finished {
            succeeded: items.len(),
            failed: failures.len(),
        });
        log::info!(
            "batch {}: {} succeeded, {} failed, {} dropped",
            Stage::Done,
            items.len(),
            failures.len(),
            received - kept
        );

        Ok(BatchResult {
            items,
            failures,
            warnings,
            output,
        })
    }

    /// Take one upload from bytes to its encoded cut-out.
    fn process_item(
        &self,
        item: &BatchItem,
        transform: &Transform,
    ) -> Result<(ImageAsset, ImageAsset, Vec<u8>), ItemError> {
        let original = decode(&item.filename, &item.bytes)?;
        log::debug!(
            "decoded {} ({}x{}, {:?})",
            original.identifier,
            original.width(),
            original.height(),
            original.source_format
        );

        // The remover always sees an upright PNG so its output lines up with `original`
        let normalized = encode_png(&original.raster)?;
        let removed = self.remover.remove(&normalized)?;
        let cutout = validate_output(&original.raster, &removed)?;

        let transformed = apply_transform(&cutout, transform, self.config.filter)?;
        let processed = original.with_raster(transformed);

        let bytes = encode_with_quality(
            &processed.raster,
            self.config.output_format,
            self.config.jpeg_quality,
        )?;

        Ok((original, processed, bytes))
    }

    /// Zero successes give no output, one gives the file itself, more give a zip.
    fn bundle(&self, items: &[ProcessedItem]) -> Result<Option<BatchOutput>, BatchError> {
        match items {
            [] => Ok(None),
            [only] => Ok(Some(BatchOutput::Single {
                filename: only.output_name.clone(),
                mime: self.config.output_format.mime_type(),
                bytes: only.bytes.clone(),
            })),
            many => {
                let entries: Vec<ArchiveEntry> = many
                    .iter()
                    .map(|item| ArchiveEntry::new(item.output_name.clone(), item.bytes.clone()))
                    .collect();
                Ok(Some(BatchOutput::Archive {
                    filename: self.config.archive_name.clone(),
                    mime: ARCHIVE_MIME,
                    bytes: bundle(&entries)?,
                }))
            }
        }
    }

    fn emit(&self, event: BatchEvent) {
        if let Some(events) = &self.events {
            // Nobody listening is fine
            let _ = events.send(event);
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }
}
