//! nobg Core - Batch background removal
//!
//! This crate takes a handful of uploaded images, cuts out their
//! backgrounds with an external remover, optionally applies one geometric
//! transform, and hands back either a single PNG or a zip of PNGs.
//!
//! - [`decode`] / [`encode`]: image containers to RGBA rasters and back
//! - [`remove`]: the background remover seam
//! - [`transform`]: rotate, translate, scale, shear
//! - [`archive`]: zip bundling and output names
//! - [`pipeline`]: the batch state machine tying it all together

pub mod archive;
pub mod config;
pub mod decode;
pub mod encode;
pub mod pipeline;
pub mod remove;
pub mod transform;

pub use archive::{bundle, output_filename, ArchiveEntry, ArchiveError};
pub use config::{ConfigError, FailurePolicy, PipelineConfig, MAX_FILES};
pub use decode::{decode, is_allowed_type, DecodeError, FilterType, ImageAsset, Raster, SourceFormat};
pub use encode::{encode, encode_png, EncodeError, OutputFormat};
pub use pipeline::{
    BatchError, BatchEvent, BatchItem, BatchOutput, BatchPipeline, BatchRequest, BatchResult,
    BatchWarning, CancellationToken, ItemError, ItemFailure, ProcessedItem,
};
pub use remove::{from_fn, BackgroundRemover, FnRemover, RemovalError};
#[cfg(not(target_arch = "wasm32"))]
pub use remove::CommandRemover;
pub use transform::{apply_transform, Transform, TransformError};
