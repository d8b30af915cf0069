//! Zip bundling of processed images.
//!
//! A batch with more than one successful item is returned as one
//! Deflate-compressed zip. Entry names are made unique on the way in, so
//! two uploads called `cat.jpg` never overwrite each other.

mod naming;

pub use naming::{output_filename, NameRegistry, OUTPUT_SUFFIX};

use std::io::{Cursor, Write};

use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// MIME type of a bundled archive.
pub const ARCHIVE_MIME: &str = "application/zip";

/// Errors from writing an archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Zip writer failed: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Failed to write archive entry: {0}")]
    Io(#[from] std::io::Error),
}

/// One named payload in an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ArchiveEntry {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// Write `entries` into a single zip stream, in order.
///
/// # Errors
///
/// Returns `ArchiveError` only when the underlying writer fails.
pub fn bundle(entries: &[ArchiveEntry]) -> Result<Vec<u8>, ArchiveError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut names = NameRegistry::new();

    for entry in entries {
        let name = names.claim(&entry.name);
        if name != entry.name {
            log::debug!("archive entry {} renamed to {}", entry.name, name);
        }
        writer.start_file(name, options)?;
        writer.write_all(&entry.bytes)?;
    }

    let cursor = writer.finish()?;
    let bytes = cursor.into_inner();
    log::debug!("bundled {} entries into {} bytes", entries.len(), bytes.len());
    Ok(bytes)
}
