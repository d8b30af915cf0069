//! Background removal as an external capability.
//!
//! The pipeline never looks inside the model. It hands a remover the bytes
//! of one image and expects back the bytes of the same image with
//! background pixels at zero alpha. Anything implementing
//! [`BackgroundRemover`] can sit in that slot:
//!
//! - [`CommandRemover`] runs an external program such as `rembg` (native only)
//! - [`FnRemover`] wraps a closure, e.g. a JavaScript callback in the WASM bindings
//!
//! Removers are called once per item. There are no retries.

#[cfg(not(target_arch = "wasm32"))]
mod command;

#[cfg(not(target_arch = "wasm32"))]
pub use command::{CommandRemover, DEFAULT_REMOVAL_TIMEOUT};

use std::time::Duration;

use thiserror::Error;

use crate::decode::{decode_raster, Raster};

/// Errors surfaced by a background remover.
#[derive(Debug, Error)]
pub enum RemovalError {
    /// The remover ran and reported a failure.
    #[error("Background removal failed: {0}")]
    Failed(String),

    /// The remover did not answer in time.
    #[error("Background removal timed out after {0:?}")]
    Timeout(Duration),

    /// The remover answered with bytes that are not the expected image.
    #[error("Background remover returned malformed output: {0}")]
    MalformedOutput(String),

    /// The remover could not be started or talked to.
    #[error("Could not run background remover: {0}")]
    Io(#[from] std::io::Error),
}

/// Something that turns image bytes into the same image with a transparent background.
pub trait BackgroundRemover {
    /// Remove the background from one encoded image.
    fn remove(&self, bytes: &[u8]) -> Result<Vec<u8>, RemovalError>;
}

impl<T: BackgroundRemover + ?Sized> BackgroundRemover for &T {
    fn remove(&self, bytes: &[u8]) -> Result<Vec<u8>, RemovalError> {
        (**self).remove(bytes)
    }
}

impl<T: BackgroundRemover + ?Sized> BackgroundRemover for Box<T> {
    fn remove(&self, bytes: &[u8]) -> Result<Vec<u8>, RemovalError> {
        (**self).remove(bytes)
    }
}

/// A remover backed by a closure.
pub struct FnRemover<F> {
    f: F,
}

impl<F> BackgroundRemover for FnRemover<F>
where
    F: Fn(&[u8]) -> Result<Vec<u8>, RemovalError>,
{
    fn remove(&self, bytes: &[u8]) -> Result<Vec<u8>, RemovalError> {
        (self.f)(bytes)
    }
}

/// Build a remover from a closure.
pub fn from_fn<F>(f: F) -> FnRemover<F>
where
    F: Fn(&[u8]) -> Result<Vec<u8>, RemovalError>,
{
    FnRemover { f }
}

/// Decode remover output and check it lines up with the image that was sent.
///
/// # Errors
///
/// Returns `RemovalError::MalformedOutput` if the bytes do not decode or the
/// dimensions differ from `input`.
pub fn validate_output(input: &Raster, bytes: &[u8]) -> Result<Raster, RemovalError> {
    let raster = decode_raster(bytes).map_err(|e| RemovalError::MalformedOutput(e.to_string()))?;

    if raster.width != input.width || raster.height != input.height {
        return Err(RemovalError::MalformedOutput(format!(
            "expected {}x{} image, got {}x{}",
            input.width, input.height, raster.width, raster.height
        )));
    }

    Ok(raster)
}
