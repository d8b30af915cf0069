//! Container decoding: bytes in, upright RGBA raster out.

use std::io::Cursor;

use image::ImageReader;

use super::orientation::{apply_orientation, read_orientation};
use super::{DecodeError, ImageAsset, Raster, SourceFormat};

/// Decode image bytes into an [`ImageAsset`].
///
/// The container format is sniffed from the bytes, not taken from the
/// filename. EXIF orientation is applied and the result is always RGBA8.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the bytes are not a recognized container.
/// Returns `DecodeError::CorruptedFile` if the container is recognized but broken.
/// Returns `DecodeError::EmptyImage` if the image has no pixels.
pub fn decode(identifier: &str, bytes: &[u8]) -> Result<ImageAsset, DecodeError> {
    let format = image::guess_format(bytes).map_err(|_| DecodeError::InvalidFormat)?;

    let img = ImageReader::with_format(Cursor::new(bytes), format)
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let oriented = apply_orientation(img, read_orientation(bytes));
    let raster = Raster::from_rgba_image(oriented.into_rgba8());

    if raster.is_empty() {
        return Err(DecodeError::EmptyImage {
            width: raster.width,
            height: raster.height,
        });
    }

    Ok(ImageAsset::new(
        identifier,
        raster,
        SourceFormat::from_image_format(format),
    ))
}

/// Decode bytes straight to a raster, discarding the container details.
pub fn decode_raster(bytes: &[u8]) -> Result<Raster, DecodeError> {
    decode("", bytes).map(|asset| asset.raster)
}
