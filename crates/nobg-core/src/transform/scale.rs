//! Independent-axis scaling.
//!
//! Resizing goes through the `image` crate's resampling filters, so output
//! is deterministic for a given filter. Aspect ratio is not preserved
//! unless the caller passes equal factors.
//!
//! Interpolating filters run on premultiplied alpha, like the rotate and
//! shear sampler, so transparent neighbours do not bleed black into edges.

use image::{Rgba, Rgba32FImage, RgbaImage};

use super::TransformError;
use crate::decode::{FilterType, Raster};

/// Output dimensions for scale factors: `(round(w*sx), round(h*sy))`, at least 1.
pub fn scaled_dimensions(width: u32, height: u32, sx: f64, sy: f64) -> (u32, u32) {
    let new_w = (width as f64 * sx).round().max(1.0) as u32;
    let new_h = (height as f64 * sy).round().max(1.0) as u32;
    (new_w, new_h)
}

/// Resize a raster to exact dimensions.
///
/// # Errors
///
/// Returns `TransformError::InvalidRaster` if the pixel buffer does not
/// match the raster's dimensions.
pub fn resize(
    raster: &Raster,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<Raster, TransformError> {
    // Fast path: if dimensions match, just clone
    if raster.width == width && raster.height == height {
        return Ok(raster.clone());
    }

    let rgba = raster.to_rgba_image().ok_or(TransformError::InvalidRaster {
        expected: raster.pixel_count() * crate::decode::CHANNELS,
        actual: raster.pixels.len(),
    })?;

    let resized = match filter {
        FilterType::Nearest => {
            image::imageops::resize(&rgba, width, height, filter.to_image_filter())
        }
        _ => {
            let premultiplied = premultiply(&rgba);
            let scaled =
                image::imageops::resize(&premultiplied, width, height, filter.to_image_filter());
            unpremultiply(&scaled)
        }
    };
    Ok(Raster::from_rgba_image(resized))
}

fn premultiply(rgba: &RgbaImage) -> Rgba32FImage {
    Rgba32FImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = a as f32 / 255.0;
        Rgba([
            r as f32 / 255.0 * alpha,
            g as f32 / 255.0 * alpha,
            b as f32 / 255.0 * alpha,
            alpha,
        ])
    })
}

fn unpremultiply(premultiplied: &Rgba32FImage) -> RgbaImage {
    let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    RgbaImage::from_fn(premultiplied.width(), premultiplied.height(), |x, y| {
        let [r, g, b, a] = premultiplied.get_pixel(x, y).0;
        let alpha = a.clamp(0.0, 1.0);
        if to_u8(alpha) == 0 {
            return Rgba([0, 0, 0, 0]);
        }
        Rgba([to_u8(r / alpha), to_u8(g / alpha), to_u8(b / alpha), to_u8(alpha)])
    })
}

/// Scale a raster by independent horizontal and vertical factors.
pub fn apply_scale(
    raster: &Raster,
    sx: f64,
    sy: f64,
    filter: FilterType,
) -> Result<Raster, TransformError> {
    let (width, height) = scaled_dimensions(raster.width, raster.height, sx, sy);
    resize(raster, width, height, filter)
}
