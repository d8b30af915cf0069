//! Horizontal shear on a fixed canvas.
//!
//! Forward mapping is `x' = x + factor * y`, `y' = y`, with the origin at
//! the top-left corner. Output pixels whose source position falls outside
//! the image are transparent.

use super::sample::sample;
use crate::decode::{FilterType, Raster, CHANNELS};

/// Shear a raster horizontally by `factor`.
pub fn apply_shear(raster: &Raster, factor: f64, filter: FilterType) -> Raster {
    if factor == 0.0 {
        return raster.clone();
    }

    let (w, h) = (raster.width, raster.height);
    let mut output = vec![0u8; w as usize * h as usize * CHANNELS];

    for dst_y in 0..h {
        // Inverse of x' = x + factor * y, evaluated at pixel centers
        let offset = factor * (dst_y as f64 + 0.5);
        for dst_x in 0..w {
            let src_x = dst_x as f64 - offset;
            let idx = (dst_y as usize * w as usize + dst_x as usize) * CHANNELS;
            output[idx..idx + CHANNELS].copy_from_slice(&sample(raster, src_x, dst_y as f64, filter));
        }
    }

    Raster::new(w, h, output)
}
