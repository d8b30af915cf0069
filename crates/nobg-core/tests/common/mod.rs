//! Fixtures shared by the integration tests.

#![allow(dead_code)]

use std::io::{Cursor, Read};

use nobg_core::decode::decode_raster;
use nobg_core::encode::{encode_png, encode_with_quality, OutputFormat};
use nobg_core::{from_fn, BackgroundRemover, RemovalError, Raster};

pub const BACKGROUND: [u8; 3] = [255, 255, 255];
pub const SUBJECT: [u8; 3] = [200, 30, 30];

/// A `width`x`height` white image with a red square in the middle half.
pub fn subject_on_white(width: u32, height: u32) -> Raster {
    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let inside = x >= width / 4 && x < width * 3 / 4 && y >= height / 4 && y < height * 3 / 4;
            let rgb = if inside { SUBJECT } else { BACKGROUND };
            pixels.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
        }
    }
    Raster::new(width, height, pixels)
}

pub fn png_upload(width: u32, height: u32) -> Vec<u8> {
    encode_png(&subject_on_white(width, height)).unwrap()
}

pub fn jpeg_upload(width: u32, height: u32) -> Vec<u8> {
    encode_with_quality(&subject_on_white(width, height), OutputFormat::Jpeg, 95).unwrap()
}

/// Whether `rgb` is close enough to the flat background to be keyed out.
fn is_background(rgb: &[u8]) -> bool {
    rgb.iter()
        .zip(BACKGROUND)
        .all(|(&c, b)| (c as i32 - b as i32).abs() <= 40)
}

/// Keys out near-white pixels, the way a real model would drop a studio backdrop.
pub fn key_out_white(bytes: &[u8]) -> Result<Vec<u8>, RemovalError> {
    let mut raster = decode_raster(bytes).map_err(|e| RemovalError::Failed(e.to_string()))?;
    for px in raster.pixels.chunks_exact_mut(4) {
        if is_background(&px[..3]) {
            px.copy_from_slice(&[0, 0, 0, 0]);
        }
    }
    encode_png(&raster).map_err(|e| RemovalError::Failed(e.to_string()))
}

pub fn test_remover() -> impl BackgroundRemover {
    from_fn(key_out_white)
}

/// Names and contents of every entry in a zip, in order.
pub fn read_zip(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut file = archive.by_index(i).unwrap();
            let mut contents = Vec::new();
            file.read_to_end(&mut contents).unwrap();
            (file.name().to_string(), contents)
        })
        .collect()
}
