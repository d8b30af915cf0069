//! Integer pixel translation on a fixed canvas.
//!
//! Content moves by `(dx, dy)`: positive `dx` shifts right, positive `dy`
//! shifts down. Vacated pixels become transparent and content pushed past
//! the edge is discarded. There is no wrap-around.

use crate::decode::{Raster, CHANNELS};

/// Shift a raster's content by whole pixels.
pub fn apply_translation(raster: &Raster, dx: i32, dy: i32) -> Raster {
    if dx == 0 && dy == 0 {
        return raster.clone();
    }

    let (w, h) = (raster.width as i64, raster.height as i64);
    let (dx, dy) = (dx as i64, dy as i64);
    let mut output = Raster::transparent(raster.width, raster.height);

    // Destination columns that receive source content
    let dst_x_start = dx.clamp(0, w);
    let dst_x_end = (w + dx).clamp(0, w);
    if dst_x_start >= dst_x_end {
        return output;
    }
    let src_x_start = dst_x_start - dx;
    let row_bytes = (dst_x_end - dst_x_start) as usize * CHANNELS;

    for dst_y in 0..h {
        let src_y = dst_y - dy;
        if src_y < 0 || src_y >= h {
            continue;
        }
        let src_idx = ((src_y * w + src_x_start) as usize) * CHANNELS;
        let dst_idx = ((dst_y * w + dst_x_start) as usize) * CHANNELS;
        output.pixels[dst_idx..dst_idx + row_bytes]
            .copy_from_slice(&raster.pixels[src_idx..src_idx + row_bytes]);
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 3x3 image where each pixel's red channel encodes its index.
    fn indexed(width: u32, height: u32) -> Raster {
        let mut pixels = Vec::new();
        for i in 0..(width * height) {
            pixels.extend_from_slice(&[i as u8 + 1, 0, 0, 255]);
        }
        Raster::new(width, height, pixels)
    }

    #[test]
    fn test_zero_translation_is_identity() {
        let img = indexed(3, 3);
        assert_eq!(apply_translation(&img, 0, 0), img);
    }

    #[test]
    fn test_shift_right_and_down() {
        let img = indexed(3, 3);
        let out = apply_translation(&img, 1, 1);

        assert_eq!((out.width, out.height), (3, 3));
        // Vacated top row and left column are transparent
        assert_eq!(out.pixel(0, 0), [0, 0, 0, 0]);
        assert_eq!(out.pixel(2, 0), [0, 0, 0, 0]);
        assert_eq!(out.pixel(0, 2), [0, 0, 0, 0]);
        // (0,0) moved to (1,1), (1,1) moved to (2,2)
        assert_eq!(out.pixel(1, 1), img.pixel(0, 0));
        assert_eq!(out.pixel(2, 2), img.pixel(1, 1));
    }

    #[test]
    fn test_shift_left_and_up() {
        let img = indexed(3, 3);
        let out = apply_translation(&img, -2, -1);
        assert_eq!(out.pixel(0, 0), img.pixel(2, 1));
        assert_eq!(out.pixel(0, 1), img.pixel(2, 2));
        assert_eq!(out.pixel(1, 0), [0, 0, 0, 0]);
        assert_eq!(out.pixel(0, 2), [0, 0, 0, 0]);
    }

    #[test]
    fn test_no_wrap_around() {
        let img = indexed(4, 1);
        let out = apply_translation(&img, 2, 0);
        // Rightmost source pixels fall off the canvas, nothing comes back on the left
        assert_eq!(out.pixel(0, 0), [0, 0, 0, 0]);
        assert_eq!(out.pixel(1, 0), [0, 0, 0, 0]);
        assert_eq!(out.pixel(2, 0), img.pixel(0, 0));
        assert_eq!(out.pixel(3, 0), img.pixel(1, 0));
    }

    #[test]
    fn test_shift_past_canvas_is_fully_transparent() {
        let img = indexed(5, 5);
        for (dx, dy) in [(5, 0), (-7, 0), (0, 5), (0, -100), (100, 100)] {
            let out = apply_translation(&img, dx, dy);
            assert!(out.pixels.iter().all(|&v| v == 0), "shift ({}, {})", dx, dy);
        }
    }
}
