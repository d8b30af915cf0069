//! Image rotation about the center with an expanded canvas.
//!
//! The rotation uses inverse mapping: for each pixel in the output image,
//! we calculate which source position maps onto it and sample there.
//!
//! With the y axis pointing down, a counter-clockwise rotation by θ has
//! the inverse transform:
//! ```text
//! src_x = (dst_x - cx) * cos(θ) - (dst_y - cy) * sin(θ) + src_cx
//! src_y = (dst_x - cx) * sin(θ) + (dst_y - cy) * cos(θ) + src_cy
//! ```
//!
//! Corners of the output canvas that no source pixel covers are transparent.

use super::sample::sample;
use crate::decode::{FilterType, Raster, CHANNELS};

/// Angles closer than this to a multiple of 360 are treated as no rotation.
const ANGLE_EPSILON: f64 = 0.001;

/// Whether `angle_degrees` is (numerically) a whole number of turns.
fn is_full_turn(angle_degrees: f64) -> bool {
    let normalized = (angle_degrees % 360.0).abs();
    normalized < ANGLE_EPSILON || (360.0 - normalized) < ANGLE_EPSILON
}

/// Compute the dimensions of the bounding box for a rotated image.
///
/// # Returns
///
/// Tuple of (new_width, new_height) for the rotated bounding box.
pub fn compute_rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> (u32, u32) {
    if is_full_turn(angle_degrees) {
        return (width, height);
    }

    // Fast path: exact 90/270 degree rotations (swap dimensions)
    let abs_angle = (angle_degrees % 360.0).abs();
    if (abs_angle - 90.0).abs() < ANGLE_EPSILON || (abs_angle - 270.0).abs() < ANGLE_EPSILON {
        return (height, width);
    }

    // Fast path: exact 180 degree rotation (same dimensions)
    if (abs_angle - 180.0).abs() < ANGLE_EPSILON {
        return (width, height);
    }

    let angle_rad = angle_degrees.to_radians();
    let cos = angle_rad.cos().abs();
    let sin = angle_rad.sin().abs();

    let w = width as f64;
    let h = height as f64;

    // new_w = |w*cos| + |h*sin|, new_h = |w*sin| + |h*cos|
    let new_w = (w * cos + h * sin).round() as u32;
    let new_h = (w * sin + h * cos).round() as u32;

    (new_w.max(1), new_h.max(1))
}

/// Rotate a raster about its center.
///
/// Positive angles rotate counter-clockwise. The output canvas is expanded
/// to fit the entire rotated image (no clipping). Whole turns return an
/// exact copy with the original canvas size.
pub fn apply_rotation(raster: &Raster, angle_degrees: f64, filter: FilterType) -> Raster {
    if is_full_turn(angle_degrees) {
        return raster.clone();
    }

    let (dst_w, dst_h) = compute_rotated_bounds(raster.width, raster.height, angle_degrees);

    let angle_rad = angle_degrees.to_radians();
    let cos = angle_rad.cos();
    let sin = angle_rad.sin();

    let src_cx = raster.width as f64 / 2.0;
    let src_cy = raster.height as f64 / 2.0;
    let dst_cx = dst_w as f64 / 2.0;
    let dst_cy = dst_h as f64 / 2.0;

    let mut output = vec![0u8; dst_w as usize * dst_h as usize * CHANNELS];

    for dst_y in 0..dst_h {
        for dst_x in 0..dst_w {
            // Pixel center, relative to the output center
            let dx = dst_x as f64 + 0.5 - dst_cx;
            let dy = dst_y as f64 + 0.5 - dst_cy;

            // Back to source index space (centers on integers)
            let src_x = dx * cos - dy * sin + src_cx - 0.5;
            let src_y = dx * sin + dy * cos + src_cy - 0.5;

            let idx = (dst_y as usize * dst_w as usize + dst_x as usize) * CHANNELS;
            output[idx..idx + CHANNELS].copy_from_slice(&sample(raster, src_x, src_y, filter));
        }
    }

    Raster::new(dst_w, dst_h, output)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Create a simple opaque test image with a gradient pattern.
    fn test_image(width: u32, height: u32) -> Raster {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height {
            for x in 0..width {
                let v = ((x + y) * 8) as u8;
                pixels.extend_from_slice(&[v, v, v, 255]);
            }
        }
        Raster::new(width, height, pixels)
    }

    #[test]
    fn test_no_rotation_is_identity() {
        let img = test_image(100, 50);
        let result = apply_rotation(&img, 0.0, FilterType::Bilinear);
        assert_eq!(result, img);
    }

    #[test]
    fn test_tiny_rotation_fast_path() {
        let img = test_image(100, 50);
        let result = apply_rotation(&img, 0.0001, FilterType::Bilinear);
        assert_eq!(result, img);
    }

    #[test]
    fn test_full_turns_are_identity() {
        let img = test_image(30, 20);
        for angle in [360.0, -360.0, 720.0] {
            assert_eq!(apply_rotation(&img, angle, FilterType::Lanczos3), img);
        }
    }

    #[test]
    fn test_90_degree_rotation_bounds() {
        assert_eq!(compute_rotated_bounds(100, 50, 90.0), (50, 100));
    }

    #[test]
    fn test_180_degree_rotation_bounds() {
        assert_eq!(compute_rotated_bounds(100, 50, 180.0), (100, 50));
    }

    #[test]
    fn test_270_degree_rotation_bounds() {
        assert_eq!(compute_rotated_bounds(100, 50, 270.0), (50, 100));
        assert_eq!(compute_rotated_bounds(100, 50, -90.0), (50, 100));
    }

    #[test]
    fn test_45_degree_rotation_bounds() {
        let (w, h) = compute_rotated_bounds(100, 100, 45.0);
        // Diagonal of 100x100 square is ~141.4
        assert!(w > 140 && w < 143, "width was {}", w);
        assert!(h > 140 && h < 143, "height was {}", h);
    }

    #[test]
    fn test_opposite_rotations_same_bounds() {
        assert_eq!(
            compute_rotated_bounds(100, 80, 30.0),
            compute_rotated_bounds(100, 80, -30.0)
        );
    }

    #[test]
    fn test_large_rotation_angles() {
        assert_eq!(compute_rotated_bounds(100, 50, 720.0), (100, 50));
        assert_eq!(compute_rotated_bounds(100, 50, 450.0), (50, 100));
    }

    #[test]
    fn test_bounds_never_zero() {
        for angle in [1.0, 15.0, 45.0, 89.0, 90.0, 135.0, 179.0, 180.0, 270.0, 359.0] {
            let (w, h) = compute_rotated_bounds(10, 10, angle);
            assert!(w > 0, "Width should be > 0 for angle {}", angle);
            assert!(h > 0, "Height should be > 0 for angle {}", angle);
        }
    }

    #[test]
    fn test_rotation_expands_canvas() {
        let img = test_image(100, 100);
        let result = apply_rotation(&img, 45.0, FilterType::Bilinear);
        assert!(result.width > img.width);
        assert!(result.height > img.height);
        assert!(result.is_consistent());
    }

    #[test]
    fn test_expanded_corners_are_transparent() {
        let img = test_image(40, 40);
        let result = apply_rotation(&img, 45.0, FilterType::Bilinear);
        assert_eq!(result.pixel(0, 0)[3], 0);
        assert_eq!(result.pixel(result.width - 1, result.height - 1)[3], 0);
        // The center is still covered
        assert_eq!(result.pixel(result.width / 2, result.height / 2)[3], 255);
    }

    #[test]
    fn test_90_degree_rotation_moves_pixels_counter_clockwise() {
        // Red at top-left, green at top-right of a 2x1 strip
        let img = Raster::new(2, 1, vec![255, 0, 0, 255, 0, 255, 0, 255]);
        let result = apply_rotation(&img, 90.0, FilterType::Nearest);
        assert_eq!((result.width, result.height), (1, 2));
        // Counter-clockwise: the right end ends up on top
        assert_eq!(result.pixel(0, 0), [0, 255, 0, 255]);
        assert_eq!(result.pixel(0, 1), [255, 0, 0, 255]);
    }

    #[test]
    fn test_180_degree_rotation_reverses() {
        let img = Raster::new(2, 1, vec![255, 0, 0, 255, 0, 255, 0, 255]);
        let result = apply_rotation(&img, 180.0, FilterType::Bilinear);
        assert_eq!(result.pixel(0, 0), [0, 255, 0, 255]);
        assert_eq!(result.pixel(1, 0), [255, 0, 0, 255]);
    }

    #[test]
    fn test_bilinear_vs_lanczos_same_dimensions() {
        let img = test_image(50, 50);
        let bilinear = apply_rotation(&img, 15.0, FilterType::Bilinear);
        let lanczos = apply_rotation(&img, 15.0, FilterType::Lanczos3);
        assert_eq!(bilinear.width, lanczos.width);
        assert_eq!(bilinear.height, lanczos.height);
    }

    #[test]
    fn test_1x1_image_rotation() {
        let img = Raster::new(1, 1, vec![128, 128, 128, 255]);
        let result = apply_rotation(&img, 45.0, FilterType::Bilinear);
        assert!(result.width >= 1);
        assert!(result.height >= 1);
    }

    #[test]
    fn test_very_thin_image_rotation() {
        let result = apply_rotation(&test_image(100, 1), 45.0, FilterType::Bilinear);
        assert!(result.width > 0 && result.height > 0);

        let result = apply_rotation(&test_image(1, 100), 45.0, FilterType::Lanczos3);
        assert!(result.width > 0 && result.height > 0);
    }

    #[test]
    fn test_rotation_center_preservation() {
        // 3x3 white block at the center of a black 21x21 square
        let size = 21u32;
        let mut pixels = [0u8, 0, 0, 255].repeat((size * size) as usize);
        let center = size / 2;
        for py in center - 1..=center + 1 {
            for px in center - 1..=center + 1 {
                let idx = ((py * size + px) * 4) as usize;
                pixels[idx..idx + 3].copy_from_slice(&[255, 255, 255]);
            }
        }
        let img = Raster::new(size, size, pixels);

        let result = apply_rotation(&img, 30.0, FilterType::Bilinear);
        let mid = result.pixel(result.width / 2, result.height / 2);
        assert!(mid[0] > 200, "Center should stay bright, got {:?}", mid);
    }
}
