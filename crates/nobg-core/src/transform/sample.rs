//! Pixel sampling for inverse-mapped transforms.
//!
//! Coordinates are in source index space: pixel centers sit on integers.
//! Anything that falls outside the source is fully transparent, and
//! interpolation is done on premultiplied alpha so transparent neighbors
//! do not darken edges.

use crate::decode::{FilterType, Raster};

/// Fill used for pixels with no source coverage.
pub const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];

/// Sample `raster` at fractional index coordinates.
#[inline]
pub(crate) fn sample(raster: &Raster, x: f64, y: f64, filter: FilterType) -> [u8; 4] {
    match filter {
        FilterType::Nearest => sample_nearest(raster, x, y),
        FilterType::Bilinear => sample_bilinear(raster, x, y),
        FilterType::Lanczos3 => sample_lanczos3(raster, x, y),
    }
}

#[inline]
fn in_bounds(raster: &Raster, px: i64, py: i64) -> bool {
    px >= 0 && py >= 0 && px < raster.width as i64 && py < raster.height as i64
}

fn sample_nearest(raster: &Raster, x: f64, y: f64) -> [u8; 4] {
    let px = x.round() as i64;
    let py = y.round() as i64;
    if in_bounds(raster, px, py) {
        raster.pixel(px as u32, py as u32)
    } else {
        TRANSPARENT
    }
}

/// Premultiplied accumulator: [r*a, g*a, b*a, a] weighted sums.
#[derive(Default)]
struct Accum {
    color: [f64; 3],
    alpha: f64,
}

impl Accum {
    #[inline]
    fn add(&mut self, pixel: [u8; 4], weight: f64) {
        let a = pixel[3] as f64 * weight;
        self.color[0] += pixel[0] as f64 * a;
        self.color[1] += pixel[1] as f64 * a;
        self.color[2] += pixel[2] as f64 * a;
        self.alpha += a;
    }

    fn finish(self, weight_sum: f64) -> [u8; 4] {
        if self.alpha <= 0.0 || weight_sum <= 0.0 {
            return TRANSPARENT;
        }
        let alpha = (self.alpha / weight_sum).clamp(0.0, 255.0).round() as u8;
        if alpha == 0 {
            return TRANSPARENT;
        }
        [
            (self.color[0] / self.alpha).clamp(0.0, 255.0).round() as u8,
            (self.color[1] / self.alpha).clamp(0.0, 255.0).round() as u8,
            (self.color[2] / self.alpha).clamp(0.0, 255.0).round() as u8,
            alpha,
        ]
    }
}

/// Bilinear interpolation over the 4 nearest pixels.
fn sample_bilinear(raster: &Raster, x: f64, y: f64) -> [u8; 4] {
    let (w, h) = (raster.width as f64, raster.height as f64);
    if x <= -1.0 || y <= -1.0 || x >= w || y >= h {
        return TRANSPARENT;
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    // An exactly aligned sample is a copy; keeps fully transparent colors intact.
    if fx == 0.0 && fy == 0.0 {
        return if in_bounds(raster, x0, y0) {
            raster.pixel(x0 as u32, y0 as u32)
        } else {
            TRANSPARENT
        };
    }

    let taps = [
        (x0, y0, (1.0 - fx) * (1.0 - fy)),
        (x0 + 1, y0, fx * (1.0 - fy)),
        (x0, y0 + 1, (1.0 - fx) * fy),
        (x0 + 1, y0 + 1, fx * fy),
    ];

    let mut acc = Accum::default();
    for (px, py, weight) in taps {
        if weight > 0.0 && in_bounds(raster, px, py) {
            acc.add(raster.pixel(px as u32, py as u32), weight);
        }
    }
    acc.finish(1.0)
}

/// Lanczos3 interpolation over a 6x6 neighborhood.
fn sample_lanczos3(raster: &Raster, x: f64, y: f64) -> [u8; 4] {
    let (w, h) = (raster.width as f64, raster.height as f64);
    if x <= -1.0 || y <= -1.0 || x >= w || y >= h {
        return TRANSPARENT;
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let mut acc = Accum::default();
    let mut weight_sum = 0.0;

    for ky in -2..=3 {
        for kx in -2..=3 {
            let px = x0 + kx;
            let py = y0 + ky;
            let weight = lanczos_weight(x - px as f64, 3.0) * lanczos_weight(y - py as f64, 3.0);
            weight_sum += weight;
            if in_bounds(raster, px, py) {
                acc.add(raster.pixel(px as u32, py as u32), weight);
            }
        }
    }

    acc.finish(weight_sum)
}

/// Lanczos kernel weight function.
///
/// ```text
/// L(x) = sinc(x) * sinc(x/a)  for |x| < a
/// L(x) = 0                     for |x| >= a
/// ```
///
/// where sinc(x) = sin(πx) / (πx)
pub(crate) fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;
    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}
