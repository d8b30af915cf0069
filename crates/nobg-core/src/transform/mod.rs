//! Geometric transforms: rotate, translate, scale, shear.
//!
//! A batch applies at most one transform to each processed image, after
//! background removal and before encoding. Every transform returns a new
//! raster; the input is never modified.
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner, y points down
//! - Rotation angles are in degrees, positive = counter-clockwise
//! - Translation is in whole pixels, positive = right/down
//! - Pixels with no source coverage are fully transparent `[0, 0, 0, 0]`
//!
//! # Parameter Bounds
//!
//! | Transform | Parameters | Bounds |
//! |---|---|---|
//! | Rotate | `degrees` | any finite value |
//! | Translate | `dx`, `dy` | `-100..=100` |
//! | Scale | `sx`, `sy` | `0.5..=2.0` |
//! | Shear | `factor` | `-1.0..=1.0` |

mod rotation;
mod sample;
mod scale;
mod shear;
mod translate;

pub use rotation::{apply_rotation, compute_rotated_bounds};
pub use sample::TRANSPARENT;
pub use scale::{apply_scale, resize, scaled_dimensions};
pub use shear::apply_shear;
pub use translate::apply_translation;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::{FilterType, Raster};

/// Largest absolute translation, in pixels.
pub const TRANSLATE_LIMIT: i32 = 100;
/// Smallest scale factor per axis.
pub const SCALE_MIN: f64 = 0.5;
/// Largest scale factor per axis.
pub const SCALE_MAX: f64 = 2.0;
/// Largest absolute shear factor.
pub const SHEAR_LIMIT: f64 = 1.0;

/// Errors that can occur while applying a transform.
#[derive(Debug, Error, PartialEq)]
pub enum TransformError {
    /// A numeric parameter is outside its documented bounds.
    #[error("Parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// The raster has no pixels to transform.
    #[error("Cannot transform an empty image ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    /// The pixel buffer disagrees with the raster's dimensions.
    #[error("Invalid raster: expected {expected} bytes, got {actual}")]
    InvalidRaster { expected: usize, actual: usize },
}

/// The geometric transform applied to each processed image.
///
/// Serialized with an internal `kind` tag, e.g.
/// `{"kind": "scale", "sx": 2.0, "sy": 2.0}`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Transform {
    /// Leave the image as is.
    #[default]
    None,
    /// Rotate about the center, expanding the canvas.
    Rotate { degrees: f64 },
    /// Shift content by whole pixels on a fixed canvas.
    Translate { dx: i32, dy: i32 },
    /// Resize by independent axis factors.
    Scale { sx: f64, sy: f64 },
    /// Horizontal shear `x' = x + factor * y`.
    Shear { factor: f64 },
}

impl Transform {
    /// Short name used in logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Transform::None => "none",
            Transform::Rotate { .. } => "rotate",
            Transform::Translate { .. } => "translate",
            Transform::Scale { .. } => "scale",
            Transform::Shear { .. } => "shear",
        }
    }

    /// Whether this transform leaves every image untouched.
    pub fn is_identity(&self) -> bool {
        match *self {
            Transform::None => true,
            Transform::Rotate { degrees } => degrees == 0.0,
            Transform::Translate { dx, dy } => dx == 0 && dy == 0,
            Transform::Scale { sx, sy } => sx == 1.0 && sy == 1.0,
            Transform::Shear { factor } => factor == 0.0,
        }
    }

    /// Check parameters against their bounds.
    pub fn validate(&self) -> Result<(), TransformError> {
        match *self {
            Transform::None => Ok(()),
            Transform::Rotate { degrees } => {
                if degrees.is_finite() {
                    Ok(())
                } else {
                    Err(TransformError::ParameterOutOfRange {
                        parameter: "degrees",
                        value: degrees,
                        min: f64::MIN,
                        max: f64::MAX,
                    })
                }
            }
            Transform::Translate { dx, dy } => {
                let limit = TRANSLATE_LIMIT as f64;
                check_range("dx", dx as f64, -limit, limit)?;
                check_range("dy", dy as f64, -limit, limit)
            }
            Transform::Scale { sx, sy } => {
                check_range("sx", sx, SCALE_MIN, SCALE_MAX)?;
                check_range("sy", sy, SCALE_MIN, SCALE_MAX)
            }
            Transform::Shear { factor } => check_range("factor", factor, -SHEAR_LIMIT, SHEAR_LIMIT),
        }
    }
}

fn check_range(parameter: &'static str, value: f64, min: f64, max: f64) -> Result<(), TransformError> {
    // NaN fails `contains`, so it is reported as out of range too
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(TransformError::ParameterOutOfRange {
            parameter,
            value,
            min,
            max,
        })
    }
}

/// Apply one transform to a raster.
///
/// Parameters are validated before any pixel work.
///
/// # Errors
///
/// Returns `TransformError::ParameterOutOfRange` for out-of-bounds parameters.
/// Returns `TransformError::EmptyImage` for a zero-sized raster.
pub fn apply_transform(
    raster: &Raster,
    transform: &Transform,
    filter: FilterType,
) -> Result<Raster, TransformError> {
    transform.validate()?;

    if let Transform::None = transform {
        return Ok(raster.clone());
    }

    if raster.width == 0 || raster.height == 0 {
        return Err(TransformError::EmptyImage {
            width: raster.width,
            height: raster.height,
        });
    }
    if !raster.is_consistent() {
        return Err(TransformError::InvalidRaster {
            expected: raster.pixel_count() * crate::decode::CHANNELS,
            actual: raster.pixels.len(),
        });
    }

    let result = match *transform {
        Transform::None => raster.clone(),
        Transform::Rotate { degrees } => apply_rotation(raster, degrees, filter),
        Transform::Translate { dx, dy } => apply_translation(raster, dx, dy),
        Transform::Scale { sx, sy } => apply_scale(raster, sx, sy, filter)?,
        Transform::Shear { factor } => apply_shear(raster, factor, filter),
    };

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(width: u32, height: u32) -> Raster {
        let mut pixels = Vec::new();
        for y in 0..height {
            for x in 0..width {
                let v = if (x + y) % 2 == 0 { 255 } else { 0 };
                pixels.extend_from_slice(&[v, v, v, 255]);
            }
        }
        Raster::new(width, height, pixels)
    }

    #[test]
    fn test_none_returns_copy() {
        let img = checker(5, 5);
        assert_eq!(
            apply_transform(&img, &Transform::None, FilterType::Bilinear).unwrap(),
            img
        );
    }

    #[test]
    fn test_rotate_zero_identity() {
        let img = checker(9, 4);
        let out = apply_transform(&img, &Transform::Rotate { degrees: 0.0 }, FilterType::Bilinear)
            .unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn test_shear_zero_identity() {
        let img = checker(9, 4);
        let out =
            apply_transform(&img, &Transform::Shear { factor: 0.0 }, FilterType::Lanczos3).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn test_scale_boundaries() {
        let img = checker(300, 300);
        let half = apply_transform(&img, &Transform::Scale { sx: 0.5, sy: 0.5 }, FilterType::Bilinear)
            .unwrap();
        assert_eq!((half.width, half.height), (150, 150));

        let double = apply_transform(&img, &Transform::Scale { sx: 2.0, sy: 2.0 }, FilterType::Bilinear)
            .unwrap();
        assert_eq!((double.width, double.height), (600, 600));
    }

    #[test]
    fn test_out_of_range_parameters() {
        let img = checker(4, 4);
        let cases = [
            (Transform::Translate { dx: 101, dy: 0 }, "dx"),
            (Transform::Translate { dx: 0, dy: -101 }, "dy"),
            (Transform::Scale { sx: 0.49, sy: 1.0 }, "sx"),
            (Transform::Scale { sx: 1.0, sy: 2.01 }, "sy"),
            (Transform::Scale { sx: f64::NAN, sy: 1.0 }, "sx"),
            (Transform::Shear { factor: 1.5 }, "factor"),
            (Transform::Shear { factor: -1.01 }, "factor"),
            (Transform::Rotate { degrees: f64::INFINITY }, "degrees"),
        ];
        for (transform, expected) in cases {
            match apply_transform(&img, &transform, FilterType::Bilinear) {
                Err(TransformError::ParameterOutOfRange { parameter, .. }) => {
                    assert_eq!(parameter, expected, "{:?}", transform)
                }
                other => panic!("expected ParameterOutOfRange for {:?}, got {:?}", transform, other),
            }
        }
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let img = checker(4, 4);
        for transform in [
            Transform::Translate { dx: 100, dy: -100 },
            Transform::Scale { sx: 0.5, sy: 2.0 },
            Transform::Shear { factor: -1.0 },
            Transform::Shear { factor: 1.0 },
            Transform::Rotate { degrees: -180.0 },
            Transform::Rotate { degrees: 1234.5 },
        ] {
            assert!(apply_transform(&img, &transform, FilterType::Bilinear).is_ok());
        }
    }

    #[test]
    fn test_empty_image_rejected() {
        let empty = Raster {
            width: 0,
            height: 3,
            pixels: vec![],
        };
        assert_eq!(
            apply_transform(&empty, &Transform::Shear { factor: 0.5 }, FilterType::Bilinear),
            Err(TransformError::EmptyImage { width: 0, height: 3 })
        );
    }

    #[test]
    fn test_parameters_checked_before_raster() {
        let empty = Raster {
            width: 0,
            height: 0,
            pixels: vec![],
        };
        assert!(matches!(
            apply_transform(&empty, &Transform::Shear { factor: 3.0 }, FilterType::Bilinear),
            Err(TransformError::ParameterOutOfRange { .. })
        ));
    }

    #[test]
    fn test_transform_serde_tagging() {
        let t: Transform = serde_json::from_str(r#"{"kind":"scale","sx":2.0,"sy":0.5}"#).unwrap();
        assert_eq!(t, Transform::Scale { sx: 2.0, sy: 0.5 });

        let t: Transform = serde_json::from_str(r#"{"kind":"none"}"#).unwrap();
        assert_eq!(t, Transform::None);

        let json = serde_json::to_string(&Transform::Translate { dx: -3, dy: 4 }).unwrap();
        assert_eq!(json, r#"{"kind":"translate","dx":-3,"dy":4}"#);
    }

    #[test]
    fn test_identity_detection() {
        assert!(Transform::None.is_identity());
        assert!(Transform::Rotate { degrees: 0.0 }.is_identity());
        assert!(Transform::Scale { sx: 1.0, sy: 1.0 }.is_identity());
        assert!(!Transform::Shear { factor: 0.1 }.is_identity());
        assert_eq!(Transform::Translate { dx: 1, dy: 0 }.name(), "translate");
    }

    #[test]
    fn test_error_message() {
        let err = Transform::Shear { factor: 2.0 }.validate().unwrap_err();
        assert_eq!(err.to_string(), "Parameter factor = 2 is out of range [-1, 1]");
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn raster_strategy() -> impl Strategy<Value = Raster> {
        (1u32..=24, 1u32..=24).prop_flat_map(|(w, h)| {
            let size = w as usize * h as usize * 4;
            prop::collection::vec(any::<u8>(), size..=size)
                .prop_map(move |pixels| Raster::new(w, h, pixels))
        })
    }

    proptest! {
        /// Property: Shear(0) is pixel-for-pixel identity.
        #[test]
        fn prop_zero_shear_identity(img in raster_strategy()) {
            let out = apply_transform(&img, &Transform::Shear { factor: 0.0 }, FilterType::Bilinear).unwrap();
            prop_assert_eq!(out, img);
        }

        /// Property: Rotate(0) is pixel-for-pixel identity.
        #[test]
        fn prop_zero_rotation_identity(img in raster_strategy()) {
            let out = apply_transform(&img, &Transform::Rotate { degrees: 0.0 }, FilterType::Lanczos3).unwrap();
            prop_assert_eq!(out, img);
        }

        /// Property: Scale output size follows the rounding rule for every factor in bounds.
        #[test]
        fn prop_scale_dimensions(
            img in raster_strategy(),
            sx in SCALE_MIN..=SCALE_MAX,
            sy in SCALE_MIN..=SCALE_MAX,
        ) {
            let out = apply_transform(&img, &Transform::Scale { sx, sy }, FilterType::Bilinear).unwrap();
            prop_assert_eq!((out.width, out.height), scaled_dimensions(img.width, img.height, sx, sy));
            prop_assert!(out.is_consistent());
        }

        /// Property: Shear never changes the canvas.
        #[test]
        fn prop_shear_keeps_canvas(img in raster_strategy(), factor in -SHEAR_LIMIT..=SHEAR_LIMIT) {
            let out = apply_transform(&img, &Transform::Shear { factor }, FilterType::Bilinear).unwrap();
            prop_assert_eq!((out.width, out.height), (img.width, img.height));
        }

        /// Property: Rotation output always contains the source extent.
        #[test]
        fn prop_rotation_bounds_cover_source(img in raster_strategy(), degrees in -180.0f64..=180.0) {
            let out = apply_transform(&img, &Transform::Rotate { degrees }, FilterType::Bilinear).unwrap();
            prop_assert!(out.width >= 1 && out.height >= 1);
            prop_assert!(out.is_consistent());
        }
    }
}
