//! Auto-fit camera placement.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::bounds::BoundingBox;
use super::error::GeometryError;

pub const DEFAULT_ASPECT_RATIO: f64 = 16.0 / 9.0;
pub const DEFAULT_MARGIN: f64 = 1.2;
pub const DEFAULT_FOV_DEGREES: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CameraFit {
    pub aspect_ratio: f64,
    pub margin: f64,
    pub fov_degrees: f64,
}

impl Default for CameraFit {
    fn default() -> Self {
        Self {
            aspect_ratio: DEFAULT_ASPECT_RATIO,
            margin: DEFAULT_MARGIN,
            fov_degrees: DEFAULT_FOV_DEGREES,
        }
    }
}

impl CameraFit {
    pub fn with_aspect_ratio(aspect_ratio: f64) -> Self {
        Self {
            aspect_ratio,
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), GeometryError> {
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return Err(GeometryError::InvalidParameter {
                name: "aspect_ratio",
                value: self.aspect_ratio,
            });
        }
        if !(self.margin.is_finite() && self.margin > 0.0) {
            return Err(GeometryError::InvalidParameter {
                name: "margin",
                value: self.margin,
            });
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(GeometryError::InvalidParameter {
                name: "fov_degrees",
                value: self.fov_degrees,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraRecommendation {
    pub position: DVec3,
    /// Vertical field of view in degrees
    pub fov: f64,
}

/// Camera position that frames `bounds`, looking down -Z from in front of it.
///
/// Distance is `maxDim / (2 tan(fov/2))`; objects wider than the viewport
/// (`size.x / size.y > aspect`) use `size.x / (2 tan(fov/2) aspect)` instead.
/// The distance is then multiplied by the margin and applied along Z only.
pub fn recommend_camera(
    bounds: &BoundingBox,
    fit: &CameraFit,
) -> Result<CameraRecommendation, GeometryError> {
    if !bounds.is_valid() {
        return Err(GeometryError::DegenerateGeometry);
    }
    fit.validate()?;

    let center = bounds.center();
    let size = bounds.size();
    let half_fov_tan = (fit.fov_degrees.to_radians() / 2.0).tan();

    let mut distance = size.max_element() / (2.0 * half_fov_tan);

    let object_aspect = size.x / size.y;
    if object_aspect > fit.aspect_ratio {
        distance = size.x / (2.0 * half_fov_tan * fit.aspect_ratio);
    }

    distance *= fit.margin;

    Ok(CameraRecommendation {
        position: center + DVec3::new(0.0, 0.0, distance),
        fov: fit.fov_degrees,
    })
}
