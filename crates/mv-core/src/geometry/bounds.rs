//! Axis-aligned bounding boxes.

use glam::{DMat4, DVec3};
use serde::{Deserialize, Serialize};

/// Axis-Aligned Bounding Box
///
/// The empty box has `min = +inf` and `max = -inf`, so expanding it by any
/// point yields exactly that point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: DVec3,
    pub max: DVec3,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

impl BoundingBox {
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    pub fn empty() -> Self {
        Self {
            min: DVec3::INFINITY,
            max: DVec3::NEG_INFINITY,
        }
    }

    pub fn from_center_size(center: DVec3, size: DVec3) -> Self {
        let half = size * 0.5;
        Self::new(center - half, center + half)
    }

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a DVec3>) -> Self {
        let mut bounds = Self::empty();
        for point in points {
            bounds.expand_by_point(*point);
        }
        bounds
    }

    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y || self.max.z < self.min.z
    }

    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Non-empty with finite corners.
    pub fn is_valid(&self) -> bool {
        !self.is_empty() && self.is_finite()
    }

    pub fn expand_by_point(&mut self, point: DVec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn union(&mut self, other: &BoundingBox) {
        if other.is_empty() {
            return;
        }
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    pub fn center(&self) -> DVec3 {
        if self.is_empty() {
            return DVec3::ZERO;
        }
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> DVec3 {
        if self.is_empty() {
            return DVec3::ZERO;
        }
        self.max - self.min
    }

    pub fn max_dimension(&self) -> f64 {
        self.size().max_element()
    }

    pub fn translated(&self, offset: DVec3) -> Self {
        if self.is_empty() {
            return *self;
        }
        Self::new(self.min + offset, self.max + offset)
    }

    /// Box enclosing this box's eight corners after `matrix`.
    pub fn transformed(&self, matrix: &DMat4) -> Self {
        if self.is_empty() {
            return *self;
        }
        let corners = [
            DVec3::new(self.min.x, self.min.y, self.min.z),
            DVec3::new(self.min.x, self.min.y, self.max.z),
            DVec3::new(self.min.x, self.max.y, self.min.z),
            DVec3::new(self.min.x, self.max.y, self.max.z),
            DVec3::new(self.max.x, self.min.y, self.min.z),
            DVec3::new(self.max.x, self.min.y, self.max.z),
            DVec3::new(self.max.x, self.max.y, self.min.z),
            DVec3::new(self.max.x, self.max.y, self.max.z),
        ];
        let mut out = Self::empty();
        for corner in corners {
            let p = matrix.transform_point3(corner);
            // NaN would be dropped by f64::min/max; poison the box instead.
            if !p.is_finite() {
                return Self::new(DVec3::NAN, DVec3::NAN);
            }
            out.expand_by_point(p);
        }
        out
    }
}
