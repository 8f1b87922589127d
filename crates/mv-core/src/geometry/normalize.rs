//! Bounding-box computation and scale/center fit.
//! 包围盒计算与缩放/居中归一化。

use glam::{DMat4, DVec3};
use serde::{Deserialize, Serialize};

use super::bounds::BoundingBox;
use super::error::GeometryError;
use super::scene::SceneNode;

/// World-space box enclosing every primitive under `root`.
///
/// The first pass transforms each vertex. If that yields an empty box or any
/// non-finite coordinate, every primitive's local box is transformed into the
/// shared frame instead and the finite results are unioned.
pub fn compute_bounding_box(root: &SceneNode) -> Result<BoundingBox, GeometryError> {
    let mut bounds = BoundingBox::empty();
    let mut finite = true;
    root.visit_primitives(&DMat4::IDENTITY, &mut |world, primitive| {
        for position in &primitive.positions {
            let p = world.transform_point3(*position);
            if p.is_finite() {
                bounds.expand_by_point(p);
            } else {
                finite = false;
            }
        }
    });

    if finite && bounds.is_valid() {
        return Ok(bounds);
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        node = %root.name,
        finite,
        empty = bounds.is_empty(),
        "Vertex bounds unusable, falling back to per-primitive bounds"
    );

    let mut fallback = BoundingBox::empty();
    root.visit_primitives(&DMat4::IDENTITY, &mut |world, primitive| {
        let world_box = primitive.local_bounds().transformed(world);
        if world_box.is_valid() {
            fallback.union(&world_box);
        }
    });

    if fallback.is_valid() {
        Ok(fallback)
    } else {
        Err(GeometryError::DegenerateGeometry)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizeOptions {
    pub target_size: f64,
    /// Put the object's top (max Y) at y = 0. Otherwise the object is
    /// centered on all three axes.
    pub center_on_ground: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            target_size: 2.0,
            center_on_ground: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum NormalizeOutcome {
    #[serde(rename_all = "camelCase")]
    Normalized {
        scale_factor: f64,
        /// The node's translation after the fit
        translation: DVec3,
        /// World-space bounds after the fit
        bounds: BoundingBox,
    },
    /// Zero extent or no usable geometry; the node was left untouched.
    Unchanged,
}

/// Scale `object` uniformly so its largest dimension equals
/// `options.target_size`, then move it so its X/Z center sits at the origin
/// and its max Y sits at 0 (or its full center, see [`NormalizeOptions`]).
pub fn normalize(
    object: &mut SceneNode,
    options: &NormalizeOptions,
) -> Result<NormalizeOutcome, GeometryError> {
    if !(options.target_size.is_finite() && options.target_size > 0.0) {
        return Err(GeometryError::InvalidParameter {
            name: "target_size",
            value: options.target_size,
        });
    }

    let bounds = match compute_bounding_box(object) {
        Ok(bounds) => bounds,
        Err(GeometryError::DegenerateGeometry) => return Ok(NormalizeOutcome::Unchanged),
        Err(err) => return Err(err),
    };

    let max_dimension = bounds.max_dimension();
    if max_dimension <= 0.0 {
        return Ok(NormalizeOutcome::Unchanged);
    }

    let scale_factor = options.target_size / max_dimension;
    object.transform.scale *= scale_factor;

    let scaled = compute_bounding_box(object)?;
    let center = scaled.center();
    let offset = DVec3::new(
        -center.x,
        if options.center_on_ground {
            -scaled.max.y
        } else {
            -center.y
        },
        -center.z,
    );
    object.transform.translation += offset;

    Ok(NormalizeOutcome::Normalized {
        scale_factor,
        translation: object.transform.translation,
        bounds: scaled.translated(offset),
    })
}
