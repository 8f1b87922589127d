//! Already-parsed scene graph consumed by the normalizer.
//!
//! Decoding model formats happens elsewhere; these types only carry what the
//! bounding-box and fit computations need.

use glam::{DMat4, DQuat, DVec3};
use serde::{Deserialize, Serialize};

use super::bounds::BoundingBox;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub translation: DVec3,
    pub rotation: DQuat,
    pub scale: DVec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: DVec3::ZERO,
            rotation: DQuat::IDENTITY,
            scale: DVec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_translation(translation: DVec3) -> Self {
        Self {
            translation,
            ..Self::default()
        }
    }

    pub fn matrix(&self) -> DMat4 {
        DMat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// One drawable part of a mesh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MeshPrimitive {
    /// Vertex positions in the primitive's local frame
    pub positions: Vec<DVec3>,

    /// Bounds declared by the source file (glTF accessor min/max). Used by the
    /// per-primitive fallback when present and valid.
    pub declared_bounds: Option<BoundingBox>,
}

impl MeshPrimitive {
    pub fn from_positions(positions: Vec<DVec3>) -> Self {
        Self {
            positions,
            declared_bounds: None,
        }
    }

    /// Local-frame bounds: declared bounds when valid, otherwise the finite
    /// vertex positions.
    pub fn local_bounds(&self) -> BoundingBox {
        if let Some(declared) = self.declared_bounds.filter(BoundingBox::is_valid) {
            return declared;
        }
        BoundingBox::from_points(self.positions.iter().filter(|p| p.is_finite()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneNode {
    pub name: String,
    pub transform: Transform,
    pub primitives: Vec<MeshPrimitive>,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_primitive(mut self, primitive: MeshPrimitive) -> Self {
        self.primitives.push(primitive);
        self
    }

    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    /// Visit every primitive with its world matrix. The node's own transform
    /// is part of the world matrix.
    pub fn visit_primitives<F>(&self, parent: &DMat4, visit: &mut F)
    where
        F: FnMut(&DMat4, &MeshPrimitive),
    {
        let world = *parent * self.transform.matrix();
        for primitive in &self.primitives {
            visit(&world, primitive);
        }
        for child in &self.children {
            child.visit_primitives(&world, visit);
        }
    }

    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
            + self
                .children
                .iter()
                .map(SceneNode::primitive_count)
                .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_matrix_composes_parent_and_child() {
        let child = SceneNode::new("child")
            .with_transform(Transform::from_translation(DVec3::new(0.0, 1.0, 0.0)))
            .with_primitive(MeshPrimitive::from_positions(vec![DVec3::ZERO]));
        let root = SceneNode::new("root")
            .with_transform(Transform {
                scale: DVec3::splat(2.0),
                ..Transform::default()
            })
            .with_child(child);

        let mut seen = Vec::new();
        root.visit_primitives(&DMat4::IDENTITY, &mut |world, prim| {
            seen.push(world.transform_point3(prim.positions[0]));
        });
        assert_eq!(seen, vec![DVec3::new(0.0, 2.0, 0.0)]);
        assert_eq!(root.primitive_count(), 1);
    }

    #[test]
    fn local_bounds_prefers_valid_declared_bounds() {
        let declared = BoundingBox::new(DVec3::splat(-5.0), DVec3::splat(5.0));
        let prim = MeshPrimitive {
            positions: vec![DVec3::ZERO, DVec3::ONE],
            declared_bounds: Some(declared),
        };
        assert_eq!(prim.local_bounds(), declared);

        let invalid = MeshPrimitive {
            positions: vec![DVec3::ZERO, DVec3::new(f64::NAN, 0.0, 0.0), DVec3::ONE],
            declared_bounds: Some(BoundingBox::empty()),
        };
        assert_eq!(
            invalid.local_bounds(),
            BoundingBox::new(DVec3::ZERO, DVec3::ONE)
        );
    }

    #[test]
    fn transform_deserializes_with_defaults() {
        let t: Transform = serde_json::from_str(r#"{"translation":[1.0,2.0,3.0]}"#).unwrap();
        assert_eq!(t.translation, DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.rotation, DQuat::IDENTITY);
        assert_eq!(t.scale, DVec3::ONE);
    }
}
