use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::bounds::BoundingBox;
use super::camera::{recommend_camera, CameraFit, CameraRecommendation};
use super::error::GeometryError;
use super::normalize::compute_bounding_box;
use super::scene::SceneNode;

/// Summary of a model's extent and a camera that frames it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelProperties {
    pub bounding_box: BoundingBox,
    pub center: DVec3,
    /// Width, height, depth
    pub dimensions: DVec3,
    pub recommended_camera: CameraRecommendation,
}

pub fn model_properties(
    scene: &SceneNode,
    fit: &CameraFit,
) -> Result<ModelProperties, GeometryError> {
    let bounding_box = compute_bounding_box(scene)?;
    let recommended_camera = recommend_camera(&bounding_box, fit)?;
    Ok(ModelProperties {
        bounding_box,
        center: bounding_box.center(),
        dimensions: bounding_box.size(),
        recommended_camera,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::scene::MeshPrimitive;

    #[test]
    fn properties_of_offset_box() {
        let scene = SceneNode::new("box").with_primitive(MeshPrimitive::from_positions(vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(2.0, 4.0, 6.0),
        ]));
        let props = model_properties(&scene, &CameraFit::default()).unwrap();
        assert_eq!(props.center, DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(props.dimensions, DVec3::new(2.0, 4.0, 6.0));
        assert_eq!(props.recommended_camera.position.x, 1.0);
        assert!(props.recommended_camera.position.z > 3.0);

        let json = serde_json::to_value(&props).unwrap();
        assert_eq!(json["boundingBox"]["max"], serde_json::json!([2.0, 4.0, 6.0]));
        assert_eq!(json["recommendedCamera"]["fov"], serde_json::json!(60.0));
    }

    #[test]
    fn empty_scene_is_degenerate() {
        assert_eq!(
            model_properties(&SceneNode::new("empty"), &CameraFit::default()),
            Err(GeometryError::DegenerateGeometry)
        );
    }
}
