//! Geometry normalization: bounding boxes, scale/center fit and camera
//! auto-fit over already-parsed scene graphs. Pure functions, no I/O.

mod analysis;
mod bounds;
mod camera;
mod error;
mod normalize;
mod scene;

pub use analysis::{model_properties, ModelProperties};
pub use bounds::BoundingBox;
pub use camera::{
    recommend_camera, CameraFit, CameraRecommendation, DEFAULT_ASPECT_RATIO, DEFAULT_FOV_DEGREES,
    DEFAULT_MARGIN,
};
pub use error::GeometryError;
pub use normalize::{compute_bounding_box, normalize, NormalizeOptions, NormalizeOutcome};
pub use scene::{MeshPrimitive, SceneNode, Transform};
