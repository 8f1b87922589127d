use mv_core::geometry::{
    model_properties, normalize, CameraFit, ModelProperties, NormalizeOptions, NormalizeOutcome,
    SceneNode,
};
use serde::Serialize;

use crate::error::AssetError;

#[derive(Debug, Clone)]
pub struct AnalyzeRequest {
    pub scene: SceneNode,
    pub camera: CameraFit,
    /// `None` skips normalization.
    pub normalize: Option<NormalizeOptions>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// Extent and camera of the scene as given.
    pub properties: ModelProperties,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalization: Option<NormalizeOutcome>,
}

/// Bounding box, dimensions and an auto-fit camera for an already-parsed
/// scene, plus the uniform fit the viewer would apply to it.
/// 为已解析的场景计算包围盒、尺寸与自适应相机。
#[derive(Debug, Default, Clone, Copy)]
pub struct AnalyzeGeometry;

impl AnalyzeGeometry {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(&self, request: AnalyzeRequest) -> Result<AnalysisReport, AssetError> {
        let primitives = request.scene.primitive_count();
        let properties = model_properties(&request.scene, &request.camera)?;

        let normalization = match request.normalize {
            Some(options) => {
                let mut scene = request.scene;
                Some(normalize(&mut scene, &options)?)
            }
            None => None,
        };

        tracing::debug!(
            primitives,
            max_dimension = properties.bounding_box.max_dimension(),
            normalized = normalization.is_some(),
            "Analyzed scene"
        );
        Ok(AnalysisReport {
            properties,
            normalization,
        })
    }
}
