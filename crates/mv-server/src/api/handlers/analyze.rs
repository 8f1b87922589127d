use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use mv_app::usecases::{AnalysisReport, AnalyzeRequest};

use crate::api::dto::AnalyzeBody;
use crate::api::error::ApiError;
use crate::api::state::AppState;

/// `POST /model/analyze`: bounds, camera fit and optional normalization for
/// a parsed scene graph.
pub async fn analyze_model(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeBody>, JsonRejection>,
) -> Result<Json<AnalysisReport>, ApiError> {
    let Json(body) = body.map_err(|rejection| {
        ApiError::bad_request("Invalid scene payload").with_detail(rejection.body_text())
    })?;

    let request = AnalyzeRequest {
        camera: body.camera_fit(),
        normalize: body.normalize_options(),
        scene: body.scene,
    };
    let report = state.use_cases.analyze_geometry().execute(request)?;
    Ok(Json(report))
}
