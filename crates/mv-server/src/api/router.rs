use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{add_model, analyze_model, get_all_models, get_model, health};
use super::state::AppState;

/// Room for multipart boundaries and the title field on top of the file.
const MULTIPART_OVERHEAD_BYTES: u64 = 1024 * 1024;

/// HTTP routes of the vault.
///
/// The body limit sits just above the upload ceiling; the upload handler
/// enforces the exact ceiling itself so oversize files get a JSON 400.
pub fn build_router(state: AppState) -> Router {
    let max_upload = state.use_cases.upload_policy().max_bytes;
    let body_limit = usize::try_from(max_upload.saturating_add(MULTIPART_OVERHEAD_BYTES))
        .unwrap_or(usize::MAX);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/model/add", post(add_model))
        .route("/model/get/{title}", get(get_model))
        .route("/model/all", get(get_all_models))
        .route("/model/analyze", post(analyze_model))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
