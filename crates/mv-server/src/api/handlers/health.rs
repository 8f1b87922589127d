use axum::Json;

use crate::api::dto::HealthResponse;

/// Liveness check. Only routable after storage init succeeded.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
