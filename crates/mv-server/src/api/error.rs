//! Use-case errors mapped onto HTTP responses.
//! 用例错误到 HTTP 响应的映射。

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use mv_app::AssetError;
use mv_core::ValidationError;

use super::dto::ErrorBody;

/// Handler-level error. Everything a handler returns as `Err` goes through
/// here, so every failure reaches the client as `{ success:false, ... }`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    detail: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<AssetError> for ApiError {
    fn from(err: AssetError) -> Self {
        match err {
            AssetError::Validation(err) => Self::bad_request(err.to_string()),
            AssetError::NotFound(what) => {
                Self::new(StatusCode::NOT_FOUND, "Model not found").with_detail(what)
            }
            err @ AssetError::DuplicateTitle(_) => Self::new(StatusCode::CONFLICT, err.to_string()),
            AssetError::Geometry(err) => {
                Self::new(StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
            }
            err @ (AssetError::StorageWrite(_) | AssetError::StorageRead(_)) => {
                tracing::error!(error = %err, "Storage failure while handling request");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
                    .with_detail(err.to_string())
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        AssetError::from(err).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            message: self.message,
            error: self.detail,
        };
        (self.status, Json(body)).into_response()
    }
}
