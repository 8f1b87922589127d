//! `/model/*` handlers: upload, download and listing.
//! 模型上传、下载与列表处理器。

use axum::body::Body;
use axum::extract::multipart::{Field, MultipartRejection};
use axum::extract::{Multipart, Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::BytesMut;
use mv_app::usecases::{IncomingFile, UploadRequest};
use mv_core::blob::DEFAULT_CONTENT_TYPE;
use mv_core::ValidationError;

use crate::api::dto::{ListResponse, ModelDto, UploadResponse};
use crate::api::error::ApiError;
use crate::api::state::AppState;

const TITLE_FIELD: &str = "title";
const FILE_FIELD: &str = "file";

/// `POST /model/add`: multipart `title` + `file`.
pub async fn add_model(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let mut multipart = multipart.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Upload is not a multipart body");
        ApiError::from(ValidationError::MissingFile).with_detail(rejection.body_text())
    })?;

    let limit = state.use_cases.upload_policy().max_bytes;
    let mut request = UploadRequest::default();

    while let Some(field) = multipart.next_field().await.map_err(|err| {
        ApiError::bad_request("Malformed multipart body").with_detail(err.body_text())
    })? {
        match field.name() {
            Some(TITLE_FIELD) => {
                let title = field.text().await.map_err(|err| {
                    ApiError::bad_request("Malformed title field").with_detail(err.body_text())
                })?;
                request.title = Some(title);
            }
            Some(FILE_FIELD) => request.file = Some(read_file(field, limit).await?),
            other => tracing::debug!(field = ?other, "Ignoring unexpected multipart field"),
        }
    }

    let uploaded = state.use_cases.upload_asset().execute(request).await?;
    tracing::info!(
        title = %uploaded.record.title,
        bytes = uploaded.blob.length,
        "Model created"
    );

    let body = UploadResponse {
        success: true,
        message: "Model created successfully".to_string(),
        model: ModelDto::from(uploaded),
    };
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

/// Buffers the file part, reading at most `limit + 1` bytes so an oversized
/// upload is rejected without holding the whole body.
async fn read_file(mut field: Field<'_>, limit: u64) -> Result<IncomingFile, ApiError> {
    let original_name = field.file_name().unwrap_or_default().to_string();
    let content_type = field.content_type().map(str::to_string);

    let mut data = BytesMut::new();
    while let Some(chunk) = field.chunk().await.map_err(|err| {
        ApiError::bad_request("Malformed file field").with_detail(err.body_text())
    })? {
        data.extend_from_slice(&chunk);
        let size = data.len() as u64;
        if size > limit {
            tracing::info!(
                filename = %original_name,
                received = size,
                limit,
                "Rejecting oversized upload"
            );
            return Err(ValidationError::PayloadTooLarge { size, limit }.into());
        }
    }

    Ok(IncomingFile {
        original_name,
        content_type,
        data: data.freeze(),
    })
}

/// `GET /model/get/{title}`: streams the blob chunk by chunk.
pub async fn get_model(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> Result<Response, ApiError> {
    let download = state.use_cases.download_asset().execute(&title).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_str(&download.content_type)
            .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_CONTENT_TYPE)),
    );
    headers.insert(CONTENT_LENGTH, HeaderValue::from(download.blob.length));
    headers.insert(
        CONTENT_DISPOSITION,
        content_disposition(&download.record.stored_filename),
    );

    Ok((StatusCode::OK, headers, Body::from_stream(download.stream)).into_response())
}

/// `inline` disposition naming `filename`. Non-ASCII names get an ASCII
/// `filename` fallback plus an RFC 5987 `filename*`.
/// 非 ASCII 文件名同时给出 ASCII 回退与 UTF-8 编码的 `filename*`。
fn content_disposition(filename: &str) -> HeaderValue {
    let fallback: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect();
    let value = if fallback == filename {
        format!("inline; filename=\"{fallback}\"")
    } else {
        format!(
            "inline; filename=\"{fallback}\"; filename*=UTF-8''{}",
            ext_value_encode(filename)
        )
    };
    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("inline"))
}

/// Percent-encode everything outside RFC 5987 `attr-char`.
fn ext_value_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len() * 3);
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'!'
            | b'#'
            | b'$'
            | b'&'
            | b'+'
            | b'-'
            | b'.'
            | b'^'
            | b'_'
            | b'`'
            | b'|'
            | b'~' => out.push(byte as char),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// `GET /model/all`: every record, newest first. An empty store is `200 []`.
pub async fn get_all_models(State(state): State<AppState>) -> Result<Json<ListResponse>, ApiError> {
    let models = state.use_cases.list_assets().execute().await?;
    Ok(Json(ListResponse {
        success: true,
        models,
    }))
}
