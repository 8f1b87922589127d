//! HTTP API tests driving the router in-process
//! 通过进程内路由驱动的 HTTP 接口测试

use axum::body::Body;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mv_core::config::AppConfig;
use mv_server::bootstrap::wire_dependencies;
use mv_server::{build_router, AppState};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "modelvault-test-boundary";

struct TestServer {
    router: Router,
    _dir: TempDir,
}

fn server_with_limit(max_bytes: u64) -> TestServer {
    let dir = TempDir::new().unwrap();
    let mut config = AppConfig::default();
    config.storage.database_url = dir.path().join("vault.db").to_str().unwrap().to_string();
    config.upload.max_bytes = max_bytes;
    config.janitor.enabled = false;

    let wired = wire_dependencies(&config).unwrap();
    TestServer {
        router: build_router(AppState::new(wired.use_cases)),
        _dir: dir,
    }
}

fn server() -> TestServer {
    server_with_limit(AppConfig::default().upload.max_bytes)
}

struct FilePart<'a> {
    filename: &'a str,
    content_type: &'a str,
    data: &'a [u8],
}

fn upload_request(title: Option<&str>, file: Option<FilePart<'_>>) -> Request<Body> {
    let mut body = Vec::new();
    if let Some(title) = title {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"title\"\r\n\r\n{title}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(file) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                file.filename, file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(file.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/model/add")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn glb(data: &[u8]) -> FilePart<'_> {
    FilePart {
        filename: "bee.glb",
        content_type: "model/gltf-binary",
        data,
    }
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, body.to_vec())
}

async fn send_json(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, _, body) = send(router, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, value: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(value.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_upload_list_download_roundtrip() {
    let server = server();
    // spans three 255 KiB chunks
    let data: Vec<u8> = (0..600_000u32).map(|i| (i % 251) as u8).collect();

    let (status, body) =
        send_json(&server.router, upload_request(Some("Bee"), Some(glb(&data)))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Model created successfully");
    assert_eq!(body["model"]["title"], "Bee");
    assert_eq!(body["model"]["fileInfo"]["length"], 600_000);
    assert_eq!(body["model"]["fileInfo"]["contentType"], "model/gltf-binary");
    let stored = body["model"]["storedFilename"].as_str().unwrap().to_string();
    assert!(stored.ends_with("-bee.glb"));

    let (status, body) = send_json(&server.router, get("/model/all")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["models"].as_array().unwrap().len(), 1);
    assert_eq!(body["models"][0]["title"], "Bee");

    let (status, headers, bytes) = send(&server.router, get("/model/get/Bee")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[CONTENT_TYPE], "model/gltf-binary");
    assert_eq!(headers[CONTENT_LENGTH], "600000");
    assert_eq!(
        headers[CONTENT_DISPOSITION].to_str().unwrap(),
        format!("inline; filename=\"{stored}\"")
    );
    assert_eq!(bytes, data);
}

#[tokio::test]
async fn test_title_with_spaces_is_reachable_via_encoded_path() {
    let server = server();
    let (status, _) = send_json(
        &server.router,
        upload_request(Some("Queen Bee"), Some(glb(b"glTF1234"))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _, bytes) = send(&server.router, get("/model/get/Queen%20Bee")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, b"glTF1234");
}

#[tokio::test]
async fn test_non_ascii_filename_downloads_with_encoded_disposition() {
    let server = server();
    let part = FilePart {
        filename: "蜜蜂.glb",
        content_type: "model/gltf-binary",
        data: b"glTFhoney",
    };
    let (status, body) = send_json(&server.router, upload_request(Some("Honey"), Some(part))).await;
    assert_eq!(status, StatusCode::CREATED);
    let stored = body["model"]["storedFilename"].as_str().unwrap().to_string();
    assert!(stored.ends_with("-蜜蜂.glb"));

    let (status, headers, bytes) = send(&server.router, get("/model/get/Honey")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, b"glTFhoney");
    let disposition = headers[CONTENT_DISPOSITION].to_str().unwrap();
    let prefix = stored.trim_end_matches("蜜蜂.glb");
    assert_eq!(
        disposition,
        format!(
            "inline; filename=\"{prefix}__.glb\"; filename*=UTF-8''{prefix}%E8%9C%9C%E8%9C%82.glb"
        )
    );
}

#[tokio::test]
async fn test_missing_file_is_bad_request() {
    let server = server();
    let (status, body) = send_json(&server.router, upload_request(Some("Bee"), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "No file uploaded");
}

#[tokio::test]
async fn test_non_multipart_upload_is_bad_request() {
    let server = server();
    let (status, body) = send_json(&server.router, post_json("/model/add", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No file uploaded");
}

#[tokio::test]
async fn test_missing_title_is_bad_request() {
    let server = server();
    let (status, body) = send_json(&server.router, upload_request(None, Some(glb(b"glTF")))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("title"));

    let (_, body) = send_json(&server.router, get("/model/all")).await;
    assert!(body["models"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_gltf_json_file_is_rejected() {
    let server = server();
    let part = FilePart {
        filename: "scene.gltf",
        content_type: "model/gltf+json",
        data: b"{\"asset\":{\"version\":\"2.0\"}}",
    };
    let (status, body) = send_json(&server.router, upload_request(Some("Scene"), Some(part))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("scene.gltf"));
}

#[tokio::test]
async fn test_payload_over_ceiling_is_rejected_and_exact_ceiling_accepted() {
    let server = server_with_limit(1024);

    let (status, body) = send_json(
        &server.router,
        upload_request(Some("Big"), Some(glb(&[7u8; 1025]))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().starts_with("File too large"));

    let (status, _) = send_json(
        &server.router,
        upload_request(Some("Exact"), Some(glb(&[7u8; 1024]))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_duplicate_title_is_conflict() {
    let server = server();
    let (status, _) =
        send_json(&server.router, upload_request(Some("Bee"), Some(glb(b"first")))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) =
        send_json(&server.router, upload_request(Some("Bee"), Some(glb(b"second")))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);

    // the first upload is untouched
    let (_, _, bytes) = send(&server.router, get("/model/get/Bee")).await;
    assert_eq!(bytes, b"first");
}

#[tokio::test]
async fn test_unknown_title_is_not_found() {
    let server = server();
    let (status, body) = send_json(&server.router, get("/model/get/Nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Model not found");
}

#[tokio::test]
async fn test_empty_listing_is_success() {
    let server = server();
    let (status, body) = send_json(&server.router, get("/model/all")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "models": [] }));
}

fn cube_scene(side: f64) -> Value {
    let h = side / 2.0;
    let mut positions = Vec::new();
    for x in [-h, h] {
        for y in [-h, h] {
            for z in [-h, h] {
                positions.push(json!([x, y, z]));
            }
        }
    }
    json!({ "name": "cube", "primitives": [{ "positions": positions }] })
}

#[tokio::test]
async fn test_analyze_reports_bounds_camera_and_fit() {
    let server = server();
    let (status, body) = send_json(
        &server.router,
        post_json(
            "/model/analyze",
            json!({ "scene": cube_scene(4.0), "targetSize": 2.0 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["properties"]["boundingBox"]["min"], json!([-2.0, -2.0, -2.0]));
    assert_eq!(body["properties"]["dimensions"], json!([4.0, 4.0, 4.0]));
    assert_eq!(body["properties"]["recommendedCamera"]["fov"], 60.0);
    assert_eq!(body["normalization"]["status"], "normalized");
    assert_eq!(body["normalization"]["scaleFactor"], 0.5);
}

#[tokio::test]
async fn test_analyze_without_geometry_is_unprocessable() {
    let server = server();
    let (status, body) = send_json(
        &server.router,
        post_json("/model/analyze", json!({ "scene": { "name": "empty" } })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_analyze_rejects_malformed_payload() {
    let server = server();
    let (status, body) = send_json(
        &server.router,
        post_json("/model/analyze", json!({ "scene": 42 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid scene payload");
}

#[tokio::test]
async fn test_health() {
    let server = server();
    let (status, body) = send_json(&server.router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}
