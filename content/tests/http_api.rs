use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode};
use common::{LocalStorage, Storage};
use content::server::{ContentServer, ContentServerConfig};
use content::uploads::UploadLimits;
use content::{ContentDbBuilder, StrategyRecord, VideoRecord};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "academy-test-boundary";

struct TestServer {
    router: Router,
    data_dir: TempDir,
    uploads_dir: TempDir,
}

async fn server_with_limits(limits: UploadLimits) -> TestServer {
    let data_dir = TempDir::new().unwrap();
    let uploads_dir = TempDir::new().unwrap();
    let data: Arc<dyn Storage> = Arc::new(LocalStorage::open(data_dir.path()).unwrap());
    let uploads: Arc<dyn Storage> = Arc::new(LocalStorage::open(uploads_dir.path()).unwrap());
    let db = ContentDbBuilder::new(data, uploads)
        .with_upload_limits(limits)
        .build()
        .await
        .unwrap();
    let router = ContentServer::new(Arc::new(db), ContentServerConfig::default()).router();
    TestServer {
        router,
        data_dir,
        uploads_dir,
    }
}

async fn server() -> TestServer {
    server_with_limits(UploadLimits::default()).await
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, body.to_vec())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, json: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

/// Builds a multipart body from `(field, optional file name, data)` parts.
fn post_multipart(uri: &str, parts: &[(&str, Option<&str>, &[u8])]) -> Request<Body> {
    let mut body = Vec::new();
    for (name, file_name, data) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        let disposition = match file_name {
            Some(file_name) => format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                name, file_name
            ),
            None => format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name),
        };
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn files_under(dir: &std::path::Path) -> Vec<String> {
    let mut files = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(files_under(&path));
            } else {
                files.push(path.to_string_lossy().into_owned());
            }
        }
    }
    files
}

#[tokio::test]
async fn should_publish_strategy_and_list_it_first() {
    // given
    let server = server().await;
    let (_, _, _) = send(
        &server.router,
        post_json("/api/strategies", r#"{"title":"Trend following","content":"Ride it"}"#),
    )
    .await;

    // when
    let (status, _, body) = send(
        &server.router,
        post_json("/api/strategies", r#"{"title":"Risk 101","content":"Never risk >2%"}"#),
    )
    .await;

    // then
    assert_eq!(status, StatusCode::OK);
    let created: StrategyRecord = serde_json::from_slice(&body).unwrap();
    assert_eq!(created.title, "Risk 101");
    assert_eq!(created.content, "Never risk >2%");
    assert!(!created.id.is_empty());

    let (status, _, body) = send(&server.router, get("/api/strategies")).await;
    assert_eq!(status, StatusCode::OK);
    let listed: Vec<StrategyRecord> = serde_json::from_slice(&body).unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0], created);
    assert_ne!(listed[0].id, listed[1].id);
}

#[tokio::test]
async fn should_reject_missing_fields_and_leave_collection_untouched() {
    // given
    let server = server().await;
    let blob_path = server.data_dir.path().join("strategies.json");
    let before = std::fs::read(&blob_path).unwrap();

    // when
    let (status, _, body) = send(
        &server.router,
        post_json("/api/strategies", r#"{"title":"Risk 101"}"#),
    )
    .await;

    // then
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["status"], "error");
    assert_eq!(error["error"], "title and content are required");
    assert_eq!(std::fs::read(&blob_path).unwrap(), before);
}

#[tokio::test]
async fn should_reject_malformed_json_with_400() {
    let server = server().await;
    let (status, _, _) = send(&server.router, post_json("/api/videos/link", "{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_add_video_link_with_default_category() {
    // given
    let server = server().await;

    // when
    let (status, _, body) = send(
        &server.router,
        post_json(
            "/api/videos/link",
            r#"{"title":"Intro","url":"https://www.youtube.com/embed/abc"}"#,
        ),
    )
    .await;

    // then
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["category"], "General");
    assert_eq!(json["url"], "https://www.youtube.com/embed/abc");
    assert!(json.get("path").is_none());
    assert!(json["createdAt"].is_string());
}

#[tokio::test]
async fn should_serve_uploaded_video_back() {
    // given
    let server = server().await;
    let payload: &[u8] = b"\x00\x00\x00\x18ftypmp42";

    // when
    let (status, _, body) = send(
        &server.router,
        post_multipart(
            "/api/videos/upload",
            &[
                ("title", None, b"Opening range"),
                ("video", Some("orb clip.mp4"), payload),
            ],
        ),
    )
    .await;

    // then
    assert_eq!(status, StatusCode::OK);
    let record: VideoRecord = serde_json::from_slice(&body).unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    let path = json["path"].as_str().unwrap().to_string();
    assert!(path.starts_with("/uploads/videos/"));
    assert!(path.ends_with("-orb-clip.mp4"));
    assert_eq!(record.category, "General");

    let (status, headers, served) = send(&server.router, get(&path)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(served, payload);
    assert_eq!(headers["content-type"], "video/mp4");
}

#[tokio::test]
async fn should_upload_cheat_sheet() {
    // given
    let server = server().await;

    // when
    let (status, _, body) = send(
        &server.router,
        post_multipart(
            "/api/cheatsheets/upload",
            &[
                ("file", Some("candles.pdf"), b"%PDF-1.4"),
                ("title", None, b"Candlestick patterns"),
            ],
        ),
    )
    .await;

    // then
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    let path = json["path"].as_str().unwrap();
    assert!(path.starts_with("/uploads/cheatsheets/"));

    let (_, _, listed) = send(&server.router, get("/api/cheatsheets")).await;
    let listed: Value = serde_json::from_slice(&listed).unwrap();
    assert_eq!(listed[0]["title"], "Candlestick patterns");
    assert_eq!(files_under(server.uploads_dir.path()).len(), 1);
}

#[tokio::test]
async fn should_reject_oversized_upload_and_write_nothing() {
    // given
    let server = server_with_limits(UploadLimits {
        video: 8,
        document: 8,
    })
    .await;
    let videos_blob = server.data_dir.path().join("videos.json");
    let before = std::fs::read(&videos_blob).unwrap();

    // when
    let (status, _, body) = send(
        &server.router,
        post_multipart(
            "/api/videos/upload",
            &[
                ("title", None, b"Too long"),
                ("video", Some("long.mp4"), b"0123456789"),
            ],
        ),
    )
    .await;

    // then
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    let error: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["status"], "error");
    assert!(files_under(server.uploads_dir.path()).is_empty());
    assert_eq!(std::fs::read(&videos_blob).unwrap(), before);
}

#[tokio::test]
async fn should_reject_upload_without_title_and_write_nothing() {
    // given
    let server = server().await;

    // when
    let (status, _, body) = send(
        &server.router,
        post_multipart("/api/videos/upload", &[("video", Some("a.mp4"), b"abc")]),
    )
    .await;

    // then
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["error"], "title is required");
    assert!(files_under(server.uploads_dir.path()).is_empty());
}

#[tokio::test]
async fn should_return_404_for_missing_or_escaping_upload_paths() {
    let server = server().await;

    let (status, _, _) = send(&server.router, get("/uploads/videos/missing.mp4")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = send(&server.router, get("/uploads/videos/..%2F..%2Fvideos.json")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_allow_cross_origin_requests() {
    // given
    let server = server().await;
    let preflight = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/videos/link")
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();

    // when
    let (preflight_status, preflight_headers, _) = send(&server.router, preflight).await;
    let (status, headers, _) = send(&server.router, get("/api/videos")).await;

    // then
    assert_eq!(preflight_status, StatusCode::NO_CONTENT);
    assert_eq!(preflight_headers["access-control-allow-origin"], "*");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn should_expose_health_and_metrics() {
    // given
    let server = server().await;
    send(&server.router, get("/api/videos")).await;

    // when
    let (healthy, _, _) = send(&server.router, get("/-/healthy")).await;
    let (ready, _, _) = send(&server.router, get("/-/ready")).await;
    let (status, _, body) = send(&server.router, get("/metrics")).await;

    // then
    assert_eq!(healthy, StatusCode::OK);
    assert_eq!(ready, StatusCode::OK);
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(body).unwrap();
    assert!(text.contains("# TYPE http_requests counter"));
    assert!(text.contains(
        r#"http_requests_total{method="Get",endpoint="/api/videos",status="200"} 1"#
    ));
    assert!(!text.contains("_total_total"));
}
