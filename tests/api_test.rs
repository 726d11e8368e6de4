use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt; // for `oneshot`

use vidbox::api::router;
use vidbox::api::state::AppState;
use vidbox::config::Config;
use vidbox::extractor::{ExtractorError, MediaExtractor, MediaInfo};

/// Scripted extractor behaviors covering the three interesting
/// outcomes of the external call.
enum StubBehavior {
    /// Succeed and leave a file of the given name and size behind
    WriteFile { name: &'static str, size: usize },
    /// Report success without producing any file
    WriteNothing,
    /// Fail with the given message
    Fail(&'static str),
}

struct StubExtractor {
    behavior: StubBehavior,
    staging_seen: Mutex<Option<PathBuf>>,
}

impl StubExtractor {
    fn new(behavior: StubBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            staging_seen: Mutex::new(None),
        })
    }

    /// Staging directory the extractor was invoked with, if any.
    fn staging_seen(&self) -> Option<PathBuf> {
        self.staging_seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaExtractor for StubExtractor {
    async fn download(&self, _url: &str, staging: &Path) -> Result<MediaInfo, ExtractorError> {
        *self.staging_seen.lock().unwrap() = Some(staging.to_path_buf());

        match &self.behavior {
            StubBehavior::WriteFile { name, size } => {
                tokio::fs::write(staging.join(name), vec![0u8; *size])
                    .await
                    .expect("failed to write stub artifact");
                Ok(MediaInfo {
                    title: Some("stub clip".to_string()),
                    ..MediaInfo::default()
                })
            }
            StubBehavior::WriteNothing => Ok(MediaInfo::default()),
            StubBehavior::Fail(message) => Err(ExtractorError::Failed((*message).to_string())),
        }
    }
}

/// Creates a minimal config for testing, bypassing file-based loading
fn create_test_config() -> Config {
    let config_toml = r#"
[server]
bind_addr = "127.0.0.1:5000"

[extractor]
binary = "yt-dlp"
"#;

    toml::from_str(config_toml).expect("Failed to parse test config")
}

/// Builds a test app around a scripted extractor
fn build_test_app(behavior: StubBehavior) -> (Router, Arc<StubExtractor>) {
    let extractor = StubExtractor::new(behavior);
    let state = AppState::new(create_test_config(), extractor.clone());

    (router(state), extractor)
}

/// Helper to build a POST /download request
fn post_download(body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .uri("/download")
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(body: Body) -> serde_json::Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body was not JSON")
}

#[tokio::test]
async fn test_health_always_healthy() {
    let (app, _) = build_test_app(StubBehavior::Fail("irrelevant"));

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response.into_body()).await,
        json!({"status": "healthy"})
    );
}

#[tokio::test]
async fn test_ping_always_pong() {
    let (app, _) = build_test_app(StubBehavior::Fail("irrelevant"));

    let request = Request::builder().uri("/ping").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response.into_body()).await,
        json!({"message": "pong"})
    );
}

#[tokio::test]
async fn test_download_without_url_key_rejected() {
    let (app, extractor) = build_test_app(StubBehavior::WriteFile {
        name: "video.mp4",
        size: 16,
    });

    let response = app.oneshot(post_download(&json!({}))).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response.into_body()).await,
        json!({"error": "No URL provided"})
    );
    // Rejected before any staging directory exists
    assert!(extractor.staging_seen().is_none());
}

#[tokio::test]
async fn test_download_with_empty_url_rejected() {
    let (app, extractor) = build_test_app(StubBehavior::WriteFile {
        name: "video.mp4",
        size: 16,
    });

    let response = app.oneshot(post_download(&json!({"url": ""}))).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response.into_body()).await,
        json!({"error": "No URL provided"})
    );
    assert!(extractor.staging_seen().is_none());
}

#[tokio::test]
async fn test_download_with_malformed_body_rejected() {
    let (app, _) = build_test_app(StubBehavior::WriteFile {
        name: "video.mp4",
        size: 16,
    });

    let request = Request::builder()
        .uri("/download")
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response.into_body()).await;
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("invalid request body"));
}

#[tokio::test]
async fn test_download_requires_json_content_type() {
    let (app, _) = build_test_app(StubBehavior::WriteFile {
        name: "video.mp4",
        size: 16,
    });

    let request = Request::builder()
        .uri("/download")
        .method("POST")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(r#"{"url": "https://example.com/v"}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_download_streams_artifact() {
    const SIZE: usize = 5_242_880;
    let (app, extractor) = build_test_app(StubBehavior::WriteFile {
        name: "video.mp4",
        size: SIZE,
    });

    let response = app
        .oneshot(post_download(&json!({"url": "https://example.com/video123"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "video/mp4"
    );
    assert_eq!(
        response.headers().get(header::CONTENT_LENGTH).unwrap(),
        &SIZE.to_string()
    );
    assert_eq!(
        response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=\"video.mp4\""
    );

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(bytes.len(), SIZE);

    // Staging directory is gone once the stream has been consumed
    let staging = extractor.staging_seen().unwrap();
    assert!(!staging.exists());
}

#[tokio::test]
async fn test_download_picks_artifact_by_prefix() {
    // Extractor leaves a non-mp4 container behind; the prefix scan
    // still finds it
    let (app, _) = build_test_app(StubBehavior::WriteFile {
        name: "video.webm",
        size: 64,
    });

    let response = app
        .oneshot(post_download(&json!({"url": "https://example.com/v"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(bytes.len(), 64);
}

#[tokio::test]
async fn test_extractor_failure_maps_to_500_with_message() {
    let (app, extractor) = build_test_app(StubBehavior::Fail("unsupported URL"));

    let response = app
        .oneshot(post_download(&json!({"url": "not-a-real-url"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response.into_body()).await,
        json!({"error": "unsupported URL"})
    );

    // Staging directory torn down on the failure path too
    let staging = extractor.staging_seen().unwrap();
    assert!(!staging.exists());
}

#[tokio::test]
async fn test_missing_artifact_maps_to_400() {
    let (app, extractor) = build_test_app(StubBehavior::WriteNothing);

    let response = app
        .oneshot(post_download(&json!({"url": "https://example.com/v"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response.into_body()).await,
        json!({"error": "Download failed: No file created"})
    );

    let staging = extractor.staging_seen().unwrap();
    assert!(!staging.exists());
}
