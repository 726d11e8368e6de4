use std::pin::Pin;
use std::task::{Context, Poll};

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use bytes::Bytes;
use futures::Stream;
use http_body_util::BodyExt;
use tokio_util::io::ReaderStream;
use tracing::{error, info};
use uuid::Uuid;

use super::{
    error::ApiError,
    models::{DownloadRequest, HealthResponse, PingResponse},
    state::AppState,
};
use crate::staging::StagingDir;

/// Download endpoint (POST /download)
///
/// The one real operation of the service. It validates the request,
/// then drives the linear acquisition pipeline:
///
/// 1. Parse the JSON body and reject a missing or empty `url` before
///    any side effect
/// 2. Create a scoped staging directory (removed on every exit path)
/// 3. Invoke the external extractor. The call blocks for the duration
///    of the network fetch and transcode; the only timeout is the
///    extractor's own socket timeout
/// 4. Locate the produced artifact by its fixed `video` name prefix
/// 5. Stream the artifact back as `video/mp4` with an attachment
///    disposition
///
/// Failures map through [`ApiError`]: client mistakes and a missing
/// artifact are 400s with fixed messages, extraction and filesystem
/// failures are 500s carrying the underlying message.
pub async fn download(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Body,
) -> Result<impl IntoResponse, ApiError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::InvalidPayload("missing Content-Type header".into()))?;

    super::utils::parse_content_type(content_type)?;

    let body_bytes = read_body(body).await?;
    let request: DownloadRequest = serde_json::from_slice(&body_bytes)?;

    // Only existence and non-emptiness are checked; whitespace-only
    // urls pass through to the extractor.
    let url = request
        .url
        .as_deref()
        .filter(|url| !url.is_empty())
        .ok_or(ApiError::MissingUrl)?;

    let request_id = Uuid::now_v7();
    info!(%request_id, url, "starting download");
    state.metrics.download_started();

    let fail = |err: ApiError| {
        state.metrics.download_failed();
        err
    };

    let staging = StagingDir::create().map_err(|e| {
        fail(ApiError::Internal(format!(
            "failed to create staging directory: {e}"
        )))
    })?;

    let media = state
        .extractor
        .download(url, staging.path())
        .await
        .map_err(|err| {
            error!(%request_id, error = %err, "extraction failed");
            fail(ApiError::from(err))
        })?;

    info!(%request_id, title = media.display_title(), "download complete");

    let artifact = staging
        .locate_artifact(&state.config.extractor.container)
        .map_err(|e| {
            fail(ApiError::Internal(format!(
                "failed to scan staging directory: {e}"
            )))
        })?;

    let Some(artifact) = artifact else {
        return Err(fail(ApiError::NoArtifact));
    };

    let file = tokio::fs::File::open(&artifact)
        .await
        .map_err(|e| fail(ApiError::Internal(format!("failed to open artifact: {e}"))))?;
    let size = file
        .metadata()
        .await
        .map_err(|e| fail(ApiError::Internal(format!("failed to stat artifact: {e}"))))?
        .len();

    info!(%request_id, size_bytes = size, "serving artifact");
    state.metrics.download_completed(size);

    let response_headers = [
        (header::CONTENT_TYPE, "video/mp4".to_string()),
        (header::CONTENT_LENGTH, size.to_string()),
        (
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"video.mp4\"".to_string(),
        ),
    ];
    let body = axum::body::Body::from_stream(ArtifactStream::new(file, staging));

    Ok((StatusCode::OK, response_headers, body))
}

/// Reads the request body into memory.
async fn read_body(body: axum::body::Body) -> Result<Vec<u8>, ApiError> {
    let data = body
        .collect()
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?
        .to_bytes()
        .to_vec();

    Ok(data)
}

/// Health check endpoint (GET /health)
///
/// Unconditional liveness signal.
pub async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
        }),
    )
}

/// Ping endpoint (GET /ping)
///
/// Unconditional liveness signal.
pub async fn ping() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(PingResponse {
            message: "pong".to_string(),
        }),
    )
}

/// Response body that owns the staging directory. The directory (and
/// the artifact inside it) is deleted when the stream is dropped,
/// which happens after the last chunk has been sent.
struct ArtifactStream {
    inner: ReaderStream<tokio::fs::File>,
    _staging: StagingDir,
}

impl ArtifactStream {
    fn new(file: tokio::fs::File, staging: StagingDir) -> Self {
        Self {
            inner: ReaderStream::new(file),
            _staging: staging,
        }
    }
}

impl Stream for ArtifactStream {
    type Item = std::io::Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
