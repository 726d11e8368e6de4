//! API models for the download and liveness endpoints.
//!
//! The wire contract is intentionally small:
//! - `POST /download` accepts a [`DownloadRequest`] and answers with
//!   either the binary artifact or an [`ErrorResponse`]
//! - `GET /health` answers [`HealthResponse`]
//! - `GET /ping` answers [`PingResponse`]

use serde::{Deserialize, Serialize};

/// Download request body. `url` is optional at the parse level so a
/// missing key and an explicit empty string share one rejection path.
#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    #[serde(default)]
    pub url: Option<String>,
}

/// Error body shape shared by every failure response: `{error: ...}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PingResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_request_tolerates_missing_url() {
        let request: DownloadRequest = serde_json::from_str("{}").unwrap();
        assert!(request.url.is_none());
    }

    #[test]
    fn download_request_parses_url() {
        let request: DownloadRequest =
            serde_json::from_str(r#"{"url": "https://example.com/v"}"#).unwrap();
        assert_eq!(request.url.as_deref(), Some("https://example.com/v"));
    }
}
