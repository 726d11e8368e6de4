use axum::{Json, http::StatusCode, response::IntoResponse};
use thiserror::Error;

use super::models::ErrorResponse;
use crate::extractor::ExtractorError;

/// Typed request-failure union. Each variant maps to exactly one
/// status; the Display text is the `error` field of the JSON body, so
/// the fixed-contract variants spell their wire text verbatim.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request body: {0}")]
    InvalidPayload(String),
    #[error("No URL provided")]
    MissingUrl,
    #[error("Download failed: No file created")]
    NoArtifact,
    #[error("{0}")]
    Extraction(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidPayload(_) | ApiError::MissingUrl | ApiError::NoArtifact => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Extraction(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(value: serde_json::Error) -> Self {
        ApiError::InvalidPayload(value.to_string())
    }
}

impl From<ExtractorError> for ApiError {
    fn from(value: ExtractorError) -> Self {
        ApiError::Extraction(value.to_string())
    }
}
