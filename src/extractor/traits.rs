use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use super::types::MediaInfo;

/// Extraction failures. Display text is what the client sees in the
/// error response body, so variants carry the raw underlying detail.
#[derive(Debug, Error)]
pub enum ExtractorError {
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}")]
    Failed(String),
    #[error("could not parse extractor metadata: {0}")]
    Metadata(#[from] serde_json::Error),
}

/// Media extraction trait.
///
/// One call fetches the media behind `url` into `staging` and performs
/// container normalization. The call blocks for the duration of the
/// network fetch and local transcode; the only timeout applied is the
/// implementation's own per-socket timeout.
#[async_trait]
pub trait MediaExtractor: Send + Sync {
    /// Download and transcode, returning the extracted metadata.
    async fn download(&self, url: &str, staging: &Path) -> Result<MediaInfo, ExtractorError>;
}
