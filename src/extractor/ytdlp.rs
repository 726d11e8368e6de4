//! `yt-dlp` subprocess integration.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use super::traits::{ExtractorError, MediaExtractor};
use super::types::MediaInfo;
use crate::config::ExtractorConfig;
use crate::staging::output_template;

/// Extractor backed by the `yt-dlp` binary.
///
/// A single invocation downloads the media, runs the ffmpeg
/// post-processor to normalize the container, and dumps the info dict
/// as JSON on stdout (`--no-simulate --dump-json`), so one blocking
/// call yields both the artifact and its metadata.
pub struct YtDlp {
    program: PathBuf,
    config: ExtractorConfig,
}

impl YtDlp {
    /// Resolves the configured binary on PATH up front. A missing
    /// binary is reported at spawn time with a clear error, so startup
    /// only warns.
    pub fn new(config: ExtractorConfig) -> Self {
        let program = which::which(&config.binary).unwrap_or_else(|_| {
            warn!(binary = %config.binary, "extractor binary not found on PATH");
            PathBuf::from(&config.binary)
        });
        Self { program, config }
    }

    /// Best combined stream under the height ceiling, falling back to
    /// best available.
    fn format_selector(&self) -> String {
        let height = self.config.max_height;
        format!("bestvideo[height<={height}]+bestaudio/best[height<={height}]/best")
    }

    fn build_args(&self, url: &str, output_template: &Path) -> Vec<String> {
        vec![
            "--no-simulate".to_string(),
            "--dump-json".to_string(),
            "--no-playlist".to_string(),
            "--socket-timeout".to_string(),
            self.config.socket_timeout_secs.to_string(),
            "--format".to_string(),
            self.format_selector(),
            "--recode-video".to_string(),
            self.config.container.clone(),
            "--output".to_string(),
            output_template.to_string_lossy().into_owned(),
            url.to_string(),
        ]
    }
}

/// Extracts the failure detail from yt-dlp's stderr: the last
/// `ERROR:` line with the prefix stripped, or the last non-empty line
/// when no such marker exists.
fn failure_message(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);

    if let Some(message) = text.lines().rev().find_map(|line| {
        line.trim()
            .strip_prefix("ERROR:")
            .map(|rest| rest.trim().to_string())
            .filter(|rest| !rest.is_empty())
    }) {
        return message;
    }

    text.lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| "extractor exited with an error".to_string())
}

#[async_trait]
impl MediaExtractor for YtDlp {
    async fn download(&self, url: &str, staging: &Path) -> Result<MediaInfo, ExtractorError> {
        let template = output_template(staging);
        let args = self.build_args(url, &template);

        debug!(program = %self.program.display(), ?args, "invoking extractor");

        let output = Command::new(&self.program)
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ExtractorError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(ExtractorError::Failed(failure_message(&output.stderr)));
        }

        let info: MediaInfo = serde_json::from_slice(&output.stdout)?;
        Ok(info)
    }
}
