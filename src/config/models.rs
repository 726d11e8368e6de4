use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub extractor: ExtractorConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    "0.0.0.0:5000".parse().unwrap()
}

/// Extractor configuration. These are the fixed download options; they
/// never vary per request.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtractorConfig {
    /// Extractor binary name or path
    #[serde(default = "default_binary")]
    pub binary: String,
    /// Resolution ceiling for stream selection
    #[serde(default = "default_max_height")]
    pub max_height: u32,
    /// Target container the post-processor normalizes to
    #[serde(default = "default_container")]
    pub container: String,
    /// Socket timeout applied to individual network operations inside
    /// the extractor
    #[serde(default = "default_socket_timeout_secs")]
    pub socket_timeout_secs: u64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            max_height: default_max_height(),
            container: default_container(),
            socket_timeout_secs: default_socket_timeout_secs(),
        }
    }
}

fn default_binary() -> String {
    "yt-dlp".to_string()
}

fn default_max_height() -> u32 {
    720
}

fn default_container() -> String {
    "mp4".to_string()
}

fn default_socket_timeout_secs() -> u64 {
    60
}
