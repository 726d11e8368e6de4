//! Configuration management for vidbox
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use vidbox::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Server listening on: {}", config.server.bind_addr);
//! ```
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `VIDBOX__<section>__<key>`
//!
//! Examples:
//! - `VIDBOX__SERVER__BIND_ADDR=0.0.0.0:9000`
//! - `VIDBOX__EXTRACTOR__BINARY=/opt/yt-dlp/yt-dlp`
//!
//! The legacy `PORT` variable (integer) is also honored and overrides
//! only the listener port.
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/vidbox.toml`.
//! This can be overridden using the `VIDBOX_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

pub use models::{Config, ExtractorConfig, ServerConfig};
pub use validation::ValidationError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables (`VIDBOX__*`, then `PORT`)
    /// 2. TOML file (default: `config/vidbox.toml`)
    /// 3. Default values
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file is malformed or
    /// validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    ///
    /// Useful for testing with custom configuration files.
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }
}
