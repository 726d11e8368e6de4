use super::models::Config;
use config::{ConfigError, Environment, File};
use std::env;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "VIDBOX_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/vidbox.toml";
const ENV_PREFIX: &str = "VIDBOX";
const ENV_SEPARATOR: &str = "__";

/// Load configuration from multiple sources with priority:
/// 1. Defaults (embedded in structs)
/// 2. TOML file (if exists)
/// 3. Environment variables from .env file (via dotenvy)
/// 4. System environment variables (highest priority)
///
/// The legacy `PORT` variable is applied last and replaces only the
/// port of the bind address, keeping the all-interfaces bind.
pub fn load() -> Result<Config, ConfigError> {
    // Load .env file if it exists (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    let config_path = env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

    let mut config = load_from_sources(config_path)?;

    if let Ok(port) = env::var("PORT") {
        override_port(&mut config, &port);
    }

    Ok(config)
}

fn override_port(config: &mut Config, value: &str) {
    match value.parse::<u16>() {
        Ok(port) => config.server.bind_addr.set_port(port),
        Err(_) => tracing::warn!(value, "ignoring unparseable PORT override"),
    }
}

/// Load configuration from a specific path and environment
/// Useful for testing with custom config files
pub fn load_from_sources(config_path: PathBuf) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    // Start with defaults (handled by struct Default implementations)
    // Add TOML file if it exists (optional)
    if config_path.exists() {
        tracing::info!("Loading configuration from: {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(false));
    } else {
        tracing::warn!(
            "Configuration file not found at {}, using defaults and environment overrides",
            config_path.display()
        );
    }

    // Add environment variable overrides
    // VIDBOX__SERVER__BIND_ADDR -> server.bind_addr
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true),
    );

    let config = builder.build()?;
    config.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_defaults_only() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        let config = load_from_sources(config_path).unwrap();
        assert_eq!(config.server.bind_addr.to_string(), "0.0.0.0:5000");
        assert_eq!(config.extractor.binary, "yt-dlp");
    }

    #[test]
    fn test_load_from_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[server]
bind_addr = "127.0.0.1:9000"

[extractor]
binary = "yt-dlp-nightly"
max_height = 1080
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = load_from_sources(config_path).unwrap();
        assert_eq!(config.server.bind_addr.to_string(), "127.0.0.1:9000");
        assert_eq!(config.extractor.binary, "yt-dlp-nightly");
        assert_eq!(config.extractor.max_height, 1080);
        // Untouched sections keep their defaults
        assert_eq!(config.extractor.socket_timeout_secs, 60);
    }

    #[test]
    fn test_port_override_keeps_host() {
        let mut config = Config::default();
        override_port(&mut config, "8080");
        assert_eq!(config.server.bind_addr.to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn test_port_override_rejects_garbage() {
        let mut config = Config::default();
        override_port(&mut config, "not-a-port");
        assert_eq!(config.server.bind_addr.to_string(), "0.0.0.0:5000");
    }
}
