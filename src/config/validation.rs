use thiserror::Error;

use super::models::Config;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("extractor.binary must not be empty")]
    EmptyBinary,
    #[error("extractor.container must not be empty")]
    EmptyContainer,
    #[error("extractor.max_height must be greater than zero")]
    ZeroHeight,
    #[error("extractor.socket_timeout_secs must be greater than zero")]
    ZeroSocketTimeout,
}

pub fn validate(config: &Config) -> Result<(), ValidationError> {
    if config.extractor.binary.trim().is_empty() {
        return Err(ValidationError::EmptyBinary);
    }
    if config.extractor.container.trim().is_empty() {
        return Err(ValidationError::EmptyContainer);
    }
    if config.extractor.max_height == 0 {
        return Err(ValidationError::ZeroHeight);
    }
    if config.extractor.socket_timeout_secs == 0 {
        return Err(ValidationError::ZeroSocketTimeout);
    }
    Ok(())
}
