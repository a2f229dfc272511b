//! Error types for namespace configuration.

use thiserror::Error;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading or persisting the namespace config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no candidate config paths provided")]
    NoCandidates,

    #[error("failed to read config file: {0}")]
    Read(String),

    #[error("failed to parse config file: {0}")]
    Parse(String),

    #[error("failed to persist config file: {0}")]
    Persist(String),
}
