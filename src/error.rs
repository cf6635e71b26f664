// file: src/error.rs
// version: 0.3.0
// guid: 71c3e8d5-2a9f-4b46-b0d1-8e54f7a2c903

use thiserror::Error;

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, OnboardError>;

/// Error types for the onboard environment helper
#[derive(Error, Debug)]
pub enum OnboardError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Docker error: {0}")]
    DockerError(String),

    #[error("Container error: {0}")]
    ContainerError(String),

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("System error: {0}")]
    SystemError(String),

    #[error("{command} exited with status {code}")]
    CommandError { command: String, code: i32 },

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

impl OnboardError {
    /// Process exit code to relay for this error.
    ///
    /// Failures of the wrapped `docker` command carry its exit status through
    /// unchanged; everything else maps to 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            OnboardError::CommandError { code, .. } => *code,
            _ => 1,
        }
    }
}
