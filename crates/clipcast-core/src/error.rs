//! Error types module
//!
//! All failures in the publish pipeline are unified under [`PublishError`].
//! Thumbnail generation is the one deliberately non-fatal operation and never
//! surfaces here; everything else aborts the run and reaches the CLI, which
//! renders the error as a JSON object keyed by [`PublishError::error_code`].

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Video host API error: {0}")]
    HostApi(String),

    #[error("Social platform error: {0}")]
    Platform(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Public reachability check failed: {0}")]
    Publicity(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for publish operations
pub type PublishResult<T> = Result<T, PublishError>;

impl PublishError {
    /// Machine-readable error code for the CLI's JSON error object.
    pub fn error_code(&self) -> &'static str {
        match self {
            PublishError::Config(_) => "CONFIG_ERROR",
            PublishError::NotFound(_) => "NOT_FOUND",
            PublishError::Parse(_) => "PARSE_ERROR",
            PublishError::HostApi(_) => "HOST_API_ERROR",
            PublishError::Platform(_) => "PLATFORM_ERROR",
            PublishError::Storage(_) => "STORAGE_ERROR",
            PublishError::Publicity(_) => "PUBLICITY_ERROR",
            PublishError::Timeout(_) => "TIMEOUT_ERROR",
            PublishError::Io(_) => "IO_ERROR",
        }
    }
}

impl From<serde_json::Error> for PublishError {
    fn from(err: serde_json::Error) -> Self {
        PublishError::Parse(format!("JSON parsing error: {}", err))
    }
}
