//! Error types for gzembed

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for gzembed operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Source asset not found: {0:?}")]
    SourceNotFound(PathBuf),

    #[error("Gzip compression failed: {0}")]
    Compression(String),

    #[error("Compressed artifact missing after compression: {0:?}")]
    ArtifactMissing(PathBuf),

    #[error("Array rendering error: {0}")]
    Render(String),

    #[error("Array parse error: {0}")]
    Parse(String),

    #[error("Verification failed: {0}")]
    Verification(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using gzembed's Error
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a parse error at a given line of the rendered output
    pub fn parse_at(line: usize, message: impl Into<String>) -> Self {
        Error::Parse(format!("line {}: {}", line, message.into()))
    }
}
