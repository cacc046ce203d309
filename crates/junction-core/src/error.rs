//! Error types for junction

use thiserror::Error;

/// Main error type for junction
#[derive(Error, Debug)]
pub enum JunctionError {
    #[error("Invalid action: {0} (expected 0 or 1)")]
    InvalidAction(usize),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for junction operations
pub type Result<T> = std::result::Result<T, JunctionError>;
