// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, InventoryError>;

#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Signature length mismatch: expected {expected}, got {got}")]
    SignatureLength { expected: usize, got: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("File operation failed for {path}: {source}")]
    FileOperation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {file}: {message}")]
    Parse { file: String, message: String },

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
