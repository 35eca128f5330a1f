//! Error types for I/O operations

use thiserror::Error;

/// Errors that can occur while loading or saving session data
#[derive(Error, Debug)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("OBJ error: {0}")]
    Obj(#[from] obj::ObjError),

    #[error(transparent)]
    Core(#[from] pose6d_core::Error),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Result type alias for I/O operations
pub type Result<T> = std::result::Result<T, IoError>;
