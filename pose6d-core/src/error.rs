//! Error types for pose6d

use thiserror::Error;

/// Main error type for pose6d operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Invalid pose: {0}")]
    InvalidPose(String),

    #[error("Invalid camera: {0}")]
    Camera(String),

    #[error("Solver error: {0}")]
    Solver(String),

    #[error("Need to load a mesh first")]
    NoMesh,

    #[error("Need to set a reference mesh first")]
    NoReference,

    #[error("No actor named {0:?} in the scene")]
    UnknownActor(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Result type alias for pose6d operations
pub type Result<T> = std::result::Result<T, Error>;
