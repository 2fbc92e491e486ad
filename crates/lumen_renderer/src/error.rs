//! Errors raised outside the per-ray core.
//!
//! Tracing a path never fails; these cover configuration loading,
//! framebuffer bookkeeping and image output.

use thiserror::Error;

/// Errors that can occur while configuring or driving a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Config parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Pass buffer has {actual} pixels, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Render cancelled")]
    Cancelled,
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;
