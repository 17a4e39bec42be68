//! Error types for frame rendering and animation output.

use thiserror::Error;
use windmap_common::WindmapError;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Debug, Error)]
pub enum RenderError {
    /// Frame dimensions or extent cannot produce a drawable layout
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    /// Field shape disagrees with the frame context axes
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Failed to allocate {width}x{height} pixmap")]
    Allocation { width: u32, height: u32 },

    /// Image codec failure
    #[error("Encoding failed: {0}")]
    Encode(String),

    /// Output file could not be written
    #[error("cannot write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<image::ImageError> for RenderError {
    fn from(err: image::ImageError) -> Self {
        RenderError::Encode(err.to_string())
    }
}

impl From<RenderError> for WindmapError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::ShapeMismatch(msg) => WindmapError::GridMismatch(msg),
            RenderError::Encode(_) | RenderError::Io { .. } => WindmapError::Encode(err.to_string()),
            other => WindmapError::Render(other.to_string()),
        }
    }
}
