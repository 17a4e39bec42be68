//! Error types for the windmap pipeline.

use thiserror::Error;

/// Result type alias using WindmapError.
pub type WindmapResult<T> = Result<T, WindmapError>;

/// Primary error type for the windmap pipeline.
///
/// Every variant is fatal. A frame whose field is entirely missing is not an
/// error; the renderer logs it and still produces the frame.
#[derive(Debug, Error)]
pub enum WindmapError {
    /// Dataset, boundary or configuration missing, unreadable or incomplete.
    #[error("Input error: {0}")]
    Input(String),

    /// Axis lengths disagree with the component array shapes.
    #[error("Grid mismatch: {0}")]
    GridMismatch(String),

    #[error("Rendering failed: {0}")]
    Render(String),

    /// Output artifact could not be written.
    #[error("Encoding failed: {0}")]
    Encode(String),
}

impl WindmapError {
    /// Short stable name of the error class, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            WindmapError::Input(_) => "input",
            WindmapError::GridMismatch(_) => "grid_mismatch",
            WindmapError::Render(_) => "render",
            WindmapError::Encode(_) => "encode",
        }
    }
}

impl From<serde_yaml::Error> for WindmapError {
    fn from(err: serde_yaml::Error) -> Self {
        WindmapError::Input(format!("YAML error: {}", err))
    }
}
