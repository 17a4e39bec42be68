//! Error types for NetCDF parsing operations.

use thiserror::Error;
use windmap_common::WindmapError;

/// Result type for NetCDF parser operations.
pub type NetCdfResult<T> = Result<T, NetCdfError>;

/// Error types for NetCDF parsing.
#[derive(Error, Debug)]
pub enum NetCdfError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Missing required variable or attribute
    #[error("Missing required data: {0}")]
    MissingData(String),

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// Variable shape disagrees with the coordinate axes
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Time axis units could not be decoded
    #[error("Invalid time units: {0}")]
    InvalidTime(String),
}

impl From<NetCdfError> for WindmapError {
    fn from(err: NetCdfError) -> Self {
        match err {
            NetCdfError::ShapeMismatch(msg) => WindmapError::GridMismatch(msg),
            other => WindmapError::Input(other.to_string()),
        }
    }
}
