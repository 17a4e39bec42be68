//! Error types for boundary loading.

use thiserror::Error;
use windmap_common::WindmapError;

/// Result type for boundary operations.
pub type BoundaryResult<T> = Result<T, BoundaryError>;

#[derive(Debug, Error)]
pub enum BoundaryError {
    /// File could not be read
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Not valid GeoJSON, or malformed coordinates
    #[error("GeoJSON error: {0}")]
    Parse(String),

    /// The document holds no Polygon or MultiPolygon geometry
    #[error("No polygons found in boundary")]
    NoPolygons,

    /// A legacy `crs` member names a system with no known definition
    #[error("Unsupported CRS: {0}")]
    UnsupportedCrs(String),

    /// The source system is known but a coordinate could not be converted
    #[error("Cannot reproject from {crs}: {message}")]
    Projection { crs: String, message: String },
}

impl From<geojson::Error> for BoundaryError {
    fn from(e: geojson::Error) -> Self {
        BoundaryError::Parse(e.to_string())
    }
}

impl From<BoundaryError> for WindmapError {
    fn from(err: BoundaryError) -> Self {
        WindmapError::Input(err.to_string())
    }
}
