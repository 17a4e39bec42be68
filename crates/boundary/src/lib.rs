//! Region boundary handling for windmap.
//!
//! Loads the national boundary polygon and the optional coastline / border
//! reference layers from GeoJSON, and rasterizes the boundary onto the
//! wind grid as a [`RegionMask`](windmap_common::RegionMask).
//!
//! # Example
//!
//! ```ignore
//! use boundary::{rasterize, Boundary};
//!
//! let india = Boundary::from_file(Path::new("India_Boundary.geojson"))?;
//! let mask = rasterize(&india, &dataset.grid);
//! ```

pub mod crs;
pub mod error;
pub mod geometry;
pub mod rasterize;

pub use crs::Reprojector;
pub use error::{BoundaryError, BoundaryResult};
pub use geometry::{Boundary, ReferenceLines};
pub use rasterize::rasterize;
