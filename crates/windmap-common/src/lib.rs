//! Common types shared across the windmap crates.
//!
//! Everything here is a plain value object: the grid axes, the wind
//! component cube, the region mask and the masked per-step field. They are
//! built once (or once per time step) and then only read, so they can be
//! shared by reference across rendering threads.

pub mod bbox;
pub mod config;
pub mod error;
pub mod field;
pub mod grid;
pub mod mask;
pub mod time;

pub use bbox::BoundingBox;
pub use config::{WindmapConfig, MIN_FRAME_WIDTH};
pub use error::{WindmapError, WindmapResult};
pub use field::{preprocess, MaskedField, MISSING};
pub use grid::{Grid, WindDataset};
pub use mask::RegionMask;
pub use time::{format_timestamp, sample_indices};

/// A line of `(lon, lat)` vertices in degrees, open or closed.
pub type Polyline = Vec<(f64, f64)>;
