//! NetCDF reader for gridded reanalysis wind data.
//!
//! Reads eastward and northward wind components laid out
//! `[time, latitude, longitude]` (ERA5 single-level `u10`/`v10` by default)
//! together with their coordinate axes and a CF-encoded time axis.
//!
//! # Data handling
//!
//! - Packed variables are unpacked with `scale_factor` / `add_offset`.
//! - `_FillValue` and `missing_value` cells become NaN, which the field
//!   preprocessor treats as missing.
//! - The latitude axis is returned as stored. ERA5 stores it north to
//!   south; callers normalize it with
//!   [`WindDataset::normalize_latitude`](windmap_common::WindDataset::normalize_latitude).

pub mod cf_time;
pub mod error;
pub mod native;

pub use cf_time::CfTimeUnits;
pub use error::{NetCdfError, NetCdfResult};
pub use native::{load_wind_dataset, silence_hdf5_errors, DatasetVariables};

use windmap_common::config::DatasetConfig;

impl From<&DatasetConfig> for DatasetVariables {
    fn from(config: &DatasetConfig) -> Self {
        Self {
            u: config.u_variable.clone(),
            v: config.v_variable.clone(),
            lat: config.lat_variable.clone(),
            lon: config.lon_variable.clone(),
            time: config.time_variables.clone(),
        }
    }
}
