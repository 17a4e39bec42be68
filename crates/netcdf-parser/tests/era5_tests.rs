//! Tests against a real ERA5 extract, skipped when the file is absent.
//!
//! Place `era5_india_sample.nc` in `crates/netcdf-parser/testdata/` or point
//! `TEST_DATA_DIR` at a directory containing it.

use netcdf_parser::{load_wind_dataset, DatasetVariables, NetCdfError};
use test_utils::require_test_file;

#[test]
fn test_load_era5_sample() {
    let path = require_test_file!("era5_india_sample.nc");

    let dataset = load_wind_dataset(&path, &DatasetVariables::default()).unwrap();
    let grid = &dataset.grid;

    assert!(grid.width() > 1);
    assert!(grid.height() > 1);
    assert!(grid.time_len() > 0);
    assert_eq!(dataset.u.len(), grid.time_len() * grid.cell_count());
    assert_eq!(dataset.v.len(), dataset.u.len());

    // Timestamps are strictly increasing
    assert!(grid.times.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_era5_latitude_normalizes() {
    let path = require_test_file!("era5_india_sample.nc");

    let dataset = load_wind_dataset(&path, &DatasetVariables::default())
        .unwrap()
        .normalize_latitude();
    assert!(dataset.grid.lat.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_missing_variable_is_reported() {
    let path = require_test_file!("era5_india_sample.nc");

    let vars = DatasetVariables {
        u: "no_such_variable".to_string(),
        ..DatasetVariables::default()
    };
    let err = load_wind_dataset(&path, &vars).unwrap_err();
    assert!(matches!(err, NetCdfError::MissingData(_)));
}
