//! Native NetCDF reading using the netcdf library.
//!
//! Reads the two wind component variables, their coordinate axes and the
//! time axis from a file on disk into a [`WindDataset`].

use std::path::Path;
use std::sync::Once;

use windmap_common::{Grid, WindDataset};

use crate::cf_time::CfTimeUnits;
use crate::error::{NetCdfError, NetCdfResult};

/// Names of the variables to read.
#[derive(Debug, Clone)]
pub struct DatasetVariables {
    pub u: String,
    pub v: String,
    pub lat: String,
    pub lon: String,
    /// Candidates for the time axis, first present wins
    pub time: Vec<String>,
}

impl Default for DatasetVariables {
    fn default() -> Self {
        Self {
            u: "u10".to_string(),
            v: "v10".to_string(),
            lat: "latitude".to_string(),
            lon: "longitude".to_string(),
            time: vec!["valid_time".to_string(), "time".to_string()],
        }
    }
}

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints verbose diagnostics even when the Rust side
/// handles the condition (e.g. probing for an optional attribute). Call
/// this before the first NetCDF operation; later calls are no-ops.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and we're passing null pointers
        // to disable error output, which is a documented valid use.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// Load a `[time, lat, lon]` wind dataset from a NetCDF file.
///
/// Packed variables are unpacked with `scale_factor` / `add_offset`;
/// `_FillValue` and `missing_value` cells become NaN. Latitude order is
/// left as stored; see [`WindDataset::normalize_latitude`].
pub fn load_wind_dataset(path: &Path, vars: &DatasetVariables) -> NetCdfResult<WindDataset> {
    silence_hdf5_errors();

    if !path.exists() {
        return Err(NetCdfError::MissingData(format!(
            "dataset file {} does not exist",
            path.display()
        )));
    }

    let file = netcdf::open(path).map_err(|e| {
        NetCdfError::InvalidFormat(format!("Failed to open {}: {}", path.display(), e))
    })?;

    let lon = read_axis(&file, &vars.lon)?;
    let lat = read_axis(&file, &vars.lat)?;

    let time_name = vars
        .time
        .iter()
        .find(|name| file.variable(name).is_some())
        .ok_or_else(|| {
            NetCdfError::MissingData(format!("time variable (tried {:?})", vars.time))
        })?;
    let time_var = file
        .variable(time_name)
        .ok_or_else(|| NetCdfError::MissingData(format!("{} variable", time_name)))?;
    let units = get_string_attr(&time_var, "units")
        .ok_or_else(|| NetCdfError::MissingData(format!("units attribute on {}", time_name)))?;
    let raw_times: Vec<f64> = time_var
        .get_values(..)
        .map_err(|e| NetCdfError::InvalidFormat(format!("Failed to read {}: {}", time_name, e)))?;
    let times = CfTimeUnits::parse(&units)?.decode_all(&raw_times)?;

    let shape = [times.len(), lat.len(), lon.len()];
    let u = read_component(&file, &vars.u, shape)?;
    let v = read_component(&file, &vars.v, shape)?;

    tracing::info!(
        path = %path.display(),
        times = shape[0],
        lat = shape[1],
        lon = shape[2],
        time_variable = %time_name,
        "Loaded wind dataset"
    );

    WindDataset::new(Grid::new(lon, lat, times), u, v)
        .map_err(|e| NetCdfError::ShapeMismatch(e.to_string()))
}

// =============================================================================
// Internal helpers
// =============================================================================

fn read_axis(file: &netcdf::File, name: &str) -> NetCdfResult<Vec<f64>> {
    let var = file
        .variable(name)
        .ok_or_else(|| NetCdfError::MissingData(format!("{} variable", name)))?;
    let values: Vec<f64> = var
        .get_values(..)
        .map_err(|e| NetCdfError::InvalidFormat(format!("Failed to read {}: {}", name, e)))?;
    if values.is_empty() {
        return Err(NetCdfError::MissingData(format!("{} axis is empty", name)));
    }
    Ok(values)
}

/// Read a component variable and check it is `[time, lat, lon]`.
fn read_component(file: &netcdf::File, name: &str, shape: [usize; 3]) -> NetCdfResult<Vec<f32>> {
    let var = file
        .variable(name)
        .ok_or_else(|| NetCdfError::MissingData(format!("{} variable", name)))?;

    let dims: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
    if dims != shape {
        return Err(NetCdfError::ShapeMismatch(format!(
            "{} has dimensions {:?}, expected [time, lat, lon] = {:?}",
            name, dims, shape
        )));
    }

    let raw: Vec<f64> = var
        .get_values(..)
        .map_err(|e| NetCdfError::InvalidFormat(format!("Failed to read {}: {}", name, e)))?;

    let packing = Packing {
        scale_factor: get_f64_attr(&var, "scale_factor").unwrap_or(1.0),
        add_offset: get_f64_attr(&var, "add_offset").unwrap_or(0.0),
        fill_value: get_f64_attr(&var, "_FillValue"),
        missing_value: get_f64_attr(&var, "missing_value"),
    };

    let data = packing.unpack(&raw);
    let missing = data.iter().filter(|v| v.is_nan()).count();
    if missing > 0 {
        tracing::debug!(variable = name, missing, "Fill values in component");
    }
    Ok(data)
}

/// CF packing attributes of a variable.
#[derive(Debug, Clone, Copy)]
struct Packing {
    scale_factor: f64,
    add_offset: f64,
    fill_value: Option<f64>,
    missing_value: Option<f64>,
}

impl Packing {
    fn unpack(&self, raw: &[f64]) -> Vec<f32> {
        raw.iter()
            .map(|&val| {
                if Some(val) == self.fill_value || Some(val) == self.missing_value {
                    f32::NAN
                } else {
                    (val * self.scale_factor + self.add_offset) as f32
                }
            })
            .collect()
    }
}

/// Check if a variable has an attribute with the given name.
/// This avoids HDF5 error spam when checking for optional attributes.
fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

/// Helper to get f64 attribute.
fn get_f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    f64::try_from(attr_value).ok()
}

/// Helper to get string attribute.
fn get_string_attr(var: &netcdf::Variable, name: &str) -> Option<String> {
    if !has_attr(var, name) {
        return None;
    }
    match var.attribute_value(name)?.ok()? {
        netcdf::AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpack_scale_offset_and_fill() {
        let packing = Packing {
            scale_factor: 0.5,
            add_offset: -1.0,
            fill_value: Some(-32767.0),
            missing_value: None,
        };
        let out = packing.unpack(&[4.0, -32767.0, 0.0]);
        assert_eq!(out[0], 1.0);
        assert!(out[1].is_nan());
        assert_eq!(out[2], -1.0);
    }

    #[test]
    fn test_missing_file_is_missing_data() {
        let err = load_wind_dataset(
            Path::new("/nonexistent/windmap/data.nc"),
            &DatasetVariables::default(),
        )
        .unwrap_err();
        assert!(matches!(err, NetCdfError::MissingData(_)));
    }
}
