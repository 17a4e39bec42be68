//! Run configuration, loaded from YAML.
//!
//! Every field has a default, so an empty document is a valid
//! configuration reproducing the India 10 m wind animation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{BoundingBox, WindmapError, WindmapResult};

/// Narrowest frame that still fits the title, axis labels and colorbar.
pub const MIN_FRAME_WIDTH: u32 = 200;

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindmapConfig {
    pub dataset: DatasetConfig,
    pub boundary: BoundaryConfig,
    pub render: RenderConfig,
    pub animation: AnimationConfig,
}

/// Gridded wind input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub path: PathBuf,
    pub u_variable: String,
    pub v_variable: String,
    pub lat_variable: String,
    pub lon_variable: String,
    /// Candidate names for the time axis; the first present is used.
    pub time_variables: Vec<String>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data_stream-oper_stepType-instant.nc"),
            u_variable: "u10".to_string(),
            v_variable: "v10".to_string(),
            lat_variable: "latitude".to_string(),
            lon_variable: "longitude".to_string(),
            time_variables: vec!["valid_time".to_string(), "time".to_string()],
        }
    }
}

/// Region boundary and static reference layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryConfig {
    pub path: PathBuf,
    pub coastline_path: Option<PathBuf>,
    pub borders_path: Option<PathBuf>,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("India_Boundary.geojson"),
            coastline_path: None,
            borders_path: None,
        }
    }
}

/// Frame appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Displayed geographic extent
    pub extent: BoundingBox,
    /// Streamline density (1.0 = 30x30 occupancy grid)
    pub density: f32,
    /// Magnitude range of the color scale, clamped at both ends
    pub color_domain: [f32; 2],
    /// Streamline width in pixels at the reference width of 960 px
    pub line_width: f32,
    pub arrow_size: f32,
    /// Frame width in pixels; height follows from the extent
    pub width: u32,
    /// Graticule spacing in degrees
    pub graticule_step: f64,
    pub title: String,
    pub legend_label: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            extent: BoundingBox::new(68.0, 6.0, 98.0, 38.0),
            density: 4.0,
            color_domain: [0.0, 20.0],
            line_width: 1.4,
            arrow_size: 1.0,
            width: 960,
            graticule_step: 5.0,
            title: "Wind Streamlines over India".to_string(),
            legend_label: "Wind Speed (m/s)".to_string(),
        }
    }
}

/// Time sampling and output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Render every `stride`-th time step
    pub stride: usize,
    pub frame_duration_secs: f32,
    pub output_path: PathBuf,
    /// When set, each frame is also written here as PNG
    pub frames_dir: Option<PathBuf>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            stride: 12,
            frame_duration_secs: 1.5,
            output_path: PathBuf::from("wind_streamlines_india_black.gif"),
            frames_dir: None,
        }
    }
}

impl WindmapConfig {
    /// Parse a YAML document.
    pub fn from_yaml_str(yaml: &str) -> WindmapResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a YAML file.
    pub fn from_file(path: &Path) -> WindmapResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            WindmapError::Input(format!("cannot read config {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Reject settings the pipeline cannot honour.
    pub fn validate(&self) -> WindmapResult<()> {
        let invalid = |msg: String| Err(WindmapError::Input(msg));

        if self.animation.stride == 0 {
            return invalid("animation.stride must be at least 1".to_string());
        }
        if !(self.animation.frame_duration_secs > 0.0) {
            return invalid(format!(
                "animation.frame_duration_secs must be positive, got {}",
                self.animation.frame_duration_secs
            ));
        }
        if !(self.render.density > 0.0) {
            return invalid(format!(
                "render.density must be positive, got {}",
                self.render.density
            ));
        }
        let [lo, hi] = self.render.color_domain;
        if !(lo < hi) {
            return invalid(format!("render.color_domain [{}, {}] is empty", lo, hi));
        }
        if !self.render.extent.is_valid() {
            return invalid(format!("render.extent {:?} is empty", self.render.extent));
        }
        if self.render.width < MIN_FRAME_WIDTH {
            return invalid(format!(
                "render.width must be at least {} px, got {}",
                MIN_FRAME_WIDTH, self.render.width
            ));
        }
        if !(self.render.graticule_step > 0.0) {
            return invalid("render.graticule_step must be positive".to_string());
        }
        Ok(())
    }
}
