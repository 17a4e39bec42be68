//! Wind streamline animation generator.
//!
//! Reads a gridded wind dataset and a region boundary, renders one
//! streamline map per sampled time step and writes a looping GIF.

mod pipeline;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use windmap_common::{BoundingBox, WindmapConfig};

#[derive(Parser, Debug)]
#[command(name = "windmap")]
#[command(about = "Render an animated wind streamline map clipped to a region boundary")]
struct Args {
    /// YAML configuration file (defaults apply when omitted)
    #[arg(short, long, env = "WINDMAP_CONFIG")]
    config: Option<PathBuf>,

    /// NetCDF wind dataset
    #[arg(short, long, env = "WINDMAP_DATASET")]
    dataset: Option<PathBuf>,

    /// Region boundary GeoJSON
    #[arg(short, long, env = "WINDMAP_BOUNDARY")]
    boundary: Option<PathBuf>,

    /// Output GIF path
    #[arg(short, long, env = "WINDMAP_OUTPUT")]
    output: Option<PathBuf>,

    /// Render every N-th time step
    #[arg(long, env = "WINDMAP_STRIDE")]
    stride: Option<usize>,

    /// Streamline density
    #[arg(long, env = "WINDMAP_DENSITY")]
    density: Option<f32>,

    /// Map extent as "minx,miny,maxx,maxy" in degrees
    #[arg(long, env = "WINDMAP_EXTENT")]
    extent: Option<String>,

    /// Also write every frame as PNG into this directory
    #[arg(long, env = "WINDMAP_FRAMES_DIR")]
    frames_dir: Option<PathBuf>,

    /// Coastline GeoJSON
    #[arg(long, env = "WINDMAP_COASTLINE")]
    coastline: Option<PathBuf>,

    /// Political borders GeoJSON
    #[arg(long, env = "WINDMAP_BORDERS")]
    borders: Option<PathBuf>,

    /// Rendering threads (default: one per core)
    #[arg(long, env = "WINDMAP_THREADS")]
    threads: Option<usize>,

    /// Log level (RUST_LOG takes precedence when set)
    #[arg(long, env = "WINDMAP_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

impl Args {
    /// Load the configuration file, if any, and apply flag overrides.
    fn load_config(&self) -> Result<WindmapConfig> {
        let mut config = match &self.config {
            Some(path) => WindmapConfig::from_file(path)
                .with_context(|| format!("loading configuration {}", path.display()))?,
            None => WindmapConfig::default(),
        };

        if let Some(path) = &self.dataset {
            config.dataset.path = path.clone();
        }
        if let Some(path) = &self.boundary {
            config.boundary.path = path.clone();
        }
        if let Some(path) = &self.output {
            config.animation.output_path = path.clone();
        }
        if let Some(stride) = self.stride {
            config.animation.stride = stride;
        }
        if let Some(density) = self.density {
            config.render.density = density;
        }
        if let Some(extent) = &self.extent {
            config.render.extent = BoundingBox::from_extent_string(extent)
                .with_context(|| format!("parsing --extent {:?}", extent))?;
        }
        if self.frames_dir.is_some() {
            config.animation.frames_dir = self.frames_dir.clone();
        }
        if self.coastline.is_some() {
            config.boundary.coastline_path = self.coastline.clone();
        }
        if self.borders.is_some() {
            config.boundary.borders_path = self.borders.clone();
        }

        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

/// Filter from RUST_LOG when set, otherwise from `--log-level`.
fn log_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level))
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(log_filter(log_level))
        .with_target(true);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, args.log_json)?;

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("configuring the rendering thread pool")?;
    }

    let config = args.load_config()?;
    info!(
        dataset = %config.dataset.path.display(),
        boundary = %config.boundary.path.display(),
        stride = config.animation.stride,
        density = config.render.density,
        "Starting windmap"
    );

    if let Err(e) = pipeline::run(&config) {
        tracing::error!(error = %format!("{:#}", e), "Run failed");
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let args = Args::parse_from([
            "windmap",
            "--dataset",
            "july.nc",
            "--stride",
            "6",
            "--density",
            "2.5",
            "--frames-dir",
            "frames",
        ]);
        let config = args.load_config().unwrap();

        assert_eq!(config.dataset.path, PathBuf::from("july.nc"));
        assert_eq!(config.animation.stride, 6);
        assert_eq!(config.render.density, 2.5);
        assert_eq!(config.animation.frames_dir, Some(PathBuf::from("frames")));
        assert_eq!(config.boundary.path, PathBuf::from("India_Boundary.geojson"));
    }

    #[test]
    fn test_invalid_override_rejected() {
        let args = Args::parse_from(["windmap", "--stride", "0"]);
        assert!(args.load_config().is_err());
    }

    #[test]
    fn test_extent_flag() {
        let args = Args::parse_from(["windmap", "--extent", "70, 8, 90, 30"]);
        let config = args.load_config().unwrap();
        assert_eq!(config.render.extent, BoundingBox::new(70.0, 8.0, 90.0, 30.0));

        let args = Args::parse_from(["windmap", "--extent", "70,8,90"]);
        assert!(args.load_config().is_err());

        // Parses but is empty
        let args = Args::parse_from(["windmap", "--extent", "90,8,70,30"]);
        assert!(args.load_config().is_err());
    }

    #[test]
    fn test_log_filter_from_level() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        assert_eq!(log_filter("debug").to_string(), "debug");
    }
}
