//! End-to-end animation run.
//!
//! The grid is normalized and the boundary rasterized once; every sampled
//! time step is then preprocessed and rendered independently on the rayon
//! pool. The indexed collect keeps frames in time order for the encoder.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::info;

use boundary::{rasterize, Boundary, BoundaryResult, ReferenceLines};
use netcdf_parser::{load_wind_dataset, DatasetVariables};
use renderer::{render_frame, write_gif, Frame, FrameContext};
use windmap_common::{
    format_timestamp, preprocess, sample_indices, RegionMask, WindDataset, WindmapConfig,
    WindmapError, WindmapResult,
};

/// Everything read from disk before rendering starts.
pub struct Inputs {
    /// As stored; latitude may still be decreasing
    pub dataset: WindDataset,
    pub boundary: Boundary,
    pub coastline: ReferenceLines,
    pub borders: ReferenceLines,
}

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub frames: usize,
    pub inside_cells: usize,
    pub masked_cells: usize,
    pub output: PathBuf,
}

/// Load inputs and render the animation described by `config`.
pub fn run(config: &WindmapConfig) -> Result<RunSummary> {
    let inputs = load_inputs(config)?;
    run_with(inputs, config)
}

/// Read the dataset, the boundary and both reference layers.
///
/// Reference layers without a configured file fall back to the built-in
/// world data, cut down to the map extent.
pub fn load_inputs(config: &WindmapConfig) -> Result<Inputs> {
    let vars = DatasetVariables::from(&config.dataset);
    let dataset = load_wind_dataset(&config.dataset.path, &vars)
        .map_err(WindmapError::from)
        .with_context(|| format!("loading dataset {}", config.dataset.path.display()))?;

    let boundary = Boundary::from_file(&config.boundary.path)
        .map_err(WindmapError::from)
        .with_context(|| format!("loading boundary {}", config.boundary.path.display()))?;

    let extent = &config.render.extent;
    Ok(Inputs {
        dataset,
        boundary,
        coastline: load_reference(
            config.boundary.coastline_path.as_deref(),
            "coastline",
            ReferenceLines::world_coastline,
        )?
        .within(extent),
        borders: load_reference(
            config.boundary.borders_path.as_deref(),
            "borders",
            ReferenceLines::world_borders,
        )?
        .within(extent),
    })
}

fn load_reference(
    path: Option<&Path>,
    layer: &str,
    builtin: fn() -> BoundaryResult<ReferenceLines>,
) -> Result<ReferenceLines> {
    match path {
        Some(path) => ReferenceLines::from_file(path)
            .map_err(WindmapError::from)
            .with_context(|| format!("loading {} layer {}", layer, path.display())),
        None => {
            info!(layer, "No reference file configured, using built-in world data");
            builtin()
                .map_err(WindmapError::from)
                .with_context(|| format!("loading built-in {} layer", layer))
        }
    }
}

/// Render, export and encode from already loaded inputs.
pub fn run_with(inputs: Inputs, config: &WindmapConfig) -> Result<RunSummary> {
    let dataset = inputs.dataset.normalize_latitude();
    let mask = rasterize(&inputs.boundary, &dataset.grid);

    let ctx = FrameContext::new(&dataset.grid, &config.render)
        .map_err(WindmapError::from)?
        .with_boundary(inputs.boundary.outlines())
        .with_coastline(inputs.coastline.lines)
        .with_borders(inputs.borders.lines);

    let frames = render_frames(&dataset, &mask, &ctx, config.animation.stride)?;

    if let Some(dir) = &config.animation.frames_dir {
        export_pngs(&frames, dir)?;
    }

    let output = &config.animation.output_path;
    write_gif(&frames, config.animation.frame_duration_secs, output)
        .map_err(WindmapError::from)
        .with_context(|| format!("writing animation {}", output.display()))?;

    let summary = RunSummary {
        frames: frames.len(),
        inside_cells: mask.inside_count(),
        masked_cells: mask.as_slice().len() - mask.inside_count(),
        output: output.clone(),
    };
    info!(
        frames = summary.frames,
        inside_cells = summary.inside_cells,
        masked_cells = summary.masked_cells,
        output = %summary.output.display(),
        "Animation complete"
    );
    Ok(summary)
}

/// Render every `stride`-th time step, in time order.
///
/// Any failing step aborts the whole run.
pub fn render_frames(
    dataset: &WindDataset,
    mask: &RegionMask,
    ctx: &FrameContext,
    stride: usize,
) -> WindmapResult<Vec<Frame>> {
    let indices = sample_indices(dataset.grid.time_len(), stride);
    info!(
        steps = dataset.grid.time_len(),
        stride,
        frames = indices.len(),
        "Rendering frames"
    );

    indices
        .par_iter()
        .map(|&index| -> WindmapResult<Frame> {
            let field = preprocess(index, dataset, mask)?;
            let timestamp = dataset
                .grid
                .times
                .get(index)
                .map(format_timestamp)
                .unwrap_or_else(|| format!("step {}", index));
            Ok(render_frame(&field, ctx, &timestamp)?)
        })
        .collect()
}

/// Write frames as `frame_0000.png`, `frame_0001.png`, ... into `dir`.
fn export_pngs(frames: &[Frame], dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating frames directory {}", dir.display()))?;

    frames
        .par_iter()
        .enumerate()
        .try_for_each(|(n, frame)| -> Result<()> {
            let path = dir.join(format!("frame_{:04}.png", n));
            frame
                .save_png(&path)
                .map_err(WindmapError::from)
                .with_context(|| format!("writing {}", path.display()))
        })?;

    info!(dir = %dir.display(), frames = frames.len(), "Exported frame PNGs");
    Ok(())
}
