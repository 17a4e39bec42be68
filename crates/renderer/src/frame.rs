//! Frame composition.
//!
//! [`render_frame`] is a pure function of the masked field, the shared
//! [`FrameContext`] and the timestamp. It keeps no drawing state between
//! calls, so frames for different time steps can be rendered in parallel.

use std::path::Path;

use image::RgbaImage;
use tiny_skia::{Pixmap, PixmapPaint, Transform};
use windmap_common::config::RenderConfig;
use windmap_common::{Grid, MaskedField, Polyline};

use crate::canvas::FrameLayout;
use crate::colorscale::{Color, ColorScale};
use crate::error::{RenderError, RenderResult};
use crate::layers::{self, BORDER_STYLE, BOUNDARY_STYLE, COASTLINE_STYLE};
use crate::streamlines::{trace_streamlines, Streamline, StreamlineConfig};

/// Appearance settings that do not depend on the data.
#[derive(Debug, Clone)]
pub struct FrameStyle {
    pub title: String,
    pub legend_label: String,
    pub background: Color,
    pub line_width: f32,
    pub arrow_size: f32,
    pub graticule_step: f64,
    pub streamlines: StreamlineConfig,
}

impl FrameStyle {
    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            title: config.title.clone(),
            legend_label: config.legend_label.clone(),
            background: Color::BLACK,
            line_width: config.line_width,
            arrow_size: config.arrow_size,
            graticule_step: config.graticule_step,
            streamlines: StreamlineConfig::with_density(config.density),
        }
    }
}

/// Everything shared by all frames of a run: axes, layout, color scale and
/// the static geographic layers. Built once, then only read.
#[derive(Debug, Clone)]
pub struct FrameContext {
    pub lon: Vec<f64>,
    pub lat: Vec<f64>,
    pub layout: FrameLayout,
    pub scale: ColorScale,
    pub style: FrameStyle,
    pub boundary: Vec<Polyline>,
    pub coastline: Vec<Polyline>,
    pub borders: Vec<Polyline>,
}

impl FrameContext {
    /// Context for `grid` with no reference layers attached.
    pub fn new(grid: &Grid, config: &RenderConfig) -> RenderResult<Self> {
        let layout = FrameLayout::new(config.width, config.extent)?;
        let [min, max] = config.color_domain;
        let scale = ColorScale::viridis(min, max).ok_or_else(|| {
            RenderError::InvalidLayout(format!("color domain [{}, {}] is empty", min, max))
        })?;

        Ok(Self {
            lon: grid.lon.clone(),
            lat: grid.lat.clone(),
            layout,
            scale,
            style: FrameStyle::from_config(config),
            boundary: Vec::new(),
            coastline: Vec::new(),
            borders: Vec::new(),
        })
    }

    pub fn with_boundary(mut self, outlines: Vec<Polyline>) -> Self {
        self.boundary = outlines;
        self
    }

    pub fn with_coastline(mut self, lines: Vec<Polyline>) -> Self {
        self.coastline = lines;
        self
    }

    pub fn with_borders(mut self, lines: Vec<Polyline>) -> Self {
        self.borders = lines;
        self
    }

    fn check_shape(&self, field: &MaskedField) -> RenderResult<()> {
        if field.width() != self.lon.len() || field.height() != self.lat.len() {
            return Err(RenderError::ShapeMismatch(format!(
                "field is {}x{} but axes are {}x{}",
                field.height(),
                field.width(),
                self.lat.len(),
                self.lon.len()
            )));
        }
        Ok(())
    }
}

/// One rendered, opaque RGBA frame.
#[derive(Debug, Clone)]
pub struct Frame {
    pub timestamp: String,
    pub image: RgbaImage,
    pub streamline_count: usize,
}

impl Frame {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Encode as PNG.
    pub fn to_png(&self) -> RenderResult<Vec<u8>> {
        crate::png::create_png(
            self.image.as_raw(),
            self.width() as usize,
            self.height() as usize,
        )
    }

    pub fn save_png(&self, path: &Path) -> RenderResult<()> {
        let bytes = self.to_png()?;
        std::fs::write(path, bytes).map_err(|source| RenderError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}

/// Render one frame, back to front: background, coastline and borders,
/// boundary outline, graticule, streamlines, colorbar and title.
///
/// A field with no valid cell still produces a frame, without streamlines.
pub fn render_frame(
    field: &MaskedField,
    ctx: &FrameContext,
    timestamp: &str,
) -> RenderResult<Frame> {
    ctx.check_shape(field)?;

    if field.is_all_missing() {
        tracing::warn!(
            timestamp,
            "Field is entirely missing; frame will have no streamlines"
        );
    }

    let lines = trace_streamlines(field, &ctx.lon, &ctx.lat, &ctx.style.streamlines);
    let layout = &ctx.layout;
    let mut pixmap = layers::new_pixmap(layout.width, layout.height)?;
    let clip = layers::plot_clip(layout)?;

    layers::fill_background(&mut pixmap, ctx.style.background);
    layers::draw_polylines(&mut pixmap, layout, &ctx.coastline, &COASTLINE_STYLE, &clip);
    layers::draw_polylines(&mut pixmap, layout, &ctx.borders, &BORDER_STYLE, &clip);
    layers::draw_polylines(&mut pixmap, layout, &ctx.boundary, &BOUNDARY_STYLE, &clip);
    layers::draw_graticule(&mut pixmap, layout, ctx.style.graticule_step, &clip);

    let streamlines = draw_streamline_layer(&lines, ctx)?;
    pixmap.draw_pixmap(
        0,
        0,
        streamlines.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );

    layers::draw_colorbar(&mut pixmap, layout, &ctx.scale, &ctx.style.legend_label);
    layers::draw_title(&mut pixmap, layout, &ctx.style.title, timestamp);

    tracing::debug!(
        timestamp,
        streamlines = lines.len(),
        valid_cells = field.valid_count(),
        "Rendered frame"
    );

    Ok(Frame {
        timestamp: timestamp.to_string(),
        image: to_image(&pixmap)?,
        streamline_count: lines.len(),
    })
}

/// The streamline layer alone, on a transparent pixmap of frame size.
pub fn streamline_layer(field: &MaskedField, ctx: &FrameContext) -> RenderResult<Pixmap> {
    ctx.check_shape(field)?;
    let lines = trace_streamlines(field, &ctx.lon, &ctx.lat, &ctx.style.streamlines);
    draw_streamline_layer(&lines, ctx)
}

fn draw_streamline_layer(lines: &[Streamline], ctx: &FrameContext) -> RenderResult<Pixmap> {
    let layout = &ctx.layout;
    let mut pixmap = layers::new_pixmap(layout.width, layout.height)?;
    let clip = layers::plot_clip(layout)?;
    layers::draw_streamlines(
        &mut pixmap,
        layout,
        lines,
        &ctx.scale,
        ctx.style.line_width,
        ctx.style.arrow_size,
        &clip,
    );
    Ok(pixmap)
}

fn to_image(pixmap: &Pixmap) -> RenderResult<RgbaImage> {
    let data: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();

    RgbaImage::from_raw(pixmap.width(), pixmap.height(), data).ok_or_else(|| {
        RenderError::InvalidLayout(format!(
            "pixel buffer does not match {}x{}",
            pixmap.width(),
            pixmap.height()
        ))
    })
}
