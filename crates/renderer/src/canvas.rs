//! Frame geometry: where the map, title and legend sit, and the
//! equirectangular lon/lat to pixel mapping.

use windmap_common::{BoundingBox, MIN_FRAME_WIDTH};

use crate::error::{RenderError, RenderResult};

/// Width the band sizes below are expressed for.
pub const REFERENCE_WIDTH: f32 = 960.0;

/// Axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl PixelRect {
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }
}

/// Pixel layout of one frame, top to bottom: title band, map, axis labels,
/// colorbar with ticks, legend label.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameLayout {
    pub width: u32,
    pub height: u32,
    /// Multiplier applied to fonts and line widths (1.0 at 960 px)
    pub scale: f32,
    pub extent: BoundingBox,
    pub plot: PixelRect,
    pub colorbar: PixelRect,
    /// Vertical centers of the two title lines
    pub title_lines: [f32; 2],
    /// Vertical center of the longitude labels under the map
    pub x_label_y: f32,
    /// Vertical center of the colorbar tick labels
    pub tick_label_y: f32,
    /// Vertical center of the colorbar label
    pub legend_label_y: f32,
    pixels_per_degree: f32,
}

impl FrameLayout {
    /// Lay out a frame of `width` pixels showing `extent`.
    ///
    /// The map keeps a 1:1 degree aspect ratio, so the frame height
    /// follows from the extent.
    pub fn new(width: u32, extent: BoundingBox) -> RenderResult<Self> {
        if !extent.is_valid() {
            return Err(RenderError::InvalidLayout(format!(
                "extent {:?} is empty",
                extent
            )));
        }
        if width < MIN_FRAME_WIDTH {
            return Err(RenderError::InvalidLayout(format!(
                "width {} is below the minimum of {} px",
                width, MIN_FRAME_WIDTH
            )));
        }

        let s = width as f32 / REFERENCE_WIDTH;
        let margin_left = 70.0 * s;
        let margin_right = 30.0 * s;
        let title_band = 84.0 * s;

        let plot_w = width as f32 - margin_left - margin_right;
        let pixels_per_degree = plot_w / extent.width() as f32;
        let plot_h = extent.height() as f32 * pixels_per_degree;
        let plot = PixelRect {
            x: margin_left,
            y: title_band,
            w: plot_w,
            h: plot_h,
        };

        let x_label_y = plot.bottom() + 16.0 * s;
        let colorbar = PixelRect {
            x: plot.x,
            y: plot.bottom() + 44.0 * s,
            w: plot.w,
            h: 16.0 * s,
        };
        let tick_label_y = colorbar.bottom() + 18.0 * s;
        let legend_label_y = tick_label_y + 24.0 * s;
        let height = (legend_label_y + 24.0 * s).ceil() as u32;

        Ok(Self {
            width,
            height,
            scale: s,
            extent,
            plot,
            colorbar,
            title_lines: [30.0 * s, 58.0 * s],
            x_label_y,
            tick_label_y,
            legend_label_y,
            pixels_per_degree,
        })
    }

    pub fn pixels_per_degree(&self) -> f32 {
        self.pixels_per_degree
    }

    /// Pixel position of `(lon, lat)`; north is up.
    pub fn project(&self, lon: f64, lat: f64) -> (f32, f32) {
        let x = self.plot.x + ((lon - self.extent.min_x) as f32) * self.pixels_per_degree;
        let y = self.plot.y + ((self.extent.max_y - lat) as f32) * self.pixels_per_degree;
        (x, y)
    }

    /// Geographic position of a pixel.
    pub fn unproject(&self, x: f32, y: f32) -> (f64, f64) {
        let lon = self.extent.min_x + ((x - self.plot.x) / self.pixels_per_degree) as f64;
        let lat = self.extent.max_y - ((y - self.plot.y) / self.pixels_per_degree) as f64;
        (lon, lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn india() -> FrameLayout {
        FrameLayout::new(960, BoundingBox::new(68.0, 6.0, 98.0, 38.0)).unwrap()
    }

    #[test]
    fn test_corners_map_to_plot() {
        let layout = india();
        let (x0, y0) = layout.project(68.0, 38.0);
        let (x1, y1) = layout.project(98.0, 6.0);

        assert!((x0 - layout.plot.x).abs() < 1e-3);
        assert!((y0 - layout.plot.y).abs() < 1e-3);
        assert!((x1 - layout.plot.right()).abs() < 1e-2);
        assert!((y1 - layout.plot.bottom()).abs() < 1e-2);
    }

    #[test]
    fn test_square_degrees() {
        let layout = india();
        assert!((layout.plot.h / layout.plot.w - 32.0 / 30.0).abs() < 1e-4);
        assert!(layout.height as f32 > layout.colorbar.bottom());
    }

    #[test]
    fn test_unproject_inverts_project() {
        let layout = india();
        let (x, y) = layout.project(80.25, 21.5);
        let (lon, lat) = layout.unproject(x, y);
        assert!((lon - 80.25).abs() < 1e-3);
        assert!((lat - 21.5).abs() < 1e-3);
    }

    #[test]
    fn test_rejects_degenerate() {
        assert!(FrameLayout::new(960, BoundingBox::new(10.0, 0.0, 10.0, 5.0)).is_err());
        assert!(FrameLayout::new(50, BoundingBox::new(0.0, 0.0, 10.0, 5.0)).is_err());
        assert!(FrameLayout::new(199, BoundingBox::new(0.0, 0.0, 10.0, 5.0)).is_err());
        assert!(FrameLayout::new(200, BoundingBox::new(0.0, 0.0, 10.0, 5.0)).is_ok());
    }

    #[test]
    fn test_scales_with_width() {
        let small = FrameLayout::new(480, BoundingBox::new(68.0, 6.0, 98.0, 38.0)).unwrap();
        assert!((small.scale - 0.5).abs() < 1e-6);
        assert!(small.height < india().height);
    }
}
