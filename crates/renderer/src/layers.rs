//! Individual frame layers drawn with tiny-skia.
//!
//! Every function draws onto an existing pixmap and keeps no state, so a
//! frame is just these calls in back-to-front order.

use tiny_skia::{
    FillRule, LineCap, LineJoin, Mask, Paint, PathBuilder, Pixmap, Rect, Stroke, StrokeDash,
    Transform,
};
use windmap_common::Polyline;

use crate::canvas::{FrameLayout, PixelRect};
use crate::colorscale::{Color, ColorScale};
use crate::error::{RenderError, RenderResult};
use crate::streamlines::Streamline;
use crate::text::{draw_text, Align};

/// Styling of a stroked line layer, widths in pixels at the reference width.
#[derive(Debug, Clone, Copy)]
pub struct LineStyle {
    pub color: Color,
    pub width: f32,
    /// Dash and gap lengths, `None` for solid
    pub dash: Option<[f32; 2]>,
}

pub const COASTLINE_STYLE: LineStyle = LineStyle {
    color: Color::GRAY,
    width: 0.8,
    dash: None,
};

pub const BORDER_STYLE: LineStyle = LineStyle {
    color: Color::GRAY,
    width: 0.5,
    dash: None,
};

pub const BOUNDARY_STYLE: LineStyle = LineStyle {
    color: Color::WHITE,
    width: 1.6,
    dash: None,
};

pub const GRATICULE_STYLE: LineStyle = LineStyle {
    color: Color::new(255, 255, 255, 128),
    width: 0.5,
    dash: Some([4.0, 3.0]),
};

fn solid_paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

fn stroke_for(style: &LineStyle, scale: f32) -> Stroke {
    Stroke {
        width: (style.width * scale).max(0.3),
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        dash: style
            .dash
            .and_then(|[on, off]| StrokeDash::new(vec![on * scale, off * scale], 0.0)),
        ..Stroke::default()
    }
}

fn rect_path(rect: &PixelRect) -> Option<tiny_skia::Path> {
    Rect::from_xywh(rect.x, rect.y, rect.w, rect.h).map(PathBuilder::from_rect)
}

/// Allocate a frame-sized pixmap.
pub fn new_pixmap(width: u32, height: u32) -> RenderResult<Pixmap> {
    Pixmap::new(width, height).ok_or(RenderError::Allocation { width, height })
}

/// Clip mask covering the map area.
pub fn plot_clip(layout: &FrameLayout) -> RenderResult<Mask> {
    let mut mask = Mask::new(layout.width, layout.height).ok_or(RenderError::Allocation {
        width: layout.width,
        height: layout.height,
    })?;
    let path = rect_path(&layout.plot)
        .ok_or_else(|| RenderError::InvalidLayout(format!("plot area {:?}", layout.plot)))?;
    mask.fill_path(&path, FillRule::Winding, false, Transform::identity());
    Ok(mask)
}

/// Solid background over the whole frame.
pub fn fill_background(pixmap: &mut Pixmap, color: Color) {
    pixmap.fill(color.to_skia());
}

/// Stroke geographic polylines, clipped to the map.
pub fn draw_polylines(
    pixmap: &mut Pixmap,
    layout: &FrameLayout,
    lines: &[Polyline],
    style: &LineStyle,
    clip: &Mask,
) {
    let mut pb = PathBuilder::new();
    for line in lines.iter().filter(|l| l.len() >= 2) {
        let (x, y) = layout.project(line[0].0, line[0].1);
        pb.move_to(x, y);
        for &(lon, lat) in &line[1..] {
            let (x, y) = layout.project(lon, lat);
            pb.line_to(x, y);
        }
    }

    if let Some(path) = pb.finish() {
        let paint = solid_paint(style.color);
        let stroke = stroke_for(style, layout.scale);
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), Some(clip));
    }
}

/// Graticule positions `start, start + step, ...` up to `end`.
pub fn graticule_values(start: f64, end: f64, step: f64) -> Vec<f64> {
    if !(step > 0.0) {
        return Vec::new();
    }
    let count = ((end - start) / step + 1e-9).floor() as usize;
    (0..=count).map(|k| start + k as f64 * step).collect()
}

/// Degree label such as `72°E` or `20°N`.
pub fn format_degrees(value: f64, positive: char, negative: char) -> String {
    let magnitude = value.abs();
    let number = if (magnitude - magnitude.round()).abs() < 1e-6 {
        format!("{:.0}", magnitude)
    } else {
        format!("{:.1}", magnitude)
    };

    if magnitude < 1e-9 {
        format!("{}°", number)
    } else if value > 0.0 {
        format!("{}°{}", number, positive)
    } else {
        format!("{}°{}", number, negative)
    }
}

/// Dashed graticule with labels along the bottom and left edges only.
pub fn draw_graticule(pixmap: &mut Pixmap, layout: &FrameLayout, step: f64, clip: &Mask) {
    let extent = layout.extent;
    let lons = graticule_values(extent.min_x, extent.max_x, step);
    let lats = graticule_values(extent.min_y, extent.max_y, step);

    let mut lines: Vec<Polyline> = Vec::with_capacity(lons.len() + lats.len());
    lines.extend(lons.iter().map(|&lon| vec![(lon, extent.min_y), (lon, extent.max_y)]));
    lines.extend(lats.iter().map(|&lat| vec![(extent.min_x, lat), (extent.max_x, lat)]));
    draw_polylines(pixmap, layout, &lines, &GRATICULE_STYLE, clip);

    let size = 11.0 * layout.scale;
    for &lon in &lons {
        let (x, _) = layout.project(lon, extent.min_y);
        let label = format_degrees(lon, 'E', 'W');
        draw_text(pixmap, &label, x, layout.x_label_y, size, Align::Center, Color::WHITE);
    }
    for &lat in &lats {
        let (_, y) = layout.project(extent.min_x, lat);
        let label = format_degrees(lat, 'N', 'S');
        let x = layout.plot.x - 6.0 * layout.scale;
        draw_text(pixmap, &label, x, y, size, Align::Right, Color::WHITE);
    }
}

/// Stroke streamlines colored by magnitude, with an arrowhead at the
/// middle of each line. Segments are colored by their starting vertex.
pub fn draw_streamlines(
    pixmap: &mut Pixmap,
    layout: &FrameLayout,
    lines: &[Streamline],
    scale: &ColorScale,
    line_width: f32,
    arrow_size: f32,
    clip: &Mask,
) {
    let stroke = Stroke {
        width: line_width * layout.scale,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    };

    for line in lines.iter().filter(|l| l.len() >= 2) {
        let pixels: Vec<(f32, f32)> = line
            .points
            .iter()
            .map(|&(lon, lat)| layout.project(lon, lat))
            .collect();
        let colors: Vec<Color> = line.magnitudes.iter().map(|&m| scale.color_for(m)).collect();

        // One path per run of equally colored segments
        let mut start = 0;
        while start < pixels.len() - 1 {
            let color = colors[start];
            let mut end = start + 1;
            while end < pixels.len() - 1 && colors[end] == color {
                end += 1;
            }

            let mut pb = PathBuilder::new();
            pb.move_to(pixels[start].0, pixels[start].1);
            for &(x, y) in &pixels[start + 1..=end] {
                pb.line_to(x, y);
            }
            if let Some(path) = pb.finish() {
                let paint = solid_paint(color);
                pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), Some(clip));
            }
            start = end;
        }

        draw_arrowhead(pixmap, &pixels, &colors, layout.scale * arrow_size, clip);
    }
}

fn draw_arrowhead(
    pixmap: &mut Pixmap,
    pixels: &[(f32, f32)],
    colors: &[Color],
    size: f32,
    clip: &Mask,
) {
    let lengths: Vec<f32> = pixels
        .windows(2)
        .scan(0.0, |acc, w| {
            *acc += (w[1].0 - w[0].0).hypot(w[1].1 - w[0].1);
            Some(*acc)
        })
        .collect();
    let Some(&total) = lengths.last() else {
        return;
    };
    if total <= 0.0 {
        return;
    }

    let n = lengths.partition_point(|&s| s < total / 2.0).min(pixels.len() - 2);
    let tail = pixels[n];
    let next = pixels[n + 1];
    let (dx, dy) = (next.0 - tail.0, next.1 - tail.1);
    let len = dx.hypot(dy);
    if len <= f32::EPSILON {
        return;
    }
    let (ux, uy) = (dx / len, dy / len);
    let center = ((tail.0 + next.0) / 2.0, (tail.1 + next.1) / 2.0);

    let head_length = 8.0 * size;
    let half_width = 3.5 * size;
    let tip = (center.0 + ux * head_length / 2.0, center.1 + uy * head_length / 2.0);
    let base = (center.0 - ux * head_length / 2.0, center.1 - uy * head_length / 2.0);

    let mut pb = PathBuilder::new();
    pb.move_to(tip.0, tip.1);
    pb.line_to(base.0 - uy * half_width, base.1 + ux * half_width);
    pb.line_to(base.0 + uy * half_width, base.1 - ux * half_width);
    pb.close();

    if let Some(path) = pb.finish() {
        let paint = solid_paint(colors[n]);
        pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), Some(clip));
    }
}

/// Horizontal colorbar with quarter ticks and a label underneath.
pub fn draw_colorbar(pixmap: &mut Pixmap, layout: &FrameLayout, scale: &ColorScale, label: &str) {
    let bar = layout.colorbar;
    let columns = bar.w.ceil().max(1.0) as usize;

    for i in 0..columns {
        let x = bar.x + i as f32;
        let w = (bar.right() - x).min(1.0);
        let value = scale.min() + (scale.max() - scale.min()) * (i as f32 + 0.5) / bar.w;
        if let Some(rect) = Rect::from_xywh(x, bar.y, w, bar.h) {
            let mut paint = solid_paint(scale.color_for(value));
            paint.anti_alias = false;
            pixmap.fill_rect(rect, &paint, Transform::identity(), None);
        }
    }

    let outline = Stroke {
        width: 0.8 * layout.scale,
        ..Stroke::default()
    };
    let white = solid_paint(Color::WHITE);
    if let Some(path) = rect_path(&bar) {
        pixmap.stroke_path(&path, &white, &outline, Transform::identity(), None);
    }

    let tick_len = 4.0 * layout.scale;
    let size = 11.0 * layout.scale;
    let mut pb = PathBuilder::new();
    for value in scale.ticks(4) {
        let x = bar.x + bar.w * scale.normalize(value);
        pb.move_to(x, bar.bottom());
        pb.line_to(x, bar.bottom() + tick_len);
        draw_text(pixmap, &format_tick(value), x, layout.tick_label_y, size, Align::Center, Color::WHITE);
    }
    if let Some(path) = pb.finish() {
        pixmap.stroke_path(&path, &white, &outline, Transform::identity(), None);
    }

    let center = bar.x + bar.w / 2.0;
    draw_text(pixmap, label, center, layout.legend_label_y, 13.0 * layout.scale, Align::Center, Color::WHITE);
}

fn format_tick(value: f32) -> String {
    if (value - value.round()).abs() < 1e-4 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

/// Two-line title: the configured heading over the timestamp.
pub fn draw_title(pixmap: &mut Pixmap, layout: &FrameLayout, title: &str, timestamp: &str) {
    let center = layout.plot.x + layout.plot.w / 2.0;
    let size = 16.0 * layout.scale;
    draw_text(pixmap, title, center, layout.title_lines[0], size, Align::Center, Color::WHITE);
    draw_text(pixmap, timestamp, center, layout.title_lines[1], size, Align::Center, Color::WHITE);
}
