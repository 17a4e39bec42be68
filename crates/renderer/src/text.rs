//! Stroke-font text drawing.
//!
//! Glyphs are polylines in a unit box (x right, y down) stroked with
//! round caps, so labels need no font files. Covers A-Z, a-z, 0-9, space
//! and `- : . ( ) / °`. Lowercase letters sit on an x-height of 0.6 with
//! descenders below the baseline.

use tiny_skia::{LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::colorscale::Color;

/// Glyph box width as a fraction of the text size (cap height).
const GLYPH_WIDTH: f32 = 0.58;
/// Horizontal advance per character as a fraction of the text size.
const ADVANCE: f32 = 0.82;
const STROKE_WIDTH: f32 = 0.12;

/// Horizontal anchoring of a label relative to its x coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

type Glyph = &'static [&'static [(f32, f32)]];

/// Width in pixels of `text` drawn at `size`.
pub fn text_width(text: &str, size: f32) -> f32 {
    let n = text.chars().count();
    if n == 0 {
        return 0.0;
    }
    (n as f32 - 1.0) * ADVANCE * size + GLYPH_WIDTH * size
}

/// Draw `text` with its vertical center at `y`.
pub fn draw_text(
    pixmap: &mut Pixmap,
    text: &str,
    x: f32,
    y: f32,
    size: f32,
    align: Align,
    color: Color,
) {
    let width = text_width(text, size);
    let left = match align {
        Align::Left => x,
        Align::Center => x - width / 2.0,
        Align::Right => x - width,
    };
    let top = y - size / 2.0;

    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;

    let stroke = Stroke {
        width: (STROKE_WIDTH * size).max(0.8),
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    };

    let glyph_w = GLYPH_WIDTH * size;
    let mut pb = PathBuilder::new();

    for (i, ch) in text.chars().enumerate() {
        let origin_x = left + i as f32 * ADVANCE * size;
        for line in glyph(ch) {
            let mut points = line.iter();
            if let Some(&(gx, gy)) = points.next() {
                pb.move_to(origin_x + gx * glyph_w, top + gy * size);
                for &(gx, gy) in points {
                    pb.line_to(origin_x + gx * glyph_w, top + gy * size);
                }
            }
        }
    }

    if let Some(path) = pb.finish() {
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }
}

/// Whether `ch` has a glyph (space counts).
pub fn is_supported(ch: char) -> bool {
    ch == ' ' || !glyph(ch).is_empty()
}

fn glyph(ch: char) -> Glyph {
    match ch {
        'A' => &[&[(0.0, 1.0), (0.0, 0.3), (0.5, 0.0), (1.0, 0.3), (1.0, 1.0)], &[(0.0, 0.55), (1.0, 0.55)]],
        'B' => &[
            &[(0.0, 0.5), (0.75, 0.5), (1.0, 0.62), (1.0, 0.88), (0.75, 1.0), (0.0, 1.0), (0.0, 0.0), (0.7, 0.0), (0.92, 0.12), (0.92, 0.38), (0.75, 0.5)],
        ],
        'C' => &[&[(1.0, 0.0), (0.0, 0.0), (0.0, 1.0), (1.0, 1.0)]],
        'D' => &[&[(0.0, 0.0), (0.0, 1.0), (0.6, 1.0), (1.0, 0.7), (1.0, 0.3), (0.6, 0.0), (0.0, 0.0)]],
        'E' => &[&[(1.0, 0.0), (0.0, 0.0), (0.0, 1.0), (1.0, 1.0)], &[(0.0, 0.5), (0.75, 0.5)]],
        'F' => &[&[(1.0, 0.0), (0.0, 0.0), (0.0, 1.0)], &[(0.0, 0.5), (0.75, 0.5)]],
        'G' => &[&[(1.0, 0.0), (0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.5), (0.5, 0.5)]],
        'H' => &[&[(0.0, 0.0), (0.0, 1.0)], &[(1.0, 0.0), (1.0, 1.0)], &[(0.0, 0.5), (1.0, 0.5)]],
        'I' => &[&[(0.5, 0.0), (0.5, 1.0)], &[(0.2, 0.0), (0.8, 0.0)], &[(0.2, 1.0), (0.8, 1.0)]],
        'J' => &[&[(1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.7)]],
        'K' => &[&[(0.0, 0.0), (0.0, 1.0)], &[(1.0, 0.0), (0.0, 0.6)], &[(0.3, 0.4), (1.0, 1.0)]],
        'L' => &[&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)]],
        'M' => &[&[(0.0, 1.0), (0.0, 0.0), (0.5, 0.5), (1.0, 0.0), (1.0, 1.0)]],
        'N' => &[&[(0.0, 1.0), (0.0, 0.0), (1.0, 1.0), (1.0, 0.0)]],
        'O' => &[&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)]],
        'P' => &[&[(0.0, 1.0), (0.0, 0.0), (1.0, 0.0), (1.0, 0.5), (0.0, 0.5)]],
        'Q' => &[&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)], &[(0.6, 0.7), (1.05, 1.1)]],
        'R' => &[&[(0.0, 1.0), (0.0, 0.0), (1.0, 0.0), (1.0, 0.5), (0.0, 0.5)], &[(0.4, 0.5), (1.0, 1.0)]],
        'S' | '5' => &[&[(1.0, 0.0), (0.0, 0.0), (0.0, 0.5), (1.0, 0.5), (1.0, 1.0), (0.0, 1.0)]],
        'T' => &[&[(0.0, 0.0), (1.0, 0.0)], &[(0.5, 0.0), (0.5, 1.0)]],
        'U' => &[&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]],
        'V' => &[&[(0.0, 0.0), (0.5, 1.0), (1.0, 0.0)]],
        'W' => &[&[(0.0, 0.0), (0.25, 1.0), (0.5, 0.5), (0.75, 1.0), (1.0, 0.0)]],
        'X' => &[&[(0.0, 0.0), (1.0, 1.0)], &[(1.0, 0.0), (0.0, 1.0)]],
        'Y' => &[&[(0.0, 0.0), (0.5, 0.5), (1.0, 0.0)], &[(0.5, 0.5), (0.5, 1.0)]],
        'Z' => &[&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)]],
        'a' => &[&[(1.0, 0.4), (1.0, 1.0)], &[(1.0, 0.55), (0.7, 0.4), (0.2, 0.4), (0.0, 0.6), (0.0, 0.85), (0.2, 1.0), (0.7, 1.0), (1.0, 0.85)]],
        'b' => &[&[(0.0, 0.0), (0.0, 1.0)], &[(0.0, 0.55), (0.3, 0.4), (0.8, 0.4), (1.0, 0.6), (1.0, 0.8), (0.8, 1.0), (0.3, 1.0), (0.0, 0.85)]],
        'c' => &[&[(1.0, 0.45), (0.8, 0.4), (0.2, 0.4), (0.0, 0.6), (0.0, 0.8), (0.2, 1.0), (0.8, 1.0), (1.0, 0.95)]],
        'd' => &[&[(1.0, 0.0), (1.0, 1.0)], &[(1.0, 0.55), (0.7, 0.4), (0.2, 0.4), (0.0, 0.6), (0.0, 0.8), (0.2, 1.0), (0.7, 1.0), (1.0, 0.85)]],
        'e' => &[&[(0.0, 0.7), (1.0, 0.7), (1.0, 0.55), (0.8, 0.4), (0.2, 0.4), (0.0, 0.6), (0.0, 0.8), (0.2, 1.0), (0.9, 1.0)]],
        'f' => &[&[(0.9, 0.05), (0.7, 0.0), (0.45, 0.0), (0.3, 0.15), (0.3, 1.0)], &[(0.0, 0.4), (0.75, 0.4)]],
        'g' => &[
            &[(1.0, 0.4), (1.0, 1.15), (0.8, 1.3), (0.1, 1.3)],
            &[(1.0, 0.55), (0.7, 0.4), (0.2, 0.4), (0.0, 0.6), (0.0, 0.8), (0.2, 0.95), (0.7, 0.95), (1.0, 0.8)],
        ],
        'h' => &[&[(0.0, 0.0), (0.0, 1.0)], &[(0.0, 0.55), (0.3, 0.4), (0.8, 0.4), (1.0, 0.55), (1.0, 1.0)]],
        'i' => &[&[(0.5, 0.4), (0.5, 1.0)], &[(0.5, 0.15), (0.5, 0.2)]],
        'j' => &[&[(0.6, 0.4), (0.6, 1.15), (0.4, 1.3), (0.1, 1.3)], &[(0.6, 0.15), (0.6, 0.2)]],
        'k' => &[&[(0.0, 0.0), (0.0, 1.0)], &[(0.9, 0.4), (0.0, 0.75)], &[(0.35, 0.62), (1.0, 1.0)]],
        'l' => &[&[(0.4, 0.0), (0.4, 0.9), (0.55, 1.0), (0.7, 1.0)]],
        'm' => &[
            &[(0.0, 1.0), (0.0, 0.4)],
            &[(0.0, 0.5), (0.15, 0.4), (0.35, 0.4), (0.5, 0.5), (0.5, 1.0)],
            &[(0.5, 0.5), (0.65, 0.4), (0.85, 0.4), (1.0, 0.5), (1.0, 1.0)],
        ],
        'n' => &[&[(0.0, 1.0), (0.0, 0.4)], &[(0.0, 0.55), (0.3, 0.4), (0.8, 0.4), (1.0, 0.55), (1.0, 1.0)]],
        'o' => &[&[(0.2, 0.4), (0.8, 0.4), (1.0, 0.6), (1.0, 0.8), (0.8, 1.0), (0.2, 1.0), (0.0, 0.8), (0.0, 0.6), (0.2, 0.4)]],
        'p' => &[&[(0.0, 0.4), (0.0, 1.3)], &[(0.0, 0.55), (0.3, 0.4), (0.8, 0.4), (1.0, 0.6), (1.0, 0.8), (0.8, 1.0), (0.3, 1.0), (0.0, 0.85)]],
        'q' => &[&[(1.0, 0.4), (1.0, 1.3)], &[(1.0, 0.55), (0.7, 0.4), (0.2, 0.4), (0.0, 0.6), (0.0, 0.8), (0.2, 1.0), (0.7, 1.0), (1.0, 0.85)]],
        'r' => &[&[(0.0, 0.4), (0.0, 1.0)], &[(0.0, 0.6), (0.3, 0.4), (0.9, 0.4)]],
        's' => &[
            &[(1.0, 0.45), (0.8, 0.4), (0.15, 0.4), (0.0, 0.5), (0.0, 0.6), (0.15, 0.7), (0.85, 0.7), (1.0, 0.8), (1.0, 0.9), (0.85, 1.0), (0.0, 1.0)],
        ],
        't' => &[&[(0.35, 0.1), (0.35, 0.9), (0.5, 1.0), (0.8, 1.0)], &[(0.0, 0.4), (0.8, 0.4)]],
        'u' => &[&[(0.0, 0.4), (0.0, 0.85), (0.2, 1.0), (0.7, 1.0), (1.0, 0.85)], &[(1.0, 0.4), (1.0, 1.0)]],
        'v' => &[&[(0.0, 0.4), (0.5, 1.0), (1.0, 0.4)]],
        'w' => &[&[(0.0, 0.4), (0.25, 1.0), (0.5, 0.6), (0.75, 1.0), (1.0, 0.4)]],
        'x' => &[&[(0.0, 0.4), (1.0, 1.0)], &[(1.0, 0.4), (0.0, 1.0)]],
        'y' => &[&[(0.0, 0.4), (0.5, 1.0)], &[(1.0, 0.4), (0.3, 1.3)]],
        'z' => &[&[(0.0, 0.4), (1.0, 0.4), (0.0, 1.0), (1.0, 1.0)]],
        '0' => &[&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)], &[(0.8, 0.2), (0.2, 0.8)]],
        '1' => &[&[(0.2, 0.2), (0.5, 0.0), (0.5, 1.0)], &[(0.2, 1.0), (0.8, 1.0)]],
        '2' => &[&[(0.0, 0.0), (1.0, 0.0), (1.0, 0.5), (0.0, 0.5), (0.0, 1.0), (1.0, 1.0)]],
        '3' => &[&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)], &[(0.2, 0.5), (1.0, 0.5)]],
        '4' => &[&[(0.0, 0.0), (0.0, 0.5), (1.0, 0.5)], &[(1.0, 0.0), (1.0, 1.0)]],
        '6' => &[&[(1.0, 0.0), (0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.5), (0.0, 0.5)]],
        '7' => &[&[(0.0, 0.0), (1.0, 0.0), (0.4, 1.0)]],
        '8' => &[&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)], &[(0.0, 0.5), (1.0, 0.5)]],
        '9' => &[&[(1.0, 0.5), (0.0, 0.5), (0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]],
        '-' => &[&[(0.15, 0.5), (0.85, 0.5)]],
        ':' => &[&[(0.5, 0.25), (0.5, 0.3)], &[(0.5, 0.75), (0.5, 0.8)]],
        '.' => &[&[(0.5, 0.92), (0.5, 1.0)]],
        '(' => &[&[(0.7, 0.0), (0.35, 0.3), (0.35, 0.7), (0.7, 1.0)]],
        ')' => &[&[(0.3, 0.0), (0.65, 0.3), (0.65, 0.7), (0.3, 1.0)]],
        '/' => &[&[(0.0, 1.0), (1.0, 0.0)]],
        '°' => &[&[(0.3, 0.0), (0.7, 0.0), (0.7, 0.35), (0.3, 0.35), (0.3, 0.0)]],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_width() {
        assert_eq!(text_width("", 10.0), 0.0);
        assert!((text_width("A", 10.0) - 5.8).abs() < 1e-5);
        assert!((text_width("AB", 10.0) - 14.0).abs() < 1e-5);
    }

    #[test]
    fn test_label_characters_supported() {
        for text in ["72°E", "20°N", "Wind Speed (m/s)", "2024-06-01 18:00", "10.5"] {
            assert!(text.chars().all(is_supported), "{}", text);
        }
        assert!(!is_supported('#'));
        assert!(('a'..='z').chain('A'..='Z').chain('0'..='9').all(is_supported));
    }

    #[test]
    fn test_lowercase_differs_from_capitals() {
        let render = |text: &str| {
            let mut pixmap = Pixmap::new(80, 40).unwrap();
            draw_text(&mut pixmap, text, 40.0, 20.0, 20.0, Align::Center, Color::WHITE);
            pixmap
        };
        assert_ne!(render("m/s").data(), render("M/S").data());

        // Lowercase stays below the cap line
        let pixmap = render("mnos");
        let top = (20.0 - 10.0) as u32;
        for x in 0..80 {
            for y in 0..top + 2 {
                assert_eq!(pixmap.pixel(x, y).map(|p| p.alpha()), Some(0), "({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_draw_text_marks_pixels() {
        let mut pixmap = Pixmap::new(80, 30).unwrap();
        draw_text(&mut pixmap, "H1", 40.0, 15.0, 16.0, Align::Center, Color::WHITE);

        let lit = pixmap.pixels().iter().filter(|p| p.alpha() > 0).count();
        assert!(lit > 20);

        // Nothing drawn far from the label
        assert_eq!(pixmap.pixel(2, 2).map(|p| p.alpha()), Some(0));
    }
}
