//! Fixed magnitude to color mapping shared by every frame.

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0, 255);
    pub const WHITE: Color = Color::new(255, 255, 255, 255);
    pub const GRAY: Color = Color::new(128, 128, 128, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

/// Linear color interpolation, `t` clamped to [0, 1].
pub fn interpolate_color(color1: Color, color2: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let t_inv = 1.0 - t;
    let mix = |a: u8, b: u8| (a as f32 * t_inv + b as f32 * t).round() as u8;

    Color::new(
        mix(color1.r, color2.r),
        mix(color1.g, color2.g),
        mix(color1.b, color2.b),
        mix(color1.a, color2.a),
    )
}

/// Viridis sampled at 0.0, 0.1, ..., 1.0.
const VIRIDIS: [Color; 11] = [
    Color::rgb(68, 1, 84),
    Color::rgb(72, 36, 117),
    Color::rgb(65, 68, 135),
    Color::rgb(53, 95, 141),
    Color::rgb(42, 120, 142),
    Color::rgb(33, 145, 140),
    Color::rgb(34, 168, 132),
    Color::rgb(68, 191, 112),
    Color::rgb(122, 209, 81),
    Color::rgb(189, 223, 38),
    Color::rgb(253, 231, 37),
];

/// Piecewise-linear color ramp over `[min, max]`, clamped at both ends.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    min: f32,
    max: f32,
    stops: Vec<Color>,
}

impl ColorScale {
    /// Evenly spaced `stops` spanning `[min, max]`.
    ///
    /// Returns `None` for an empty domain or fewer than two stops.
    pub fn new(min: f32, max: f32, stops: Vec<Color>) -> Option<Self> {
        if !(min < max) || stops.len() < 2 {
            return None;
        }
        Some(Self { min, max, stops })
    }

    /// The viridis colormap over `[min, max]`.
    pub fn viridis(min: f32, max: f32) -> Option<Self> {
        Self::new(min, max, VIRIDIS.to_vec())
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Position of `value` in the domain, clamped to [0, 1]. NaN maps to 0.
    pub fn normalize(&self, value: f32) -> f32 {
        let t = (value - self.min) / (self.max - self.min);
        if t.is_nan() {
            0.0
        } else {
            t.clamp(0.0, 1.0)
        }
    }

    /// Color for a magnitude; out-of-domain values take the end colors.
    pub fn color_for(&self, value: f32) -> Color {
        let segments = (self.stops.len() - 1) as f32;
        let pos = self.normalize(value) * segments;
        let lower = (pos.floor() as usize).min(self.stops.len() - 2);
        interpolate_color(self.stops[lower], self.stops[lower + 1], pos - lower as f32)
    }

    /// `intervals + 1` evenly spaced tick values from min to max.
    pub fn ticks(&self, intervals: usize) -> Vec<f32> {
        let intervals = intervals.max(1);
        let step = (self.max - self.min) / intervals as f32;
        (0..=intervals).map(|i| self.min + step * i as f32).collect()
    }
}
