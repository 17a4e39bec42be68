//! Regular lat/lon grid and the wind component cube defined on it.

use chrono::{DateTime, Utc};

use crate::{BoundingBox, WindmapError, WindmapResult};

/// Coordinate axes of a regular lat/lon grid.
///
/// Per-step arrays defined on this grid are `height x width`, row-major,
/// with rows following `lat` and columns following `lon`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    /// Longitude of each column (degrees east)
    pub lon: Vec<f64>,
    /// Latitude of each row (degrees north)
    pub lat: Vec<f64>,
    /// Valid time of each step
    pub times: Vec<DateTime<Utc>>,
}

impl Grid {
    pub fn new(lon: Vec<f64>, lat: Vec<f64>, times: Vec<DateTime<Utc>>) -> Self {
        Self { lon, lat, times }
    }

    /// Number of columns (longitude points).
    pub fn width(&self) -> usize {
        self.lon.len()
    }

    /// Number of rows (latitude points).
    pub fn height(&self) -> usize {
        self.lat.len()
    }

    /// Number of time steps.
    pub fn time_len(&self) -> usize {
        self.times.len()
    }

    /// Number of cells in one time step.
    pub fn cell_count(&self) -> usize {
        self.width() * self.height()
    }

    /// True when latitude runs north to south (first value above last).
    pub fn latitude_descending(&self) -> bool {
        match (self.lat.first(), self.lat.last()) {
            (Some(first), Some(last)) => first > last,
            _ => false,
        }
    }

    /// Bounding box of the grid points (cell centers).
    pub fn bbox(&self) -> BoundingBox {
        let (min_x, max_x) = min_max(&self.lon);
        let (min_y, max_y) = min_max(&self.lat);
        BoundingBox::new(min_x, min_y, max_x, max_y)
    }

    /// Reverse the latitude axis when it is descending.
    ///
    /// Returns whether the axis was flipped. Calling this on an increasing
    /// axis is a no-op.
    pub fn normalize_latitude(&mut self) -> bool {
        if !self.latitude_descending() {
            return false;
        }
        self.lat.reverse();
        true
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
        (lo.min(v), hi.max(v))
    })
}

/// Eastward (u) and northward (v) wind components over a [`Grid`].
///
/// Both arrays are laid out `[time, lat, lon]`, row-major.
#[derive(Debug, Clone)]
pub struct WindDataset {
    pub grid: Grid,
    pub u: Vec<f32>,
    pub v: Vec<f32>,
}

impl WindDataset {
    /// Build a dataset, failing fast when the arrays do not match the axes.
    pub fn new(grid: Grid, u: Vec<f32>, v: Vec<f32>) -> WindmapResult<Self> {
        let dataset = Self { grid, u, v };
        dataset.validate()?;
        Ok(dataset)
    }

    /// Check that both component arrays hold exactly `T * H * W` values.
    pub fn validate(&self) -> WindmapResult<()> {
        let expected = self.grid.time_len() * self.grid.cell_count();

        if self.grid.width() == 0 || self.grid.height() == 0 {
            return Err(WindmapError::GridMismatch(format!(
                "empty spatial axes: {} longitudes, {} latitudes",
                self.grid.width(),
                self.grid.height()
            )));
        }

        for (name, data) in [("u", &self.u), ("v", &self.v)] {
            if data.len() != expected {
                return Err(WindmapError::GridMismatch(format!(
                    "{} has {} values, expected {} ({} times x {} lat x {} lon)",
                    name,
                    data.len(),
                    expected,
                    self.grid.time_len(),
                    self.grid.height(),
                    self.grid.width()
                )));
            }
        }

        Ok(())
    }

    /// Values per time step.
    pub fn step_len(&self) -> usize {
        self.grid.cell_count()
    }

    /// The u and v slices for one time index.
    pub fn step(&self, time_index: usize) -> Option<(&[f32], &[f32])> {
        if time_index >= self.grid.time_len() {
            return None;
        }
        let start = time_index * self.step_len();
        let end = start + self.step_len();
        Some((self.u.get(start..end)?, self.v.get(start..end)?))
    }

    /// Put latitude in increasing order, flipping both component arrays
    /// along the latitude axis to keep the physical mapping.
    ///
    /// Idempotent: an increasing grid passes through unchanged.
    pub fn normalize_latitude(mut self) -> Self {
        if self.grid.normalize_latitude() {
            let width = self.grid.width();
            let height = self.grid.height();
            flip_rows(&mut self.u, width, height);
            flip_rows(&mut self.v, width, height);
            tracing::debug!(width, height, "Flipped latitude axis to increasing order");
        }
        self
    }
}

/// Reverse the row order of every `height x width` block in `data`.
fn flip_rows(data: &mut [f32], width: usize, height: usize) {
    let step_len = width * height;
    if step_len == 0 {
        return;
    }

    for block in data.chunks_exact_mut(step_len) {
        for row in 0..height / 2 {
            let mirror = height - 1 - row;
            let (head, tail) = block.split_at_mut(mirror * width);
            head[row * width..(row + 1) * width].swap_with_slice(&mut tail[..width]);
        }
    }
}
