//! Deterministic streamline layout over a masked wind field.
//!
//! Lines are integrated in grid-index space along the unit-speed direction
//! field with an adaptive second-order Runge-Kutta scheme. A coarse
//! occupancy grid spaces the lines out: every line claims the occupancy
//! cells it passes through and stops when it reaches a claimed cell.
//! Seeds are visited in a fixed spiral from the outer ring inwards, so the
//! same field always produces the same lines.
//!
//! Missing cells never seed or carry a line: the integrator stops as soon
//! as the bilinear neighbourhood of a position contains a missing cell.

use windmap_common::MaskedField;

/// Layout parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamlineConfig {
    /// 1.0 gives a 30x30 occupancy grid
    pub density: f32,
    /// Maximum length of each half of a line, in axes units (domain = 1)
    pub max_length: f64,
    /// Lines shorter than this (both halves together) are discarded
    pub min_length: f64,
    /// Step error tolerance of the adaptive integrator
    pub max_error: f64,
}

impl Default for StreamlineConfig {
    fn default() -> Self {
        Self {
            density: 4.0,
            max_length: 4.0,
            min_length: 0.1,
            max_error: 0.003,
        }
    }
}

impl StreamlineConfig {
    pub fn with_density(density: f32) -> Self {
        Self {
            density,
            ..Self::default()
        }
    }
}

/// One traced line in geographic coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Streamline {
    /// `(lon, lat)` vertices in flow order
    pub points: Vec<(f64, f64)>,
    /// Interpolated wind speed at each vertex
    pub magnitudes: Vec<f32>,
}

impl Streamline {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Lay out streamlines for one masked field.
///
/// `lon` and `lat` are the field's column and row axes (latitude
/// increasing). Fields smaller than 2x2 or without valid cells yield no
/// lines.
pub fn trace_streamlines(
    field: &MaskedField,
    lon: &[f64],
    lat: &[f64],
    config: &StreamlineConfig,
) -> Vec<Streamline> {
    let nx = field.width();
    let ny = field.height();
    if nx < 2 || ny < 2 || lon.len() != nx || lat.len() != ny || field.is_all_missing() {
        return Vec::new();
    }

    let grid = GridField::new(field, lon, lat);
    let side = ((30.0 * config.density).round() as usize).max(2);
    let mut occupancy = Occupancy::new(side, side, nx, ny);
    let integrator = Integrator {
        grid: &grid,
        max_ds: (1.0 / side as f64).min(0.1),
        max_error: config.max_error,
        max_length: config.max_length,
    };

    let mut lines = Vec::new();
    for (xm, ym) in spiral(side, side) {
        if occupancy.is_taken(xm, ym) {
            continue;
        }
        let (xg, yg) = occupancy.mask_to_grid(xm, ym);
        if let Some(trajectory) = integrator.integrate(xg, yg, config.min_length, &mut occupancy) {
            lines.push(grid.to_streamline(&trajectory));
        }
    }

    tracing::debug!(lines = lines.len(), occupancy = side, "Traced streamlines");
    lines
}

// =============================================================================
// Field sampling
// =============================================================================

/// Why an integration step could not be taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stop {
    /// Position left the grid
    OutOfBounds,
    /// Missing data nearby or zero speed
    Terminate,
}

/// The field in grid units plus the axes needed to map back to lon/lat.
struct GridField<'a> {
    field: &'a MaskedField,
    lon: &'a [f64],
    lat: &'a [f64],
    nx: usize,
    ny: usize,
    /// u and v converted to grid cells per unit time
    u: Vec<f32>,
    v: Vec<f32>,
    /// Speed in axes units per unit time
    speed: Vec<f32>,
}

impl<'a> GridField<'a> {
    fn new(field: &'a MaskedField, lon: &'a [f64], lat: &'a [f64]) -> Self {
        let nx = field.width();
        let ny = field.height();
        let dx = ((lon[nx - 1] - lon[0]) / (nx - 1) as f64).abs().max(f64::EPSILON) as f32;
        let dy = ((lat[ny - 1] - lat[0]) / (ny - 1) as f64).abs().max(f64::EPSILON) as f32;

        let u: Vec<f32> = field.raw_u().iter().map(|&u| u / dx).collect();
        let v: Vec<f32> = field.raw_v().iter().map(|&v| v / dy).collect();
        let speed = u
            .iter()
            .zip(&v)
            .map(|(&u, &v)| (u / (nx - 1) as f32).hypot(v / (ny - 1) as f32))
            .collect();

        Self {
            field,
            lon,
            lat,
            nx,
            ny,
            u,
            v,
            speed,
        }
    }

    fn within(&self, x: f64, y: f64) -> bool {
        x >= 0.0 && x <= (self.nx - 1) as f64 && y >= 0.0 && y <= (self.ny - 1) as f64
    }

    /// Bilinear interpolation; `None` when any of the four corners is missing.
    fn interpolate(&self, data: &[f32], x: f64, y: f64) -> Option<f64> {
        let x0 = (x.floor() as usize).min(self.nx - 1);
        let y0 = (y.floor() as usize).min(self.ny - 1);
        let x1 = (x0 + 1).min(self.nx - 1);
        let y1 = (y0 + 1).min(self.ny - 1);

        let valid = self.field.validity();
        let at = |row: usize, col: usize| -> Option<f64> {
            let idx = row * self.nx + col;
            valid[idx].then(|| data[idx] as f64)
        };

        let a00 = at(y0, x0)?;
        let a01 = at(y0, x1)?;
        let a10 = at(y1, x0)?;
        let a11 = at(y1, x1)?;

        let xt = x - x0 as f64;
        let yt = y - y0 as f64;
        let a0 = a00 * (1.0 - xt) + a01 * xt;
        let a1 = a10 * (1.0 - xt) + a11 * xt;
        Some(a0 * (1.0 - yt) + a1 * yt)
    }

    /// Unit-speed direction at `(x, y)`, in grid cells per axes unit.
    fn direction(&self, x: f64, y: f64) -> Result<(f64, f64), Stop> {
        if !self.within(x, y) {
            return Err(Stop::OutOfBounds);
        }
        let speed = self.interpolate(&self.speed, x, y).ok_or(Stop::Terminate)?;
        if speed == 0.0 {
            return Err(Stop::Terminate);
        }
        let u = self.interpolate(&self.u, x, y).ok_or(Stop::Terminate)?;
        let v = self.interpolate(&self.v, x, y).ok_or(Stop::Terminate)?;
        Ok((u / speed, v / speed))
    }

    fn axis_value(axis: &[f64], pos: f64) -> f64 {
        let last = axis.len() - 1;
        let i = (pos.floor().max(0.0) as usize).min(last.saturating_sub(1));
        let t = pos - i as f64;
        axis[i] + (axis[(i + 1).min(last)] - axis[i]) * t
    }

    fn to_streamline(&self, trajectory: &[(f64, f64)]) -> Streamline {
        let points = trajectory
            .iter()
            .map(|&(x, y)| (Self::axis_value(self.lon, x), Self::axis_value(self.lat, y)))
            .collect();

        let sampled: Vec<Option<f32>> = trajectory
            .iter()
            .map(|&(x, y)| {
                self.interpolate(self.field.raw_magnitude(), x, y)
                    .map(|m| m as f32)
            })
            .collect();

        Streamline {
            points,
            magnitudes: fill_gaps(&sampled),
        }
    }
}

/// Replace `None` with the nearest earlier value (or the first value for
/// a leading run).
fn fill_gaps(values: &[Option<f32>]) -> Vec<f32> {
    let first = values.iter().flatten().next().copied().unwrap_or(0.0);
    let mut last = first;
    values
        .iter()
        .map(|v| {
            if let Some(v) = v {
                last = *v;
            }
            last
        })
        .collect()
}

// =============================================================================
// Occupancy grid
// =============================================================================

struct Occupancy {
    nx: usize,
    ny: usize,
    taken: Vec<bool>,
    grid_to_mask: (f64, f64),
    mask_to_grid: (f64, f64),
    /// Cells claimed by the line being traced
    trajectory: Vec<usize>,
    current: Option<(usize, usize)>,
}

impl Occupancy {
    fn new(nx: usize, ny: usize, grid_nx: usize, grid_ny: usize) -> Self {
        let gx = (nx - 1) as f64 / (grid_nx - 1) as f64;
        let gy = (ny - 1) as f64 / (grid_ny - 1) as f64;
        Self {
            nx,
            ny,
            taken: vec![false; nx * ny],
            grid_to_mask: (gx, gy),
            mask_to_grid: (1.0 / gx, 1.0 / gy),
            trajectory: Vec::new(),
            current: None,
        }
    }

    fn is_taken(&self, xm: usize, ym: usize) -> bool {
        self.taken[ym * self.nx + xm]
    }

    fn mask_to_grid(&self, xm: usize, ym: usize) -> (f64, f64) {
        (xm as f64 * self.mask_to_grid.0, ym as f64 * self.mask_to_grid.1)
    }

    fn grid_to_mask(&self, xg: f64, yg: f64) -> (usize, usize) {
        let xm = (xg * self.grid_to_mask.0 + 0.5) as usize;
        let ym = (yg * self.grid_to_mask.1 + 0.5) as usize;
        (xm.min(self.nx - 1), ym.min(self.ny - 1))
    }

    fn start(&mut self, xg: f64, yg: f64) {
        self.trajectory.clear();
        self.current = None;
        // The seed cell is free, so this always succeeds.
        self.claim(xg, yg);
    }

    /// Re-anchor at the seed for the second half of a line.
    fn restart_at(&mut self, xg: f64, yg: f64) {
        self.current = Some(self.grid_to_mask(xg, yg));
    }

    /// Claim the cell under `(xg, yg)`; false when another line holds it.
    fn claim(&mut self, xg: f64, yg: f64) -> bool {
        let cell = self.grid_to_mask(xg, yg);
        if self.current == Some(cell) {
            return true;
        }
        let idx = cell.1 * self.nx + cell.0;
        if self.taken[idx] {
            return false;
        }
        self.taken[idx] = true;
        self.trajectory.push(idx);
        self.current = Some(cell);
        true
    }

    fn undo(&mut self) {
        for &idx in &self.trajectory {
            self.taken[idx] = false;
        }
        self.trajectory.clear();
    }
}

/// Cells of an `nx x ny` grid, spiralling inwards from the bottom-left
/// corner of the outer ring.
fn spiral(nx: usize, ny: usize) -> Vec<(usize, usize)> {
    #[derive(Clone, Copy)]
    enum Dir {
        Right,
        Up,
        Left,
        Down,
    }

    let mut out = Vec::with_capacity(nx * ny);
    let (mut x, mut y) = (0isize, 0isize);
    let (mut x_first, mut y_first) = (0isize, 1isize);
    let (mut x_last, mut y_last) = (nx as isize - 1, ny as isize - 1);
    let mut dir = Dir::Right;

    for _ in 0..nx * ny {
        if x >= 0 && y >= 0 && (x as usize) < nx && (y as usize) < ny {
            out.push((x as usize, y as usize));
        }
        match dir {
            Dir::Right => {
                x += 1;
                if x >= x_last {
                    x_last -= 1;
                    dir = Dir::Up;
                }
            }
            Dir::Up => {
                y += 1;
                if y >= y_last {
                    y_last -= 1;
                    dir = Dir::Left;
                }
            }
            Dir::Left => {
                x -= 1;
                if x <= x_first {
                    x_first += 1;
                    dir = Dir::Down;
                }
            }
            Dir::Down => {
                y -= 1;
                if y <= y_first {
                    y_first += 1;
                    dir = Dir::Right;
                }
            }
        }
    }
    out
}

// =============================================================================
// Integration
// =============================================================================

struct Integrator<'a, 'f> {
    grid: &'a GridField<'f>,
    max_ds: f64,
    max_error: f64,
    max_length: f64,
}

impl Integrator<'_, '_> {
    /// Trace backwards then forwards from a seed. Returns the trajectory in
    /// grid coordinates, or `None` (releasing its cells) when too short.
    fn integrate(
        &self,
        x0: f64,
        y0: f64,
        min_length: f64,
        occupancy: &mut Occupancy,
    ) -> Option<Vec<(f64, f64)>> {
        occupancy.start(x0, y0);

        let (back_len, mut back) = self.rk12(x0, y0, -1.0, occupancy);
        occupancy.restart_at(x0, y0);
        let (fwd_len, fwd) = self.rk12(x0, y0, 1.0, occupancy);

        if back_len + fwd_len > min_length {
            back.reverse();
            back.extend(fwd.into_iter().skip(1));
            Some(back)
        } else {
            occupancy.undo();
            None
        }
    }

    fn step(&self, x: f64, y: f64, sign: f64) -> Result<(f64, f64), Stop> {
        let (dx, dy) = self.grid.direction(x, y)?;
        Ok((dx * sign, dy * sign))
    }

    /// Adaptive Heun integration in one direction.
    fn rk12(
        &self,
        x0: f64,
        y0: f64,
        sign: f64,
        occupancy: &mut Occupancy,
    ) -> (f64, Vec<(f64, f64)>) {
        let nx = (self.grid.nx - 1) as f64;
        let ny = (self.grid.ny - 1) as f64;
        let mut ds = self.max_ds;
        let mut total = 0.0;
        let (mut x, mut y) = (x0, y0);
        let mut trajectory = Vec::new();

        loop {
            if !self.grid.within(x, y) {
                break;
            }
            trajectory.push((x, y));

            let k1 = match self.step(x, y, sign) {
                Ok(k) => k,
                Err(_) => break,
            };
            let k2 = match self.step(x + ds * k1.0, y + ds * k1.1, sign) {
                Ok(k) => k,
                Err(Stop::OutOfBounds) => {
                    total += self.step_to_edge(&mut trajectory, sign);
                    break;
                }
                Err(Stop::Terminate) => break,
            };

            let (dx1, dy1) = (ds * k1.0, ds * k1.1);
            let (dx2, dy2) = (ds * 0.5 * (k1.0 + k2.0), ds * 0.5 * (k1.1 + k2.1));
            let error = ((dx2 - dx1) / nx).hypot((dy2 - dy1) / ny);

            if error < self.max_error {
                x += dx2;
                y += dy2;
                if !self.grid.within(x, y) || !occupancy.claim(x, y) {
                    break;
                }
                if total + ds > self.max_length {
                    break;
                }
                total += ds;
            }

            ds = if error == 0.0 {
                self.max_ds
            } else {
                self.max_ds.min(0.85 * ds * (self.max_error / error).sqrt())
            };
        }

        (total, trajectory)
    }

    /// Extend the last point straight to the grid edge. Returns the
    /// length added.
    fn step_to_edge(&self, trajectory: &mut Vec<(f64, f64)>, sign: f64) -> f64 {
        let Some(&(x, y)) = trajectory.last() else {
            return 0.0;
        };
        let Ok((cx, cy)) = self.step(x, y, sign) else {
            return 0.0;
        };

        let xmax = (self.grid.nx - 1) as f64;
        let ymax = (self.grid.ny - 1) as f64;
        let dsx = if cx == 0.0 {
            f64::INFINITY
        } else if cx < 0.0 {
            x / -cx
        } else {
            (xmax - x) / cx
        };
        let dsy = if cy == 0.0 {
            f64::INFINITY
        } else if cy < 0.0 {
            y / -cy
        } else {
            (ymax - y) / cy
        };

        let ds = dsx.min(dsy);
        if !ds.is_finite() {
            return 0.0;
        }
        trajectory.push((x + cx * ds, y + cy * ds));
        ds
    }
}
