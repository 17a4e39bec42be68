//! Test data generators for synthetic wind fields.
//!
//! Component cubes are returned as `(u, v)` vectors laid out
//! `[time, lat, lon]`, row-major, matching what the NetCDF reader produces.

/// Evenly spaced axis values: `start, start + step, ...` (`n` values).
pub fn regular_axis(start: f64, step: f64, n: usize) -> Vec<f64> {
    (0..n).map(|i| start + step * i as f64).collect()
}

/// Uniform wind everywhere, for every time step.
pub fn create_uniform_wind(
    width: usize,
    height: usize,
    steps: usize,
    u: f32,
    v: f32,
) -> (Vec<f32>, Vec<f32>) {
    let len = width * height * steps;
    (vec![u; len], vec![v; len])
}

/// Wind whose values encode their own position.
///
/// `u = t * 10000 + row * 100 + col` and `v = -u`, which makes it easy to
/// check that reindexing kept values attached to the right cell.
pub fn create_position_tagged_wind(
    width: usize,
    height: usize,
    steps: usize,
) -> (Vec<f32>, Vec<f32>) {
    let mut u = Vec::with_capacity(width * height * steps);
    for t in 0..steps {
        for row in 0..height {
            for col in 0..width {
                u.push((t * 10000 + row * 100 + col) as f32);
            }
        }
    }
    let v = u.iter().map(|x| -x).collect();
    (u, v)
}

/// Solid-body rotation around the grid center, one time step.
///
/// Speed grows linearly with distance from the center; `max_speed` is
/// reached at the corners.
pub fn create_vortex_wind(width: usize, height: usize, max_speed: f32) -> (Vec<f32>, Vec<f32>) {
    let cx = (width as f32 - 1.0) / 2.0;
    let cy = (height as f32 - 1.0) / 2.0;
    let max_dist = (cx * cx + cy * cy).sqrt().max(1.0);

    let mut u = Vec::with_capacity(width * height);
    let mut v = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let dx = col as f32 - cx;
            let dy = row as f32 - cy;
            u.push(-dy / max_dist * max_speed);
            v.push(dx / max_dist * max_speed);
        }
    }
    (u, v)
}

/// Westerly jet: u peaks along the middle row, v oscillates with longitude.
pub fn create_jet_wind(width: usize, height: usize, steps: usize) -> (Vec<f32>, Vec<f32>) {
    let mut u = Vec::with_capacity(width * height * steps);
    let mut v = Vec::with_capacity(width * height * steps);
    for t in 0..steps {
        let phase = t as f32 * 0.3;
        for row in 0..height {
            let y = row as f32 / height.max(1) as f32 - 0.5;
            for col in 0..width {
                let x = col as f32 / width.max(1) as f32;
                u.push(18.0 * (-(y * y) * 20.0).exp() + 2.0);
                v.push(4.0 * (x * std::f32::consts::TAU * 2.0 + phase).sin());
            }
        }
    }
    (u, v)
}

/// Opaque RGBA pixels of a single color.
pub fn create_solid_rgba(width: usize, height: usize, rgba: [u8; 4]) -> Vec<u8> {
    rgba.iter().copied().cycle().take(width * height * 4).collect()
}
