//! Boundary to grid rasterization.

use rayon::prelude::*;
use windmap_common::{Grid, RegionMask};

use crate::Boundary;

/// Test every grid cell center against the boundary.
///
/// Rows are evaluated in parallel; each cell is independent, so the mask
/// is the same for any thread count. Cells on a polygon edge or vertex
/// count as inside. Build this once per run and share it by reference.
pub fn rasterize(boundary: &Boundary, grid: &Grid) -> RegionMask {
    let start = std::time::Instant::now();
    let bbox = boundary.bbox();

    if !bbox.intersects(&grid.bbox()) {
        tracing::warn!(
            boundary_bbox = ?bbox,
            grid_bbox = ?grid.bbox(),
            "Boundary lies outside the grid; every frame will be empty"
        );
        return RegionMask::from_fn(grid.width(), grid.height(), |_, _| false);
    }

    let rows: Vec<Vec<bool>> = grid
        .lat
        .par_iter()
        .map(|&lat| {
            if lat < bbox.min_y || lat > bbox.max_y {
                return vec![false; grid.width()];
            }
            grid.lon
                .iter()
                .map(|&lon| boundary.contains(lon, lat))
                .collect()
        })
        .collect();

    let mask = RegionMask::from_fn(grid.width(), grid.height(), |row, col| rows[row][col]);

    tracing::info!(
        width = mask.width(),
        height = mask.height(),
        inside = mask.inside_count(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Rasterized boundary mask"
    );

    if mask.is_empty() {
        tracing::warn!(
            boundary_bbox = ?bbox,
            grid_bbox = ?grid.bbox(),
            "Boundary covers no grid cell; every frame will be empty"
        );
    }

    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(lon: Vec<f64>, lat: Vec<f64>) -> Grid {
        Grid::new(lon, lat, Vec::new())
    }

    #[test]
    fn test_row_major_layout() {
        let json = test_utils::rectangle_feature((0.0, 0.5, 0.5, 1.5));
        let boundary = Boundary::from_geojson_str(&json).unwrap();
        let mask = rasterize(&boundary, &grid(vec![0.0, 1.0, 2.0], vec![0.0, 1.0]));

        // Only (lon 0, lat 1) is inside: row 1, col 0
        assert_eq!(mask.as_slice(), &[false, false, false, true, false, false]);
    }

    #[test]
    fn test_boundary_touching_grid_edge() {
        // Shares only the lon 2 column with the grid
        let json = test_utils::rectangle_feature((2.0, 0.0, 3.0, 1.0));
        let boundary = Boundary::from_geojson_str(&json).unwrap();
        let mask = rasterize(&boundary, &grid(vec![0.0, 1.0, 2.0], vec![0.0, 1.0]));
        assert_eq!(mask.as_slice(), &[false, false, true, false, false, true]);
    }

    #[test]
    fn test_boundary_outside_grid() {
        let json = test_utils::rectangle_feature((10.0, 10.0, 11.0, 11.0));
        let boundary = Boundary::from_geojson_str(&json).unwrap();
        let mask = rasterize(&boundary, &grid(vec![0.0, 1.0, 2.0], vec![0.0, 1.0]));
        assert_eq!((mask.width(), mask.height()), (3, 2));
        assert!(mask.is_empty());
    }
}
