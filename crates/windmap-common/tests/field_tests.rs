//! Tests for field preprocessing: magnitude and mask propagation.

use chrono::{DateTime, Utc};
use test_utils::{assert_approx_eq, axes, create_jet_wind, create_uniform_wind};
use windmap_common::{preprocess, Grid, RegionMask, WindDataset, WindmapError};

fn grid_4x4(steps: usize) -> Grid {
    let times = (0..steps)
        .map(|h| DateTime::<Utc>::from_timestamp(h as i64 * 3600, 0).unwrap())
        .collect();
    Grid::new(axes::LON_4X4.to_vec(), axes::LAT_4X4.to_vec(), times)
}

/// Cells of the north-west quadrant: rows 2..4 (lat 20, 25), cols 0..2 (lon 70, 75).
fn top_left_mask() -> RegionMask {
    RegionMask::from_fn(4, 4, |row, col| row >= 2 && col < 2)
}

#[test]
fn test_quadrant_scenario() {
    let (u, v) = create_uniform_wind(4, 4, 1, 5.0, 0.0);
    let dataset = WindDataset::new(grid_4x4(1), u, v).unwrap();
    let field = preprocess(0, &dataset, &top_left_mask()).unwrap();

    for row in 0..4 {
        for col in 0..4 {
            if row >= 2 && col < 2 {
                assert_eq!(field.magnitude(row, col), Some(5.0));
                assert_eq!(field.u(row, col), Some(5.0));
                assert_eq!(field.v(row, col), Some(0.0));
            }
            if row < 2 && col >= 2 {
                // South-east block (bottom-right on the map)
                assert_eq!(field.magnitude(row, col), None);
                assert_eq!(field.u(row, col), None);
                assert_eq!(field.v(row, col), None);
            }
        }
    }
    assert_eq!(field.valid_count(), 4);
}

#[test]
fn test_masked_cells_carry_missing_in_all_buffers() {
    let (u, v) = create_jet_wind(4, 4, 2);
    let dataset = WindDataset::new(grid_4x4(2), u, v).unwrap();
    let mask = top_left_mask();
    let field = preprocess(1, &dataset, &mask).unwrap();

    for (idx, &inside) in mask.as_slice().iter().enumerate() {
        if !inside {
            assert!(field.raw_u()[idx].is_nan());
            assert!(field.raw_v()[idx].is_nan());
            assert!(field.raw_magnitude()[idx].is_nan());
            assert!(!field.validity()[idx]);
        }
    }
}

#[test]
fn test_magnitude_matches_components_inside() {
    let (u, v) = create_jet_wind(4, 4, 2);
    let dataset = WindDataset::new(grid_4x4(2), u.clone(), v.clone()).unwrap();
    let mask = RegionMask::from_fn(4, 4, |_, _| true);
    let field = preprocess(1, &dataset, &mask).unwrap();

    for row in 0..4 {
        for col in 0..4 {
            let idx = 16 + row * 4 + col;
            let expected = (u[idx] * u[idx] + v[idx] * v[idx]).sqrt();
            assert_approx_eq!(field.magnitude(row, col).unwrap(), expected, 1e-5);
        }
    }
}

#[test]
fn test_preprocess_is_pure() {
    let (u, v) = create_jet_wind(4, 4, 3);
    let dataset = WindDataset::new(grid_4x4(3), u, v).unwrap();
    let mask = top_left_mask();

    let a = preprocess(2, &dataset, &mask).unwrap();
    let _ = preprocess(0, &dataset, &mask).unwrap();
    let b = preprocess(2, &dataset, &mask).unwrap();

    assert_eq!(a.validity(), b.validity());
    assert_eq!(
        a.raw_magnitude().iter().map(|m| m.to_bits()).collect::<Vec<_>>(),
        b.raw_magnitude().iter().map(|m| m.to_bits()).collect::<Vec<_>>()
    );
}

#[test]
fn test_out_of_range_time_index() {
    let (u, v) = create_uniform_wind(4, 4, 1, 1.0, 1.0);
    let dataset = WindDataset::new(grid_4x4(1), u, v).unwrap();
    let err = preprocess(1, &dataset, &top_left_mask()).unwrap_err();
    assert!(matches!(err, WindmapError::GridMismatch(_)));
}

#[test]
fn test_mask_shape_mismatch() {
    let (u, v) = create_uniform_wind(4, 4, 1, 1.0, 1.0);
    let dataset = WindDataset::new(grid_4x4(1), u, v).unwrap();
    let mask = RegionMask::from_fn(3, 4, |_, _| true);
    assert!(matches!(
        preprocess(0, &dataset, &mask),
        Err(WindmapError::GridMismatch(_))
    ));
}
