//! Tests for latitude normalization of wind datasets.

use chrono::{DateTime, Utc};
use test_utils::{create_position_tagged_wind, regular_axis};
use windmap_common::{Grid, WindDataset};

fn hourly(steps: usize) -> Vec<DateTime<Utc>> {
    (0..steps)
        .map(|h| DateTime::<Utc>::from_timestamp(1_700_000_000 + h as i64 * 3600, 0).unwrap())
        .collect()
}

fn dataset(lat: Vec<f64>, width: usize, steps: usize) -> WindDataset {
    let height = lat.len();
    let (u, v) = create_position_tagged_wind(width, height, steps);
    let grid = Grid::new(regular_axis(70.0, 5.0, width), lat, hourly(steps));
    WindDataset::new(grid, u, v).unwrap()
}

// ============================================================================
// Increasing latitude
// ============================================================================

#[test]
fn test_increasing_grid_is_unchanged() {
    let original = dataset(regular_axis(10.0, 5.0, 4), 3, 2);
    let normalized = original.clone().normalize_latitude();

    assert_eq!(normalized.grid, original.grid);
    assert_eq!(normalized.u, original.u);
    assert_eq!(normalized.v, original.v);
}

#[test]
fn test_normalization_is_idempotent() {
    let once = dataset(regular_axis(25.0, -5.0, 4), 3, 2).normalize_latitude();
    let twice = once.clone().normalize_latitude();

    assert_eq!(once.grid, twice.grid);
    assert_eq!(once.u, twice.u);
    assert_eq!(once.v, twice.v);
}

// ============================================================================
// Decreasing latitude
// ============================================================================

#[test]
fn test_decreasing_grid_becomes_increasing() {
    let normalized = dataset(regular_axis(25.0, -5.0, 4), 3, 2).normalize_latitude();
    assert_eq!(normalized.grid.lat, vec![10.0, 15.0, 20.0, 25.0]);
    assert!(normalized.grid.lat.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_values_follow_mirrored_rows() {
    let (width, height, steps) = (3, 5, 2);
    let original = dataset(regular_axis(30.0, -2.5, height), width, steps);
    let normalized = original.clone().normalize_latitude();

    for t in 0..steps {
        for k in 0..height {
            for col in 0..width {
                let new_idx = t * width * height + k * width + col;
                let old_idx = t * width * height + (height - 1 - k) * width + col;
                assert_eq!(normalized.u[new_idx], original.u[old_idx]);
                assert_eq!(normalized.v[new_idx], original.v[old_idx]);
            }
        }
        // Latitude stays attached to its row
        for k in 0..height {
            assert_eq!(normalized.grid.lat[k], original.grid.lat[height - 1 - k]);
        }
    }
}

#[test]
fn test_lon_and_time_axes_untouched() {
    let original = dataset(regular_axis(25.0, -5.0, 4), 3, 3);
    let normalized = original.clone().normalize_latitude();
    assert_eq!(normalized.grid.lon, original.grid.lon);
    assert_eq!(normalized.grid.times, original.grid.times);
}
