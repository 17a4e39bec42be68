//! Streamline layout properties.

use renderer::{trace_streamlines, StreamlineConfig};
use test_utils::axes::{LAT_4X4, LON_4X4};
use test_utils::{assert_approx_eq, create_vortex_wind, regular_axis};
use windmap_common::{MaskedField, RegionMask};

fn field(
    width: usize,
    height: usize,
    u: &[f32],
    v: &[f32],
    inside: impl Fn(usize, usize) -> bool,
) -> MaskedField {
    let mask = RegionMask::from_fn(width, height, inside);
    MaskedField::from_components(u, v, &mask).unwrap()
}

#[test]
fn test_layout_is_deterministic() {
    let (u, v) = create_vortex_wind(40, 30, 15.0);
    let f = field(40, 30, &u, &v, |_, _| true);
    let lon = regular_axis(68.0, 0.5, 40);
    let lat = regular_axis(6.0, 0.5, 30);
    let config = StreamlineConfig::with_density(2.0);

    let first = trace_streamlines(&f, &lon, &lat, &config);
    let second = trace_streamlines(&f, &lon, &lat, &config);
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn test_lines_stay_in_grid_extent() {
    let (u, v) = create_vortex_wind(25, 25, 10.0);
    let f = field(25, 25, &u, &v, |_, _| true);
    let lon = regular_axis(70.0, 1.0, 25);
    let lat = regular_axis(5.0, 1.0, 25);

    for line in trace_streamlines(&f, &lon, &lat, &StreamlineConfig::with_density(1.5)) {
        assert_eq!(line.points.len(), line.magnitudes.len());
        for &(x, y) in &line.points {
            assert!((70.0 - 1e-6..=94.0 + 1e-6).contains(&x));
            assert!((5.0 - 1e-6..=29.0 + 1e-6).contains(&y));
        }
    }
}

#[test]
fn test_no_lines_in_masked_quadrant() {
    // 4x4 grid, only the north-west quadrant inside, uniform westerly
    let f = field(4, 4, &[5.0; 16], &[0.0; 16], |row, col| row >= 2 && col < 2);
    let lines = trace_streamlines(&f, &LON_4X4, &LAT_4X4, &StreamlineConfig::default());

    assert!(!lines.is_empty());
    for line in &lines {
        for &(lon, lat) in &line.points {
            assert!(lat >= 20.0 - 1e-9, "point at lat {} below the valid rows", lat);
            assert!(lon <= 75.5, "point at lon {} east of the valid columns", lon);
        }
        for &m in &line.magnitudes {
            assert_approx_eq!(m, 5.0_f32, 1e-4_f32);
        }
    }
}

#[test]
fn test_fully_missing_field_has_no_lines() {
    let f = field(10, 10, &[3.0; 100], &[1.0; 100], |_, _| false);
    let axis = regular_axis(0.0, 1.0, 10);
    let lines = trace_streamlines(&f, &axis, &axis, &StreamlineConfig::default());
    assert!(lines.is_empty());
}

#[test]
fn test_missing_column_splits_lines() {
    let n = 21;
    let f = field(n, n, &vec![8.0; n * n], &vec![0.0; n * n], |_, col| col != 10);
    let axis = regular_axis(0.0, 1.0, n);

    let lines = trace_streamlines(&f, &axis, &axis, &StreamlineConfig::with_density(1.0));
    assert!(!lines.is_empty());
    for line in &lines {
        let west = line.points.iter().any(|p| p.0 < 9.0);
        let east = line.points.iter().any(|p| p.0 > 11.0);
        assert!(!(west && east), "line crosses the missing column");
    }
}

#[test]
fn test_density_controls_line_count() {
    let (u, v) = create_vortex_wind(30, 30, 12.0);
    let f = field(30, 30, &u, &v, |_, _| true);
    let axis = regular_axis(0.0, 1.0, 30);

    let sparse = trace_streamlines(&f, &axis, &axis, &StreamlineConfig::with_density(0.5));
    let dense = trace_streamlines(&f, &axis, &axis, &StreamlineConfig::with_density(2.0));
    assert!(dense.len() > sparse.len());
}
