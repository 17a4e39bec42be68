//! Rasterization properties on small synthetic grids.

use boundary::{rasterize, Boundary};
use test_utils::axes::{LAT_4X4, LON_4X4};
use test_utils::extent::{DISJOINT, GRID_4X4, TOP_LEFT_QUADRANT};
use test_utils::{multipolygon_feature, rectangle_collection, rectangle_feature, regular_axis};
use windmap_common::Grid;

fn grid_4x4() -> Grid {
    Grid::new(LON_4X4.to_vec(), LAT_4X4.to_vec(), Vec::new())
}

#[test]
fn test_full_bbox_is_all_true() {
    let boundary = Boundary::from_geojson_str(&rectangle_feature(GRID_4X4)).unwrap();
    let mask = rasterize(&boundary, &grid_4x4());
    assert_eq!(mask.inside_count(), 16);
}

#[test]
fn test_full_bbox_on_larger_grid() {
    let lon = regular_axis(60.0, 0.25, 81);
    let lat = regular_axis(5.0, 0.25, 61);
    let (x1, y1) = (*lon.last().unwrap(), *lat.last().unwrap());
    let grid = Grid::new(lon, lat, Vec::new());

    let boundary = Boundary::from_geojson_str(&rectangle_feature((60.0, 5.0, x1, y1))).unwrap();
    let mask = rasterize(&boundary, &grid);
    assert_eq!(mask.inside_count(), grid.cell_count());
}

#[test]
fn test_disjoint_is_all_false() {
    let boundary = Boundary::from_geojson_str(&rectangle_feature(DISJOINT)).unwrap();
    let mask = rasterize(&boundary, &grid_4x4());
    assert!(mask.is_empty());
}

#[test]
fn test_top_left_quadrant() {
    let boundary = Boundary::from_geojson_str(&rectangle_feature(TOP_LEFT_QUADRANT)).unwrap();
    let mask = rasterize(&boundary, &grid_4x4());

    // Rows follow increasing latitude, so "top" is rows 2 and 3
    for row in 0..4 {
        for col in 0..4 {
            let expected = row >= 2 && col < 2;
            assert_eq!(mask.is_inside(row, col), expected, "row {} col {}", row, col);
        }
    }
}

#[test]
fn test_deterministic() {
    let json = multipolygon_feature(&[(69.0, 9.0, 76.0, 16.0), (79.0, 19.0, 86.0, 26.0)]);
    let boundary = Boundary::from_geojson_str(&json).unwrap();
    let grid = Grid::new(
        regular_axis(68.0, 0.5, 40),
        regular_axis(6.0, 0.5, 40),
        Vec::new(),
    );

    let first = rasterize(&boundary, &grid);
    let second = rasterize(&boundary, &grid);
    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[test]
fn test_multiple_features_union() {
    let json = rectangle_collection(&[(69.0, 9.0, 71.0, 11.0), (84.0, 24.0, 86.0, 26.0)]);
    let boundary = Boundary::from_geojson_str(&json).unwrap();
    let mask = rasterize(&boundary, &grid_4x4());

    assert_eq!(mask.inside_count(), 2);
    assert!(mask.is_inside(0, 0));
    assert!(mask.is_inside(3, 3));
}

#[test]
fn test_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("boundary.geojson");
    std::fs::write(&path, rectangle_feature(GRID_4X4)).unwrap();

    let boundary = Boundary::from_file(&path).unwrap();
    assert_eq!(rasterize(&boundary, &grid_4x4()).inside_count(), 16);

    let missing = Boundary::from_file(&dir.path().join("absent.geojson"));
    assert!(missing.is_err());
}

/// Spherical Mercator metres for a lon/lat position.
fn web_mercator(lon: f64, lat: f64) -> (f64, f64) {
    const R: f64 = 6378137.0;
    let y = (std::f64::consts::FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
    (R * lon.to_radians(), R * y)
}

#[test]
fn test_web_mercator_boundary_matches_geographic() {
    let (x0, y0, x1, y1) = TOP_LEFT_QUADRANT;
    let ring = [(x0, y0), (x1, y0), (x1, y1), (x0, y1), (x0, y0)];
    let coords: Vec<String> = ring
        .iter()
        .map(|&(lon, lat)| {
            let (x, y) = web_mercator(lon, lat);
            format!("[{},{}]", x, y)
        })
        .collect();
    let json = format!(
        r#"{{"type":"Feature","crs":{{"type":"name","properties":{{"name":"urn:ogc:def:crs:EPSG::3857"}}}},"properties":{{}},"geometry":{{"type":"Polygon","coordinates":[[{}]]}}}}"#,
        coords.join(",")
    );

    let projected = Boundary::from_geojson_str(&json).unwrap();
    let geographic = Boundary::from_geojson_str(&rectangle_feature(TOP_LEFT_QUADRANT)).unwrap();

    let bbox = projected.bbox();
    assert!((bbox.min_x - x0).abs() < 1e-6 && (bbox.max_y - y1).abs() < 1e-6);
    assert_eq!(
        rasterize(&projected, &grid_4x4()),
        rasterize(&geographic, &grid_4x4())
    );
    assert_eq!(rasterize(&projected, &grid_4x4()).inside_count(), 4);
}
