//! Common test fixtures: grid axes, extents and boundary GeoJSON.

/// Axes of the 4x4 scenario grid used across the test suite.
pub mod axes {
    /// Longitudes of the 4x4 grid
    pub const LON_4X4: [f64; 4] = [70.0, 75.0, 80.0, 85.0];

    /// Latitudes of the 4x4 grid (increasing)
    pub const LAT_4X4: [f64; 4] = [10.0, 15.0, 20.0, 25.0];
}

/// Common extents as `(min_x, min_y, max_x, max_y)`.
pub mod extent {
    /// Default display extent around India
    pub const INDIA: (f64, f64, f64, f64) = (68.0, 6.0, 98.0, 38.0);

    /// North-west quadrant of the 4x4 grid (lon 70-75, lat 20-25 cell centers)
    pub const TOP_LEFT_QUADRANT: (f64, f64, f64, f64) = (67.5, 17.5, 77.5, 27.5);

    /// Exactly the bounding box of the 4x4 grid's cell centers
    pub const GRID_4X4: (f64, f64, f64, f64) = (70.0, 10.0, 85.0, 25.0);

    /// Far away from every fixture grid
    pub const DISJOINT: (f64, f64, f64, f64) = (-40.0, -40.0, -30.0, -30.0);
}

fn ring_coords(rect: (f64, f64, f64, f64)) -> String {
    let (x0, y0, x1, y1) = rect;
    format!(
        "[[{x0},{y0}],[{x1},{y0}],[{x1},{y1}],[{x0},{y1}],[{x0},{y0}]]",
        x0 = x0,
        y0 = y0,
        x1 = x1,
        y1 = y1
    )
}

/// A GeoJSON Feature holding one rectangular Polygon.
pub fn rectangle_feature(rect: (f64, f64, f64, f64)) -> String {
    format!(
        r#"{{"type":"Feature","properties":{{"name":"rect"}},"geometry":{{"type":"Polygon","coordinates":[{}]}}}}"#,
        ring_coords(rect)
    )
}

/// A GeoJSON Feature holding one MultiPolygon built from rectangles.
pub fn multipolygon_feature(rects: &[(f64, f64, f64, f64)]) -> String {
    let polys: Vec<String> = rects.iter().map(|r| format!("[{}]", ring_coords(*r))).collect();
    format!(
        r#"{{"type":"Feature","properties":{{}},"geometry":{{"type":"MultiPolygon","coordinates":[{}]}}}}"#,
        polys.join(",")
    )
}

/// A FeatureCollection with one rectangular Polygon feature per rect.
pub fn rectangle_collection(rects: &[(f64, f64, f64, f64)]) -> String {
    let features: Vec<String> = rects.iter().map(|r| rectangle_feature(*r)).collect();
    format!(
        r#"{{"type":"FeatureCollection","features":[{}]}}"#,
        features.join(",")
    )
}

/// A bare LineString geometry through `points`.
pub fn linestring_geometry(points: &[(f64, f64)]) -> String {
    let coords: Vec<String> = points.iter().map(|(x, y)| format!("[{},{}]", x, y)).collect();
    format!(
        r#"{{"type":"LineString","coordinates":[{}]}}"#,
        coords.join(",")
    )
}
