//! GeoJSON boundary and reference-line loading.
//!
//! Coordinates are geographic `(lon, lat)` degrees per RFC 7946. Documents
//! carrying a legacy `crs` member naming a projected system are converted
//! to lon/lat on load (see [`crate::crs`]).

use std::path::Path;

use geo::coordinate_position::{CoordPos, CoordinatePosition};
use geo::{BoundingRect, Coord, LineString, MapCoords, MultiPolygon, Polygon};
use geojson::{GeoJson, Geometry, JsonObject, Value};
use windmap_common::{BoundingBox, Polyline};

use crate::crs::{self, Reprojector};
use crate::error::{BoundaryError, BoundaryResult};

const WORLD_COASTLINE: &str = include_str!("../data/world_coastline.geojson");
const WORLD_BORDERS: &str = include_str!("../data/world_borders.geojson");

/// Region boundary: the union of every polygon in the source document.
#[derive(Debug, Clone)]
pub struct Boundary {
    polygons: MultiPolygon<f64>,
    bbox: BoundingBox,
}

impl Boundary {
    /// Build from polygons; fails when there are none.
    pub fn new(polygons: Vec<Polygon<f64>>) -> BoundaryResult<Self> {
        let polygons = MultiPolygon(polygons);
        let rect = polygons.bounding_rect().ok_or(BoundaryError::NoPolygons)?;
        let bbox = BoundingBox::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y);
        Ok(Self { polygons, bbox })
    }

    /// Parse a GeoJSON document (FeatureCollection, Feature or Geometry).
    pub fn from_geojson_str(json: &str) -> BoundaryResult<Self> {
        let geojson: GeoJson = json.parse()?;
        let reprojector = source_crs(&geojson)?;

        let mut polygons = Vec::new();
        for geometry in geometries(&geojson) {
            collect_polygons(&geometry.value, &mut polygons)?;
        }
        if let Some(r) = &reprojector {
            polygons = polygons
                .iter()
                .map(|p| p.try_map_coords(|c| r.to_lon_lat(c)))
                .collect::<BoundaryResult<_>>()?;
        }

        let boundary = Self::new(polygons)?;
        tracing::debug!(
            polygons = boundary.polygon_count(),
            bbox = ?boundary.bbox,
            "Parsed boundary"
        );
        Ok(boundary)
    }

    /// Read and parse a GeoJSON file.
    pub fn from_file(path: &Path) -> BoundaryResult<Self> {
        let json = read_file(path)?;
        let boundary = Self::from_geojson_str(&json)?;
        tracing::info!(
            path = %path.display(),
            polygons = boundary.polygon_count(),
            "Loaded boundary"
        );
        Ok(boundary)
    }

    pub fn polygon_count(&self) -> usize {
        self.polygons.0.len()
    }

    /// Bounding box of all parts.
    pub fn bbox(&self) -> BoundingBox {
        self.bbox
    }

    pub fn polygons(&self) -> &MultiPolygon<f64> {
        &self.polygons
    }

    /// Whether `(lon, lat)` lies inside or on the edge of any part.
    ///
    /// Parts are tested one by one, so overlapping parts still union
    /// instead of cancelling out.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        if !self.bbox.contains_point(lon, lat) {
            return false;
        }
        let coord = Coord { x: lon, y: lat };
        self.polygons
            .0
            .iter()
            .any(|polygon| polygon.coordinate_position(&coord) != CoordPos::Outside)
    }

    /// Every ring (exteriors and holes) as a closed polyline.
    pub fn outlines(&self) -> Vec<Polyline> {
        self.polygons
            .0
            .iter()
            .flat_map(|polygon| std::iter::once(polygon.exterior()).chain(polygon.interiors()))
            .map(ring_to_polyline)
            .collect()
    }
}

/// Static line work drawn under the boundary (coastlines, borders).
#[derive(Debug, Clone, Default)]
pub struct ReferenceLines {
    pub lines: Vec<Polyline>,
}

impl ReferenceLines {
    /// Collect line work from any geometry type. Polygons contribute their
    /// rings; points are ignored.
    pub fn from_geojson_str(json: &str) -> BoundaryResult<Self> {
        let geojson: GeoJson = json.parse()?;
        let reprojector = source_crs(&geojson)?;

        let mut lines = Vec::new();
        for geometry in geometries(&geojson) {
            collect_lines(&geometry.value, &mut lines)?;
        }
        if let Some(r) = &reprojector {
            lines = lines
                .iter()
                .map(|line| reproject_polyline(r, line))
                .collect::<BoundaryResult<_>>()?;
        }
        Ok(Self { lines })
    }

    pub fn from_file(path: &Path) -> BoundaryResult<Self> {
        let json = read_file(path)?;
        let layer = Self::from_geojson_str(&json)?;
        tracing::info!(
            path = %path.display(),
            lines = layer.lines.len(),
            "Loaded reference lines"
        );
        Ok(layer)
    }

    /// Built-in 1:110m world coastline.
    pub fn world_coastline() -> BoundaryResult<Self> {
        Self::from_geojson_str(WORLD_COASTLINE)
    }

    /// Built-in 1:110m land borders between countries.
    pub fn world_borders() -> BoundaryResult<Self> {
        Self::from_geojson_str(WORLD_BORDERS)
    }

    /// Drop lines whose bounding box misses `extent`.
    pub fn within(self, extent: &BoundingBox) -> Self {
        let lines = self
            .lines
            .into_iter()
            .filter(|line| polyline_bbox(line).is_some_and(|bbox| bbox.intersects(extent)))
            .collect();
        Self { lines }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// =============================================================================
// Internal helpers
// =============================================================================

fn read_file(path: &Path) -> BoundaryResult<String> {
    std::fs::read_to_string(path).map_err(|source| BoundaryError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Top-level geometries of a document, features without geometry skipped.
fn geometries(geojson: &GeoJson) -> Vec<&Geometry> {
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            fc.features.iter().filter_map(|f| f.geometry.as_ref()).collect()
        }
        GeoJson::Feature(f) => f.geometry.iter().collect(),
        GeoJson::Geometry(g) => vec![g],
    }
}

fn foreign_members(geojson: &GeoJson) -> Option<&JsonObject> {
    match geojson {
        GeoJson::FeatureCollection(fc) => fc.foreign_members.as_ref(),
        GeoJson::Feature(f) => f.foreign_members.as_ref(),
        GeoJson::Geometry(g) => g.foreign_members.as_ref(),
    }
}

/// Reprojector for a legacy named `crs` member, `None` for lon/lat input.
fn source_crs(geojson: &GeoJson) -> BoundaryResult<Option<Reprojector>> {
    let Some(member) = foreign_members(geojson).and_then(|m| m.get("crs")) else {
        return Ok(None);
    };

    let name = member
        .get("properties")
        .and_then(|p| p.get("name"))
        .and_then(|n| n.as_str())
        .ok_or_else(|| BoundaryError::UnsupportedCrs(member.to_string()))?;

    crs::resolve(name)
}

fn reproject_polyline(r: &Reprojector, line: &Polyline) -> BoundaryResult<Polyline> {
    line.iter()
        .map(|&(x, y)| r.to_lon_lat(Coord { x, y }).map(|c| (c.x, c.y)))
        .collect()
}

fn to_coords(positions: &[Vec<f64>]) -> BoundaryResult<Vec<Coord<f64>>> {
    positions
        .iter()
        .map(|p| match p.as_slice() {
            [x, y, ..] => Ok(Coord { x: *x, y: *y }),
            _ => Err(BoundaryError::Parse(format!(
                "position has {} values, expected at least 2",
                p.len()
            ))),
        })
        .collect()
}

fn to_polygon(rings: &[Vec<Vec<f64>>]) -> BoundaryResult<Option<Polygon<f64>>> {
    let Some((exterior, holes)) = rings.split_first() else {
        return Ok(None);
    };
    let exterior = LineString::from(to_coords(exterior)?);
    let holes = holes
        .iter()
        .map(|ring| to_coords(ring).map(LineString::from))
        .collect::<BoundaryResult<Vec<_>>>()?;
    Ok(Some(Polygon::new(exterior, holes)))
}

fn collect_polygons(value: &Value, out: &mut Vec<Polygon<f64>>) -> BoundaryResult<()> {
    match value {
        Value::Polygon(rings) => out.extend(to_polygon(rings)?),
        Value::MultiPolygon(parts) => {
            for rings in parts {
                out.extend(to_polygon(rings)?);
            }
        }
        Value::GeometryCollection(members) => {
            for member in members {
                collect_polygons(&member.value, out)?;
            }
        }
        _ => {
            tracing::debug!("Ignoring non-polygon geometry in boundary");
        }
    }
    Ok(())
}

fn collect_lines(value: &Value, out: &mut Vec<Polyline>) -> BoundaryResult<()> {
    let polyline = |positions: &[Vec<f64>]| -> BoundaryResult<Polyline> {
        Ok(to_coords(positions)?.into_iter().map(|c| (c.x, c.y)).collect())
    };

    match value {
        Value::LineString(line) => out.push(polyline(line)?),
        Value::MultiLineString(lines) => {
            for line in lines {
                out.push(polyline(line)?);
            }
        }
        Value::Polygon(rings) => {
            for ring in rings {
                out.push(polyline(ring)?);
            }
        }
        Value::MultiPolygon(parts) => {
            for ring in parts.iter().flatten() {
                out.push(polyline(ring)?);
            }
        }
        Value::GeometryCollection(members) => {
            for member in members {
                collect_lines(&member.value, out)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn polyline_bbox(line: &Polyline) -> Option<BoundingBox> {
    let (&(x, y), rest) = line.split_first()?;
    Some(rest.iter().fold(BoundingBox::new(x, y, x, y), |b, &(x, y)| {
        BoundingBox::new(b.min_x.min(x), b.min_y.min(y), b.max_x.max(x), b.max_y.max(y))
    }))
}

fn ring_to_polyline(ring: &LineString<f64>) -> Polyline {
    ring.coords().map(|c| (c.x, c.y)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{linestring_geometry, multipolygon_feature, rectangle_collection, rectangle_feature};

    #[test]
    fn test_feature_polygon() {
        let boundary = Boundary::from_geojson_str(&rectangle_feature((0.0, 0.0, 10.0, 5.0))).unwrap();
        assert_eq!(boundary.polygon_count(), 1);
        assert_eq!(boundary.bbox(), BoundingBox::new(0.0, 0.0, 10.0, 5.0));
        assert!(boundary.contains(5.0, 2.5));
        assert!(!boundary.contains(11.0, 2.5));
    }

    #[test]
    fn test_edges_and_corners_are_inside() {
        let boundary = Boundary::from_geojson_str(&rectangle_feature((0.0, 0.0, 10.0, 5.0))).unwrap();
        assert!(boundary.contains(0.0, 2.0));
        assert!(boundary.contains(10.0, 5.0));
        assert!(boundary.contains(4.0, 0.0));
    }

    #[test]
    fn test_multipolygon_and_collection_union() {
        let rects = [(0.0, 0.0, 1.0, 1.0), (5.0, 5.0, 6.0, 6.0)];
        for json in [multipolygon_feature(&rects), rectangle_collection(&rects)] {
            let boundary = Boundary::from_geojson_str(&json).unwrap();
            assert_eq!(boundary.polygon_count(), 2);
            assert!(boundary.contains(0.5, 0.5));
            assert!(boundary.contains(5.5, 5.5));
            assert!(!boundary.contains(3.0, 3.0));
        }
    }

    #[test]
    fn test_overlapping_parts_do_not_cancel() {
        let rects = [(0.0, 0.0, 4.0, 4.0), (2.0, 2.0, 6.0, 6.0)];
        let boundary = Boundary::from_geojson_str(&multipolygon_feature(&rects)).unwrap();
        assert!(boundary.contains(3.0, 3.0));
    }

    #[test]
    fn test_hole_is_outside() {
        let json = r#"{"type":"Polygon","coordinates":[
            [[0,0],[10,0],[10,10],[0,10],[0,0]],
            [[4,4],[6,4],[6,6],[4,6],[4,4]]]}"#;
        let boundary = Boundary::from_geojson_str(json).unwrap();
        assert!(boundary.contains(2.0, 2.0));
        assert!(!boundary.contains(5.0, 5.0));
        assert_eq!(boundary.outlines().len(), 2);
    }

    #[test]
    fn test_no_polygons() {
        let json = linestring_geometry(&[(0.0, 0.0), (1.0, 1.0)]);
        assert!(matches!(
            Boundary::from_geojson_str(&json),
            Err(BoundaryError::NoPolygons)
        ));
        assert!(matches!(
            Boundary::from_geojson_str(r#"{"type":"FeatureCollection","features":[]}"#),
            Err(BoundaryError::NoPolygons)
        ));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            Boundary::from_geojson_str("{not json"),
            Err(BoundaryError::Parse(_))
        ));
    }

    #[test]
    fn test_crs_member() {
        let with_crs = |name: &str| {
            format!(
                r#"{{"type":"FeatureCollection","crs":{{"type":"name","properties":{{"name":"{}"}}}},"features":[{}]}}"#,
                name,
                rectangle_feature((0.0, 0.0, 1.0, 1.0))
            )
        };

        assert!(Boundary::from_geojson_str(&with_crs("urn:ogc:def:crs:OGC:1.3:CRS84")).is_ok());
        assert!(Boundary::from_geojson_str(&with_crs("urn:ogc:def:crs:EPSG::4326")).is_ok());
        assert!(matches!(
            Boundary::from_geojson_str(&with_crs("urn:ogc:def:crs:EPSG::2000")),
            Err(BoundaryError::UnsupportedCrs(_))
        ));
    }

    #[test]
    fn test_reference_lines_reprojected() {
        // Equator crossing of the 75E meridian in UTM zone 43N
        let json = format!(
            r#"{{"type":"FeatureCollection","crs":{{"type":"name","properties":{{"name":"EPSG:32643"}}}},"features":[{{"type":"Feature","properties":{{}},"geometry":{}}}]}}"#,
            linestring_geometry(&[(500000.0, 0.0), (500000.0, 100000.0)])
        );
        let layer = ReferenceLines::from_geojson_str(&json).unwrap();
        assert_eq!(layer.lines.len(), 1);

        let (lon, lat) = layer.lines[0][0];
        assert!((lon - 75.0).abs() < 1e-7);
        assert!(lat.abs() < 1e-7);
        let (lon, lat) = layer.lines[0][1];
        assert!((lon - 75.0).abs() < 1e-7);
        assert!(lat > 0.85 && lat < 0.95, "lat {}", lat);
    }

    #[test]
    fn test_reference_lines_collects_all_line_work() {
        let json = format!(
            r#"{{"type":"GeometryCollection","geometries":[{},{},{{"type":"Point","coordinates":[1,1]}}]}}"#,
            linestring_geometry(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]),
            r#"{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,0]]]}"#
        );
        let layer = ReferenceLines::from_geojson_str(&json).unwrap();
        assert_eq!(layer.lines.len(), 2);
        assert_eq!(layer.lines[0], vec![(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]);
        assert_eq!(layer.lines[1].len(), 4);
    }

    #[test]
    fn test_world_layers_cover_south_asia() {
        let extent = BoundingBox::new(68.0, 6.0, 98.0, 38.0);
        let coastline = ReferenceLines::world_coastline().unwrap();
        let borders = ReferenceLines::world_borders().unwrap();
        let (all_coast, all_borders) = (coastline.lines.len(), borders.lines.len());

        let coastline = coastline.within(&extent);
        let borders = borders.within(&extent);
        assert!(!coastline.is_empty());
        assert!(!borders.is_empty());
        assert!(coastline.lines.len() < all_coast);
        assert!(borders.lines.len() < all_borders);

        // Southern tip of India sits near 77.5E 8N
        assert!(coastline
            .lines
            .iter()
            .flatten()
            .any(|&(x, y)| (x - 77.5).abs() < 1.0 && (y - 8.1).abs() < 1.0));
    }

    #[test]
    fn test_within_keeps_crossing_lines() {
        let layer = ReferenceLines {
            lines: vec![
                vec![(-10.0, 5.0), (10.0, 5.0)],
                vec![(20.0, 20.0), (30.0, 30.0)],
                Vec::new(),
            ],
        };
        let kept = layer.within(&BoundingBox::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(kept.lines, vec![vec![(-10.0, 5.0), (10.0, 5.0)]]);
    }

    #[test]
    fn test_short_position_rejected() {
        let json = r#"{"type":"LineString","coordinates":[[0],[1,1]]}"#;
        assert!(ReferenceLines::from_geojson_str(json).is_err());
    }
}
