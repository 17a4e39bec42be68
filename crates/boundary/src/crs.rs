//! Source coordinate reference systems for GeoJSON input.
//!
//! RFC 7946 documents are geographic WGS 84 and pass through untouched.
//! Older documents may name another system in a legacy `crs` member; the
//! projected systems resolved here are brought back to lon/lat degrees
//! with proj4rs before anything touches the grid.

use std::borrow::Cow;

use geo::Coord;
use proj4rs::adaptors::transform_vertex_2d;
use proj4rs::Proj;

use crate::error::{BoundaryError, BoundaryResult};

/// Target of every reprojection: geographic WGS 84.
const WGS84: &str = "+proj=longlat +datum=WGS84 +no_defs";

/// Spherical ("web") Mercator, EPSG:3857 and its legacy aliases.
const WEB_MERCATOR: &str = "+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 \
                            +k=1 +units=m +nadgrids=@null +no_defs";

/// Ellipsoidal World Mercator, EPSG:3395.
const WORLD_MERCATOR: &str = "+proj=merc +lon_0=0 +k=1 +x_0=0 +y_0=0 +datum=WGS84 +units=m +no_defs";

/// Geographic systems on GRS80 whose offset from WGS 84 is below a metre.
const GRS80_GEOGRAPHIC: &str = "+proj=longlat +ellps=GRS80 +towgs84=0,0,0 +no_defs";

/// Converts coordinates of one source system to lon/lat degrees.
pub struct Reprojector {
    name: String,
    src: Proj,
    dst: Proj,
}

impl std::fmt::Debug for Reprojector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reprojector").field("name", &self.name).finish()
    }
}

impl Reprojector {
    fn new(name: &str, definition: &str) -> BoundaryResult<Self> {
        let projection = |s: &str| {
            Proj::from_proj_string(s).map_err(|e| BoundaryError::Projection {
                crs: name.to_string(),
                message: e.to_string(),
            })
        };
        Ok(Self {
            name: name.to_string(),
            src: projection(definition)?,
            dst: projection(WGS84)?,
        })
    }

    /// CRS name as given in the document.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source coordinate to `(lon, lat)` degrees.
    pub fn to_lon_lat(&self, c: Coord<f64>) -> BoundaryResult<Coord<f64>> {
        let input = if self.src.is_latlong() {
            (c.x.to_radians(), c.y.to_radians())
        } else {
            (c.x, c.y)
        };

        let (lon, lat) = transform_vertex_2d(&self.src, &self.dst, input).map_err(|e| {
            BoundaryError::Projection {
                crs: self.name.clone(),
                message: format!("({}, {}): {}", c.x, c.y, e),
            }
        })?;

        Ok(Coord {
            x: lon.to_degrees(),
            y: lat.to_degrees(),
        })
    }
}

/// Resolve a `crs` name.
///
/// Returns `None` for geographic WGS 84 (no conversion needed) and
/// [`BoundaryError::UnsupportedCrs`] for names with no known definition.
/// Raw PROJ strings (`+proj=...`) are accepted as-is.
pub fn resolve(name: &str) -> BoundaryResult<Option<Reprojector>> {
    let trimmed = name.trim();
    if trimmed.to_ascii_uppercase().ends_with("CRS84") {
        return Ok(None);
    }

    let definition: Cow<'static, str> = if trimmed.starts_with("+proj=") {
        Cow::Owned(trimmed.to_string())
    } else {
        match epsg_code(trimmed) {
            Some(4326) => return Ok(None),
            Some(code) => match epsg_definition(code) {
                Some(definition) => definition,
                None => return Err(BoundaryError::UnsupportedCrs(name.to_string())),
            },
            None => return Err(BoundaryError::UnsupportedCrs(name.to_string())),
        }
    };

    let reprojector = Reprojector::new(trimmed, &definition)?;
    tracing::debug!(crs = trimmed, definition = %definition, "Reprojecting GeoJSON input");
    Ok(Some(reprojector))
}

/// EPSG code from the usual spellings: `EPSG:3857`, `EPSG::3857`,
/// `urn:ogc:def:crs:EPSG:6.18:3857` and the opengis.net URI form.
fn epsg_code(name: &str) -> Option<u32> {
    let upper = name.to_ascii_uppercase();
    let start = upper.find("EPSG")?;
    upper[start..]
        .rsplit(|c: char| c == ':' || c == '/')
        .next()
        .and_then(|code| code.trim().parse().ok())
}

fn epsg_definition(code: u32) -> Option<Cow<'static, str>> {
    let definition = match code {
        3857 | 3785 | 900913 | 102100 | 102113 => Cow::Borrowed(WEB_MERCATOR),
        3395 => Cow::Borrowed(WORLD_MERCATOR),
        4269 | 4258 => Cow::Borrowed(GRS80_GEOGRAPHIC),
        32601..=32660 => Cow::Owned(format!(
            "+proj=utm +zone={} +datum=WGS84 +units=m +no_defs",
            code - 32600
        )),
        32701..=32760 => Cow::Owned(format!(
            "+proj=utm +zone={} +south +datum=WGS84 +units=m +no_defs",
            code - 32700
        )),
        _ => return None,
    };
    Some(definition)
}
