//! Geometry type definitions
//!
//! Each theme table targets exactly one geometry type, which determines the
//! source table the rows are copied from, the WKT geometry subtype recorded
//! in the GeoPackage catalog, and the identifier columns the table carries.

use std::fmt;
use std::str::FromStr;

/// The three geometry families a theme can select.
///
/// The derived `Ord` follows the fixed enumeration order (points, lines,
/// polygons) used everywhere tables are listed or emitted, regardless of the
/// order the document spelled them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GeometryType {
    /// Point features (nodes)
    Points,
    /// Linear features (ways)
    Lines,
    /// Area features (closed ways and multipolygon relations)
    Polygons,
}

impl GeometryType {
    /// All geometry types in fixed enumeration order.
    pub const ALL: [GeometryType; 3] =
        [GeometryType::Points, GeometryType::Lines, GeometryType::Polygons];

    /// WKT geometry subtype recorded in the GeoPackage catalog.
    pub fn wkt_type(self) -> &'static str {
        match self {
            GeometryType::Points => "POINT",
            GeometryType::Lines => "MULTILINESTRING",
            GeometryType::Polygons => "MULTIPOLYGON",
        }
    }

    /// Name of the ogr2ogr-converted source table rows are selected from.
    pub fn source_table(self) -> &'static str {
        match self {
            GeometryType::Points => "points",
            GeometryType::Lines => "lines",
            GeometryType::Polygons => "multipolygons",
        }
    }

    /// OSM identifier columns carried by tables of this geometry type.
    ///
    /// Polygon features can originate from either a way or a relation, so
    /// polygon tables carry both identifier columns.
    pub fn id_columns(self) -> &'static [&'static str] {
        match self {
            GeometryType::Points | GeometryType::Lines => &["osm_id"],
            GeometryType::Polygons => &["osm_id", "osm_way_id"],
        }
    }
}

impl fmt::Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryType::Points => write!(f, "points"),
            GeometryType::Lines => write!(f, "lines"),
            GeometryType::Polygons => write!(f, "polygons"),
        }
    }
}

/// Error when parsing a geometry type string
#[derive(Debug, Clone)]
pub struct ParseGeometryTypeError {
    pub input: String,
}

impl fmt::Display for ParseGeometryTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown geometry type '{}'; valid options: points, lines, polygons",
            self.input
        )
    }
}

impl std::error::Error for ParseGeometryTypeError {}

impl FromStr for GeometryType {
    type Err = ParseGeometryTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "points" => Ok(GeometryType::Points),
            "lines" => Ok(GeometryType::Lines),
            "polygons" => Ok(GeometryType::Polygons),
            _ => Err(ParseGeometryTypeError { input: s.to_string() }),
        }
    }
}
