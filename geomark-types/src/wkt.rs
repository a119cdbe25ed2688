//! Reading shapes from well-known text.
//!
//! Parsing itself is done by the `wkt` crate. This module only converts the parsed geometry into [`ParsedGeometry`],
//! keeping the kind of the top-level geometry so that unsupported geometries can be reported by name.

use ::wkt::types::{Coord, LineString};
use ::wkt::Wkt;

use crate::error::GeomarkTypesError;
use crate::geometry_type::GeometryKind;
use crate::point::Position;
use crate::polygon::Polygon;
use crate::ring::Ring;

/// Result of parsing a WKT string.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedGeometry {
    /// `POINT`, `POINT Z`, `POINT M` or `POINT ZM`. Contains `None` for `POINT EMPTY`.
    Point(Option<Position>),
    /// `POLYGON` in any dimension. The outer ring is `None` if the polygon has no points.
    Polygon {
        /// Outer boundary of the polygon.
        outer: Option<Polygon>,
        /// Number of inner rings found in the text.
        inner_rings: usize,
    },
    /// Any other geometry type.
    Other(GeometryKind),
}

impl ParsedGeometry {
    /// Kind of the parsed geometry.
    pub fn kind(&self) -> GeometryKind {
        match self {
            ParsedGeometry::Point(_) => GeometryKind::Point,
            ParsedGeometry::Polygon { .. } => GeometryKind::Polygon,
            ParsedGeometry::Other(kind) => *kind,
        }
    }
}

/// Parses a well-known text string.
///
/// Coordinates are read as longitude, latitude and an optional Z ordinate which becomes the elevation of the
/// position. An M ordinate is read but dropped.
///
/// ```
/// use geomark_types::wkt::{parse_wkt, ParsedGeometry};
/// use geomark_types::lonlat;
///
/// let parsed = parse_wkt("POINT Z (-105.89194 38.99333 2400)")?;
/// assert_eq!(parsed, ParsedGeometry::Point(Some(lonlat!(-105.89194, 38.99333, 2400.0))));
/// # Ok::<(), geomark_types::GeomarkTypesError>(())
/// ```
pub fn parse_wkt(text: &str) -> Result<ParsedGeometry, GeomarkTypesError> {
    let geometry = text
        .trim()
        .parse::<Wkt<f64>>()
        .map_err(|err| GeomarkTypesError::Wkt(err.to_string()))?;

    Ok(match geometry {
        Wkt::Point(point) => ParsedGeometry::Point(point.0.as_ref().map(position)),
        Wkt::Polygon(polygon) => {
            let mut rings = polygon.0.into_iter();
            let outer = rings.next().and_then(ring).map(Polygon::new);
            ParsedGeometry::Polygon {
                outer,
                inner_rings: rings.len(),
            }
        }
        Wkt::LineString(_) => ParsedGeometry::Other(GeometryKind::LineString),
        Wkt::MultiPoint(_) => ParsedGeometry::Other(GeometryKind::MultiPoint),
        Wkt::MultiLineString(_) => ParsedGeometry::Other(GeometryKind::MultiLineString),
        Wkt::MultiPolygon(_) => ParsedGeometry::Other(GeometryKind::MultiPolygon),
        Wkt::GeometryCollection(_) => ParsedGeometry::Other(GeometryKind::GeometryCollection),
    })
}

fn position(coord: &Coord<f64>) -> Position {
    Position::from_parts(coord.x, coord.y, coord.z)
}

/// Returns `None` for a ring without points.
fn ring(line: LineString<f64>) -> Option<Ring<Position>> {
    Ring::new(line.0.iter().map(position).collect()).ok()
}
