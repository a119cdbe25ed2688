//! See documentation for [`GeometryKind`].
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Kind of a geometry as named by the OGC simple features model.
///
/// Parsers report the kind of every geometry they read, even the ones that cannot be converted
/// into a [`Shape`](crate::Shape). This lets the caller tell the user what kind of geometry was
/// found instead of just rejecting it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum GeometryKind {
    /// Single position.
    Point,
    /// Set of positions.
    MultiPoint,
    /// Open or closed sequence of positions.
    LineString,
    /// Set of line strings.
    MultiLineString,
    /// Area bounded by rings.
    Polygon,
    /// Set of polygons.
    MultiPolygon,
    /// Heterogeneous set of geometries.
    GeometryCollection,
    /// Any curved or surface type outside of the basic simple features.
    Other,
}

impl GeometryKind {
    /// Returns true if a geometry of this kind can be represented as a [`Shape`](crate::Shape).
    pub fn is_supported(&self) -> bool {
        matches!(self, GeometryKind::Point | GeometryKind::Polygon)
    }

    /// OGC name of the geometry kind.
    pub fn name(&self) -> &'static str {
        match self {
            GeometryKind::Point => "Point",
            GeometryKind::MultiPoint => "MultiPoint",
            GeometryKind::LineString => "LineString",
            GeometryKind::MultiLineString => "MultiLineString",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::MultiPolygon => "MultiPolygon",
            GeometryKind::GeometryCollection => "GeometryCollection",
            GeometryKind::Other => "Other",
        }
    }
}

impl Display for GeometryKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
