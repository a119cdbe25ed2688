use serde::{Deserialize, Serialize};

use crate::geometry_type::GeometryKind;
use crate::point::Position;
use crate::polygon::Polygon;

/// Geometry of a placemark.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum Shape {
    /// Single position, optionally with elevation.
    Point(Position),
    /// Area bounded by a ring.
    Polygon(Polygon),
}

impl Shape {
    /// Kind of the geometry.
    pub fn kind(&self) -> GeometryKind {
        match self {
            Shape::Point(_) => GeometryKind::Point,
            Shape::Polygon(_) => GeometryKind::Polygon,
        }
    }

    /// Returns true if any of the shape positions has elevation.
    pub fn has_elevation(&self) -> bool {
        use crate::GeoPoint;

        match self {
            Shape::Point(p) => p.elevation().is_some(),
            Shape::Polygon(polygon) => polygon
                .outer_ring()
                .iter_points()
                .any(|p| p.elevation().is_some()),
        }
    }
}

impl From<Position> for Shape {
    fn from(value: Position) -> Self {
        Self::Point(value)
    }
}

impl From<Polygon> for Shape {
    fn from(value: Polygon) -> Self {
        Self::Polygon(value)
    }
}
