use geo_types::{Coord, CoordNum};
use num_traits::Float;

use crate::error::GeomarkTypesError;
use crate::point::{GeoPoint, Position};
use crate::polygon::Polygon;
use crate::ring::Ring;
use crate::shape::Shape;

impl<T: CoordNum + Float> GeoPoint for geo_types::Point<T> {
    type Num = T;

    fn lat(&self) -> Self::Num {
        self.y()
    }

    fn lon(&self) -> Self::Num {
        self.x()
    }
}

impl<T: CoordNum + Float> GeoPoint for Coord<T> {
    type Num = T;

    fn lat(&self) -> Self::Num {
        self.y
    }

    fn lon(&self) -> Self::Num {
        self.x
    }
}

impl From<geo_types::Point<f64>> for Position {
    fn from(value: geo_types::Point<f64>) -> Self {
        Position::from_geo(&value)
    }
}

impl From<Position> for geo_types::Point<f64> {
    fn from(value: Position) -> Self {
        geo_types::Point::new(value.lon(), value.lat())
    }
}

impl TryFrom<geo_types::Polygon<f64>> for Polygon {
    type Error = GeomarkTypesError;

    fn try_from(value: geo_types::Polygon<f64>) -> Result<Self, Self::Error> {
        let points = value.exterior().coords().map(Position::from_geo).collect();
        Ok(Polygon::new(Ring::new(points)?))
    }
}

impl TryFrom<geo_types::Geometry<f64>> for Shape {
    type Error = GeomarkTypesError;

    fn try_from(value: geo_types::Geometry<f64>) -> Result<Self, Self::Error> {
        match value {
            geo_types::Geometry::Point(p) => Ok(Shape::Point(p.into())),
            geo_types::Geometry::Polygon(p) => Ok(Shape::Polygon(p.try_into()?)),
            other => Err(GeomarkTypesError::Conversion(format!(
                "geometry {other:?} cannot be used as a placemark shape"
            ))),
        }
    }
}
