//! Resolving placemark geometry from record fields.

use geomark_types::wkt::{parse_wkt, ParsedGeometry};
use geomark_types::{GeometryKind, Position, Shape};
use serde::{Deserialize, Serialize};

use crate::error::RecordError;
use crate::record::{FeatureRecord, FieldValue};

/// Where the geometry of a record is taken from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum GeometryConfig {
    /// Geometry is a point given by longitude, latitude and optionally elevation fields.
    Point {
        /// Name of the longitude field.
        longitude_field: String,
        /// Name of the latitude field.
        latitude_field: String,
        /// Name of the elevation field.
        elevation_field: Option<String>,
    },
    /// Geometry is given as well-known text in a single field.
    Wkt {
        /// Name of the WKT field.
        wkt_field: String,
    },
}

impl GeometryConfig {
    /// Point geometry without elevation.
    pub fn point(longitude_field: impl Into<String>, latitude_field: impl Into<String>) -> Self {
        Self::Point {
            longitude_field: longitude_field.into(),
            latitude_field: latitude_field.into(),
            elevation_field: None,
        }
    }

    /// WKT geometry.
    pub fn wkt(wkt_field: impl Into<String>) -> Self {
        Self::Wkt {
            wkt_field: wkt_field.into(),
        }
    }

    /// Resolves geometry of the record.
    ///
    /// Returns `Ok(None)` if the record does not have values for the geometry fields. Such records are expected in
    /// heterogeneous tables and are not errors.
    pub fn resolve(&self, record: &impl FeatureRecord) -> Result<Option<Shape>, RecordError> {
        match self {
            GeometryConfig::Point {
                longitude_field,
                latitude_field,
                elevation_field,
            } => resolve_point(
                record,
                longitude_field,
                latitude_field,
                elevation_field.as_deref(),
            ),
            GeometryConfig::Wkt { wkt_field } => resolve_wkt(record, wkt_field),
        }
    }
}

fn resolve_point(
    record: &impl FeatureRecord,
    longitude_field: &str,
    latitude_field: &str,
    elevation_field: Option<&str>,
) -> Result<Option<Shape>, RecordError> {
    let lon = record.field(longitude_field)?;
    let lat = record.field(latitude_field)?;
    let (Some(lon), Some(lat)) = (lon, lat) else {
        return Ok(None);
    };

    let elevation = match elevation_field {
        Some(field) => match record.field(field)? {
            Some(value) => Some(number(field, &value)?),
            None => None,
        },
        None => None,
    };

    Ok(Some(Shape::Point(Position::from_parts(
        number(longitude_field, &lon)?,
        number(latitude_field, &lat)?,
        elevation,
    ))))
}

fn number(field: &str, value: &FieldValue) -> Result<f64, RecordError> {
    value.as_number().ok_or_else(|| RecordError::InvalidNumber {
        field: field.to_string(),
        value: value.to_string(),
    })
}

fn resolve_wkt(record: &impl FeatureRecord, wkt_field: &str) -> Result<Option<Shape>, RecordError> {
    let Some(value) = record.field(wkt_field)? else {
        return Ok(None);
    };

    let text = value.as_text();
    if text.trim().is_empty() {
        return Ok(None);
    }

    let parsed = parse_wkt(&text).map_err(|err| RecordError::invalid_geometry(wkt_field, err))?;
    match parsed {
        ParsedGeometry::Point(Some(position)) => Ok(Some(Shape::Point(position))),
        ParsedGeometry::Point(None) => Err(RecordError::EmptyShape(GeometryKind::Point)),
        ParsedGeometry::Polygon {
            outer: Some(polygon),
            inner_rings,
        } => {
            if inner_rings > 0 {
                log::debug!("Ignoring {inner_rings} inner ring(s) of a polygon in field '{wkt_field}'");
            }
            Ok(Some(Shape::Polygon(polygon)))
        }
        ParsedGeometry::Polygon { outer: None, .. } => {
            Err(RecordError::EmptyShape(GeometryKind::Polygon))
        }
        ParsedGeometry::Other(kind) => Err(RecordError::UnknownShape(kind)),
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use assert_matches::assert_matches;
    use geomark_types::{lonlat, GeoPoint};

    use super::*;
    use crate::record::{PropertyValue, TimeSeries};

    /// Record with text fields, `None` means the field exists but is empty.
    struct Row(Vec<(&'static str, Option<&'static str>)>);

    impl FeatureRecord for Row {
        fn field(&self, name: &str) -> Result<Option<FieldValue<'_>>, RecordError> {
            self.0
                .iter()
                .find(|(field, _)| *field == name)
                .map(|(_, value)| value.map(|v| FieldValue::Text(Cow::Borrowed(v))))
                .ok_or_else(|| RecordError::FieldNotFound(name.to_string()))
        }
    }

    fn with_elevation() -> GeometryConfig {
        GeometryConfig::Point {
            longitude_field: "lon".into(),
            latitude_field: "lat".into(),
            elevation_field: Some("z".into()),
        }
    }

    #[test]
    fn point_from_fields() {
        let row = Row(vec![("lon", Some("-105.0")), ("lat", Some("39.0"))]);
        let shape = GeometryConfig::point("lon", "lat").resolve(&row);
        assert_eq!(shape, Ok(Some(Shape::Point(lonlat!(-105.0, 39.0)))));
    }

    #[test]
    fn missing_latitude_means_no_geometry() {
        let row = Row(vec![("lon", Some("-105.0")), ("lat", None)]);
        assert_eq!(GeometryConfig::point("lon", "lat").resolve(&row), Ok(None));
    }

    #[test]
    fn elevation_is_attached_when_present() {
        let row = Row(vec![("lon", Some("1")), ("lat", Some("2")), ("z", Some("3.5"))]);
        let shape = with_elevation().resolve(&row).expect("valid").expect("shape");
        assert_matches!(shape, Shape::Point(p) if p.elevation() == Some(3.5));

        let row = Row(vec![("lon", Some("1")), ("lat", Some("2")), ("z", None)]);
        let shape = with_elevation().resolve(&row).expect("valid").expect("shape");
        assert_matches!(shape, Shape::Point(p) if p.elevation().is_none());
    }

    #[test]
    fn unknown_field_is_an_error() {
        let row = Row(vec![("x", Some("1")), ("lat", Some("2"))]);
        assert_eq!(
            GeometryConfig::point("lon", "lat").resolve(&row),
            Err(RecordError::FieldNotFound("lon".into()))
        );
    }

    #[test]
    fn non_numeric_coordinate_is_an_error() {
        let row = Row(vec![("lon", Some("west")), ("lat", Some("2"))]);
        assert_matches!(
            GeometryConfig::point("lon", "lat").resolve(&row),
            Err(RecordError::InvalidNumber { field, .. }) if field == "lon"
        );
    }

    #[test]
    fn non_finite_coordinates_are_errors() {
        let row = Row(vec![("lon", Some("NaN")), ("lat", Some("2"))]);
        assert_matches!(
            GeometryConfig::point("lon", "lat").resolve(&row),
            Err(RecordError::InvalidNumber { field, value }) if field == "lon" && value == "NaN"
        );

        let row = Row(vec![("lon", Some("1")), ("lat", Some("inf"))]);
        assert_matches!(
            GeometryConfig::point("lon", "lat").resolve(&row),
            Err(RecordError::InvalidNumber { field, .. }) if field == "lat"
        );

        let series = TimeSeries::new("08223000")
            .with_property("Longitude", PropertyValue::Number(f64::INFINITY))
            .with_property("Latitude", PropertyValue::Number(37.68));
        assert_matches!(
            GeometryConfig::point("Longitude", "Latitude").resolve(&series),
            Err(RecordError::InvalidNumber { field, .. }) if field == "Longitude"
        );
    }

    #[test]
    fn numeric_properties_of_time_series() {
        let series = TimeSeries::new("08223000")
            .with_property("Longitude", PropertyValue::Number(-106.4))
            .with_property("Latitude", PropertyValue::Text("37.68".into()));
        let shape = GeometryConfig::point("Longitude", "Latitude")
            .resolve(&series)
            .expect("valid");
        assert_eq!(shape, Some(Shape::Point(lonlat!(-106.4, 37.68))));
    }

    #[test]
    fn wkt_point_and_polygon() {
        let config = GeometryConfig::wkt("geom");

        let row = Row(vec![("geom", Some("POINT Z (1 2 3)"))]);
        assert_eq!(
            config.resolve(&row),
            Ok(Some(Shape::Point(lonlat!(1.0, 2.0, 3.0))))
        );

        let row = Row(vec![("geom", Some("POLYGON ((0 0, 1 0, 1 1))"))]);
        let shape = config.resolve(&row).expect("valid").expect("shape");
        assert_matches!(shape, Shape::Polygon(p) if p.outer_ring().len() == 3);
    }

    #[test]
    fn empty_wkt_means_no_geometry() {
        let config = GeometryConfig::wkt("geom");
        assert_eq!(config.resolve(&Row(vec![("geom", None)])), Ok(None));
        assert_eq!(config.resolve(&Row(vec![("geom", Some("  "))])), Ok(None));
    }

    #[test]
    fn unsupported_wkt_shape() {
        let row = Row(vec![("geom", Some("LINESTRING (0 0, 1 1)"))]);
        assert_eq!(
            GeometryConfig::wkt("geom").resolve(&row),
            Err(RecordError::UnknownShape(GeometryKind::LineString))
        );
    }

    #[test]
    fn malformed_wkt() {
        let row = Row(vec![("geom", Some("POLYGON ((0 0, 1"))]);
        assert_matches!(
            GeometryConfig::wkt("geom").resolve(&row),
            Err(RecordError::InvalidGeometry { field, .. }) if field == "geom"
        );
    }
}
