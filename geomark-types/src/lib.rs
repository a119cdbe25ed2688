//! Geometry types used by the `geomark` placemark exporter.
//!
//! The crate is intentionally small: an export only ever deals with geographic positions
//! (longitude, latitude and an optional elevation), closed rings and the two shapes that can
//! be written as placemark geometry, see [`Shape`].
//!
//! With the `wkt` feature (enabled by default) shapes can be read from well-known text with
//! [`wkt::parse_wkt`]. With the optional `geo-types` feature the types can be converted from the
//! [`geo_types`](https://docs.rs/geo-types) geometries.

pub mod error;
pub mod geometry_type;
mod point;
pub mod polygon;
pub mod ring;
mod shape;

#[cfg(feature = "geo-types")]
mod geo_types;

#[cfg(feature = "wkt")]
pub mod wkt;

pub use error::GeomarkTypesError;
pub use geometry_type::GeometryKind;
pub use point::{GeoPoint, Position};
pub use polygon::Polygon;
pub use ring::Ring;
pub use shape::Shape;
