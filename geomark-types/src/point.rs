use num_traits::Float;
use serde::{Deserialize, Serialize};

/// Point on the surface of the Earth given in geographic decimal degrees.
pub trait GeoPoint {
    /// Numeric type used to represent coordinates.
    type Num: Float;

    /// Latitude in degrees.
    fn lat(&self) -> Self::Num;

    /// Longitude in degrees.
    fn lon(&self) -> Self::Num;

    /// Elevation of the point, if the point has one.
    fn elevation(&self) -> Option<Self::Num> {
        None
    }
}

/// Geographic position with an optional elevation.
///
/// Two positions are equal only if their longitudes, latitudes and elevations are exactly equal. A position
/// without elevation is never equal to a position with elevation, even if the elevation is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct Position {
    lon: f64,
    lat: f64,
    elevation: Option<f64>,
}

impl Position {
    /// Creates a new position without elevation.
    pub fn new(lon: f64, lat: f64) -> Self {
        Self {
            lon,
            lat,
            elevation: None,
        }
    }

    /// Creates a new position with the given elevation.
    pub fn with_elevation(lon: f64, lat: f64, elevation: f64) -> Self {
        Self {
            lon,
            lat,
            elevation: Some(elevation),
        }
    }

    /// Creates a position from longitude, latitude and an optional elevation.
    pub fn from_parts(lon: f64, lat: f64, elevation: Option<f64>) -> Self {
        Self {
            lon,
            lat,
            elevation,
        }
    }

    /// Copies coordinates of another geographic point.
    pub fn from_geo(other: &impl GeoPoint<Num = f64>) -> Self {
        Self::from_parts(other.lon(), other.lat(), other.elevation())
    }

    /// Returns the same position with elevation replaced.
    pub fn set_elevation(self, elevation: Option<f64>) -> Self {
        Self { elevation, ..self }
    }
}

impl GeoPoint for Position {
    type Num = f64;

    fn lat(&self) -> f64 {
        self.lat
    }

    fn lon(&self) -> f64 {
        self.lon
    }

    fn elevation(&self) -> Option<f64> {
        self.elevation
    }
}

/// Creates a new [`Position`](crate::Position) from longitude and latitude values (in degrees), and
/// optionally an elevation.
///
/// ```
/// use geomark_types::{lonlat, GeoPoint};
///
/// let point = lonlat!(-105.0, 39.0);
/// assert_eq!(point.lat(), 39.0);
///
/// let point = lonlat!(-105.0, 39.0, 1650.0);
/// assert_eq!(point.elevation(), Some(1650.0));
/// ```
#[macro_export]
macro_rules! lonlat {
    ($lon:expr, $lat:expr) => {
        $crate::Position::new($lon, $lat)
    };
    ($lon:expr, $lat:expr, $elevation:expr) => {
        $crate::Position::with_elevation($lon, $lat, $elevation)
    };
}
