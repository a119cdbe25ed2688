use geomark_types::{GeoPoint, Position};
use serde::{Deserialize, Serialize};

/// Default number of digits after the decimal point in written coordinates.
pub const DEFAULT_PRECISION: usize = 4;

/// What to write for positions that have no elevation.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingElevation {
    /// Write `0` as the third ordinate.
    #[default]
    Zero,
    /// Write only longitude and latitude.
    Omit,
}

/// Formatting of coordinate tuples.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CoordinateFormat {
    precision: usize,
    missing_elevation: MissingElevation,
}

impl Default for CoordinateFormat {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            missing_elevation: MissingElevation::Zero,
        }
    }
}

impl CoordinateFormat {
    /// Creates a new format.
    pub fn new(precision: usize, missing_elevation: MissingElevation) -> Self {
        Self {
            precision,
            missing_elevation,
        }
    }

    /// Maximum number of digits after the decimal point.
    pub fn precision(&self) -> usize {
        self.precision
    }

    /// Formats a single ordinate.
    ///
    /// The value is rounded to the configured precision, then trailing zeros are removed keeping at least one digit
    /// after the decimal point: `-105.0`, `38.9933`.
    pub fn ordinate(&self, value: f64) -> String {
        let mut formatted = format!("{value:.prec$}", prec = self.precision);
        if let Some(dot) = formatted.find('.') {
            let trimmed = formatted.trim_end_matches('0').len();
            formatted.truncate(trimmed.max(dot + 2));
        }

        match formatted.strip_prefix('-') {
            Some(abs) if abs.bytes().all(|b| b == b'0' || b == b'.') => abs.to_string(),
            _ => formatted,
        }
    }

    /// Formats a `lon,lat[,elevation]` tuple.
    pub fn position(&self, position: &Position) -> String {
        let lon = self.ordinate(position.lon());
        let lat = self.ordinate(position.lat());
        match (position.elevation(), self.missing_elevation) {
            (Some(elevation), _) => format!("{lon},{lat},{}", self.ordinate(elevation)),
            (None, MissingElevation::Zero) => format!("{lon},{lat},0"),
            (None, MissingElevation::Omit) => format!("{lon},{lat}"),
        }
    }
}
