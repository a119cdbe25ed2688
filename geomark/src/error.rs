//! Error types used by the crate.
//!
//! An export can fail in two different ways. Problems with the export as a whole (configuration, style file,
//! output file) are fatal and returned as [`ExportError`]. Problems with a single record are recoverable: they are
//! collected as [`RecordError`] values while the export continues with the next record.

use std::path::PathBuf;

use geomark_types::{GeomarkTypesError, GeometryKind};
use thiserror::Error;

/// Fatal export error.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Export configuration is invalid.
    #[error("invalid export configuration: {0}")]
    Configuration(String),
    /// Configured style file cannot be read.
    #[error("failed to read style file {path:?}: {source}")]
    Style {
        /// Path to the style file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Output file cannot be created.
    #[error("failed to create output file {path:?}: {source}")]
    Output {
        /// Path to the output file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Record source cannot be opened.
    #[error("failed to open record source: {0}")]
    Source(String),
    /// Error writing the output document.
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for ExportError {
    fn from(value: csv::Error) -> Self {
        Self::Source(value.to_string())
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(value: serde_json::Error) -> Self {
        Self::Source(value.to_string())
    }
}

/// Recoverable error of a single record. The record is skipped, but the export continues.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    /// Referenced field does not exist in the record source.
    #[error("field '{0}' is not found in the record source")]
    FieldNotFound(String),
    /// Coordinate field contains a value that is not a number.
    #[error("field '{field}' value '{value}' is not a number")]
    InvalidNumber {
        /// Field name.
        field: String,
        /// Value of the field.
        value: String,
    },
    /// Geometry text cannot be parsed.
    #[error("field '{field}' contains invalid geometry: {message}")]
    InvalidGeometry {
        /// Field name.
        field: String,
        /// Parser message.
        message: String,
    },
    /// Geometry was parsed, but its type cannot be written as a placemark geometry.
    #[error("unknown shape type {0}")]
    UnknownShape(GeometryKind),
    /// Geometry was parsed, but has no coordinates.
    #[error("{0} geometry has no coordinates")]
    EmptyShape(GeometryKind),
    /// The record cannot be read from the source.
    #[error("failed to read record: {0}")]
    Read(String),
}

impl RecordError {
    pub(crate) fn invalid_geometry(field: &str, error: GeomarkTypesError) -> Self {
        let message = match error {
            GeomarkTypesError::Conversion(message) | GeomarkTypesError::Wkt(message) => message,
        };

        Self::InvalidGeometry {
            field: field.to_string(),
            message,
        }
    }
}

impl From<csv::Error> for RecordError {
    fn from(value: csv::Error) -> Self {
        Self::Read(value.to_string())
    }
}
