//! Geomark exports tabular records and time series as KML placemark documents.
//!
//! # Quick start
//!
//! ```
//! use geomark::{CsvTable, ExportConfigBuilder, Exporter};
//!
//! let csv = "name,lon,lat\nSite A,-105.0,39.0\n";
//! let mut table = CsvTable::from_reader("stations", csv.as_bytes())?;
//!
//! let config = ExportConfigBuilder::new("stations")
//!     .with_point_fields("lon", "lat")
//!     .with_name_field("name")
//!     .build()?;
//!
//! let mut output = vec![];
//! let summary = Exporter::new(config).export(table.rows(), &mut output)?;
//!
//! assert_eq!(summary.placemarks_written, 1);
//! assert!(String::from_utf8_lossy(&output).contains("<coordinates>-105.0,39.0,0</coordinates>"));
//! # Ok::<(), geomark::ExportError>(())
//! ```
//!
//! # Main components
//!
//! * [`records`](record) are anything implementing [`FeatureRecord`]: rows of a CSV [`CsvTable`] or
//!   [`TimeSeries`] of a collection.
//! * [`GeometryConfig`] resolves the geometry of a record, either from coordinate fields or from well-known text.
//! * [`PlacemarkFormatter`](placemark::PlacemarkFormatter) produces names and descriptions of placemarks from
//!   fields or [`templates`](placemark::Template).
//! * [`KmlWriter`](kml::KmlWriter) writes the document in a single pass.
//! * [`Exporter`] drives all of the above and collects the errors of individual records into an
//!   [`ExportSummary`].
//!
//! An export job can also be described in JSON, see [`ExportSettings`].

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod export;
pub mod geometry;
pub mod kml;
pub mod placemark;
pub mod record;
pub mod style;

pub use config::ExportSettings;
pub use error::{ExportError, RecordError};
pub use export::{ExportConfig, ExportConfigBuilder, ExportSummary, Exporter, RecordIssue};
pub use geomark_types;
pub use geometry::GeometryConfig;
pub use record::{CsvTable, FeatureRecord, TimeSeries, TimeSeriesCollection};
