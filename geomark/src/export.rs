//! Export driver.
//!
//! An export is configured once with [`ExportConfigBuilder`] and then run over any iterator of records with
//! [`Exporter`]. Records that cannot be exported do not stop the export: their errors are collected into
//! [`ExportSummary::issues`] and the export continues with the next record.
//!
//! ```no_run
//! use geomark::export::{ExportConfigBuilder, Exporter};
//! use geomark::record::CsvTable;
//!
//! let mut table = CsvTable::from_path("stations", "stations.csv")?;
//! let config = ExportConfigBuilder::new("stations")
//!     .with_point_fields("lon", "lat")
//!     .with_name_field("name")
//!     .build()?;
//!
//! let summary = Exporter::new(config).export_to_path(table.rows(), "stations.kml")?;
//! for issue in &summary.issues {
//!     eprintln!("warning: {issue}");
//! }
//! # Ok::<(), geomark::error::ExportError>(())
//! ```

use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{ExportError, RecordError};
use crate::geometry::GeometryConfig;
use crate::kml::{
    CoordinateFormat, ExportDocument, KmlWriter, MissingElevation, WriteSummary, DEFAULT_PRECISION,
};
use crate::placemark::{Placemark, PlacemarkFormatter, TextContent, TextSource};
use crate::record::FeatureRecord;
use crate::style::{provide_style, StyleSource};

/// Validated configuration of an export.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    source_id: String,
    title: String,
    description: String,
    geometry: GeometryConfig,
    name: Option<TextSource>,
    placemark_description: Option<TextSource>,
    geometry_insert: Option<String>,
    style: Option<StyleSource>,
    style_url: Option<String>,
    coordinate_format: CoordinateFormat,
}

impl ExportConfig {
    /// Identifier of the record source.
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// Geometry configuration.
    pub fn geometry(&self) -> &GeometryConfig {
        &self.geometry
    }

    /// Style source, if any.
    pub fn style(&self) -> Option<&StyleSource> {
        self.style.as_ref()
    }

    /// Format of the written coordinates.
    pub fn coordinate_format(&self) -> CoordinateFormat {
        self.coordinate_format
    }
}

/// Constructor for an [`ExportConfig`].
///
/// ```
/// use geomark::export::ExportConfigBuilder;
///
/// let config = ExportConfigBuilder::new("parcels")
///     .with_wkt_field("geometry")
///     .with_name_template("Parcel ${property:id}")
///     .with_inline_style("<Style id=\"parcel\"/>")
///     .with_style_url("#parcel")
///     .with_precision(6)
///     .build()?;
/// # Ok::<(), geomark::error::ExportError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExportConfigBuilder {
    source_id: String,
    title: Option<String>,
    description: Option<String>,
    longitude_field: Option<String>,
    latitude_field: Option<String>,
    elevation_field: Option<String>,
    wkt_field: Option<String>,
    name: Option<TextSource>,
    placemark_description: Option<TextSource>,
    geometry_insert: Option<String>,
    inline_style: Option<String>,
    style_file: Option<PathBuf>,
    style_url: Option<String>,
    precision: Option<usize>,
    missing_elevation: MissingElevation,
}

impl ExportConfigBuilder {
    /// Initializes a builder for an export of the source with the given identifier.
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            ..Default::default()
        }
    }

    /// Sets the document title. Defaults to the source identifier.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the document description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Takes point geometry from the longitude and latitude fields.
    pub fn with_point_fields(
        mut self,
        longitude_field: impl Into<String>,
        latitude_field: impl Into<String>,
    ) -> Self {
        self.longitude_field = Some(longitude_field.into());
        self.latitude_field = Some(latitude_field.into());
        self
    }

    /// Sets the longitude field only.
    pub fn with_longitude_field(mut self, field: impl Into<String>) -> Self {
        self.longitude_field = Some(field.into());
        self
    }

    /// Sets the latitude field only.
    pub fn with_latitude_field(mut self, field: impl Into<String>) -> Self {
        self.latitude_field = Some(field.into());
        self
    }

    /// Takes point elevation from the given field. Requires point fields.
    pub fn with_elevation_field(mut self, field: impl Into<String>) -> Self {
        self.elevation_field = Some(field.into());
        self
    }

    /// Takes geometry from the well-known text in the given field.
    pub fn with_wkt_field(mut self, field: impl Into<String>) -> Self {
        self.wkt_field = Some(field.into());
        self
    }

    /// Sets where placemark names come from.
    pub fn with_name(mut self, source: TextSource) -> Self {
        self.name = Some(source);
        self
    }

    /// Placemark names are the values of the given field.
    pub fn with_name_field(self, field: impl Into<String>) -> Self {
        self.with_name(TextSource::field(field))
    }

    /// Placemark names are produced by the given template.
    pub fn with_name_template(self, template: impl Into<String>) -> Self {
        self.with_name(TextSource::template(template))
    }

    /// Sets where placemark descriptions come from.
    pub fn with_placemark_description(mut self, source: TextSource) -> Self {
        self.placemark_description = Some(source);
        self
    }

    /// Sets raw markup inserted at the start of every geometry element.
    pub fn with_geometry_insert(mut self, insert: impl Into<String>) -> Self {
        self.geometry_insert = Some(insert.into());
        self
    }

    /// Sets style markup inserted at the top of the document.
    pub fn with_inline_style(mut self, markup: impl Into<String>) -> Self {
        self.inline_style = Some(markup.into());
        self
    }

    /// Sets a file with style markup inserted at the top of the document.
    pub fn with_style_file(mut self, path: impl AsRef<Path>) -> Self {
        self.style_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the style reference of every placemark.
    pub fn with_style_url(mut self, url: impl Into<String>) -> Self {
        self.style_url = Some(url.into());
        self
    }

    /// Sets maximum number of digits after the decimal point in coordinates. Default is 4.
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Sets what is written for positions without elevation.
    pub fn with_missing_elevation(mut self, missing_elevation: MissingElevation) -> Self {
        self.missing_elevation = missing_elevation;
        self
    }

    /// Validates the configuration.
    pub fn build(self) -> Result<ExportConfig, ExportError> {
        let geometry = match (
            self.longitude_field,
            self.latitude_field,
            self.elevation_field,
            self.wkt_field,
        ) {
            (Some(_), _, _, Some(_)) | (_, Some(_), _, Some(_)) => {
                return Err(ExportError::Configuration(
                    "point fields and WKT field cannot be used together".into(),
                ))
            }
            (None, None, Some(_), _) => {
                return Err(ExportError::Configuration(
                    "elevation field requires longitude and latitude fields".into(),
                ))
            }
            (Some(longitude_field), Some(latitude_field), elevation_field, None) => {
                GeometryConfig::Point {
                    longitude_field,
                    latitude_field,
                    elevation_field,
                }
            }
            (Some(_), None, _, None) | (None, Some(_), _, None) => {
                return Err(ExportError::Configuration(
                    "both longitude and latitude fields must be set".into(),
                ))
            }
            (None, None, None, Some(wkt_field)) => GeometryConfig::Wkt { wkt_field },
            (None, None, None, None) => {
                return Err(ExportError::Configuration(
                    "either point fields or WKT field must be set".into(),
                ))
            }
        };

        let style = match (self.inline_style, self.style_file) {
            (Some(_), Some(_)) => {
                return Err(ExportError::Configuration(
                    "inline style and style file cannot be used together".into(),
                ))
            }
            (Some(markup), None) => Some(StyleSource::Inline(markup)),
            (None, Some(path)) => {
                if !path.is_file() {
                    return Err(ExportError::Configuration(format!(
                        "style file {path:?} does not exist"
                    )));
                }
                Some(StyleSource::File(path))
            }
            (None, None) => None,
        };

        Ok(ExportConfig {
            title: self.title.unwrap_or_else(|| self.source_id.clone()),
            source_id: self.source_id,
            description: self.description.unwrap_or_default(),
            geometry,
            name: self.name,
            placemark_description: self.placemark_description,
            geometry_insert: self.geometry_insert,
            style,
            style_url: self.style_url,
            coordinate_format: CoordinateFormat::new(
                self.precision.unwrap_or(DEFAULT_PRECISION),
                self.missing_elevation,
            ),
        })
    }
}

/// Recoverable error of a single record.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordIssue {
    /// Zero-based index of the record in the source.
    pub index: usize,
    /// The error.
    pub error: RecordError,
}

impl Display for RecordIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "record {}: {}", self.index + 1, self.error)
    }
}

/// Result of a successful export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportSummary {
    /// Number of placemarks written.
    pub placemarks_written: usize,
    /// Number of bytes written.
    pub bytes_written: u64,
    /// Number of records that had no geometry.
    pub skipped: usize,
    /// Errors of the records that could not be exported, in record order.
    pub issues: Vec<RecordIssue>,
}

impl ExportSummary {
    /// Returns true if all records were processed without errors.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Runs exports with the given configuration.
#[derive(Debug, Clone)]
pub struct Exporter {
    config: ExportConfig,
    formatter: PlacemarkFormatter,
}

impl Exporter {
    /// Creates a new exporter.
    pub fn new(config: ExportConfig) -> Self {
        let formatter = PlacemarkFormatter::new(
            config.source_id.clone(),
            config.name.clone(),
            config.placemark_description.clone(),
        );
        Self { config, formatter }
    }

    /// Configuration of the exporter.
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Builds the document content from the records.
    ///
    /// Fails only if the style block cannot be provided. Errors of individual records are returned along with the
    /// document.
    pub fn build_document<R, I>(
        &self,
        records: I,
    ) -> Result<(ExportDocument, Vec<RecordIssue>, usize), ExportError>
    where
        R: FeatureRecord,
        I: IntoIterator<Item = Result<R, RecordError>>,
    {
        let style = provide_style(self.config.style.as_ref())?;

        let mut placemarks = vec![];
        let mut issues = vec![];
        let mut skipped = 0;

        for (index, record) in records.into_iter().enumerate() {
            match record.and_then(|record| self.placemark(&record)) {
                Ok(Some(placemark)) => placemarks.push(placemark),
                Ok(None) => {
                    log::debug!("Record {} has no geometry, skipping", index + 1);
                    skipped += 1;
                }
                Err(error) => {
                    let issue = RecordIssue { index, error };
                    log::warn!("Skipping {issue}");
                    issues.push(issue);
                }
            }
        }

        let document = ExportDocument {
            title: self.config.title.clone(),
            description: TextContent::classify(self.config.description.clone()),
            style,
            placemarks,
        };

        Ok((document, issues, skipped))
    }

    fn placemark(&self, record: &impl FeatureRecord) -> Result<Option<Placemark>, RecordError> {
        let Some(geometry) = self.config.geometry.resolve(record)? else {
            return Ok(None);
        };

        let text = self.formatter.format(record)?;
        Ok(Some(Placemark {
            name: text.name,
            description: text.description,
            geometry: Some(geometry),
            style_url: self.config.style_url.clone(),
        }))
    }

    /// Exports the records into the sink.
    pub fn export<R, I, W>(&self, records: I, sink: W) -> Result<ExportSummary, ExportError>
    where
        R: FeatureRecord,
        I: IntoIterator<Item = Result<R, RecordError>>,
        W: Write,
    {
        let (document, issues, skipped) = self.build_document(records)?;
        let WriteSummary {
            placemarks_written,
            bytes_written,
        } = self.writer(sink).write_document(&document)?;

        log::info!(
            "Exported {placemarks_written} placemark(s) of '{}' ({bytes_written} bytes), {skipped} record(s) without geometry, {} record error(s)",
            self.config.source_id,
            issues.len()
        );

        Ok(ExportSummary {
            placemarks_written,
            bytes_written,
            skipped,
            issues,
        })
    }

    /// Exports the records into a file, creating missing parent folders.
    ///
    /// If writing fails, the partially written file is removed.
    pub fn export_to_path<R, I>(
        &self,
        records: I,
        path: impl AsRef<Path>,
    ) -> Result<ExportSummary, ExportError>
    where
        R: FeatureRecord,
        I: IntoIterator<Item = Result<R, RecordError>>,
    {
        let path = path.as_ref();
        let (document, issues, skipped) = self.build_document(records)?;

        let file = create_output(path)?;
        let WriteSummary {
            placemarks_written,
            bytes_written,
        } = self.write_or_remove(BufWriter::new(file), &document, path)?;

        log::info!(
            "Exported {placemarks_written} placemark(s) of '{}' to {path:?}, {skipped} record(s) without geometry, {} record error(s)",
            self.config.source_id,
            issues.len()
        );

        Ok(ExportSummary {
            placemarks_written,
            bytes_written,
            skipped,
            issues,
        })
    }

    /// Writes the document into the sink of the file at `path`, removing the file if writing fails.
    fn write_or_remove<W: Write>(
        &self,
        sink: W,
        document: &ExportDocument,
        path: &Path,
    ) -> Result<WriteSummary, ExportError> {
        self.writer(sink).write_document(document).map_err(|err| {
            if let Err(remove_err) = std::fs::remove_file(path) {
                log::warn!("Failed to remove incomplete output {path:?}: {remove_err}");
            }
            err.into()
        })
    }

    fn writer<W: Write>(&self, sink: W) -> KmlWriter<W> {
        KmlWriter::new(sink)
            .with_coordinate_format(self.config.coordinate_format)
            .with_geometry_insert(self.config.geometry_insert.clone())
    }
}

fn create_output(path: &Path) -> Result<File, ExportError> {
    let output_error = |source| ExportError::Output {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(output_error)?;
    }

    File::create(path).map_err(output_error)
}
