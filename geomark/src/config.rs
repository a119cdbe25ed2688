//! Export jobs described in JSON.
//!
//! ```json
//! {
//!   "source_id": "stations",
//!   "input": { "format": "table", "path": "stations.csv" },
//!   "output": "out/stations.kml",
//!   "longitude_field": "lon",
//!   "latitude_field": "lat",
//!   "name": { "template": "%L (%T)" },
//!   "style_file": "styles.kml",
//!   "style_url": "#gauge"
//! }
//! ```
//!
//! Relative paths in settings loaded with [`ExportSettings::from_path`] are resolved against the folder of the
//! settings file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::export::{ExportConfig, ExportConfigBuilder, ExportSummary, Exporter};
use crate::kml::MissingElevation;
use crate::placemark::TextSource;
use crate::record::{CsvTable, TimeSeriesCollection};

/// Record source of an export job.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum InputSettings {
    /// CSV table with a header row.
    Table {
        /// Path to the file.
        path: PathBuf,
        /// Column delimiter. Default is `,`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        delimiter: Option<char>,
    },
    /// JSON array of time series.
    TimeSeries {
        /// Path to the file.
        path: PathBuf,
    },
}

/// Source of a placemark text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextSettings {
    /// Value of the field with the given name.
    Field(String),
    /// Template with `%L`, `%T`, `%I`, `%D` and `${property:Name}` placeholders.
    Template(String),
}

impl From<TextSettings> for TextSource {
    fn from(value: TextSettings) -> Self {
        match value {
            TextSettings::Field(name) => TextSource::field(name),
            TextSettings::Template(template) => TextSource::template(template),
        }
    }
}

/// Complete description of an export job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ExportSettings {
    /// Identifier of the record source.
    pub source_id: String,
    /// Record source. Required to [`run`](Self::run) the job.
    #[serde(default)]
    pub input: Option<InputSettings>,
    /// Output file. Required to [`run`](Self::run) the job.
    #[serde(default)]
    pub output: Option<PathBuf>,
    /// Document title.
    #[serde(default)]
    pub title: Option<String>,
    /// Document description.
    #[serde(default)]
    pub description: Option<String>,
    /// Longitude field.
    #[serde(default)]
    pub longitude_field: Option<String>,
    /// Latitude field.
    #[serde(default)]
    pub latitude_field: Option<String>,
    /// Elevation field.
    #[serde(default)]
    pub elevation_field: Option<String>,
    /// Field with geometry in well-known text format.
    #[serde(default)]
    pub wkt_field: Option<String>,
    /// Placemark name source.
    #[serde(default)]
    pub name: Option<TextSettings>,
    /// Placemark description source.
    #[serde(default)]
    pub placemark_description: Option<TextSettings>,
    /// Raw markup inserted into every geometry element.
    #[serde(default)]
    pub geometry_insert: Option<String>,
    /// Inline style markup.
    #[serde(default)]
    pub style: Option<String>,
    /// File with style markup.
    #[serde(default)]
    pub style_file: Option<PathBuf>,
    /// Style reference of every placemark.
    #[serde(default)]
    pub style_url: Option<String>,
    /// Number of digits after the decimal point in coordinates.
    #[serde(default)]
    pub precision: Option<usize>,
    /// What to write for positions without elevation.
    #[serde(default)]
    pub missing_elevation: MissingElevation,
}

impl ExportSettings {
    /// Parses settings from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ExportError> {
        serde_json::from_str(json)
            .map_err(|err| ExportError::Configuration(format!("invalid settings: {err}")))
    }

    /// Reads settings from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ExportError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|err| {
            ExportError::Configuration(format!("failed to read settings {path:?}: {err}"))
        })?;

        let mut settings = Self::from_json_str(&json)?;
        if let Some(base) = path.parent() {
            settings.resolve_paths(base);
        }

        Ok(settings)
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };

        match &mut self.input {
            Some(InputSettings::Table { path, .. }) | Some(InputSettings::TimeSeries { path }) => {
                resolve(path)
            }
            None => {}
        }

        if let Some(output) = &mut self.output {
            resolve(output);
        }
        if let Some(style_file) = &mut self.style_file {
            resolve(style_file);
        }
    }

    /// Validates the settings and converts them into an export configuration.
    pub fn to_config(&self) -> Result<ExportConfig, ExportError> {
        let mut builder = ExportConfigBuilder::new(&self.source_id)
            .with_missing_elevation(self.missing_elevation);

        if let Some(title) = &self.title {
            builder = builder.with_title(title);
        }
        if let Some(description) = &self.description {
            builder = builder.with_description(description);
        }
        if let Some(field) = &self.longitude_field {
            builder = builder.with_longitude_field(field);
        }
        if let Some(field) = &self.latitude_field {
            builder = builder.with_latitude_field(field);
        }
        if let Some(field) = &self.elevation_field {
            builder = builder.with_elevation_field(field);
        }
        if let Some(field) = &self.wkt_field {
            builder = builder.with_wkt_field(field);
        }
        if let Some(name) = &self.name {
            builder = builder.with_name(name.clone().into());
        }
        if let Some(description) = &self.placemark_description {
            builder = builder.with_placemark_description(description.clone().into());
        }
        if let Some(insert) = &self.geometry_insert {
            builder = builder.with_geometry_insert(insert);
        }
        if let Some(style) = &self.style {
            builder = builder.with_inline_style(style);
        }
        if let Some(style_file) = &self.style_file {
            builder = builder.with_style_file(style_file);
        }
        if let Some(style_url) = &self.style_url {
            builder = builder.with_style_url(style_url);
        }
        if let Some(precision) = self.precision {
            builder = builder.with_precision(precision);
        }

        builder.build()
    }

    /// Runs the export job.
    pub fn run(&self) -> Result<ExportSummary, ExportError> {
        let config = self.to_config()?;
        let Some(input) = &self.input else {
            return Err(ExportError::Configuration("input is not set".into()));
        };
        let Some(output) = &self.output else {
            return Err(ExportError::Configuration("output is not set".into()));
        };

        let exporter = Exporter::new(config);
        match input {
            InputSettings::Table { path, delimiter } => {
                let delimiter = match delimiter {
                    None => b',',
                    Some(c) => u8::try_from(*c).map_err(|_| {
                        ExportError::Configuration(format!("delimiter '{c}' is not an ASCII character"))
                    })?,
                };
                let file = std::fs::File::open(path)
                    .map_err(|err| ExportError::Source(format!("failed to open {path:?}: {err}")))?;
                let mut table = CsvTable::with_delimiter(&self.source_id, file, delimiter)?;
                exporter.export_to_path(table.rows(), output)
            }
            InputSettings::TimeSeries { path } => {
                let collection = TimeSeriesCollection::from_path(path)?;
                exporter.export_to_path(collection.records(), output)
            }
        }
    }
}
