//! Time series record source.
//!
//! Only the identity and the properties of time series take part in an export, data values are not used.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{FeatureRecord, FieldValue, IdentityField};
use crate::error::{ExportError, RecordError};

/// Value of a time series property.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Numeric property.
    Number(f64),
    /// Text property.
    Text(String),
    /// Boolean property.
    Bool(bool),
}

impl PropertyValue {
    fn as_field_value(&self) -> FieldValue<'_> {
        match self {
            PropertyValue::Number(v) => FieldValue::Number(*v),
            PropertyValue::Text(v) => FieldValue::Text(Cow::Borrowed(v)),
            PropertyValue::Bool(v) => FieldValue::Text(Cow::Owned(v.to_string())),
        }
    }
}

/// Identity and properties of a single time series.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TimeSeries {
    /// Location identifier.
    pub location: String,
    /// Data type, e.g. `Streamflow`.
    #[serde(default)]
    pub data_type: String,
    /// Data interval, e.g. `Day`.
    #[serde(default)]
    pub interval: String,
    /// Descriptive label.
    #[serde(default)]
    pub description: String,
    /// Named properties, e.g. coordinates of the location. `null` values are stored as missing values.
    #[serde(default)]
    pub properties: BTreeMap<String, Option<PropertyValue>>,
}

impl TimeSeries {
    /// Creates a new time series without properties.
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            ..Default::default()
        }
    }

    /// Sets data type and interval of the series.
    pub fn with_type(mut self, data_type: impl Into<String>, interval: impl Into<String>) -> Self {
        self.data_type = data_type.into();
        self.interval = interval.into();
        self
    }

    /// Sets descriptive label of the series.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets a property value.
    pub fn with_property(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.insert(name.into(), Some(value));
        self
    }
}

fn non_empty(value: &str) -> Option<Cow<'_, str>> {
    (!value.is_empty()).then_some(Cow::Borrowed(value))
}

impl FeatureRecord for TimeSeries {
    /// Time series have no fixed schema, so a property that is not set is a missing value rather than an unknown
    /// field.
    fn field(&self, name: &str) -> Result<Option<FieldValue<'_>>, RecordError> {
        Ok(self
            .properties
            .get(name)
            .and_then(Option::as_ref)
            .map(PropertyValue::as_field_value))
    }

    fn identity(&self, field: IdentityField) -> Option<Cow<'_, str>> {
        match field {
            IdentityField::Location => non_empty(&self.location),
            IdentityField::DataType => non_empty(&self.data_type),
            IdentityField::Interval => non_empty(&self.interval),
            IdentityField::Description => non_empty(&self.description),
        }
    }
}

/// Ordered list of time series.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct TimeSeriesCollection {
    series: Vec<TimeSeries>,
}

impl TimeSeriesCollection {
    /// Creates a new collection.
    pub fn new(series: Vec<TimeSeries>) -> Self {
        Self { series }
    }

    /// Reads a JSON array of time series.
    pub fn from_json_reader(reader: impl Read) -> Result<Self, ExportError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Reads a JSON file with an array of time series.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ExportError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|err| ExportError::Source(format!("failed to open {path:?}: {err}")))?;
        Self::from_json_reader(BufReader::new(file))
    }

    /// Number of series in the collection.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Returns true if the collection has no series.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Iterates over the series in order. Series are always readable, so the iterator never returns errors; the
    /// item type matches the other record sources.
    pub fn records(&self) -> impl Iterator<Item = Result<&TimeSeries, RecordError>> + '_ {
        self.series.iter().map(Ok)
    }
}

impl FromIterator<TimeSeries> for TimeSeriesCollection {
    fn from_iter<T: IntoIterator<Item = TimeSeries>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
