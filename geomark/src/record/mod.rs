//! Records are the input of an export.
//!
//! Every record source (a table, a collection of time series) exposes its items through the same [`FeatureRecord`]
//! trait, so the export engine does not know where the records come from.

use std::borrow::Cow;
use std::fmt::{Display, Formatter};

use crate::error::RecordError;

pub mod table;
pub mod time_series;

pub use table::{CsvTable, TableRow, TableSchema};
pub use time_series::{PropertyValue, TimeSeries, TimeSeriesCollection};

/// Value of a record field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    /// Text value.
    Text(Cow<'a, str>),
    /// Numeric value.
    Number(f64),
}

impl FieldValue<'_> {
    /// Returns the value as text.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Text(v) => Cow::Borrowed(v.as_ref()),
            FieldValue::Number(v) => Cow::Owned(v.to_string()),
        }
    }

    /// Returns the value as a finite number, parsing text values. `NaN` and infinities are not numbers here.
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            FieldValue::Text(v) => v.trim().parse().ok(),
            FieldValue::Number(v) => Some(*v),
        };
        value.filter(|v: &f64| v.is_finite())
    }
}

impl Display for FieldValue<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Text(v) => write!(f, "{v}"),
            FieldValue::Number(v) => write!(f, "{v}"),
        }
    }
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(Cow::Borrowed(value))
    }
}

impl From<f64> for FieldValue<'_> {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Built-in identity attributes a record may have in addition to its named fields.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum IdentityField {
    /// Location identifier of the entity.
    Location,
    /// Type of the data.
    DataType,
    /// Data interval.
    Interval,
    /// Descriptive label.
    Description,
}

/// A single input item of an export.
pub trait FeatureRecord {
    /// Returns value of the field with the given name.
    ///
    /// * `Ok(Some(_))` if the record has a value for the field.
    /// * `Ok(None)` if the field exists, but the record has no value in it.
    /// * `Err(RecordError::FieldNotFound)` if the record source does not have such a field at all.
    fn field(&self, name: &str) -> Result<Option<FieldValue<'_>>, RecordError>;

    /// Returns an identity attribute of the record, if the record has one.
    fn identity(&self, _field: IdentityField) -> Option<Cow<'_, str>> {
        None
    }

    /// Name of the placemark to use when no name source is configured.
    fn default_name(&self) -> Option<Cow<'_, str>> {
        self.identity(IdentityField::Location)
    }

    /// Description of the placemark to use when no description source is configured.
    fn default_description(&self) -> Option<Cow<'_, str>> {
        self.identity(IdentityField::Description)
    }
}

impl<T: FeatureRecord + ?Sized> FeatureRecord for &T {
    fn field(&self, name: &str) -> Result<Option<FieldValue<'_>>, RecordError> {
        (**self).field(name)
    }

    fn identity(&self, field: IdentityField) -> Option<Cow<'_, str>> {
        (**self).identity(field)
    }

    fn default_name(&self) -> Option<Cow<'_, str>> {
        (**self).default_name()
    }

    fn default_description(&self) -> Option<Cow<'_, str>> {
        (**self).default_description()
    }
}
