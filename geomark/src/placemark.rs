//! Placemark names and descriptions.
//!
//! Name and description of a placemark can be taken either verbatim from a record field ([`TextSource::Field`]) or
//! produced from a [`Template`]. When neither is configured, the record's own defaults are used (location and label
//! of a time series), and the source identifier and an empty description after that.

use std::borrow::Cow;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use geomark_types::Shape;
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::RecordError;
use crate::record::{FeatureRecord, IdentityField};

lazy_static! {
    static ref PLACEHOLDER: Regex =
        Regex::new(r"%([LTID])|\$\{property:([^}]+)\}").expect("valid placeholder regex");
}

/// Text written into the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextContent {
    /// Plain text, markup characters are escaped when written.
    Plain(String),
    /// Text that contains markup of its own (e.g. HTML). It is written as opaque character data so that it cannot
    /// break the structure of the document.
    Markup(String),
}

impl TextContent {
    /// Classifies the text: text starting with `<` (ignoring leading whitespace) is markup, anything else is plain.
    pub fn classify(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.trim_start().starts_with('<') {
            Self::Markup(text)
        } else {
            Self::Plain(text)
        }
    }

    /// The text itself.
    pub fn as_str(&self) -> &str {
        match self {
            TextContent::Plain(v) | TextContent::Markup(v) => v,
        }
    }
}

impl Default for TextContent {
    fn default() -> Self {
        Self::Plain(String::new())
    }
}

/// A named, described feature of the output document.
#[derive(Debug, Clone, PartialEq)]
pub struct Placemark {
    /// Display name.
    pub name: String,
    /// Description.
    pub description: TextContent,
    /// Geometry. Placemarks without geometry are not written.
    pub geometry: Option<Shape>,
    /// Reference to a style of the document.
    pub style_url: Option<String>,
}

/// Template for placemark text.
///
/// Recognized placeholders:
/// * `%L` - location identifier,
/// * `%T` - data type,
/// * `%I` - data interval,
/// * `%D` - descriptive label,
/// * `${property:Name}` - value of the field or property `Name`.
///
/// Any other `%` sequence is copied verbatim. Placeholders the record has no value for are replaced with an empty
/// string.
///
/// ```
/// use geomark::placemark::Template;
/// use geomark::record::TimeSeries;
///
/// let template: Template = "%L (%T, %I)".parse().unwrap();
/// let series = TimeSeries::new("08223000").with_type("Streamflow", "Day");
/// assert_eq!(template.render(&series).unwrap(), "08223000 (Streamflow, Day)");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Identity(IdentityField),
    Property(String),
}

impl Template {
    /// Parses a template.
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let mut segments = vec![];
        let mut last = 0;

        for captures in PLACEHOLDER.captures_iter(&source) {
            let Some(placeholder) = captures.get(0) else {
                continue;
            };
            if placeholder.start() > last {
                segments.push(Segment::Literal(
                    source[last..placeholder.start()].to_string(),
                ));
            }

            let segment = match (captures.get(1), captures.get(2)) {
                (Some(code), _) => match code.as_str() {
                    "L" => Segment::Identity(IdentityField::Location),
                    "T" => Segment::Identity(IdentityField::DataType),
                    "I" => Segment::Identity(IdentityField::Interval),
                    _ => Segment::Identity(IdentityField::Description),
                },
                (None, Some(property)) => Segment::Property(property.as_str().to_string()),
                (None, None) => Segment::Literal(placeholder.as_str().to_string()),
            };
            segments.push(segment);
            last = placeholder.end();
        }

        if last < source.len() {
            segments.push(Segment::Literal(source[last..].to_string()));
        }

        Self { source, segments }
    }

    /// Template text as it was given.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Substitutes placeholders with values of the record.
    pub fn render(&self, record: &impl FeatureRecord) -> Result<String, RecordError> {
        let mut result = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(v) => result.push_str(v),
                Segment::Identity(field) => {
                    if let Some(v) = record.identity(*field) {
                        result.push_str(&v);
                    }
                }
                Segment::Property(name) => {
                    if let Some(v) = record.field(name)? {
                        result.push_str(&v.as_text());
                    }
                }
            }
        }

        Ok(result)
    }
}

impl FromStr for Template {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl Display for Template {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

/// Where a placemark text comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum TextSource {
    /// Verbatim value of a field.
    Field(String),
    /// Template filled with record values.
    Template(Template),
}

impl TextSource {
    /// Text is the value of the given field.
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(name.into())
    }

    /// Text is produced by the given template.
    pub fn template(template: impl Into<String>) -> Self {
        Self::Template(Template::new(template))
    }

    fn render(&self, record: &impl FeatureRecord) -> Result<String, RecordError> {
        match self {
            TextSource::Field(name) => Ok(record
                .field(name)?
                .map(|v| v.as_text().into_owned())
                .unwrap_or_default()),
            TextSource::Template(template) => template.render(record),
        }
    }
}

/// Name and description of a placemark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacemarkText {
    /// Display name.
    pub name: String,
    /// Description.
    pub description: TextContent,
}

/// Computes placemark names and descriptions.
#[derive(Debug, Clone)]
pub struct PlacemarkFormatter {
    source_id: String,
    name: Option<TextSource>,
    description: Option<TextSource>,
}

impl PlacemarkFormatter {
    /// Creates a new formatter. `source_id` is used as the name of placemarks when neither a name source is
    /// configured nor the record has a name of its own.
    pub fn new(
        source_id: impl Into<String>,
        name: Option<TextSource>,
        description: Option<TextSource>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            name,
            description,
        }
    }

    /// Formats name and description for the record.
    pub fn format(&self, record: &impl FeatureRecord) -> Result<PlacemarkText, RecordError> {
        let name = match &self.name {
            Some(source) => source.render(record)?,
            None => record
                .default_name()
                .unwrap_or(Cow::Borrowed(self.source_id.as_str()))
                .into_owned(),
        };

        let description = match &self.description {
            Some(source) => source.render(record)?,
            None => record
                .default_description()
                .map(Cow::into_owned)
                .unwrap_or_default(),
        };

        Ok(PlacemarkText {
            name,
            description: TextContent::classify(description),
        })
    }
}
