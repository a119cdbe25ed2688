//! Document level style markup.

use std::path::PathBuf;

use crate::error::ExportError;

/// Source of the style block inserted once at the top of the document.
///
/// The markup is inserted verbatim, so it must already be a valid fragment for the document level (e.g. a list of KML
/// `<Style>` elements).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleSource {
    /// Markup given inline.
    Inline(String),
    /// Markup stored in a file.
    File(PathBuf),
}

impl StyleSource {
    /// Returns the style markup.
    ///
    /// A style file is read completely every time this method is called. Failing to read it is fatal for the export.
    pub fn provide(&self) -> Result<String, ExportError> {
        match self {
            StyleSource::Inline(markup) => Ok(markup.clone()),
            StyleSource::File(path) => {
                log::debug!("Reading style file {path:?}");
                std::fs::read_to_string(path).map_err(|source| ExportError::Style {
                    path: path.clone(),
                    source,
                })
            }
        }
    }
}

/// Returns the style block for an export, or `None` if no style is configured.
pub fn provide_style(source: Option<&StyleSource>) -> Result<Option<String>, ExportError> {
    source.map(StyleSource::provide).transpose()
}
