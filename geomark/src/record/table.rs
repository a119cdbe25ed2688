//! Table record source backed by a CSV file.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use csv::{ReaderBuilder, StringRecord, Trim};

use super::{FeatureRecord, FieldValue};
use crate::error::{ExportError, RecordError};

/// Column names of a table.
#[derive(Debug, Clone, Default)]
pub struct TableSchema {
    columns: HashMap<String, usize>,
}

impl TableSchema {
    /// Creates a schema from the header row of a table.
    pub fn new<'a>(headers: impl IntoIterator<Item = &'a str>) -> Self {
        let mut columns = HashMap::new();
        for (index, name) in headers.into_iter().enumerate() {
            // The first column wins if the header has duplicates.
            columns.entry(name.trim().to_string()).or_insert(index);
        }

        Self { columns }
    }

    /// Index of the column with the given name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.get(name).copied()
    }

    /// Returns true if the table has a column with the given name.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }
}

/// Single row of a table.
#[derive(Debug, Clone)]
pub struct TableRow {
    schema: Arc<TableSchema>,
    values: StringRecord,
}

impl TableRow {
    /// Creates a new row.
    pub fn new(schema: Arc<TableSchema>, values: StringRecord) -> Self {
        Self { schema, values }
    }
}

impl FeatureRecord for TableRow {
    fn field(&self, name: &str) -> Result<Option<FieldValue<'_>>, RecordError> {
        let index = self
            .schema
            .column_index(name)
            .ok_or_else(|| RecordError::FieldNotFound(name.to_string()))?;

        Ok(self
            .values
            .get(index)
            .filter(|value| !value.is_empty())
            .map(|value| FieldValue::Text(Cow::Borrowed(value))))
    }
}

/// Table read from CSV text.
///
/// The first row of the table is the header with column names. Lines starting with `#` are comments, leading and
/// trailing whitespace of every cell is ignored and empty cells are treated as missing values.
///
/// ```no_run
/// use geomark::record::CsvTable;
///
/// let mut table = CsvTable::from_path("stations", "stations.csv")?;
/// for row in table.rows() {
///     let row = row?;
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct CsvTable<R> {
    id: String,
    reader: csv::Reader<R>,
    schema: Arc<TableSchema>,
}

impl CsvTable<File> {
    /// Opens a CSV file.
    pub fn from_path(id: impl Into<String>, path: impl AsRef<Path>) -> Result<Self, ExportError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|err| ExportError::Source(format!("failed to open {path:?}: {err}")))?;
        Self::from_reader(id, file)
    }
}

impl<R: Read> CsvTable<R> {
    /// Reads a CSV table from the given reader with `,` as a delimiter.
    pub fn from_reader(id: impl Into<String>, reader: R) -> Result<Self, ExportError> {
        Self::with_delimiter(id, reader, b',')
    }

    /// Reads a CSV table from the given reader using a custom delimiter.
    pub fn with_delimiter(
        id: impl Into<String>,
        reader: R,
        delimiter: u8,
    ) -> Result<Self, ExportError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .comment(Some(b'#'))
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);
        let schema = Arc::new(TableSchema::new(reader.headers()?.iter()));

        Ok(Self {
            id: id.into(),
            reader,
            schema,
        })
    }

    /// Identifier of the table.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Column names of the table.
    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Iterates over the remaining rows of the table.
    ///
    /// A row that cannot be read is returned as an error, and the iteration continues with the next row.
    pub fn rows(&mut self) -> impl Iterator<Item = Result<TableRow, RecordError>> + '_ {
        let schema = self.schema.clone();
        self.reader.records().map(move |record| {
            record
                .map(|values| TableRow::new(schema.clone(), values))
                .map_err(RecordError::from)
        })
    }
}
