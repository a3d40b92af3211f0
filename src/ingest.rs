//! Record ingestion into one unified table.
//!
//! Every supported export is reduced to rows of title, abstract and the
//! value chosen for scoring. The columns are resolved once from the schema
//! descriptor when the [`Ingestor`] is built, so an unsupported value key is
//! rejected before any file is opened.
//!
//! # Example
//!
//! ```no_run
//! use bibscores::ingest::Ingestor;
//! use bibscores::{Schema, ValueKey};
//!
//! let ingestor = Ingestor::new(Schema::Scopus, ValueKey::Py).unwrap();
//! let table = ingestor.ingest(&["scopus_1.csv", "scopus_2.csv"]).unwrap();
//! println!("{} records", table.len());
//! ```

use csv::ReaderBuilder;
use serde::Serialize;
use std::path::Path;

use crate::registry::{ColumnSelection, Layout, Quoting, SchemaDescriptor};
use crate::utils::decode_text;
use crate::{Result, RisParser, Schema, ScoresError, ValueKey};

/// One normalised record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Row {
    pub title: Option<String>,
    pub abstract_text: Option<String>,
    pub value: Option<String>,
}

impl Row {
    pub fn new(title: Option<&str>, abstract_text: Option<&str>, value: Option<&str>) -> Self {
        Self {
            title: title.map(String::from),
            abstract_text: abstract_text.map(String::from),
            value: value.map(String::from),
        }
    }
}

/// Rows accumulated across all input files of one request, in read order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UnifiedTable {
    rows: Vec<Row>,
}

impl UnifiedTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// The value column, in row order.
    pub fn values(&self) -> Vec<Option<&str>> {
        self.rows.iter().map(|row| row.value.as_deref()).collect()
    }

    /// Replaces the value column, e.g. with interval labels.
    ///
    /// # Errors
    ///
    /// Returns [`ScoresError::InvalidValue`] if `values` is not aligned with the rows.
    pub fn set_values(&mut self, values: Vec<String>) -> Result<()> {
        if values.len() != self.rows.len() {
            return Err(ScoresError::InvalidValue {
                value: format!("{} values", values.len()),
                message: format!("expected one value for each of {} rows", self.rows.len()),
            });
        }
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.value = Some(value);
        }
        Ok(())
    }

    /// Number of rows without a value.
    pub fn missing_values(&self) -> usize {
        self.rows.iter().filter(|row| row.value.is_none()).count()
    }

    /// Number of rows without an abstract.
    pub fn missing_abstracts(&self) -> usize {
        self.rows.iter().filter(|row| row.abstract_text.is_none()).count()
    }
}

impl FromIterator<Row> for UnifiedTable {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl Extend<Row> for UnifiedTable {
    fn extend<I: IntoIterator<Item = Row>>(&mut self, iter: I) {
        self.rows.extend(iter);
    }
}

/// Reads export files of one schema into a [`UnifiedTable`].
#[derive(Debug, Clone)]
pub struct Ingestor {
    descriptor: &'static SchemaDescriptor,
    columns: ColumnSelection,
}

impl Ingestor {
    /// Creates an ingestor for `schema`, scoring on `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ScoresError::UnsupportedValue`] if the schema has no column for `key`.
    pub fn new(schema: Schema, key: ValueKey) -> Result<Self> {
        let descriptor = schema.descriptor();
        let columns = descriptor.columns(key)?;
        Ok(Self {
            descriptor,
            columns,
        })
    }

    pub fn columns(&self) -> &ColumnSelection {
        &self.columns
    }

    /// Reads all files in order and concatenates their rows.
    ///
    /// Every file is attempted and failures are logged per file; any failure
    /// makes the whole ingestion fail with the first error.
    pub fn ingest<P: AsRef<Path>>(&self, files: &[P]) -> Result<UnifiedTable> {
        let mut table = UnifiedTable::new();
        let mut first_error = None;

        for path in files {
            let path = path.as_ref();
            tracing::debug!(
                "Adding {} file to table: {}",
                self.descriptor.schema,
                path.display()
            );
            match self.read_file(path) {
                Ok(rows) => {
                    tracing::debug!("{} rows read from {}", rows.len(), path.display());
                    table.extend(rows);
                }
                Err(err) => {
                    let err = match err {
                        ScoresError::Ingestion { .. } => err,
                        other => ScoresError::ingestion(path, other),
                    };
                    tracing::error!("{}", err);
                    first_error.get_or_insert(err);
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(table),
        }
    }

    fn read_file(&self, path: &Path) -> Result<Vec<Row>> {
        match self.descriptor.layout {
            Layout::Tagged => self.read_tagged(path),
            Layout::Delimited { separator } => {
                let bytes = std::fs::read(path)?;
                let text = decode_text(&bytes, self.descriptor.encoding)
                    .map_err(|err| ScoresError::ingestion(path, err))?;
                self.read_delimited(&text, separator)
            }
            Layout::Spreadsheet { separator } => self.read_spreadsheet(path, separator),
        }
    }

    fn read_tagged(&self, path: &Path) -> Result<Vec<Row>> {
        let records = RisParser::new().parse_file(path)?;
        Ok(records
            .into_iter()
            .map(|mut record| Row {
                title: record.take_column(self.columns.title),
                abstract_text: record.take_column(self.columns.abstract_column),
                value: record.take_column(self.columns.value),
            })
            .collect())
    }

    /// Reads delimited text with a header row, keeping the three selected columns.
    fn read_delimited(&self, text: &str, separator: u8) -> Result<Vec<Row>> {
        let mut reader = ReaderBuilder::new()
            .delimiter(separator)
            .quoting(self.descriptor.quoting == Quoting::All)
            .flexible(true)
            .from_reader(text.as_bytes());

        let positions = self.column_positions(reader.headers()?.iter())?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let [title, abstract_text, value] = positions.map(|i| cell(record.get(i)));
            rows.push(Row {
                title,
                abstract_text,
                value,
            });
        }
        Ok(rows)
    }

    #[cfg(feature = "xls")]
    fn read_spreadsheet(&self, path: &Path, separator: u8) -> Result<Vec<Row>> {
        use calamine::{Reader, open_workbook_auto};

        let mut workbook = match open_workbook_auto(path) {
            Ok(workbook) => workbook,
            Err(err) => {
                tracing::debug!(
                    "{} is not a workbook ({}), reading as delimited text",
                    path.display(),
                    err
                );
                return self.read_spreadsheet_text(path, separator);
            }
        };

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| ScoresError::ingestion(path, "workbook has no worksheets"))?
            .map_err(|err| ScoresError::ingestion(path, err))?;

        let mut sheet_rows = range.rows();
        let header: Vec<String> = sheet_rows
            .next()
            .map(|cells| cells.iter().map(|c| c.to_string()).collect())
            .unwrap_or_default();
        let positions = self.column_positions(header.iter().map(String::as_str))?;

        Ok(sheet_rows
            .map(|cells| {
                let [title, abstract_text, value] =
                    positions.map(|i| cells.get(i).and_then(workbook_cell));
                Row {
                    title,
                    abstract_text,
                    value,
                }
            })
            .collect())
    }

    #[cfg(not(feature = "xls"))]
    fn read_spreadsheet(&self, path: &Path, separator: u8) -> Result<Vec<Row>> {
        self.read_spreadsheet_text(path, separator)
    }

    fn read_spreadsheet_text(&self, path: &Path, separator: u8) -> Result<Vec<Row>> {
        let bytes = std::fs::read(path)?;
        let text = decode_text(&bytes, self.descriptor.encoding)
            .map_err(|err| ScoresError::ingestion(path, err))?;
        self.read_delimited(&text, separator)
    }

    /// Finds the title, abstract and value columns in a header row.
    fn column_positions<'a>(&self, headers: impl Iterator<Item = &'a str>) -> Result<[usize; 3]> {
        let headers: Vec<&str> = headers.collect();
        let wanted = self.columns.names();
        let found = wanted.map(|name| headers.iter().position(|h| *h == name));

        if let [Some(title), Some(abstract_text), Some(value)] = found {
            return Ok([title, abstract_text, value]);
        }

        let missing: Vec<&str> = wanted
            .iter()
            .zip(found)
            .filter(|(_, position)| position.is_none())
            .map(|(name, _)| *name)
            .collect();
        Err(ScoresError::InvalidValue {
            value: missing.join(", "),
            message: format!(
                "columns expected but not found in {} header",
                self.descriptor.name
            ),
        })
    }
}

/// Empty cells are missing values.
fn cell(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(String::from)
}

#[cfg(feature = "xls")]
fn workbook_cell(value: &calamine::Data) -> Option<String> {
    use calamine::Data;

    match value {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(s.clone()),
        Data::Float(f) => Some(crate::utils::format_number(*f)),
        Data::Int(i) => Some(i.to_string()),
        other => Some(other.to_string()),
    }
}

/// Reads `files` of `schema` into one table scored on `key`.
pub fn ingest<P: AsRef<Path>>(files: &[P], schema: Schema, key: ValueKey) -> Result<UnifiedTable> {
    Ingestor::new(schema, key)?.ingest(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn utf16le(text: &str) -> Vec<u8> {
        text.encode_utf16().flat_map(u16::to_le_bytes).collect()
    }

    fn write(dir: &TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_ingest_scopus_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "scopus.csv",
            "\u{feff}\"Authors\",\"Title\",\"Year\",\"Source title\",\"Abstract\"\n\
             \"Smith J.\",\"First, with comma\",\"2020\",\"Journal A\",\"Abstract one\"\n\
             \"Doe J.\",\"Second\",\"2021\",\"Journal B\",\"\"\n"
                .as_bytes(),
        );

        let table = ingest(&[&path], Schema::Scopus, ValueKey::So).unwrap();
        assert_eq!(
            table.rows(),
            &[
                Row::new(Some("First, with comma"), Some("Abstract one"), Some("Journal A")),
                Row::new(Some("Second"), None, Some("Journal B")),
            ]
        );
        assert_eq!(table.missing_abstracts(), 1);
    }

    #[test]
    fn test_ingest_wos_utf16_trailing_tabs() {
        let dir = tempfile::tempdir().unwrap();
        let content = "\u{feff}PT\tAU\tTI\tSO\tAB\tPY\t\n\
                       J\tSmith, J\tA \"quoted\" title\tJOURNAL A\tSome abstract\t2019\t\n\
                       J\tDoe, J\tOther title\tJOURNAL B\t\t\t\n";
        let path = write(&dir, "savedrecs.txt", &utf16le(content));

        let table = ingest(&[&path], Schema::Wos, ValueKey::Py).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].title.as_deref(), Some("A \"quoted\" title"));
        assert_eq!(table.values(), vec![Some("2019"), None]);
        assert_eq!(table.missing_values(), 1);
    }

    #[test]
    fn test_ingest_ris_projects_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "export.ris",
            b"TY  - JOUR\nTI  - One\nAB  - Abs\nT2  - Src\nPY  - 2020\n\n\
              TY  - JOUR\nTI  - Two\nPY  - 2021\n",
        );

        let table = ingest(&[&path], Schema::Ris, ValueKey::Py).unwrap();
        assert_eq!(
            table.rows(),
            &[
                Row::new(Some("One"), Some("Abs"), Some("2020")),
                Row::new(Some("Two"), None, Some("2021")),
            ]
        );
    }

    #[test]
    fn test_ingest_proquest_text_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "ProQuestDocuments.xls",
            b"Title\tAbstract\tyear\tpubtitle\nA study\tAbout it\t2018\tReview\n",
        );

        let table = ingest(&[&path], Schema::ProQuest, ValueKey::Py).unwrap();
        assert_eq!(
            table.rows(),
            &[Row::new(Some("A study"), Some("About it"), Some("2018"))]
        );
    }

    #[cfg(feature = "xls")]
    #[test]
    fn test_ingest_proquest_workbook() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join("proquest.xlsx");

        let table = ingest(&[&path], Schema::ProQuest, ValueKey::Py).unwrap();
        assert_eq!(
            table.rows(),
            &[
                Row::new(Some("A study"), Some("About it"), Some("2018")),
                Row::new(Some("Untitled abstract"), None, Some("2020")),
            ]
        );
    }

    #[cfg(feature = "xls")]
    #[test]
    fn test_workbook_cell() {
        use calamine::Data;

        assert_eq!(workbook_cell(&Data::Float(2020.0)), Some("2020".to_string()));
        assert_eq!(workbook_cell(&Data::Float(2.5)), Some("2.5".to_string()));
        assert_eq!(workbook_cell(&Data::Int(3)), Some("3".to_string()));
        assert_eq!(workbook_cell(&Data::String("Review".into())), Some("Review".to_string()));
        assert_eq!(workbook_cell(&Data::String(String::new())), None);
        assert_eq!(workbook_cell(&Data::Empty), None);
    }

    #[test]
    fn test_ingest_concatenates_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = write(&dir, "a.csv", b"Title,Abstract,Year\nA,x,2001\n");
        let second = write(&dir, "b.csv", b"Title,Abstract,Year\nB,y,2002\nC,z,2003\n");

        let table = ingest(&[&first, &second], Schema::Scopus, ValueKey::Py).unwrap();
        let titles: Vec<_> = table.rows().iter().map(|r| r.title.as_deref()).collect();
        assert_eq!(titles, vec![Some("A"), Some("B"), Some("C")]);
    }

    #[test]
    fn test_ingest_wrong_schema_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "scopus.csv", b"Title,Abstract,Year\nA,x,2001\n");

        let result = ingest(&[&path], Schema::Scopus, ValueKey::Pu);
        match result {
            Err(ScoresError::Ingestion { file, message }) => {
                assert_eq!(file, path);
                assert!(message.contains("Publisher"));
            }
            other => panic!("expected ingestion error, got {other:?}"),
        }
    }

    #[test]
    fn test_ingest_one_bad_file_fails_all() {
        let dir = tempfile::tempdir().unwrap();
        let good = write(&dir, "good.ris", b"TY  - JOUR\nTI  - One\n");
        let bad = write(&dir, "bad.ris", b"PMID- 123\n");

        let result = ingest(&[&good, &bad], Schema::Ris, ValueKey::Py);
        assert!(matches!(result, Err(ScoresError::Ingestion { file, .. }) if file == bad));
    }

    #[test]
    fn test_unsupported_key_rejected_up_front() {
        let result = Ingestor::new(Schema::Ris, ValueKey::Pu);
        assert!(matches!(result, Err(ScoresError::UnsupportedValue { .. })));
    }

    #[test]
    fn test_set_values_must_align() {
        let mut table: UnifiedTable = vec![Row::new(Some("A"), None, Some("2020"))]
            .into_iter()
            .collect();
        assert!(table.set_values(vec![]).is_err());
        table.set_values(vec!["2020-2022".to_string()]).unwrap();
        assert_eq!(table.values(), vec![Some("2020-2022")]);
    }
}
