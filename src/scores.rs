//! One-hot score matrix generation.
//!
//! Each distinct (lowercased) value of the chosen column becomes one matrix
//! column; each row holds a single `1` in the column of its own value.
//! Missing values fall into the `n/a` column. Column names drop the
//! characters `[`, `]`, `<`, `>` and `_`, which delimit headers in the
//! downstream `score<...>` format, and are sorted lexicographically.
//!
//! The matrix is stored sparsely as one column index per row and only
//! expanded to zeros and ones when serialized.
//!
//! ```
//! use bibscores::scores::ScoreMatrix;
//!
//! let matrix = ScoreMatrix::generate(&[Some("Nature"), None, Some("nature")]);
//! assert_eq!(matrix.headers(), ["score<n/a>", "score<nature>"]);
//! assert_eq!(matrix.row(1), [1, 0]);
//! ```

use itertools::Itertools;
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use std::sync::LazyLock;

use crate::Result;
use crate::bucket::NOT_AVAILABLE;
use crate::output::create_exclusive;
use crate::regex::Regex;

static ILLEGAL_HEADER_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\[\]<>_]").unwrap());

/// Strips characters reserved by the `score<...>` header syntax.
pub fn sanitize(name: &str) -> String {
    ILLEGAL_HEADER_CHARS.replace_all(name, "").into_owned()
}

/// One-hot frequency table aligned with the rows of a unified table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreMatrix {
    /// Sanitized column names, sorted
    columns: Vec<String>,
    /// Column index holding the `1` of each row
    assignments: Vec<usize>,
}

impl ScoreMatrix {
    /// Builds the matrix from a value column.
    pub fn generate(values: &[Option<&str>]) -> Self {
        let folded: Vec<String> = values
            .iter()
            .map(|value| value.unwrap_or(NOT_AVAILABLE).to_lowercase())
            .collect();

        // Values whose sanitized names collide stay separate columns.
        let ordered: Vec<(&str, String)> = folded
            .iter()
            .map(String::as_str)
            .unique()
            .map(|value| (value, sanitize(value)))
            .sorted_by(|(a, a_name), (b, b_name)| a_name.cmp(b_name).then_with(|| a.cmp(b)))
            .collect();

        let index: HashMap<&str, usize> = ordered
            .iter()
            .enumerate()
            .map(|(i, (value, _))| (*value, i))
            .collect();
        let assignments = folded.iter().map(|value| index[value.as_str()]).collect();
        let columns = ordered.into_iter().map(|(_, name)| name).collect();

        Self {
            columns,
            assignments,
        }
    }

    /// Sanitized column names without the `score<...>` wrapper.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Column headers in the downstream `score<name>` convention.
    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|c| format!("score<{c}>")).collect()
    }

    pub fn row_count(&self) -> usize {
        self.assignments.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Column index of the `1` in `row`.
    pub fn assignment(&self, row: usize) -> Option<usize> {
        self.assignments.get(row).copied()
    }

    pub fn cell(&self, row: usize, column: usize) -> u8 {
        u8::from(self.assignment(row) == Some(column))
    }

    /// Dense cells of one row.
    pub fn row(&self, row: usize) -> Vec<u8> {
        (0..self.column_count()).map(|c| self.cell(row, c)).collect()
    }

    /// Number of rows holding each column's value.
    pub fn column_sums(&self) -> Vec<usize> {
        let mut sums = vec![0; self.columns.len()];
        for column in &self.assignments {
            sums[*column] += 1;
        }
        sums
    }

    /// Writes the tab-separated matrix with a header row and no index column.
    pub fn write_tsv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_writer(writer);

        writer.write_record(self.headers())?;
        let mut cells = vec!["0"; self.columns.len()];
        for column in &self.assignments {
            cells[*column] = "1";
            writer.write_record(&cells)?;
            cells[*column] = "0";
        }
        writer.flush()?;
        Ok(())
    }

    /// Writes the matrix to a new file.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ScoresError::OutputCollision`] if `path` already exists.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = create_exclusive(path)?;
        self.write_tsv(std::io::BufWriter::new(file))?;
        tracing::debug!("Scores file saved as {}", path.display());
        Ok(())
    }
}
