//! RIS/Endnote tagged text parser.
//!
//! Provides functionality to split RIS (`TY  - `) or Endnote (`%0 `) exports
//! into records holding title, abstract, source, year and type.
//!
//! # Example
//!
//! ```
//! use bibscores::RisParser;
//!
//! let input = r#"TY  - JOUR
//! TI  - Example Title
//! PY  - 2020
//! ER  -"#;
//!
//! let records = RisParser::new().parse(input).unwrap();
//! assert_eq!(records[0].title.as_deref(), Some("Example Title"));
//! assert_eq!(records[0].year.as_deref(), Some("2020"));
//! ```

mod parse;
mod structure;
mod tags;

pub use structure::RawRecord;
pub use tags::{RecordField, RisStyle};

use crate::registry::TextEncoding;
use crate::utils::decode_text;
use crate::{Result, ScoresError};
use parse::ris_parse;
use std::path::Path;

/// Parser for RIS and Endnote tagged exports.
///
/// Records are separated by a blank line; each line starts with a
/// two-character tag.
#[derive(Debug, Default, Clone)]
pub struct RisParser {}

impl RisParser {
    /// Creates a new RIS parser instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses decoded text into records.
    ///
    /// # Errors
    ///
    /// Returns [`ScoresError::UnrecognizedFormat`] if the text starts with
    /// neither a RIS nor an Endnote header.
    pub fn parse(&self, input: &str) -> Result<Vec<RawRecord>> {
        self.parse_with_style(input).map(|(_, records)| records)
    }

    /// Like [`RisParser::parse`], also reporting which dialect was found.
    pub fn parse_with_style(&self, input: &str) -> Result<(RisStyle, Vec<RawRecord>)> {
        let input = input.strip_prefix('\u{feff}').unwrap_or(input);
        ris_parse(input)
    }

    /// Reads a UTF-8 file (byte-order mark optional) and parses it.
    pub fn parse_file(&self, path: &Path) -> Result<Vec<RawRecord>> {
        let bytes = std::fs::read(path)?;
        let text = decode_text(&bytes, TextEncoding::Utf8Sig)
            .map_err(|err| ScoresError::ingestion(path, err))?;
        let (style, records) = self.parse_with_style(&text)?;
        tracing::debug!(
            "Parsed {} {:?} records from {}",
            records.len(),
            style,
            path.display()
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_simple_ris() {
        let input = r#"TY  - JOUR
TI  - Test Article Title
AU  - Smith, John
T2  - Test Journal
PY  - 2023
M3  - Article
AB  - This is a test abstract.
KW  - Keyword1
ER  -
"#;
        let records = RisParser::new().parse(input).unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.title.as_deref(), Some("Test Article Title"));
        assert_eq!(record.source.as_deref(), Some("Test Journal"));
        assert_eq!(record.year.as_deref(), Some("2023"));
        assert_eq!(record.record_type.as_deref(), Some("Article"));
        assert_eq!(
            record.abstract_text.as_deref(),
            Some("This is a test abstract.")
        );
    }

    #[test]
    fn test_parse_with_bom() {
        let input = "\u{feff}%0 Journal Article\n%T Title\n";
        let (style, records) = RisParser::new().parse_with_style(input).unwrap();
        assert_eq!(style, RisStyle::Endnote);
        assert_eq!(records[0].title.as_deref(), Some("Title"));
    }

    #[test]
    fn test_parse_empty_input() {
        let result = RisParser::new().parse("");
        assert!(matches!(result, Err(ScoresError::UnrecognizedFormat { .. })));
    }

    #[test]
    fn test_parse_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.ris");
        std::fs::write(&path, b"\xEF\xBB\xBFTY  - JOUR\nTI  - From disk\n").unwrap();

        let records = RisParser::new().parse_file(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title.as_deref(), Some("From disk"));
    }
}
