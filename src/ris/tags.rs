//! RIS and Endnote tags and the record fields they map to.
//!
//! Both styles use two-character tags at the start of each line. RIS lines
//! look like `TI  - Title` (content from offset 6), Endnote lines like
//! `%T Title` (content from offset 3).
//! See: http://en.wikipedia.org/wiki/RIS_(file_format)

use crate::{Result, ScoresError};

/// Tagged text dialect of an input blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RisStyle {
    /// `TY  - ` style RIS
    Ris,
    /// `%0 ` style Endnote tagged export
    Endnote,
}

/// Fields extracted from a tagged record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordField {
    Title,
    Abstract,
    Source,
    Year,
    Type,
}

impl RecordField {
    pub const ALL: [RecordField; 5] = [
        RecordField::Title,
        RecordField::Abstract,
        RecordField::Source,
        RecordField::Year,
        RecordField::Type,
    ];

    /// Column name used for this field in the `ris` registry entry.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordField::Title => "title",
            RecordField::Abstract => "abstract",
            RecordField::Source => "source",
            RecordField::Year => "year",
            RecordField::Type => "type",
        }
    }

    /// Inverse of [`RecordField::as_str`].
    pub fn from_name(name: &str) -> Option<Self> {
        RecordField::ALL.into_iter().find(|field| field.as_str() == name)
    }
}

impl RisStyle {
    /// Identifies the dialect from the first non-whitespace characters.
    ///
    /// # Errors
    ///
    /// Returns [`ScoresError::UnrecognizedFormat`] with the first 20 characters
    /// of `raw` when neither header is present.
    pub fn detect(raw: &str) -> Result<Self> {
        let head = raw.trim_start();
        if head.starts_with("TY  -") {
            tracing::debug!("RIS file format detected");
            Ok(RisStyle::Ris)
        } else if head.starts_with("%0") {
            tracing::debug!("Endnote file format detected");
            Ok(RisStyle::Endnote)
        } else {
            tracing::debug!("RIS format not identified");
            Err(ScoresError::unrecognized(raw))
        }
    }

    /// Character offset at which a line's content starts.
    pub fn content_offset(&self) -> usize {
        match self {
            RisStyle::Ris => 6,
            RisStyle::Endnote => 3,
        }
    }

    /// Convert a two-character tag to the field it fills, if any.
    pub fn field_for_tag(&self, tag: &str) -> Option<RecordField> {
        match (self, tag) {
            (RisStyle::Ris, "TI") | (RisStyle::Endnote, "%T") => Some(RecordField::Title),
            (RisStyle::Ris, "AB") | (RisStyle::Endnote, "%X") => Some(RecordField::Abstract),
            (RisStyle::Ris, "T2") | (RisStyle::Endnote, "%B") => Some(RecordField::Source),
            (RisStyle::Ris, "PY") | (RisStyle::Endnote, "%D") => Some(RecordField::Year),
            (RisStyle::Ris, "M3") | (RisStyle::Endnote, "%0") => Some(RecordField::Type),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("TY  - JOUR\nTI  - Title", RisStyle::Ris)]
    #[case("\n\nTY  - BOOK", RisStyle::Ris)]
    #[case("%0 Journal Article\n%T Title", RisStyle::Endnote)]
    fn test_detect(#[case] input: &str, #[case] expected: RisStyle) {
        assert_eq!(RisStyle::detect(input).unwrap(), expected);
    }

    #[rstest]
    #[case("PT J\tAU Smith")]
    #[case("Title,Abstract,Year")]
    #[case("TY - JOUR")]
    #[case("")]
    fn test_detect_unrecognized(#[case] input: &str) {
        assert!(matches!(
            RisStyle::detect(input),
            Err(ScoresError::UnrecognizedFormat { .. })
        ));
    }

    #[rstest]
    #[case(RisStyle::Ris, "TI", Some(RecordField::Title))]
    #[case(RisStyle::Ris, "T2", Some(RecordField::Source))]
    #[case(RisStyle::Ris, "M3", Some(RecordField::Type))]
    #[case(RisStyle::Ris, "TY", None)]
    #[case(RisStyle::Ris, "%T", None)]
    #[case(RisStyle::Endnote, "%X", Some(RecordField::Abstract))]
    #[case(RisStyle::Endnote, "%D", Some(RecordField::Year))]
    #[case(RisStyle::Endnote, "%A", None)]
    fn test_field_for_tag(
        #[case] style: RisStyle,
        #[case] tag: &str,
        #[case] expected: Option<RecordField>,
    ) {
        assert_eq!(style.field_for_tag(tag), expected);
    }

    #[test]
    fn test_field_names() {
        assert_eq!(RecordField::from_name("year"), Some(RecordField::Year));
        assert_eq!(RecordField::from_name("publisher"), None);
    }
}
