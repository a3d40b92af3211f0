//! Registry of the supported bibliographic export schemas.
//!
//! Every schema is described once, statically, by a [`SchemaDescriptor`]: how
//! its files are laid out and encoded, which columns hold the title and the
//! abstract, and which semantic [`ValueKey`]s it can be scored on.
//!
//! ```
//! use bibscores::registry::{self, ValueKey};
//!
//! let scopus = registry::lookup("scopus").unwrap();
//! assert_eq!(scopus.value_column(ValueKey::Py), Some("Year"));
//! assert_eq!(scopus.value_column(ValueKey::Nc), Some("Cited by"));
//! assert!(registry::lookup("pubmed").is_err());
//! ```

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::{Result, ScoresError};

/// Supported export schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Schema {
    /// Web of Science tab-delimited export
    Wos,
    /// Scopus CSV export
    Scopus,
    /// ProQuest spreadsheet export
    ProQuest,
    /// RIS or Endnote tagged text
    Ris,
}

impl Schema {
    /// All registered schemas in registry order.
    pub const ALL: [Schema; 4] = [Schema::Wos, Schema::Scopus, Schema::ProQuest, Schema::Ris];

    /// Short identifier used on the command line and in requests.
    pub fn as_str(&self) -> &'static str {
        match self {
            Schema::Wos => "wos",
            Schema::Scopus => "scopus",
            Schema::ProQuest => "proquest",
            Schema::Ris => "ris",
        }
    }

    /// The static descriptor for this schema.
    pub fn descriptor(&self) -> &'static SchemaDescriptor {
        match self {
            Schema::Wos => &WOS,
            Schema::Scopus => &SCOPUS,
            Schema::ProQuest => &PROQUEST,
            Schema::Ris => &RIS,
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Schema {
    type Err = ScoresError;

    fn from_str(s: &str) -> Result<Self> {
        Schema::ALL
            .into_iter()
            .find(|schema| schema.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ScoresError::UnknownSchema(s.to_string()))
    }
}

/// Semantic keys naming a metadata field independently of any schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKey {
    /// Publication year
    Py,
    /// Source (journal, book series)
    So,
    /// Publisher
    Pu,
    /// Document type
    Ty,
    /// Citation count
    Nc,
    /// Access type
    At,
}

impl ValueKey {
    pub const ALL: [ValueKey; 6] = [
        ValueKey::Py,
        ValueKey::So,
        ValueKey::Pu,
        ValueKey::Ty,
        ValueKey::Nc,
        ValueKey::At,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKey::Py => "py",
            ValueKey::So => "so",
            ValueKey::Pu => "pu",
            ValueKey::Ty => "ty",
            ValueKey::Nc => "nc",
            ValueKey::At => "at",
        }
    }

    /// Human readable label for choice lists.
    pub fn label(&self) -> &'static str {
        match self {
            ValueKey::Py => "Publication year",
            ValueKey::So => "Source",
            ValueKey::Pu => "Publisher",
            ValueKey::Ty => "Document type",
            ValueKey::Nc => "Citation count",
            ValueKey::At => "Access type",
        }
    }

    /// Whether values of this key can be bucketed into intervals.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ValueKey::Py | ValueKey::Nc)
    }
}

impl fmt::Display for ValueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueKey {
    type Err = ScoresError;

    fn from_str(s: &str) -> Result<Self> {
        ValueKey::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ScoresError::UnknownSchema(format!("value key '{s}'")))
    }
}

/// Character encoding of a schema's text files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// UTF-8, a leading byte-order mark is tolerated
    Utf8,
    /// UTF-8 with a byte-order mark expected
    Utf8Sig,
    /// UTF-16 little endian
    Utf16Le,
}

/// Quoting rule applied when reading delimited files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quoting {
    /// Quote characters are literal text
    None,
    /// Fields may be wrapped in double quotes
    All,
}

/// Physical layout of a schema's export files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Delimited text with a header row
    Delimited { separator: u8 },
    /// Spreadsheet workbook, or delimited text using `separator` when the file is not a workbook
    Spreadsheet { separator: u8 },
    /// Line-oriented tagged records (RIS/Endnote)
    Tagged,
}

/// Immutable parsing parameters of one export schema.
#[derive(Debug)]
pub struct SchemaDescriptor {
    pub schema: Schema,
    /// Display name
    pub name: &'static str,
    pub layout: Layout,
    pub encoding: TextEncoding,
    pub quoting: Quoting,
    /// Column holding the title
    pub title: &'static str,
    /// Column holding the abstract
    pub abstract_column: &'static str,
    values: &'static [(ValueKey, &'static str)],
}

/// Column names resolved once for a request: title, abstract and the scored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSelection {
    pub title: &'static str,
    pub abstract_column: &'static str,
    pub value: &'static str,
    pub key: ValueKey,
}

impl ColumnSelection {
    /// Column names in table order.
    pub fn names(&self) -> [&'static str; 3] {
        [self.title, self.abstract_column, self.value]
    }
}

impl SchemaDescriptor {
    /// Field separator, or `None` for line-oriented formats.
    pub fn separator(&self) -> Option<u8> {
        match self.layout {
            Layout::Delimited { separator } | Layout::Spreadsheet { separator } => Some(separator),
            Layout::Tagged => None,
        }
    }

    /// Native column (or RIS field) name for a semantic key, if supported.
    pub fn value_column(&self, key: ValueKey) -> Option<&'static str> {
        self.values
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, column)| *column)
    }

    /// Semantic keys this schema can be scored on.
    pub fn supported_values(&self) -> BTreeSet<ValueKey> {
        self.values.iter().map(|(key, _)| *key).collect()
    }

    /// Resolves the three columns a request needs.
    ///
    /// # Errors
    ///
    /// Returns [`ScoresError::UnsupportedValue`] when the schema has no column for `key`.
    pub fn columns(&self, key: ValueKey) -> Result<ColumnSelection> {
        let value = self
            .value_column(key)
            .ok_or_else(|| ScoresError::UnsupportedValue {
                schema: self.name.to_string(),
                value: key.to_string(),
            })?;
        Ok(ColumnSelection {
            title: self.title,
            abstract_column: self.abstract_column,
            value,
            key,
        })
    }
}

static WOS: SchemaDescriptor = SchemaDescriptor {
    schema: Schema::Wos,
    name: "Web of Science",
    layout: Layout::Delimited { separator: b'\t' },
    encoding: TextEncoding::Utf16Le,
    quoting: Quoting::None,
    title: "TI",
    abstract_column: "AB",
    values: &[
        (ValueKey::So, "SO"),
        (ValueKey::Py, "PY"),
        (ValueKey::Pu, "PU"),
        (ValueKey::Ty, "DT"),
        (ValueKey::Nc, "TC"),
    ],
};

static SCOPUS: SchemaDescriptor = SchemaDescriptor {
    schema: Schema::Scopus,
    name: "Scopus",
    layout: Layout::Delimited { separator: b',' },
    encoding: TextEncoding::Utf8,
    quoting: Quoting::All,
    title: "Title",
    abstract_column: "Abstract",
    values: &[
        (ValueKey::So, "Source title"),
        (ValueKey::Py, "Year"),
        (ValueKey::Pu, "Publisher"),
        (ValueKey::Ty, "Document Type"),
        (ValueKey::At, "Access Type"),
        (ValueKey::Nc, "Cited by"),
    ],
};

static PROQUEST: SchemaDescriptor = SchemaDescriptor {
    schema: Schema::ProQuest,
    name: "ProQuest",
    layout: Layout::Spreadsheet { separator: b'\t' },
    encoding: TextEncoding::Utf8,
    quoting: Quoting::All,
    title: "Title",
    abstract_column: "Abstract",
    values: &[
        (ValueKey::So, "pubtitle"),
        (ValueKey::Py, "year"),
        (ValueKey::Pu, "publisher"),
        (ValueKey::Ty, "ArticleType"),
    ],
};

static RIS: SchemaDescriptor = SchemaDescriptor {
    schema: Schema::Ris,
    name: "RIS/Endnote",
    layout: Layout::Tagged,
    encoding: TextEncoding::Utf8Sig,
    quoting: Quoting::All,
    title: "title",
    abstract_column: "abstract",
    values: &[
        (ValueKey::So, "source"),
        (ValueKey::Py, "year"),
        (ValueKey::Ty, "type"),
    ],
};

/// Looks up a schema descriptor by its identifier.
///
/// # Errors
///
/// Returns [`ScoresError::UnknownSchema`] for anything but `wos`, `scopus`,
/// `proquest` or `ris`.
pub fn lookup(schema_id: &str) -> Result<&'static SchemaDescriptor> {
    schema_id.parse::<Schema>().map(|schema| schema.descriptor())
}

/// Semantic keys a schema supports, for restricting user choices up front.
pub fn supported_values(schema: Schema) -> BTreeSet<ValueKey> {
    schema.descriptor().supported_values()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("wos", Schema::Wos, "Web of Science")]
    #[case("scopus", Schema::Scopus, "Scopus")]
    #[case("proquest", Schema::ProQuest, "ProQuest")]
    #[case("RIS", Schema::Ris, "RIS/Endnote")]
    fn test_lookup_known(#[case] id: &str, #[case] schema: Schema, #[case] name: &str) {
        let descriptor = lookup(id).unwrap();
        assert_eq!(descriptor.schema, schema);
        assert_eq!(descriptor.name, name);
    }

    #[rstest]
    #[case("auto")]
    #[case("pubmed")]
    #[case("")]
    fn test_lookup_unknown(#[case] id: &str) {
        assert!(matches!(lookup(id), Err(ScoresError::UnknownSchema(_))));
    }

    #[test]
    fn test_supported_values_differ_per_schema() {
        assert!(supported_values(Schema::Scopus).contains(&ValueKey::At));
        assert!(!supported_values(Schema::Wos).contains(&ValueKey::At));
        assert_eq!(
            supported_values(Schema::Ris),
            BTreeSet::from([ValueKey::Py, ValueKey::So, ValueKey::Ty])
        );
    }

    #[test]
    fn test_columns_unsupported_key() {
        let result = Schema::Ris.descriptor().columns(ValueKey::Pu);
        assert!(matches!(result, Err(ScoresError::UnsupportedValue { .. })));
    }

    #[test]
    fn test_columns_resolves_names() {
        let columns = Schema::Wos.descriptor().columns(ValueKey::Ty).unwrap();
        assert_eq!(columns.names(), ["TI", "AB", "DT"]);
    }

    #[test]
    fn test_separator() {
        assert_eq!(Schema::Wos.descriptor().separator(), Some(b'\t'));
        assert_eq!(Schema::Scopus.descriptor().separator(), Some(b','));
        assert_eq!(Schema::Ris.descriptor().separator(), None);
    }

    #[test]
    fn test_value_key_parse() {
        assert_eq!("PY".parse::<ValueKey>().unwrap(), ValueKey::Py);
        assert!("xx".parse::<ValueKey>().is_err());
        assert!(ValueKey::Nc.is_numeric());
        assert!(!ValueKey::So.is_numeric());
    }
}
