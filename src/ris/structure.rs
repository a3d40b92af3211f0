//! RIS format data structures.
//!
//! This module defines the intermediate record produced by the tagged-text parser.
//!
//! # Design Decision
//!
//! ## Field Processing Strategy
//! - **Last-wins**: a tag repeated within one record overwrites the earlier value
//! - **Blank is missing**: a tag with no content leaves the field missing

use crate::ris::tags::RecordField;
use serde::Serialize;

/// One bibliographic entry as extracted from a tagged file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RawRecord {
    pub title: Option<String>,
    pub abstract_text: Option<String>,
    pub source: Option<String>,
    pub year: Option<String>,
    pub record_type: Option<String>,
}

impl RawRecord {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, field: RecordField) -> &mut Option<String> {
        match field {
            RecordField::Title => &mut self.title,
            RecordField::Abstract => &mut self.abstract_text,
            RecordField::Source => &mut self.source,
            RecordField::Year => &mut self.year,
            RecordField::Type => &mut self.record_type,
        }
    }

    /// Store a value for a field, replacing any earlier occurrence.
    pub(crate) fn set(&mut self, field: RecordField, value: &str) {
        *self.slot(field) = (!value.is_empty()).then(|| value.to_string());
    }

    /// Get the value of a field, if present.
    pub fn get(&self, field: RecordField) -> Option<&str> {
        match field {
            RecordField::Title => self.title.as_deref(),
            RecordField::Abstract => self.abstract_text.as_deref(),
            RecordField::Source => self.source.as_deref(),
            RecordField::Year => self.year.as_deref(),
            RecordField::Type => self.record_type.as_deref(),
        }
    }

    /// Take ownership of a value by its registry column name
    /// (`title`, `abstract`, `source`, `year`, `type`).
    ///
    /// Names without a counterpart, such as `publisher`, are always missing.
    pub(crate) fn take_column(&mut self, name: &str) -> Option<String> {
        RecordField::from_name(name).and_then(|field| self.slot(field).take())
    }
}
