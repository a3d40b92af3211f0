//! RIS format parsing implementation.
//!
//! This module handles the low-level splitting of RIS and Endnote text into records.

use crate::Result;
use crate::ris::structure::RawRecord;
use crate::ris::tags::RisStyle;

const ENTRY_SEPARATOR: &str = "\n\n";

/// Parse the content of a RIS or Endnote file, returning its style and records.
pub(crate) fn ris_parse<S: AsRef<str>>(ris_text: S) -> Result<(RisStyle, Vec<RawRecord>)> {
    let text = ris_text.as_ref();
    let style = RisStyle::detect(text)?;

    let normalized = text.replace("\r\n", "\n");
    let records = split_entries(normalized.trim())
        .map(|entry| parse_entry(style, entry))
        .collect();

    Ok((style, records))
}

/// Split text on blank lines, dropping empty entries left by Endnote exports.
fn split_entries(data: &str) -> impl Iterator<Item = &str> {
    data.split(ENTRY_SEPARATOR)
        .filter(|entry| !entry.trim().is_empty())
}

/// Build a record from the lines of one entry. Unknown tags are ignored.
fn parse_entry(style: RisStyle, entry: &str) -> RawRecord {
    let mut record = RawRecord::new();
    for line in entry.split('\n') {
        let Some(tag) = line.get(..2) else {
            continue;
        };
        if let Some(field) = style.field_for_tag(tag) {
            record.set(field, content_from(line, style.content_offset()));
        }
    }
    record
}

/// Content of a line from a character offset; short lines yield an empty string.
fn content_from(line: &str, offset: usize) -> &str {
    line.char_indices()
        .nth(offset)
        .map_or("", |(index, _)| &line[index..])
}
