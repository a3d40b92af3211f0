//! Export schema auto-detection.
//!
//! The file extension decides first: `.xls` is ProQuest and `.csv` is Scopus.
//! Text exports (`.txt`, `.ris`) are shared by Web of Science and RIS/Endnote,
//! so their first line is probed under an ordered list of candidate encodings.
//! A probe that cannot decode the line simply hands over to the next one.
//!
//! ```
//! use bibscores::detect::detect_bytes;
//! use bibscores::Schema;
//!
//! assert_eq!(detect_bytes("export.xls", b""), Some(Schema::ProQuest));
//! assert_eq!(detect_bytes("savedrecs.txt", b"TY  - JOUR\n"), Some(Schema::Ris));
//! assert_eq!(detect_bytes("notes.md", b"TY  - JOUR\n"), None);
//! ```

use std::path::Path;

use crate::Schema;
use crate::ris::RisStyle;
use crate::utils::{DecodeError, first_line_utf8, first_line_utf16le};

/// Tagged result of one content probe.
#[derive(Debug, PartialEq, Eq)]
enum ProbeOutcome {
    Matched(Schema),
    Mismatch,
    Undecodable(DecodeError),
}

/// A candidate encoding paired with the header check valid under it.
struct Probe {
    encoding: &'static str,
    decode: fn(&[u8]) -> Result<String, DecodeError>,
    validate: fn(&str) -> Option<Schema>,
}

impl Probe {
    fn run(&self, bytes: &[u8]) -> ProbeOutcome {
        tracing::debug!("Trying {}...", self.encoding);
        match (self.decode)(bytes) {
            Ok(head) => {
                tracing::debug!(
                    "Beginning of file: {}",
                    head.chars().take(20).collect::<String>()
                );
                (self.validate)(&head).map_or(ProbeOutcome::Mismatch, ProbeOutcome::Matched)
            }
            Err(err) => ProbeOutcome::Undecodable(err),
        }
    }
}

const CONTENT_PROBES: [Probe; 2] = [
    Probe {
        encoding: "UTF-16-LE",
        decode: first_line_utf16le,
        validate: wos_header,
    },
    Probe {
        encoding: "UTF-8",
        decode: first_line_utf8,
        validate: ris_header,
    },
];

/// Web of Science exports start with a byte-order mark and the `PT` field tag.
fn wos_header(head: &str) -> Option<Schema> {
    head.starts_with("\u{feff}PT").then_some(Schema::Wos)
}

fn ris_header(head: &str) -> Option<Schema> {
    RisStyle::detect(head).ok().map(|_| Schema::Ris)
}

fn extension(file_name: &Path) -> Option<String> {
    file_name
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

/// Detects the schema of a file on disk.
///
/// Never fails: unreadable or unrecognised files yield `None` so the caller
/// can ask for an explicit schema.
pub fn detect(path: &Path) -> Option<Schema> {
    match extension(path).as_deref() {
        Some("xls") => return found(Schema::ProQuest),
        Some("csv") => return found(Schema::Scopus),
        Some("txt" | "ris") => {}
        _ => return not_found(),
    }

    match std::fs::read(path) {
        Ok(bytes) => probe_content(&bytes),
        Err(err) => {
            tracing::debug!("Could not read {}: {}", path.display(), err);
            not_found()
        }
    }
}

/// Detects the schema from a file name and its content.
pub fn detect_bytes(file_name: &str, bytes: &[u8]) -> Option<Schema> {
    match extension(Path::new(file_name)).as_deref() {
        Some("xls") => found(Schema::ProQuest),
        Some("csv") => found(Schema::Scopus),
        Some("txt" | "ris") => probe_content(bytes),
        _ => not_found(),
    }
}

fn probe_content(bytes: &[u8]) -> Option<Schema> {
    for probe in &CONTENT_PROBES {
        match probe.run(bytes) {
            ProbeOutcome::Matched(schema) => return found(schema),
            ProbeOutcome::Mismatch => tracing::debug!("Header not matched."),
            ProbeOutcome::Undecodable(err) => {
                tracing::debug!("Not readable as {}: {}", probe.encoding, err)
            }
        }
    }
    not_found()
}

fn found(schema: Schema) -> Option<Schema> {
    tracing::debug!("This looks like the format of {}.", schema.descriptor().name);
    Some(schema)
}

fn not_found() -> Option<Schema> {
    tracing::debug!("Failed to auto-detect format.");
    None
}
