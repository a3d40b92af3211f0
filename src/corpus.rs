//! Title and abstract corpus assembly.

use std::io::Write;
use std::path::Path;

use crate::Result;
use crate::ingest::Row;
use crate::output::create_exclusive;

/// Stand-in for a missing abstract.
pub const MISSING_ABSTRACT: &str = "-";

/// Joins title and abstract with a space, one entry per row.
///
/// A missing abstract becomes `"-"`; a missing title leaves the entry absent.
pub fn assemble(rows: &[Row]) -> Vec<Option<String>> {
    rows.iter()
        .map(|row| {
            let abstract_text = row.abstract_text.as_deref().unwrap_or(MISSING_ABSTRACT);
            row.title
                .as_deref()
                .map(|title| format!("{title} {abstract_text}"))
        })
        .collect()
}

/// Writes one unheadered text field per line; absent entries are written as `""`.
pub fn write_corpus<W: Write>(corpus: &[Option<String>], writer: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(writer);
    for entry in corpus {
        writer.write_record([entry.as_deref().unwrap_or("")])?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the corpus to a new file.
///
/// # Errors
///
/// Returns [`crate::ScoresError::OutputCollision`] if `path` already exists.
pub fn save(corpus: &[Option<String>], path: &Path) -> Result<()> {
    let file = create_exclusive(path)?;
    write_corpus(corpus, std::io::BufWriter::new(file))?;
    tracing::debug!("Corpus file saved as {}", path.display());
    Ok(())
}
