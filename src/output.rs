//! Output file naming and creation.
//!
//! Names are built as `<base><NN><suffix>.<extension>` with a zero-padded
//! counter starting at 1, incremented until no file of that name exists.
//! Picking a name is not a reservation: files are created with
//! [`create_exclusive`], which fails instead of overwriting when another
//! writer got there first.

use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{Result, ScoresError};

/// Generates collision-free numbered file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputNamer {
    digits: usize,
}

impl Default for OutputNamer {
    fn default() -> Self {
        Self { digits: 2 }
    }
}

impl OutputNamer {
    #[must_use]
    pub fn new(digits: usize) -> Self {
        Self { digits }
    }

    /// Name for counter value `number`.
    pub fn numbered(&self, base: &Path, number: u32, suffix: &str, extension: &str) -> PathBuf {
        let mut name = OsString::from(base.as_os_str());
        name.push(format!(
            "{number:0width$}{suffix}.{extension}",
            width = self.digits
        ));
        PathBuf::from(name)
    }

    /// First numbered name that does not exist yet.
    pub fn next_available(&self, base: &Path, suffix: &str, extension: &str) -> PathBuf {
        let mut number = 1;
        let mut path = self.numbered(base, number, suffix, extension);
        while path.exists() {
            number += 1;
            path = self.numbered(base, number, suffix, extension);
        }
        tracing::debug!("File named \"{}\".", path.display());
        path
    }
}

/// First free `<base><NN><suffix>.<extension>` with a two-digit counter.
pub fn next_available_name(base: &Path, suffix: &str, extension: &str) -> PathBuf {
    OutputNamer::default().next_available(base, suffix, extension)
}

/// Creates a file that must not exist yet.
///
/// # Errors
///
/// Returns [`ScoresError::OutputCollision`] if the file already exists.
pub fn create_exclusive(path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|err| match err.kind() {
            ErrorKind::AlreadyExists => ScoresError::OutputCollision(path.to_path_buf()),
            _ => ScoresError::Io(err),
        })
}
