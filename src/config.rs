//! Runtime configuration, loaded from TOML.
//!
//! ```
//! use bibscores::Config;
//!
//! let config = Config::from_toml_str("output_dir = \"out\"\ntop_n = 5\n").unwrap();
//! assert_eq!(config.top_n, 5);
//! assert_eq!(config.default_output_name, "text_data");
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::Result;

/// Directories, naming and reporting settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where score and corpus files are written
    pub output_dir: PathBuf,
    /// Scratch space for uploaded inputs
    pub temp_dir: PathBuf,
    /// Base name used when a request gives none
    pub default_output_name: String,
    /// Width of the numeric output-name counter
    pub suffix_digits: usize,
    /// Number of values listed in summaries
    pub top_n: usize,
    /// Accepted input file extensions, lowercase
    pub allowed_extensions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("data").join("output"),
            temp_dir: PathBuf::from("temp"),
            default_output_name: "text_data".to_string(),
            suffix_digits: 2,
            top_n: 10,
            allowed_extensions: ["csv", "txt", "xls"].map(String::from).to_vec(),
        }
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Loads a TOML file; missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Creates the output and temp directories. Safe to call repeatedly.
    pub fn ensure_directories(&self) -> Result<()> {
        for (label, dir) in [("Output path", &self.output_dir), ("Temp folder", &self.temp_dir)] {
            if dir.is_dir() {
                tracing::debug!("{} identified: {}", label, dir.display());
            } else {
                std::fs::create_dir_all(dir)?;
                tracing::debug!("{} created: {}", label, dir.display());
            }
        }
        Ok(())
    }

    /// Whether a file name has one of the allowed extensions.
    pub fn is_allowed(&self, file_name: &Path) -> bool {
        file_name
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.allowed_extensions
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(ext))
            })
    }
}
