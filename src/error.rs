//! Error types shared by every stage of the scores pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// A specialized Result type for scores operations.
pub type Result<T> = std::result::Result<T, ScoresError>;

/// Represents errors that can occur while turning exports into score files.
#[derive(Error, Debug)]
pub enum ScoresError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Unknown database schema: '{0}'")]
    UnknownSchema(String),

    #[error("Scores value '{value}' is not available for {schema}")]
    UnsupportedValue { schema: String, value: String },

    #[error("Data scheme not recognised. Please check file format. Beginning of file: \"{head}\"")]
    UnrecognizedFormat { head: String },

    #[error("Auto-detection failed for {0}. Please check input or specify database.")]
    AutoDetectionFailed(PathBuf),

    #[error("Could not add {file} to table: {message}")]
    Ingestion { file: PathBuf, message: String },

    #[error("Output file already exists: {0}")]
    OutputCollision(PathBuf),

    #[error("Invalid value '{value}': {message}")]
    InvalidValue { value: String, message: String },

    #[error("Interval width must be positive, got {0}")]
    InvalidInterval(i64),

    #[error("No valid files submitted.")]
    NoInputFiles,
}

impl ScoresError {
    /// Wraps any displayable cause as an ingestion failure for `file`.
    pub(crate) fn ingestion(file: impl Into<PathBuf>, cause: impl std::fmt::Display) -> Self {
        ScoresError::Ingestion {
            file: file.into(),
            message: cause.to_string(),
        }
    }

    /// Builds an [`ScoresError::UnrecognizedFormat`] keeping the first 20 characters.
    pub(crate) fn unrecognized(raw: &str) -> Self {
        ScoresError::UnrecognizedFormat {
            head: raw.chars().take(20).collect(),
        }
    }
}
