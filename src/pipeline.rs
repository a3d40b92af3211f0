//! End-to-end processing of one scores request.
//!
//! Resolves the schema (detecting it when asked), ingests all files,
//! optionally buckets the values, then writes the scores file and the corpus
//! file independently of each other and summarises the result.
//!
//! ```no_run
//! use bibscores::pipeline::{Pipeline, SchemaChoice, ScoresRequest};
//! use bibscores::{Config, ValueKey};
//!
//! let config = Config::default();
//! config.ensure_directories().unwrap();
//!
//! let request = ScoresRequest::new(vec!["savedrecs.txt".into()], SchemaChoice::Auto, ValueKey::Py)
//!     .with_interval(5);
//! let outcome = Pipeline::new(config).run(&request).unwrap();
//! for message in &outcome.messages {
//!     println!("[{:?}] {}", message.severity, message.text);
//! }
//! ```

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::bucket::{BucketOutcome, bucketize_table};
use crate::ingest::Ingestor;
use crate::output::OutputNamer;
use crate::scores::ScoreMatrix;
use crate::summary::{Summary, summarize};
use crate::{Config, Result, Schema, ScoresError, ValueKey, corpus, detect};

/// Schema selection of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaChoice {
    /// Detect from the first input file
    Auto,
    Fixed(Schema),
}

impl FromStr for SchemaChoice {
    type Err = ScoresError;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("auto") {
            Ok(SchemaChoice::Auto)
        } else {
            s.parse().map(SchemaChoice::Fixed)
        }
    }
}

impl fmt::Display for SchemaChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaChoice::Auto => f.write_str("auto"),
            SchemaChoice::Fixed(schema) => fmt::Display::fmt(schema, f),
        }
    }
}

/// Parameters of one processing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoresRequest {
    pub files: Vec<PathBuf>,
    pub schema: SchemaChoice,
    pub value: ValueKey,
    /// Interval width when values should be bucketed
    pub interval: Option<i64>,
    pub skip_corpus: bool,
    /// Output base name, `default_output_name` when empty
    pub output_name: Option<String>,
}

impl ScoresRequest {
    pub fn new(files: Vec<PathBuf>, schema: SchemaChoice, value: ValueKey) -> Self {
        Self {
            files,
            schema,
            value,
            interval: None,
            skip_corpus: false,
            output_name: None,
        }
    }

    #[must_use]
    pub fn with_interval(mut self, width: i64) -> Self {
        self.interval = Some(width);
        self
    }

    #[must_use]
    pub fn skip_corpus(mut self) -> Self {
        self.skip_corpus = true;
        self
    }

    #[must_use]
    pub fn with_output_name(mut self, name: &str) -> Self {
        self.output_name = Some(name.to_string());
        self
    }
}

/// Severity of a user-facing status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Primary,
    Success,
    Warning,
    Danger,
}

/// Human readable status for the user, in the order events happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub severity: Severity,
    pub text: String,
}

/// What happened to one output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "path", rename_all = "snake_case")]
pub enum FileOutcome {
    Saved(PathBuf),
    /// The target existed and was left untouched
    AlreadyExists(PathBuf),
    Skipped,
}

/// Result of a successful request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub schema: Schema,
    pub scores_file: FileOutcome,
    pub corpus_file: FileOutcome,
    pub summary: Summary,
    pub messages: Vec<Message>,
}

/// Runs requests against one configuration.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: Config,
    namer: OutputNamer,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        let namer = OutputNamer::new(config.suffix_digits);
        Self { config, namer }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Processes one request.
    ///
    /// # Errors
    ///
    /// Fails without writing anything when no file is accepted, detection
    /// fails, the value key is unsupported or any file cannot be ingested.
    /// An existing output file is reported in the [`Outcome`] instead.
    pub fn run(&self, request: &ScoresRequest) -> Result<Outcome> {
        let mut messages = Vec::new();

        let files: Vec<&PathBuf> = request
            .files
            .iter()
            .filter(|path| self.config.is_allowed(path))
            .collect();
        tracing::debug!("{} file(s) submitted.", request.files.len());
        tracing::debug!("{} file(s) allowed.", files.len());
        let Some(first) = files.first() else {
            tracing::warn!("No valid files submitted.");
            return Err(ScoresError::NoInputFiles);
        };

        let schema = match request.schema {
            SchemaChoice::Fixed(schema) => schema,
            SchemaChoice::Auto => {
                tracing::debug!("Attempting auto-detection...");
                let schema = detect::detect(first).ok_or_else(|| {
                    tracing::error!("Auto-detection unsuccessful");
                    ScoresError::AutoDetectionFailed(first.to_path_buf())
                })?;
                push(
                    &mut messages,
                    Severity::Primary,
                    format!("{} format detected.", schema.descriptor().name),
                );
                schema
            }
        };

        let ingestor = Ingestor::new(schema, request.value)?;
        let mut table = ingestor.ingest(&files)?;
        tracing::info!("{} records read from {} file(s)", table.len(), files.len());
        let missing_values = table.missing_values();
        let missing_abstracts = table.missing_abstracts();

        if let Some(width) = request.interval {
            let outcome = bucketize_table(&mut table, request.value, width)?;
            if let BucketOutcome::Skipped { key } = outcome {
                push(
                    &mut messages,
                    Severity::Warning,
                    format!(
                        "Intervals can only be applied to numeric values, not {}. \
                         Original scores value used.",
                        key.label().to_lowercase()
                    ),
                );
            }
        }

        let matrix = ScoreMatrix::generate(&table.values());
        tracing::info!(
            "Score matrix with {} rows and {} columns",
            matrix.row_count(),
            matrix.column_count()
        );

        let base = self.output_base(request.output_name.as_deref());

        let scores_path =
            self.namer
                .next_available(&base, &format!("_scores_{}", request.value), "txt");
        let scores_file = saved_or_collision(matrix.save(&scores_path), &scores_path)?;
        match &scores_file {
            FileOutcome::Saved(path) => push(
                &mut messages,
                Severity::Success,
                format!("Scores file saved as {}.", path.display()),
            ),
            _ => push(
                &mut messages,
                Severity::Warning,
                "Scores file already exists. Please change the output name.".to_string(),
            ),
        }

        let corpus_file = if request.skip_corpus {
            tracing::debug!("Skipping corpus file.");
            FileOutcome::Skipped
        } else {
            let corpus_path = self.namer.next_available(&base, "_corpus", "txt");
            let lines = corpus::assemble(table.rows());
            let outcome = saved_or_collision(corpus::save(&lines, &corpus_path), &corpus_path)?;
            match &outcome {
                FileOutcome::Saved(path) => push(
                    &mut messages,
                    Severity::Success,
                    format!("Corpus file saved as {}.", path.display()),
                ),
                _ => push(
                    &mut messages,
                    Severity::Warning,
                    "Corpus file already exists. \
                     Please change the output name or use existing corpus."
                        .to_string(),
                ),
            }
            outcome
        };

        let summary = summarize(
            &matrix,
            missing_values,
            (!request.skip_corpus).then_some(missing_abstracts),
            self.config.top_n,
        );

        Ok(Outcome {
            schema,
            scores_file,
            corpus_file,
            summary,
            messages,
        })
    }

    /// `<output_dir>/<name>`, falling back to the default name when empty.
    fn output_base(&self, name: Option<&str>) -> PathBuf {
        let name = name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.config.default_output_name);
        self.config.output_dir.join(name)
    }
}

fn push(messages: &mut Vec<Message>, severity: Severity, text: String) {
    messages.push(Message { severity, text });
}

fn saved_or_collision(result: Result<()>, path: &Path) -> Result<FileOutcome> {
    match result {
        Ok(()) => {
            tracing::info!("Saved {}", path.display());
            Ok(FileOutcome::Saved(path.to_path_buf()))
        }
        Err(ScoresError::OutputCollision(path)) => {
            tracing::warn!("File not created. {} already exists.", path.display());
            Ok(FileOutcome::AlreadyExists(path))
        }
        Err(err) => Err(err),
    }
}
