//! Convert bibliographic database exports into score matrices and text corpora.
//!
//! `bibscores` reads exports from Web of Science, Scopus, ProQuest and
//! RIS/Endnote, reduces them to one table of title, abstract and a chosen
//! metadata value, and produces the two files a bibliometric map tool such as
//! VOSviewer consumes: a tab-separated one-hot `score<...>` matrix of the
//! chosen value and a corpus of title and abstract text per record.
//!
//! # Key Features
//!
//! - **Format registry**: static description of each export schema
//!   (separator, encoding, quoting and column names)
//! - **Auto-detection**: schema from file extension, then from the first line
//!   probed under UTF-16LE and UTF-8
//! - **RIS/Endnote parsing**: tagged text split into records
//! - **Interval buckets**: publication years or citation counts grouped into
//!   fixed-width ranges
//! - **Summaries**: missing-value shares and most frequent values
//!
//! # Basic Usage
//!
//! ```rust
//! use bibscores::{RisParser, ScoreMatrix};
//!
//! let input = "TY  - JOUR\nTI  - First\nPY  - 2020\n\nTY  - JOUR\nTI  - Second\nPY  - 2021\n";
//!
//! let records = RisParser::new().parse(input).unwrap();
//! let years: Vec<Option<&str>> = records.iter().map(|r| r.year.as_deref()).collect();
//!
//! let matrix = ScoreMatrix::generate(&years);
//! assert_eq!(matrix.headers(), ["score<2020>", "score<2021>"]);
//! ```
//!
//! # Whole Requests
//!
//! [`pipeline::Pipeline`] runs detection, ingestion, bucketing and output for
//! a set of files, reporting status messages and a [`summary::Summary`].
//!
//! # Error Handling
//!
//! The library uses a custom [`Result`] type that wraps [`ScoresError`]:
//!
//! ```rust
//! use bibscores::{RisParser, ScoresError};
//!
//! match RisParser::new().parse("PMID- 12345678") {
//!     Ok(records) => println!("Parsed {} records", records.len()),
//!     Err(ScoresError::UnrecognizedFormat { head }) => eprintln!("Not RIS: {head}"),
//!     Err(e) => eprintln!("Other error: {e}"),
//! }
//! ```

pub mod bucket;
pub mod config;
pub mod corpus;
pub mod detect;
pub mod error;
pub mod ingest;
pub mod output;
pub mod pipeline;
pub mod registry;
pub mod ris;
pub mod scores;
pub mod summary;

mod regex;
mod utils;

// Reexports
pub use config::Config;
pub use error::{Result, ScoresError};
pub use ingest::{Row, UnifiedTable};
pub use registry::{Schema, SchemaDescriptor, ValueKey};
pub use ris::{RawRecord, RisParser};
pub use scores::ScoreMatrix;
