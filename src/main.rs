use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bibscores::pipeline::{FileOutcome, Outcome, Pipeline, SchemaChoice, ScoresRequest};
use bibscores::{Config, Schema, ValueKey, detect, registry};

#[derive(Parser)]
#[command(
    name = "bibscores",
    about = "Turn bibliographic exports into VOSviewer scores and corpus files",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log debug output (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate scores (and corpus) files from export files.
    Generate {
        /// Input files (.csv, .txt, .xls).
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Database schema: auto, wos, scopus, proquest or ris.
        #[arg(long, default_value = "auto")]
        schema: SchemaChoice,
        /// Scores value: py, so, pu, ty, nc or at.
        #[arg(long, default_value = "py")]
        value: ValueKey,
        /// Group numeric values into intervals of this width.
        #[arg(long)]
        interval: Option<i64>,
        /// Do not write the corpus file.
        #[arg(long)]
        skip_corpus: bool,
        /// Base name of the output files.
        #[arg(long)]
        output_name: Option<String>,
        /// Directory for output files.
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// TOML configuration file.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Number of values listed in the summary.
        #[arg(long)]
        top: Option<usize>,
        /// Print the outcome as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Detect the schema of an export file.
    Detect { file: PathBuf },

    /// List the scores values a schema supports.
    Values { schema: Schema },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "bibscores=debug" } else { "bibscores=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Generate {
            files,
            schema,
            value,
            interval,
            skip_corpus,
            output_name,
            output_dir,
            config,
            top,
            json,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            if let Some(top) = top {
                config.top_n = top;
            }
            config
                .ensure_directories()
                .context("Failed to create output directories")?;

            let mut request = ScoresRequest::new(files, schema, value);
            request.interval = interval;
            request.skip_corpus = skip_corpus;
            request.output_name = output_name;

            let outcome = Pipeline::new(config)
                .run(&request)
                .context("Could not generate scores")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print_outcome(&outcome);
            }
        }

        Commands::Detect { file } => {
            let schema = detect::detect(&file).with_context(|| {
                format!(
                    "Auto-detection failed for {}. Please specify the database.",
                    file.display()
                )
            })?;
            println!("{}\t{}", schema, schema.descriptor().name);
        }

        Commands::Values { schema } => {
            for key in registry::supported_values(schema) {
                println!("{}\t{}", key, key.label());
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(Config::default()),
    }
}

fn print_outcome(outcome: &Outcome) {
    for message in &outcome.messages {
        println!("[{:?}] {}", message.severity, message.text);
    }

    let summary = &outcome.summary;
    println!();
    println!("Database:        {}", outcome.schema.descriptor().name);
    println!("Records:         {}", summary.rows);
    println!("Distinct values: {}", summary.distinct_values);
    println!(
        "Missing values:  {} ({:.1}%)",
        summary.missing_values,
        summary.missing_value_percent()
    );
    if let Some(percent) = summary.missing_abstract_percent() {
        println!("Missing abstracts: {percent:.1}%");
    }
    for entry in &summary.top_values {
        println!("  {:>6}  {}", entry.count, entry.value);
    }
    if summary.remaining_values > 0 {
        println!("  ... and {} more", summary.remaining_values);
    }

    let files = [
        ("Scores", &outcome.scores_file),
        ("Corpus", &outcome.corpus_file),
    ];
    for (label, file) in files {
        match file {
            FileOutcome::Saved(path) => println!("{label}: {}", path.display()),
            FileOutcome::AlreadyExists(path) => {
                println!("{label}: not written, {} exists", path.display())
            }
            FileOutcome::Skipped => {}
        }
    }
}
