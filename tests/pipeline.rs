use std::fs;
use std::path::{Path, PathBuf};

use bibscores::pipeline::{FileOutcome, Pipeline, SchemaChoice, ScoresRequest, Severity};
use bibscores::{Config, Schema, ScoresError, ValueKey};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn setup() -> (TempDir, Pipeline) {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        output_dir: dir.path().join("output"),
        temp_dir: dir.path().join("temp"),
        ..Default::default()
    };
    config.ensure_directories().unwrap();
    (dir, Pipeline::new(config))
}

fn write(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, bytes).unwrap();
    path
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(String::from)
        .collect()
}

const RIS_EXPORT: &[u8] = b"TY  - JOUR\nTI  - Sample Title\n\
    AB  - Sample Abstract\nPY  - 2020\nER  - \n\n\
    TY  - JOUR\nTI  - Other\nPY  - 2021\nER  - \n\n\
    TY  - JOUR\nTI  - Undated\nER  - \n";

#[test]
fn test_ris_auto_detect_scores_and_corpus() {
    let (dir, pipeline) = setup();
    let input = write(&dir, "export.txt", RIS_EXPORT);

    let request = ScoresRequest::new(vec![input], SchemaChoice::Auto, ValueKey::Py);
    let outcome = pipeline.run(&request).unwrap();

    assert_eq!(outcome.schema, Schema::Ris);
    assert_eq!(outcome.messages[0].severity, Severity::Primary);
    assert_eq!(outcome.messages[0].text, "RIS/Endnote format detected.");

    let scores_path = dir.path().join("output/text_data01_scores_py.txt");
    assert_eq!(outcome.scores_file, FileOutcome::Saved(scores_path.clone()));
    assert_eq!(
        read_lines(&scores_path),
        vec![
            "score<2020>\tscore<2021>\tscore<n/a>",
            "1\t0\t0",
            "0\t1\t0",
            "0\t0\t1",
        ]
    );

    let corpus_path = dir.path().join("output/text_data01_corpus.txt");
    assert_eq!(outcome.corpus_file, FileOutcome::Saved(corpus_path.clone()));
    assert_eq!(
        read_lines(&corpus_path),
        vec!["Sample Title Sample Abstract", "Other -", "Undated -"]
    );

    assert_eq!(outcome.summary.rows, 3);
    assert_eq!(outcome.summary.missing_values, 1);
    assert_eq!(outcome.summary.missing_abstract_rate, Some(2.0 / 3.0));
}

#[test]
fn test_scopus_intervals_without_corpus() {
    let (dir, pipeline) = setup();
    let input = write(
        &dir,
        "scopus.csv",
        b"\"Title\",\"Year\",\"Abstract\"\n\
          \"A\",\"2018\",\"x\"\n\"B\",\"2019\",\"y\"\n\"C\",\"2021\",\"z\"\n",
    );

    let request = ScoresRequest::new(vec![input], SchemaChoice::Auto, ValueKey::Py)
        .with_interval(2)
        .skip_corpus()
        .with_output_name("years");
    let outcome = pipeline.run(&request).unwrap();

    assert_eq!(outcome.schema, Schema::Scopus);
    assert_eq!(outcome.corpus_file, FileOutcome::Skipped);
    assert_eq!(outcome.summary.missing_abstract_rate, None);

    let scores_path = dir.path().join("output/years01_scores_py.txt");
    assert_eq!(
        read_lines(&scores_path),
        vec!["score<2018-2020>\tscore<2020-2022>", "1\t0", "1\t0", "0\t1"]
    );
    assert!(!dir.path().join("output/years01_corpus.txt").exists());
}

#[test]
fn test_interval_on_text_value_warns() {
    let (dir, pipeline) = setup();
    let input = write(
        &dir,
        "scopus.csv",
        b"Title,Abstract,Source title\nA,x,Journal_One\nB,y,journal_one\n",
    );

    let request = ScoresRequest::new(vec![input], SchemaChoice::Fixed(Schema::Scopus), ValueKey::So)
        .with_interval(5);
    let outcome = pipeline.run(&request).unwrap();

    assert!(
        outcome
            .messages
            .iter()
            .any(|m| m.severity == Severity::Warning && m.text.starts_with("Intervals"))
    );
    let lines = read_lines(&dir.path().join("output/text_data01_scores_so.txt"));
    assert_eq!(lines, vec!["score<journalone>", "1", "1"]);
}

#[test]
fn test_repeated_runs_increment_names() {
    let (dir, pipeline) = setup();
    let input = write(&dir, "export.txt", RIS_EXPORT);
    let request = ScoresRequest::new(vec![input], SchemaChoice::Fixed(Schema::Ris), ValueKey::Py);

    pipeline.run(&request).unwrap();
    let second = pipeline.run(&request).unwrap();

    assert_eq!(
        second.scores_file,
        FileOutcome::Saved(dir.path().join("output/text_data02_scores_py.txt"))
    );
    assert_eq!(
        second.corpus_file,
        FileOutcome::Saved(dir.path().join("output/text_data02_corpus.txt"))
    );
}

#[test]
fn test_auto_detection_failure() {
    let (dir, pipeline) = setup();
    let input = write(&dir, "notes.txt", b"Just some notes\n");

    let request = ScoresRequest::new(vec![input.clone()], SchemaChoice::Auto, ValueKey::Py);
    assert!(matches!(
        pipeline.run(&request),
        Err(ScoresError::AutoDetectionFailed(path)) if path == input
    ));
}

#[test]
fn test_wrong_schema_fails_without_output() {
    let (dir, pipeline) = setup();
    let input = write(&dir, "export.txt", RIS_EXPORT);

    let request =
        ScoresRequest::new(vec![input], SchemaChoice::Fixed(Schema::Scopus), ValueKey::Py);
    assert!(matches!(
        pipeline.run(&request),
        Err(ScoresError::Ingestion { .. })
    ));
    assert_eq!(fs::read_dir(dir.path().join("output")).unwrap().count(), 0);
}

#[test]
fn test_unsupported_value_rejected() {
    let (dir, pipeline) = setup();
    let input = write(&dir, "export.txt", RIS_EXPORT);

    let request = ScoresRequest::new(vec![input], SchemaChoice::Fixed(Schema::Ris), ValueKey::At);
    assert!(matches!(
        pipeline.run(&request),
        Err(ScoresError::UnsupportedValue { .. })
    ));
}
