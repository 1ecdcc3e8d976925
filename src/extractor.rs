use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::Value;
use tracing::{error, info};

use crate::config::ExtractConfig;
use crate::context::scan_lines;
use crate::discovery::list_jsonl_files;
use crate::errors::{ExtractError, Result};
use crate::lines::text_lines;

/// Suffix replacing `.jsonl` in output file names.
pub const OUTPUT_SUFFIX: &str = "_unique_contexts.json";

const INDENT: &[u8] = b"    ";

/// What one successfully processed input produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub unique: usize,
    pub malformed_lines: usize,
}

#[derive(Debug)]
pub enum FileOutcome {
    Written(FileSummary),
    Failed { input: PathBuf, error: ExtractError },
}

impl FileOutcome {
    pub fn input(&self) -> &Path {
        match self {
            FileOutcome::Written(s) => &s.input,
            FileOutcome::Failed { input, .. } => input,
        }
    }

    pub fn is_written(&self) -> bool {
        matches!(self, FileOutcome::Written(_))
    }
}

/// Per-file outcomes of one batch, in processing order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn files_found(&self) -> usize {
        self.outcomes.len()
    }

    pub fn written(&self) -> impl Iterator<Item = &FileSummary> {
        self.outcomes.iter().filter_map(|o| match o {
            FileOutcome::Written(s) => Some(s),
            FileOutcome::Failed { .. } => None,
        })
    }

    pub fn failed(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| !o.is_written())
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// `dir/name.jsonl` -> `name_unique_contexts.json`
pub fn output_file_name(input: &Path) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{stem}{OUTPUT_SUFFIX}")
}

/// Write `contexts` as a pretty JSON array, replacing any existing file.
pub fn write_contexts(path: &Path, contexts: &[Value]) -> Result<()> {
    let write_err = |source: std::io::Error| ExtractError::Write {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    let mut ser = Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(INDENT));
    contexts.serialize(&mut ser).map_err(|e| {
        if e.is_io() {
            write_err(e.into())
        } else {
            ExtractError::Serialize {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    writer.flush().map_err(write_err)
}

/// Extract the unique contexts of one `.jsonl` file into `output_dir`.
///
/// Malformed lines are logged and skipped. Returns `ExtractError::Read` if the
/// file cannot be opened or read to the end (no output is written then), and
/// `ExtractError::Write` if the output cannot be written.
pub fn extract_file(input: &Path, output_dir: &Path) -> Result<FileSummary> {
    let name = display_name(input);
    info!("Processing file: {name}");

    // Any read failure drops the whole file; nothing gets written for it.
    let read_err = |source: std::io::Error| ExtractError::Read {
        path: input.to_path_buf(),
        source,
    };
    let reader = BufReader::new(File::open(input).map_err(read_err)?);
    let scan = scan_lines(&name, text_lines(reader)).map_err(read_err)?;

    let unique = scan.contexts.len();
    info!("{unique} unique `context` entries found in {name}.");

    // name.jsonl -> <output_dir>/name_unique_contexts.json
    let output_name = output_file_name(input);
    let output = output_dir.join(&output_name);
    write_contexts(&output, &scan.contexts)?;
    info!("Saved to: {output_name}");

    Ok(FileSummary {
        input: input.to_path_buf(),
        output,
        unique,
        malformed_lines: scan.malformed.len(),
    })
}

/// Run one batch: every `*.jsonl` in the input directory, one after another.
///
/// Per-file failures are logged and recorded in the report. The only error
/// returned is failing to create the output directory.
pub fn run(config: &ExtractConfig) -> Result<BatchReport> {
    // Create the output directory first; without it nothing can be written.
    let output_dir = config.output_dir();
    fs::create_dir_all(output_dir).map_err(|source| ExtractError::CreateOutputDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    // An unlistable input directory counts as an empty batch.
    let files = list_jsonl_files(config.input_dir()).unwrap_or_else(|e| {
        error!("{e}");
        Vec::new()
    });
    info!("Found {} JSONL files.", files.len());

    let mut report = BatchReport::default();
    for input in files {
        // Failures stay local to this file; the batch moves on.
        let outcome = match extract_file(&input, output_dir) {
            Ok(summary) => FileOutcome::Written(summary),
            Err(e) => {
                // Write failures name the output file, everything else the input.
                let name = match &e {
                    ExtractError::Write { path, .. } => display_name(path),
                    _ => display_name(&input),
                };
                error!("Error processing file {name}: {e}");
                FileOutcome::Failed { input, error: e }
            }
        };
        report.outcomes.push(outcome);
    }

    info!("All files have been processed.");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn output_name_replaces_extension() {
        assert_eq!(output_file_name(Path::new("data/a.jsonl")), "a_unique_contexts.json");
        assert_eq!(
            output_file_name(Path::new("/x/train.v2.jsonl")),
            "train.v2_unique_contexts.json"
        );
    }

    #[test]
    fn writes_four_space_indent_and_literal_unicode() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("o.json");
        write_contexts(&out, &[json!("naïve"), json!("日本")]).unwrap();
        assert_eq!(
            fs::read_to_string(&out).unwrap(),
            "[\n    \"naïve\",\n    \"日本\"\n]"
        );
    }

    #[test]
    fn empty_list_writes_empty_array() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("o.json");
        write_contexts(&out, &[]).unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap(), "[]");
    }

    #[test]
    fn existing_output_is_overwritten() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("o.json");
        fs::write(&out, "stale content that is longer than the new one").unwrap();
        write_contexts(&out, &[json!("X")]).unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap(), "[\n    \"X\"\n]");
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("missing").join("o.json");
        let err = write_contexts(&out, &[json!("X")]).unwrap_err();
        assert!(matches!(err, ExtractError::Write { .. }));
    }

    #[test]
    fn missing_input_is_a_read_error() {
        let tmp = TempDir::new().unwrap();
        let err = extract_file(&tmp.path().join("gone.jsonl"), tmp.path()).unwrap_err();
        assert!(matches!(err, ExtractError::Read { .. }));
        assert!(!tmp.path().join("gone_unique_contexts.json").exists());
    }

    #[test]
    fn summary_counts_unique_and_malformed() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("s.jsonl");
        fs::write(&input, "{\"context\":\"A\"}\n{oops\n{\"context\":\"A\"}\n{\"context\":\"B\"}\n").unwrap();
        let summary = extract_file(&input, tmp.path()).unwrap();
        assert_eq!(summary.unique, 2);
        assert_eq!(summary.malformed_lines, 1);
        assert_eq!(summary.output, tmp.path().join("s_unique_contexts.json"));
    }
}
