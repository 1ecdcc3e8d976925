use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};

use crate::errors::{ExtractError, Result};

/// File-name pattern for input files.
pub const INPUT_PATTERN: &str = "*.jsonl";

fn input_matcher() -> Result<GlobMatcher> {
    Ok(Glob::new(INPUT_PATTERN)?.compile_matcher())
}

/// Entries directly inside `dir` matching `*.jsonl`, sorted by name.
///
/// Not recursive. Dot-files are left out, as shell globbing does. Matching
/// non-files (a directory named `x.jsonl`) are kept so that reading them
/// fails and gets reported like any other unreadable input.
pub fn list_jsonl_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let matcher = input_matcher()?;
    let read_dir_err = |source: std::io::Error| ExtractError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_dir_err)? {
        let entry = entry.map_err(read_dir_err)?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if name.starts_with('.') || !matcher.is_match(name) {
            continue;
        }
        files.push(entry.path());
    }
    files.sort();
    Ok(files)
}
