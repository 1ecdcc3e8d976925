use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the extractor. Line-level JSON errors never show up
/// here; they are logged and skipped while scanning.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("cannot list input directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot create output directory {}: {source}", path.display())]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot serialize contexts for {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid input pattern: {0}")]
    Pattern(#[from] globset::Error),
}

pub type Result<T> = std::result::Result<T, ExtractError>;
