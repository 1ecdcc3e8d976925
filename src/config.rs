use std::path::{Path, PathBuf};

pub const DEFAULT_INPUT_DIR: &str = "../datasets";
pub const DEFAULT_OUTPUT_DIR: &str = "../datasets/unique_contexts";

/// Directories for one batch run. Built once at startup and passed down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl ExtractConfig {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_point_at_datasets() {
        let cfg = ExtractConfig::default();
        assert_eq!(cfg.input_dir(), Path::new("../datasets"));
        assert_eq!(cfg.output_dir(), Path::new("../datasets/unique_contexts"));
    }
}
