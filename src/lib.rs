pub mod config;
pub mod context;
pub mod discovery;
pub mod errors;
pub mod extractor;
pub mod lines;

pub use config::ExtractConfig;
pub use context::{context_of, is_truthy, scan_lines, unique_contexts, Scan};
pub use errors::{ExtractError, Result};
pub use lines::text_lines;
pub use extractor::{extract_file, output_file_name, run, write_contexts, BatchReport, FileOutcome, FileSummary};
