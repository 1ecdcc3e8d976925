use clap::Parser;
use unique_contexts::config::{DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_DIR};
use unique_contexts::{run, ExtractConfig};

/// Extract the unique `context` values of every .jsonl file in a directory.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Directory scanned for *.jsonl files
    #[arg(short = 'i', long = "input_dir", default_value = DEFAULT_INPUT_DIR)]
    input_dir: String,
    /// Directory receiving <name>_unique_contexts.json files (created if missing)
    #[arg(short = 'o', long = "output_dir", default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: String,
}

fn main() {
    // Progress and diagnostics go to stdout.
    tracing_subscriber::fmt().with_target(false).init();

    let args = Args::parse();
    let config = ExtractConfig::new(args.input_dir, args.output_dir);

    // Per-file failures are already logged; only a missing output dir is fatal.
    if let Err(e) = run(&config) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn flags_default_to_datasets() {
        let args = Args::try_parse_from(["uctx"]).unwrap();
        assert_eq!(args.input_dir, "../datasets");
        assert_eq!(args.output_dir, "../datasets/unique_contexts");
    }

    #[test]
    fn short_and_long_flags() {
        let args = Args::try_parse_from(["uctx", "-i", "in", "--output_dir", "out"]).unwrap();
        assert_eq!(args.input_dir, "in");
        assert_eq!(args.output_dir, "out");
    }
}
