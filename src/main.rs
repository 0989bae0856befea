use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use word_freqs::pipeline::{self, PipelineConfig};
use word_freqs::Language;

#[derive(Parser)]
#[command(name = "word-freqs")]
#[command(about = "Count token frequencies per file, then merge them into one table", long_about = None)]
struct Cli {
    /// File listing one input text file per line
    input_loc: PathBuf,
    /// Directory for the per-file frequency files
    freqs_dir: PathBuf,
    /// Path of the merged frequency table
    output_loc: PathBuf,
    /// Tokenizer language: "en" or "xx"
    #[arg(default_value = "en")]
    lang: Language,
    /// Number of worker threads [default: available cores]
    #[arg(short = 'n', long = "n-jobs")]
    n_jobs: Option<usize>,
    /// Reuse per-file frequency files that already exist
    #[arg(short = 's', long)]
    skip_existing: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = PipelineConfig::new(cli.input_loc, cli.freqs_dir, cli.output_loc);
    config.language = cli.lang;
    config.skip_existing = cli.skip_existing;
    if let Some(n) = cli.n_jobs {
        config.workers = n.max(1);
    }

    match pipeline::run(&config) {
        Ok(report) => {
            info!(
                counted = report.counted.len(),
                skipped = report.skipped,
                rows = report.merge.rows,
                tokens = report.merge.tokens,
                output = %config.output.display(),
                "done"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "run failed");
            ExitCode::FAILURE
        }
    }
}
