//! End-to-end run: manifest, fan-out counting, then the global merge.

use std::fs;
use std::path::PathBuf;
use std::thread;

use tracing::{info, warn};

use crate::error::FreqError;
use crate::fanout::FanOut;
use crate::manifest::Manifest;
use crate::merge::{merge_files, MergeSummary};
use crate::shard::ShardSummary;
use crate::tokenizer::Language;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Text file listing one input path per line.
    pub manifest: PathBuf,
    /// Directory receiving one frequency file per input.
    pub freqs_dir: PathBuf,
    /// Global table written after every input has been counted.
    pub output: PathBuf,
    pub language: Language,
    pub workers: usize,
    /// Reuse frequency files left by an earlier run instead of recounting.
    pub skip_existing: bool,
}

impl PipelineConfig {
    pub fn new(manifest: impl Into<PathBuf>, freqs_dir: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        PipelineConfig {
            manifest: manifest.into(),
            freqs_dir: freqs_dir.into(),
            output: output.into(),
            language: Language::default(),
            workers: default_workers(),
            skip_existing: false,
        }
    }
}

/// One worker per available core, or one if that cannot be determined.
pub fn default_workers() -> usize {
    thread::available_parallelism().map_or(1, |n| n.get())
}

#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub counted: Vec<ShardSummary>,
    pub skipped: usize,
    pub merge: MergeSummary,
}

/// Counts every input named by the manifest and merges the results.
/// If any input fails to count, no merge is attempted and the global
/// table is left untouched.
pub fn run(config: &PipelineConfig) -> Result<PipelineReport, FreqError> {
    let manifest = Manifest::load(&config.manifest)?;
    info!(
        manifest = %config.manifest.display(),
        inputs = manifest.len(),
        language = %config.language,
        "loaded manifest"
    );

    fs::create_dir_all(&config.freqs_dir).map_err(|e| FreqError::io(&config.freqs_dir, e))?;
    let plan = manifest.plan(&config.freqs_dir, config.skip_existing, |p| p.exists())?;
    if plan.skipped > 0 {
        info!(skipped = plan.skipped, "reusing existing frequency files");
    }

    let counted = if plan.tasks.is_empty() {
        Vec::new()
    } else {
        let tokenizer = config.language.tokenizer()?;
        let report = FanOut::new(config.workers).run(&plan.tasks, &tokenizer)?;
        if !report.is_success() {
            warn!(failed = report.failed.len(), "skipping merge");
        }
        report.into_result()?
    };

    let merge = merge_files(&plan.outputs, &config.output)?;
    Ok(PipelineReport {
        counted,
        skipped: plan.skipped,
        merge,
    })
}
