//! Runs per-file counting tasks on a bounded rayon pool.
//!
//! Every worker gets its own copy of the tokenizer and builds its own
//! interner and counter per task; nothing mutable is shared between them.
//! A failing task does not stop its siblings. All outcomes are collected
//! and returned together.

use rayon::prelude::*;
use tracing::{error, info};

use crate::error::{FreqError, TaskFailure};
use crate::shard::{count_file, ShardSummary, ShardTask};
use crate::tokenizer::Tokenizer;

#[derive(Debug, Default)]
pub struct FanOutReport {
    pub completed: Vec<ShardSummary>,
    pub failed: Vec<TaskFailure>,
}

impl FanOutReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Turns any collected failure into an error.
    pub fn into_result(self) -> Result<Vec<ShardSummary>, FreqError> {
        if self.failed.is_empty() {
            Ok(self.completed)
        } else {
            Err(FreqError::TasksFailed(self.failed))
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FanOut {
    workers: usize,
}

impl FanOut {
    /// `workers` is clamped to at least one.
    pub fn new(workers: usize) -> Self {
        FanOut {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Counts every task and blocks until all of them have finished.
    pub fn run<T>(&self, tasks: &[ShardTask], tokenizer: &T) -> Result<FanOutReport, FreqError>
    where
        T: Tokenizer + Clone + Send + Sync,
    {
        let mut report = FanOutReport::default();
        if tasks.is_empty() {
            return Ok(report);
        }

        info!(tasks = tasks.len(), workers = self.workers, "starting fan-out");
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("count-{}", i))
            .build()?;

        let outcomes: Vec<(&ShardTask, Result<ShardSummary, FreqError>)> = pool.install(|| {
            tasks
                .par_iter()
                .map_init(|| tokenizer.clone(), |local, task| (task, count_file(&*local, task)))
                .collect()
        });

        for (task, outcome) in outcomes {
            match outcome {
                Ok(summary) => report.completed.push(summary),
                Err(e) => {
                    error!(input = %task.input.display(), error = %e, "counting failed");
                    report.failed.push(TaskFailure {
                        input: task.input.clone(),
                        output: task.output.clone(),
                        error: e,
                    });
                }
            }
        }
        info!(
            completed = report.completed.len(),
            failed = report.failed.len(),
            "fan-out finished"
        );
        Ok(report)
    }
}
