//! Fan-in: folds per-file frequency files into one global table.
//!
//! Tokens are re-interned by string into a single interner, so ids issued
//! by different workers never need to agree. Every row adds its count to
//! the token's total and exactly one to its document count.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::atomic::write_atomically;
use crate::counter::Counter;
use crate::error::FreqError;
use crate::interner::Interner;
use crate::record::{FileRecord, GlobalRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeState {
    Idle,
    /// `file` files out of `of` have been folded in.
    Reading { file: usize, of: usize },
    Writing,
    Done,
    Failed,
}

impl fmt::Display for MergeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeState::Idle => f.write_str("idle"),
            MergeState::Reading { file, of } => write!(f, "reading file {} of {}", file, of),
            MergeState::Writing => f.write_str("writing"),
            MergeState::Done => f.write_str("done"),
            MergeState::Failed => f.write_str("failed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeSummary {
    pub files: usize,
    /// Rows in the global table, one per distinct token.
    pub rows: usize,
    /// Sum of all totals.
    pub tokens: u64,
}

#[derive(Debug)]
pub struct MergeReducer {
    interner: Interner,
    totals: Counter,
    docs: Counter,
    expected: usize,
    state: MergeState,
}

impl MergeReducer {
    /// A reducer that will fold exactly `expected` files before writing.
    pub fn new(expected: usize) -> Self {
        MergeReducer {
            interner: Interner::new(),
            totals: Counter::new(),
            docs: Counter::new(),
            expected,
            state: MergeState::Idle,
        }
    }

    pub fn state(&self) -> MergeState {
        self.state
    }

    pub fn files_read(&self) -> usize {
        match self.state {
            MergeState::Reading { file, .. } => file,
            _ => 0,
        }
    }

    /// Total and document count for `token`, both zero when it was never seen.
    pub fn counts(&self, token: &str) -> (u64, u64) {
        match self.interner.get(token) {
            Some(id) => (self.totals.get(id), self.docs.get(id)),
            None => (0, 0),
        }
    }

    /// Number of files folded so far, or an error if no more input is accepted.
    fn ensure_reading(&self) -> Result<usize, FreqError> {
        let done = match self.state {
            MergeState::Idle => 0,
            MergeState::Reading { file, .. } => file,
            other => return Err(FreqError::MergeState(format!("cannot read input while {}", other))),
        };
        if done >= self.expected {
            return Err(FreqError::MergeState(format!(
                "all {} expected files already read",
                self.expected
            )));
        }
        Ok(done)
    }

    /// Folds one per-file frequency file in. Any failure is terminal for the reducer.
    pub fn fold_file(&mut self, path: &Path) -> Result<usize, FreqError> {
        self.ensure_reading()?;
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                self.state = MergeState::Failed;
                return Err(FreqError::io(path, e));
            }
        };
        self.fold_reader(path, BufReader::new(file))
    }

    /// Folds rows from `reader`; `source` names it in errors.
    pub fn fold_reader<R: BufRead>(&mut self, source: &Path, reader: R) -> Result<usize, FreqError> {
        let done = self.ensure_reading()?;
        match self.fold_rows(source, reader) {
            Ok(rows) => {
                self.state = MergeState::Reading {
                    file: done + 1,
                    of: self.expected,
                };
                debug!(source = %source.display(), rows, "folded");
                Ok(rows)
            }
            Err(e) => {
                self.state = MergeState::Failed;
                Err(e)
            }
        }
    }

    fn fold_rows<R: BufRead>(&mut self, source: &Path, mut reader: R) -> Result<usize, FreqError> {
        let mut rows = 0;
        let mut line = String::new();
        loop {
            line.clear();
            let n = reader
                .read_line(&mut line)
                .map_err(|e| FreqError::io(source, e))?;
            if n == 0 {
                break;
            }
            rows += 1;
            let record = FileRecord::parse(source, rows, &line)?;
            let id = self.interner.intern(record.token);
            let overflow = || FreqError::CountOverflow {
                path: source.to_path_buf(),
                line: rows,
                token: record.token.to_string(),
            };
            self.totals.increment(id, record.count).ok_or_else(overflow)?;
            self.docs.increment(id, 1).ok_or_else(overflow)?;
        }
        Ok(rows)
    }

    /// Writes the table in first-seen order of the totals counter.
    pub fn write_table<W: Write>(&self, out: &mut W, dest: &Path) -> Result<usize, FreqError> {
        let mut rows = 0;
        for (id, total) in self.totals.iter() {
            let record = GlobalRecord {
                total,
                docs: self.docs.get(id),
                token: self.interner.resolve(id)?,
            };
            record.write_to(out).map_err(|e| FreqError::io(dest, e))?;
            rows += 1;
        }
        Ok(rows)
    }

    /// Writes the global table to `path` and finishes the reducer. Only
    /// valid once every expected file has been folded in.
    pub fn finish(&mut self, path: &Path) -> Result<MergeSummary, FreqError> {
        let files = match self.state {
            MergeState::Idle => 0,
            MergeState::Reading { file, .. } => file,
            other => return Err(FreqError::MergeState(format!("cannot write while {}", other))),
        };
        if files < self.expected {
            self.state = MergeState::Failed;
            return Err(FreqError::MergeState(format!(
                "only {} of {} files read",
                files, self.expected
            )));
        }
        self.state = MergeState::Writing;
        match write_atomically(path, |out| self.write_table(out, path)) {
            Ok(rows) => {
                self.state = MergeState::Done;
                Ok(MergeSummary {
                    files,
                    rows,
                    tokens: self.totals.total(),
                })
            }
            Err(e) => {
                self.state = MergeState::Failed;
                Err(e)
            }
        }
    }
}

/// Folds every file in `inputs`, in order, and writes the table to `output`.
/// Nothing is written unless every input was folded successfully.
pub fn merge_files(inputs: &[PathBuf], output: &Path) -> Result<MergeSummary, FreqError> {
    info!(files = inputs.len(), output = %output.display(), "merging counts");
    let mut reducer = MergeReducer::new(inputs.len());
    for input in inputs {
        reducer.fold_file(input)?;
    }
    let summary = reducer.finish(output)?;
    info!(rows = summary.rows, tokens = summary.tokens, "merge complete");
    Ok(summary)
}
