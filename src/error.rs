use std::fmt;
use std::path::{Path, PathBuf};

use crate::interner::OrthId;

#[derive(Debug)]
pub enum FreqError {
    Io { path: PathBuf, source: std::io::Error },
    MalformedRecord { path: PathBuf, line: usize, reason: String },
    /// A count for `token` no longer fits in a `u64` after reading `line` of `path`.
    CountOverflow { path: PathBuf, line: usize, token: String },
    InvalidIdentity(OrthId),
    Pattern(String),
    UnknownLanguage(String),
    DuplicateOutput { first: PathBuf, second: PathBuf, output: PathBuf },
    ThreadPool(String),
    TasksFailed(Vec<TaskFailure>),
    MergeState(String),
}

/// A per-file counting task that did not complete, with enough context to re-run it.
#[derive(Debug)]
pub struct TaskFailure {
    pub input: PathBuf,
    pub output: PathBuf,
    pub error: FreqError,
}

impl FreqError {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        FreqError::Io { path: path.as_ref().to_path_buf(), source }
    }

    pub fn malformed(path: impl AsRef<Path>, line: usize, reason: impl Into<String>) -> Self {
        FreqError::MalformedRecord {
            path: path.as_ref().to_path_buf(),
            line,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FreqError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FreqError::Io { path, source } => write!(f, "IO error on {}: {}", path.display(), source),
            FreqError::MalformedRecord { path, line, reason } => {
                write!(f, "Malformed record at {}:{}: {}", path.display(), line, reason)
            }
            FreqError::CountOverflow { path, line, token } => {
                write!(f, "Count for {:?} overflows at {}:{}", token, path.display(), line)
            }
            FreqError::InvalidIdentity(id) => write!(f, "Identity {} was never interned", id),
            FreqError::Pattern(e) => write!(f, "Tokenizer pattern error: {}", e),
            FreqError::UnknownLanguage(name) => write!(f, "Unknown language: {}", name),
            FreqError::DuplicateOutput { first, second, output } => write!(
                f,
                "Inputs {} and {} both map to {}",
                first.display(),
                second.display(),
                output.display()
            ),
            FreqError::ThreadPool(e) => write!(f, "Thread pool error: {}", e),
            FreqError::TasksFailed(failures) => {
                write!(f, "{} counting task(s) failed", failures.len())?;
                for failure in failures {
                    write!(f, "\n  {}", failure)?;
                }
                Ok(())
            }
            FreqError::MergeState(e) => write!(f, "Merge error: {}", e),
        }
    }
}

impl fmt::Display for TaskFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "count {} -> {}: {}",
            self.input.display(),
            self.output.display(),
            self.error
        )
    }
}

impl std::error::Error for FreqError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FreqError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<fancy_regex::Error> for FreqError {
    fn from(err: fancy_regex::Error) -> Self {
        FreqError::Pattern(err.to_string())
    }
}

impl From<regex::Error> for FreqError {
    fn from(err: regex::Error) -> Self {
        FreqError::Pattern(err.to_string())
    }
}

impl From<aho_corasick::BuildError> for FreqError {
    fn from(err: aho_corasick::BuildError) -> Self {
        FreqError::Pattern(err.to_string())
    }
}

impl From<rayon::ThreadPoolBuildError> for FreqError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        FreqError::ThreadPool(err.to_string())
    }
}
