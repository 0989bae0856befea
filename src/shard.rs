//! Per-file counting: one input file in, one `count\ttoken` file out.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::atomic::write_atomically;
use crate::counter::Counter;
use crate::error::FreqError;
use crate::interner::Interner;
use crate::record::FileRecord;
use crate::tokenizer::{is_blank, Tokenizer};

/// One unit of fan-out work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardTask {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl ShardTask {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        ShardTask {
            input: input.into(),
            output: output.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShardSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Tokens produced by the tokenizer, whitespace included.
    pub tokens: u64,
    /// Distinct tokens seen, whitespace included.
    pub distinct: usize,
    /// Rows written to the output.
    pub written: usize,
    pub elapsed: Duration,
}

/// Token counts for a single file, with the interner that gives them meaning.
#[derive(Debug, Default)]
pub struct ShardCounts {
    pub interner: Interner,
    pub counts: Counter,
}

impl ShardCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts the tokens of `text`. `source` and `line` only feed the error
    /// raised when a count overflows.
    pub fn add_text<T: Tokenizer + ?Sized>(
        &mut self,
        tokenizer: &T,
        text: &str,
        source: &Path,
        line: usize,
    ) -> Result<u64, FreqError> {
        let mut produced = 0;
        for token in tokenizer.tokenize(text) {
            let id = self.interner.intern(&token);
            if self.counts.increment(id, 1).is_none() {
                return Err(FreqError::CountOverflow {
                    path: source.to_path_buf(),
                    line,
                    token,
                });
            }
            produced += 1;
        }
        Ok(produced)
    }

    /// Feeds `reader` to the tokenizer one line at a time, line terminators included.
    pub fn add_lines<T, R>(&mut self, tokenizer: &T, source: &Path, mut reader: R) -> Result<u64, FreqError>
    where
        T: Tokenizer + ?Sized,
        R: BufRead,
    {
        let mut produced = 0;
        let mut line_no = 0;
        let mut line = String::new();
        loop {
            line.clear();
            let n = reader
                .read_line(&mut line)
                .map_err(|e| FreqError::io(source, e))?;
            if n == 0 {
                break;
            }
            line_no += 1;
            produced += self.add_text(tokenizer, &line, source, line_no)?;
        }
        Ok(produced)
    }

    /// Writes one row per non-blank token, in counter order. Returns the row count.
    /// `dest` names the destination in errors.
    pub fn write_rows<W: Write>(&self, out: &mut W, dest: &Path) -> Result<usize, FreqError> {
        let mut written = 0;
        for (id, count) in self.counts.iter() {
            let token = self.interner.resolve(id)?;
            if is_blank(token) {
                continue;
            }
            FileRecord { count, token }
                .write_to(out)
                .map_err(|e| FreqError::io(dest, e))?;
            written += 1;
        }
        Ok(written)
    }
}

/// Counts the tokens of `task.input` and writes them to `task.output`.
/// The output only appears once it has been written completely.
pub fn count_file<T: Tokenizer + ?Sized>(tokenizer: &T, task: &ShardTask) -> Result<ShardSummary, FreqError> {
    let start = Instant::now();
    info!(input = %task.input.display(), "processing");

    let file = File::open(&task.input).map_err(|e| FreqError::io(&task.input, e))?;
    let mut shard = ShardCounts::new();
    let tokens = shard.add_lines(tokenizer, &task.input, BufReader::new(file))?;

    let written = write_atomically(&task.output, |out| shard.write_rows(out, &task.output))?;

    let elapsed = start.elapsed();
    debug!(
        input = %task.input.display(),
        tokens,
        distinct = shard.counts.len(),
        written,
        "counted"
    );
    info!(
        input = %task.input.display(),
        elapsed_min = elapsed.as_secs_f64() / 60.0,
        "file done"
    );
    Ok(ShardSummary {
        input: task.input.clone(),
        output: task.output.clone(),
        tokens,
        distinct: shard.counts.len(),
        written,
        elapsed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;

    /// Every maximal run of whitespace or non-whitespace is a token.
    struct Runs;

    impl Tokenizer for Runs {
        fn tokenize(&self, text: &str) -> Vec<String> {
            let mut tokens = Vec::new();
            let mut current = String::new();
            for c in text.chars() {
                let in_space = current.chars().next().map(char::is_whitespace);
                if in_space.is_some_and(|space| space != c.is_whitespace()) {
                    tokens.push(std::mem::take(&mut current));
                }
                current.push(c);
            }
            if !current.is_empty() {
                tokens.push(current);
            }
            tokens
        }
    }

    fn parse(text: &str) -> HashMap<String, u64> {
        text.lines()
            .enumerate()
            .map(|(i, line)| {
                let rec = FileRecord::parse(Path::new("t"), i + 1, line).unwrap();
                (rec.token.to_string(), rec.count)
            })
            .collect()
    }

    #[test]
    fn test_rows_follow_first_occurrence() {
        let mut shard = ShardCounts::new();
        shard.add_text(&Runs, "b a b c a b", Path::new("mem"), 1).unwrap();
        let mut out = Vec::new();
        let written = shard.write_rows(&mut out, Path::new("mem")).unwrap();
        assert_eq!(written, 3);
        assert_eq!(String::from_utf8(out).unwrap(), "3\tb\n2\ta\n1\tc\n");
    }

    #[test]
    fn test_blank_tokens_are_counted_but_not_written() {
        let mut shard = ShardCounts::new();
        let produced = shard.add_text(&Runs, "a  a \t b", Path::new("mem"), 1).unwrap();
        assert_eq!(produced, 5);
        let gap = shard.interner.get(" \t ").unwrap();
        assert_eq!(shard.counts.get(gap), 1);

        let mut out = Vec::new();
        shard.write_rows(&mut out, Path::new("mem")).unwrap();
        let rows = parse(&String::from_utf8(out).unwrap());
        assert_eq!(rows, HashMap::from([("a".to_string(), 2), ("b".to_string(), 1)]));
    }

    #[test]
    fn test_count_overflow_names_file_and_line() {
        let mut shard = ShardCounts::new();
        let id = shard.interner.intern("z");
        shard.counts.increment(id, u64::MAX).unwrap();
        match shard.add_text(&Runs, "y z", Path::new("doc.txt"), 4) {
            Err(FreqError::CountOverflow { path, line, token }) => {
                assert_eq!(path, PathBuf::from("doc.txt"));
                assert_eq!(line, 4);
                assert_eq!(token, "z");
            }
            other => panic!("expected CountOverflow, got {:?}", other),
        }
        assert_eq!(shard.counts.get(id), u64::MAX);
    }

    #[test]
    fn test_count_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("doc.txt");
        let output = dir.path().join("doc.freq");
        fs::write(&input, "a a b\na c\nb  a").unwrap();

        let summary = count_file(&Runs, &ShardTask::new(&input, &output)).unwrap();
        let text = fs::read_to_string(&output).unwrap();

        assert_eq!(text, "4\ta\n2\tb\n1\tc\n");
        assert_eq!(summary.tokens, 13);
        assert_eq!(summary.distinct, 6);
        assert_eq!(summary.written, 3);
        assert_eq!(
            parse(&text),
            HashMap::from([("a".to_string(), 4), ("b".to_string(), 2), ("c".to_string(), 1)])
        );
    }

    #[test]
    fn test_missing_input_is_io_error_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("never.freq");
        let task = ShardTask::new(dir.path().join("missing.txt"), &output);
        match count_file(&Runs, &task) {
            Err(FreqError::Io { path, .. }) => assert_eq!(path, task.input),
            other => panic!("expected Io error, got {:?}", other),
        }
        assert!(!output.exists());
    }

    #[test]
    fn test_existing_output_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("doc.txt");
        let output = dir.path().join("doc.freq");
        fs::write(&input, "x y x").unwrap();
        fs::write(&output, "99\tstale\n").unwrap();

        count_file(&Runs, &ShardTask::new(&input, &output)).unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), "2\tx\n1\ty\n");
    }
}
