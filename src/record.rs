//! Row formats of the intermediate (`count\ttoken`) and global
//! (`total\tdocs\ttoken`) frequency files.

use std::io::{self, Write};
use std::path::Path;

use crate::error::FreqError;

/// One row of a per-file frequency file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileRecord<'a> {
    pub count: u64,
    pub token: &'a str,
}

/// One row of the global frequency table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalRecord<'a> {
    pub total: u64,
    pub docs: u64,
    pub token: &'a str,
}

fn strip_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

fn parse_count(path: &Path, line_no: usize, field: &str, what: &str) -> Result<u64, FreqError> {
    match field.parse::<u64>() {
        Ok(0) => Err(FreqError::malformed(path, line_no, format!("{} must be positive", what))),
        Ok(n) => Ok(n),
        Err(_) => Err(FreqError::malformed(
            path,
            line_no,
            format!("{} {:?} is not an integer", what, field),
        )),
    }
}

impl<'a> FileRecord<'a> {
    /// Parses `count\ttoken`. `path` and `line_no` only feed the error message.
    pub fn parse(path: &Path, line_no: usize, line: &'a str) -> Result<Self, FreqError> {
        let line = strip_terminator(line);
        let (count, token) = line
            .split_once('\t')
            .ok_or_else(|| FreqError::malformed(path, line_no, "missing tab separator"))?;
        let count = parse_count(path, line_no, count, "count")?;
        Ok(FileRecord { count, token })
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}\t{}", self.count, self.token)
    }
}

impl<'a> GlobalRecord<'a> {
    /// Reads back one row of a table written by the merge, with the same
    /// count rules as [`FileRecord::parse`]. Both counts must be positive.
    pub fn parse(path: &Path, line_no: usize, line: &'a str) -> Result<Self, FreqError> {
        let line = strip_terminator(line);
        let mut fields = line.splitn(3, '\t');
        let (total, docs, token) = match (fields.next(), fields.next(), fields.next()) {
            (Some(total), Some(docs), Some(token)) => (total, docs, token),
            _ => return Err(FreqError::malformed(path, line_no, "expected three tab-separated fields")),
        };
        Ok(GlobalRecord {
            total: parse_count(path, line_no, total, "total")?,
            docs: parse_count(path, line_no, docs, "document count")?,
            token,
        })
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}\t{}\t{}", self.total, self.docs, self.token)
    }
}
