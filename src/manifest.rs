//! Corpus manifest: the ordered list of input files, and the plan that
//! maps each one to its frequency file.

use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use crate::error::FreqError;
use crate::shard::ShardTask;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub inputs: Vec<PathBuf>,
}

/// What a run has to do: every output the merge will read, and the subset
/// of inputs that still need counting.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    pub outputs: Vec<PathBuf>,
    pub tasks: Vec<ShardTask>,
    pub skipped: usize,
}

/// `<freqs_dir>/<input file name with "bz2" replaced by "freq">`.
pub fn output_path(freqs_dir: &Path, input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.to_string_lossy().into_owned());
    freqs_dir.join(name.replace("bz2", "freq"))
}

impl Manifest {
    /// One path per line; surrounding whitespace is trimmed and blank lines are ignored.
    pub fn parse(text: &str) -> Self {
        let inputs = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(PathBuf::from)
            .collect();
        Manifest { inputs }
    }

    pub fn load(path: &Path) -> Result<Self, FreqError> {
        let text = fs::read_to_string(path).map_err(|e| FreqError::io(path, e))?;
        Ok(Self::parse(&text))
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Maps every input to its output. With `skip_existing`, inputs whose
    /// output `exists` reports as present are left out of `tasks` but kept in
    /// `outputs`. Two inputs sharing an output path are rejected.
    pub fn plan<F>(&self, freqs_dir: &Path, skip_existing: bool, exists: F) -> Result<Plan, FreqError>
    where
        F: Fn(&Path) -> bool,
    {
        let mut plan = Plan::default();
        let mut claimed: FxHashMap<PathBuf, &Path> = FxHashMap::default();
        for input in &self.inputs {
            let output = output_path(freqs_dir, input);
            if let Some(first) = claimed.insert(output.clone(), input.as_path()) {
                return Err(FreqError::DuplicateOutput {
                    first: first.to_path_buf(),
                    second: input.clone(),
                    output,
                });
            }
            if skip_existing && exists(&output) {
                plan.skipped += 1;
            } else {
                plan.tasks.push(ShardTask::new(input.clone(), output.clone()));
            }
            plan.outputs.push(output);
        }
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_parse_skips_blank_lines() {
        let manifest = Manifest::parse("/data/a.bz2\n\n   \n  /data/b.bz2  \n/data/c.txt");
        assert_eq!(
            manifest.inputs,
            vec![
                PathBuf::from("/data/a.bz2"),
                PathBuf::from("/data/b.bz2"),
                PathBuf::from("/data/c.txt")
            ]
        );
    }

    #[test]
    fn test_output_path_swaps_suffix() {
        let dir = Path::new("/freqs");
        assert_eq!(output_path(dir, Path::new("/corpus/2015/RC_01.bz2")), PathBuf::from("/freqs/RC_01.freq"));
        assert_eq!(output_path(dir, Path::new("plain.txt")), PathBuf::from("/freqs/plain.txt"));
    }

    #[test]
    fn test_plan_without_skipping_counts_everything() {
        let manifest = Manifest::parse("a.bz2\nb.bz2\n");
        let plan = manifest.plan(Path::new("out"), false, |_| true).unwrap();
        assert_eq!(plan.tasks.len(), 2);
        assert_eq!(plan.skipped, 0);
        assert_eq!(plan.outputs, vec![PathBuf::from("out/a.freq"), PathBuf::from("out/b.freq")]);
    }

    #[test]
    fn test_plan_skips_existing_but_keeps_outputs() {
        let manifest = Manifest::parse("a.bz2\nb.bz2\nc.bz2\n");
        let present: HashSet<PathBuf> = [PathBuf::from("out/b.freq")].into_iter().collect();
        let plan = manifest
            .plan(Path::new("out"), true, |p| present.contains(p))
            .unwrap();
        assert_eq!(plan.skipped, 1);
        let inputs: Vec<&Path> = plan.tasks.iter().map(|t| t.input.as_path()).collect();
        assert_eq!(inputs, vec![Path::new("a.bz2"), Path::new("c.bz2")]);
        assert_eq!(plan.outputs.len(), 3);
    }

    #[test]
    fn test_plan_rejects_colliding_outputs() {
        let manifest = Manifest::parse("x/a.bz2\ny/a.bz2\n");
        match manifest.plan(Path::new("out"), false, |_| false) {
            Err(FreqError::DuplicateOutput { first, second, output }) => {
                assert_eq!(first, PathBuf::from("x/a.bz2"));
                assert_eq!(second, PathBuf::from("y/a.bz2"));
                assert_eq!(output, PathBuf::from("out/a.freq"));
            }
            other => panic!("expected DuplicateOutput, got {:?}", other),
        }
    }
}
