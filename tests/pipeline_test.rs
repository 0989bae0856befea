use std::fs;
use std::path::{Path, PathBuf};

use word_freqs::pipeline::{self, PipelineConfig};
use word_freqs::record::GlobalRecord;
use word_freqs::{FreqError, Language};

struct Corpus {
    dir: tempfile::TempDir,
}

impl Corpus {
    fn new() -> Self {
        Corpus {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, text: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, text).unwrap();
        path
    }

    /// Writes a manifest listing `inputs` and returns a two-worker config for it.
    fn config(&self, inputs: &[PathBuf]) -> PipelineConfig {
        let listing: String = inputs
            .iter()
            .map(|p| format!("{}\n", p.display()))
            .collect();
        let manifest = self.write("manifest.txt", &listing);
        let mut config = PipelineConfig::new(manifest, self.path("freqs"), self.path("total.freq"));
        config.workers = 2;
        config
    }
}

fn read_table(path: &Path) -> Vec<(u64, u64, String)> {
    let text = fs::read_to_string(path).unwrap();
    text.lines()
        .enumerate()
        .map(|(i, line)| {
            let rec = GlobalRecord::parse(path, i + 1, line).unwrap();
            (rec.total, rec.docs, rec.token.to_string())
        })
        .collect()
}

#[test]
fn test_two_file_corpus() {
    let corpus = Corpus::new();
    let a = corpus.write("a.bz2", "cat cat dog\n");
    let b = corpus.write("b.bz2", "dog dog mouse\n");
    let config = corpus.config(&[a, b]);

    let report = pipeline::run(&config).unwrap();
    assert_eq!(report.counted.len(), 2);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.merge.files, 2);
    assert_eq!(report.merge.rows, 3);
    assert_eq!(report.merge.tokens, 6);

    assert_eq!(fs::read_to_string(corpus.path("freqs/a.freq")).unwrap(), "2\tcat\n1\tdog\n");
    assert_eq!(fs::read_to_string(corpus.path("freqs/b.freq")).unwrap(), "2\tdog\n1\tmouse\n");
    assert_eq!(
        fs::read_to_string(&config.output).unwrap(),
        "2\t1\tcat\n3\t2\tdog\n1\t1\tmouse\n"
    );
}

#[test]
fn test_whitespace_never_reaches_the_tables() {
    let corpus = Corpus::new();
    let a = corpus.write("a.txt", "  spaced   out\n\n\t\ttabbed line\r\n\n");
    let b = corpus.write("b.txt", "\n\n   \n");
    let config = corpus.config(&[a, b]);

    pipeline::run(&config).unwrap();
    assert_eq!(fs::read_to_string(corpus.path("freqs/b.txt")).unwrap(), "");

    let table = read_table(&config.output);
    let tokens: Vec<&str> = table.iter().map(|(_, _, t)| t.as_str()).collect();
    assert_eq!(tokens, vec!["spaced", "out", "tabbed", "line"]);
    assert!(table.iter().all(|(total, docs, _)| *total == 1 && *docs == 1));
}

#[test]
fn test_multi_language_tokenizer() {
    let corpus = Corpus::new();
    let a = corpus.write("a.txt", "hello, world!\nhello again\n");
    let mut config = corpus.config(&[a]);
    config.language = Language::Multi;

    pipeline::run(&config).unwrap();
    let table = read_table(&config.output);
    assert_eq!(table[0], (2, 1, "hello".to_string()));
    assert!(table.iter().any(|(_, _, t)| t == ","));
    assert!(table.iter().all(|(_, _, t)| !t.trim().is_empty()));
}

#[test]
fn test_document_counts_across_many_files() {
    let corpus = Corpus::new();
    let inputs: Vec<PathBuf> = (0..9u8)
        .map(|i| {
            let name = format!("only{}", (b'a' + i) as char);
            corpus.write(&format!("part{}.txt", i), &format!("shared shared {}\n", name))
        })
        .collect();
    let config = corpus.config(&inputs);

    pipeline::run(&config).unwrap();
    let table = read_table(&config.output);
    assert_eq!(table.len(), 10);
    assert_eq!(table[0], (18, 9, "shared".to_string()));
    for i in 0..9u8 {
        assert!(table.contains(&(1, 1, format!("only{}", (b'a' + i) as char))));
    }
}

#[test]
fn test_failed_input_blocks_the_merge() {
    let corpus = Corpus::new();
    let good = corpus.write("good.txt", "fine words\n");
    let config = corpus.config(&[good, corpus.path("missing.txt")]);

    match pipeline::run(&config) {
        Err(FreqError::TasksFailed(failures)) => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].input, corpus.path("missing.txt"));
            assert!(matches!(failures[0].error, FreqError::Io { .. }));
        }
        other => panic!("expected TasksFailed, got {:?}", other),
    }
    assert!(corpus.path("freqs/good.txt").exists());
    assert!(!corpus.path("freqs/missing.txt").exists());
    assert!(!config.output.exists());
}

#[test]
fn test_skip_existing_reuses_earlier_outputs() {
    let corpus = Corpus::new();
    let fresh = corpus.write("fresh.txt", "new new\n");
    let config = corpus.config(&[corpus.path("gone.txt"), fresh]);
    fs::create_dir_all(&config.freqs_dir).unwrap();
    fs::write(corpus.path("freqs/gone.txt"), "5\told\n2\tnew\n").unwrap();

    assert!(matches!(pipeline::run(&config), Err(FreqError::TasksFailed(_))));

    let mut resumed = config.clone();
    resumed.skip_existing = true;
    let report = pipeline::run(&resumed).unwrap();
    assert_eq!(report.skipped, 2);
    assert!(report.counted.is_empty());
    assert_eq!(
        fs::read_to_string(&resumed.output).unwrap(),
        "5\t1\told\n4\t2\tnew\n"
    );
}

#[test]
fn test_colliding_outputs_are_rejected() {
    let corpus = Corpus::new();
    fs::create_dir_all(corpus.path("x")).unwrap();
    fs::create_dir_all(corpus.path("y")).unwrap();
    let first = corpus.write("x/a.bz2", "one\n");
    let second = corpus.write("y/a.bz2", "two\n");
    let config = corpus.config(&[first, second]);

    assert!(matches!(pipeline::run(&config), Err(FreqError::DuplicateOutput { .. })));
    assert!(!config.output.exists());
}

#[test]
fn test_corrupt_reused_output_fails_the_merge() {
    let corpus = Corpus::new();
    let config = corpus.config(&[corpus.path("old.txt")]);
    fs::create_dir_all(&config.freqs_dir).unwrap();
    fs::write(corpus.path("freqs/old.txt"), "seven\tword\n").unwrap();

    let mut resumed = config.clone();
    resumed.skip_existing = true;
    assert!(matches!(
        pipeline::run(&resumed),
        Err(FreqError::MalformedRecord { line: 1, .. })
    ));
    assert!(!resumed.output.exists());
}

#[test]
fn test_empty_manifest_writes_empty_table() {
    let corpus = Corpus::new();
    let config = corpus.config(&[]);
    let report = pipeline::run(&config).unwrap();
    assert!(report.counted.is_empty());
    assert_eq!(fs::read_to_string(&config.output).unwrap(), "");
}
