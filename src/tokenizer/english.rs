//! Rule-based English tokenizer.
//!
//! Text is split on single spaces first. Every non-space chunk then goes
//! through, in order: special-case lookup, whole-chunk token/URL matching,
//! repeated prefix stripping, repeated suffix stripping, and infix
//! splitting of whatever is left in the middle.

use std::sync::Arc;

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use fancy_regex::Regex;
use tracing::{debug, trace};

use super::rules::{self, SpecialCases};
use super::{is_space_char, Tokenizer};
use crate::error::FreqError;

#[derive(Debug, Clone)]
pub struct EnglishTokenizer {
    prefixes: Vec<Regex>,
    suffixes: Vec<Regex>,
    infix_patterns: Vec<Regex>,
    infix_literals: Option<AhoCorasick>,
    token_match: regex::Regex,
    url_match: Regex,
    special_cases: Arc<SpecialCases>,
}

impl EnglishTokenizer {
    pub fn new() -> Result<Self, FreqError> {
        let prefixes = rules::prefixes()
            .iter()
            .map(|p| Regex::new(&format!("^(?:{})", p)))
            .collect::<Result<Vec<_>, _>>()?;
        let suffixes = rules::suffixes()
            .iter()
            .map(|p| Regex::new(&format!("(?:{})$", p)))
            .collect::<Result<Vec<_>, _>>()?;
        let infix_patterns = rules::infix_patterns()
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        let literals = rules::infix_literals();
        // Literals are sorted longest first, so LeftmostFirst prefers the
        // longest literal starting at a given position.
        let infix_literals = if literals.is_empty() {
            None
        } else {
            Some(
                AhoCorasickBuilder::new()
                    .match_kind(MatchKind::LeftmostFirst)
                    .build(&literals)?,
            )
        };

        Ok(EnglishTokenizer {
            prefixes,
            suffixes,
            infix_patterns,
            infix_literals,
            token_match: regex::Regex::new(&rules::token_match())?,
            url_match: Regex::new(&rules::url_match())?,
            special_cases: Arc::new(rules::special_cases()),
        })
    }

    fn is_whole_token(&self, chunk: &str) -> bool {
        self.token_match.is_match(chunk)
            || checked(self.url_match.is_match(chunk), "url", chunk).unwrap_or(false)
    }

    /// Byte length of the first prefix found at the start of `text`.
    fn find_prefix(&self, text: &str) -> Option<usize> {
        self.prefixes.iter().find_map(|re| match checked(re.find(text), "prefix", text)? {
            Some(m) if m.start() == 0 && m.end() > 0 => Some(m.end()),
            _ => None,
        })
    }

    /// Byte offset where the first suffix found at the end of `text` starts.
    fn find_suffix(&self, text: &str) -> Option<usize> {
        self.suffixes.iter().find_map(|re| match checked(re.find(text), "suffix", text)? {
            Some(m) if m.end() == text.len() && m.start() < m.end() => Some(m.start()),
            _ => None,
        })
    }

    fn tokenize_chunk(&self, chunk: &str) -> Vec<String> {
        if let Some(pieces) = self.special_cases.get(chunk) {
            return pieces.clone();
        }
        if self.is_whole_token(chunk) {
            return vec![chunk.to_string()];
        }

        let mut tokens = Vec::new();
        let mut rest = chunk;

        while let Some(end) = self.find_prefix(rest) {
            tokens.push(rest[..end].to_string());
            rest = &rest[end..];
            if rest.is_empty() {
                break;
            }
        }

        let mut suffixes = Vec::new();
        while !rest.is_empty() {
            if self.special_cases.contains_key(rest) {
                break;
            }
            let Some(start) = self.find_suffix(rest) else {
                break;
            };
            suffixes.push(&rest[start..]);
            rest = &rest[..start];
        }

        if !rest.is_empty() {
            match self.special_cases.get(rest) {
                Some(pieces) => tokens.extend(pieces.iter().cloned()),
                None if self.is_whole_token(rest) => tokens.push(rest.to_string()),
                None => tokens.extend(self.split_infixes(rest).into_iter().map(str::to_string)),
            }
        }
        tokens.extend(suffixes.into_iter().rev().map(str::to_string));

        if tokens.is_empty() {
            tokens.push(chunk.to_string());
        }
        trace!(chunk, ?tokens, "tokenized chunk");
        tokens
    }

    fn split_infixes<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut spans: Vec<(usize, usize)> = Vec::new();
        if let Some(matcher) = &self.infix_literals {
            spans.extend(matcher.find_iter(text).map(|m| (m.start(), m.end())));
        }
        for re in &self.infix_patterns {
            spans.extend(
                re.find_iter(text)
                    .map_while(|m| checked(m, "infix", text))
                    .map(|m| (m.start(), m.end())),
            );
        }
        spans.retain(|&(start, end)| end > start);
        if spans.is_empty() {
            return vec![text];
        }

        // Leftmost first, longest first among equal starts; overlapping spans merge.
        spans.sort_by_key(|&(start, end)| (start, std::cmp::Reverse(end - start)));
        let mut merged: Vec<(usize, usize)> = Vec::with_capacity(spans.len());
        for (start, end) in spans {
            match merged.last_mut() {
                Some(last) if start < last.1 => last.1 = last.1.max(end),
                _ => merged.push((start, end)),
            }
        }

        let mut pieces = Vec::with_capacity(merged.len() * 2 + 1);
        let mut cursor = 0;
        for (start, end) in merged {
            if start > cursor {
                pieces.push(&text[cursor..start]);
            }
            pieces.push(&text[start..end]);
            cursor = end;
        }
        if cursor < text.len() {
            pieces.push(&text[cursor..]);
        }
        pieces
    }
}

/// A rule that fails at match time (backtrack limit, stack overflow) is
/// treated as not matching.
fn checked<T>(outcome: Result<T, fancy_regex::Error>, rule: &'static str, text: &str) -> Option<T> {
    match outcome {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(rule, text, error = %e, "rule failed, treated as no match");
            None
        }
    }
}

/// Alternating runs of whitespace and non-whitespace, tagged `true` for whitespace.
fn space_runs(text: &str) -> impl Iterator<Item = (bool, &str)> + '_ {
    let mut rest = text;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let space = is_space_char(first);
        let end = rest
            .char_indices()
            .find(|&(_, c)| is_space_char(c) != space)
            .map_or(rest.len(), |(i, _)| i);
        let (run, tail) = rest.split_at(end);
        rest = tail;
        Some((space, run))
    })
}

impl Tokenizer for EnglishTokenizer {
    /// A single space after a chunk is its separator and produces no token;
    /// any other whitespace comes back as a token of its own.
    fn tokenize(&self, text: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        let mut after_chunk = false;
        for (space, run) in space_runs(text) {
            if space {
                let run = if after_chunk {
                    run.strip_prefix(' ').unwrap_or(run)
                } else {
                    run
                };
                if !run.is_empty() {
                    tokens.push(run.to_string());
                }
                after_chunk = false;
            } else {
                tokens.extend(self.tokenize_chunk(run));
                after_chunk = true;
            }
        }
        tokens
    }
}
