//! Tokenizers the per-file counter can be driven by.
//!
//! A tokenizer turns one unit of text (a line, terminator included) into
//! surface tokens. Whitespace runs may come back as tokens of their own;
//! callers decide what to do with them via [`is_blank`].

pub mod english;
pub mod rules;
pub mod segment;

use std::fmt;
use std::str::FromStr;

use unicode_general_category::{get_general_category, GeneralCategory};

use crate::error::FreqError;

pub use english::EnglishTokenizer;
pub use segment::SegmentTokenizer;

pub trait Tokenizer {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Selects which tokenizer a pipeline run builds for its workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    /// Rule-based English tokenizer.
    #[default]
    English,
    /// Unicode word boundaries, no language-specific rules.
    Multi,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Multi => "xx",
        }
    }

    /// Compiles the tokenizer for this language. Workers clone the result.
    pub fn tokenizer(self) -> Result<LanguageTokenizer, FreqError> {
        Ok(match self {
            Language::English => LanguageTokenizer::English(EnglishTokenizer::new()?),
            Language::Multi => LanguageTokenizer::Multi(SegmentTokenizer),
        })
    }
}

impl FromStr for Language {
    type Err = FreqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Language::English),
            "xx" | "multi" => Ok(Language::Multi),
            other => Err(FreqError::UnknownLanguage(other.to_string())),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone)]
pub enum LanguageTokenizer {
    English(EnglishTokenizer),
    Multi(SegmentTokenizer),
}

impl Tokenizer for LanguageTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        match self {
            LanguageTokenizer::English(t) => t.tokenize(text),
            LanguageTokenizer::Multi(t) => t.tokenize(text),
        }
    }
}

impl<T: Tokenizer + ?Sized> Tokenizer for &T {
    fn tokenize(&self, text: &str) -> Vec<String> {
        (**self).tokenize(text)
    }
}

pub fn is_space_char(c: char) -> bool {
    matches!(c, '\t'..='\r' | '\u{1c}'..='\u{1f}' | '\u{85}')
        || matches!(
            get_general_category(c),
            GeneralCategory::SpaceSeparator
                | GeneralCategory::LineSeparator
                | GeneralCategory::ParagraphSeparator
        )
}

/// True when `token` has no visible content. The empty string counts as blank.
pub fn is_blank(token: &str) -> bool {
    token.chars().all(is_space_char)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_tokens() {
        for token in [" ", "\n", "\t\t", "\r\n", "\u{a0}", "\u{3000}", "\u{2028}", "\u{85}", ""] {
            assert!(is_blank(token), "{:?} should be blank", token);
        }
    }

    #[test]
    fn test_visible_tokens() {
        for token in ["a", " a", "\u{200b}", ".", "\n-"] {
            assert!(!is_blank(token), "{:?} should not be blank", token);
        }
    }

    #[test]
    fn test_language_parsing() {
        assert_eq!("en".parse::<Language>().unwrap(), Language::English);
        assert_eq!("XX".parse::<Language>().unwrap(), Language::Multi);
        assert!(matches!("klingon".parse::<Language>(), Err(FreqError::UnknownLanguage(_))));
        assert_eq!(Language::Multi.to_string(), "xx");
    }

    #[test]
    fn test_every_language_builds() {
        for lang in [Language::English, Language::Multi] {
            let tokenizer = lang.tokenizer().unwrap();
            assert!(tokenizer.tokenize("plain words").contains(&"words".to_string()));
        }
    }
}
