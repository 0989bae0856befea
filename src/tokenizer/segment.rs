use unicode_segmentation::UnicodeSegmentation;

use super::Tokenizer;

/// Splits on UAX #29 word boundaries. Whitespace and punctuation segments
/// are returned as tokens in their own right.
#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentTokenizer;

impl Tokenizer for SegmentTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_word_bounds().map(str::to_string).collect()
    }
}
