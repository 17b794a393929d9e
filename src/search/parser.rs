//! Query Parser & Preprocessor
//!
//! Normalizes free-text queries and splits them into terms,
//! dropping stop words that carry no lexical signal.

use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

/// Stop words that should be excluded from per-term matching
const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is", "it",
    "its", "of", "on", "or", "that", "the", "to", "was", "will", "with", "i", "you",
];

/// Parsed and normalized search query
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedQuery {
    /// Original unmodified query
    pub original: String,
    /// NFKC-normalized query with whitespace collapsed, matched as one pattern
    pub whole_query: String,
    /// Distinct words (excluding stop words), in query order
    pub terms: Vec<String>,
}

impl ParsedQuery {
    /// True when nothing is left to match after normalization
    pub fn is_empty(&self) -> bool {
        self.whole_query.is_empty()
    }
}

/// Query parser and preprocessor
pub struct QueryParser;

impl QueryParser {
    /// Parse a search query into its components
    pub fn parse(query: &str, case_sensitive: bool) -> ParsedQuery {
        let original = query.to_string();
        let whole_query = Self::normalize(query, case_sensitive);
        let terms = Self::tokenize_and_filter(&whole_query);

        ParsedQuery {
            original,
            whole_query,
            terms,
        }
    }

    /// NFKC, optional lower-casing, single spaces between words
    fn normalize(query: &str, case_sensitive: bool) -> String {
        let normalized: String = query.nfkc().collect();
        let normalized = if case_sensitive {
            normalized
        } else {
            normalized.to_lowercase()
        };

        normalized.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Tokenize text into words, filter stop words and repeats
    fn tokenize_and_filter(text: &str) -> Vec<String> {
        let mut terms: Vec<String> = Vec::new();
        for word in text.unicode_words() {
            if Self::is_stop_word(word) || terms.iter().any(|t| t == word) {
                continue;
            }
            terms.push(word.to_string());
        }
        terms
    }

    /// Check if a word is a stop word
    fn is_stop_word(word: &str) -> bool {
        STOP_WORDS.iter().any(|stop| stop.eq_ignore_ascii_case(word))
    }
}
