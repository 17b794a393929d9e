//! Approximate matching engine
//!
//! Scores a query against field text by the fewest edits (insertions,
//! deletions, substitutions) that turn the query into *some* substring of the
//! text. The scan is Myers' bit-parallel edit distance in its search form: the
//! top row of the dynamic-programming matrix is zero, so a match costs the
//! same wherever it sits in the text.
//!
//! Queries longer than one machine word are split into 64-character blocks
//! that are matched independently and whose edit counts are summed.

use std::collections::HashMap;

use unicode_normalization::UnicodeNormalization;

use super::parser::ParsedQuery;

/// Pattern characters handled by a single bit-parallel block
pub const BLOCK_CHARS: usize = 64;

/// Normalize text for matching
/// - Unicode NFKC (compatibility composition)
/// - Lower-case unless matching is case sensitive
/// - Whitespace runs collapsed to one space, as in parsed queries
pub fn normalize_for_matching(text: &str, case_sensitive: bool) -> Vec<char> {
    let normalized: String = text.nfkc().collect();
    let normalized = if case_sensitive {
        normalized
    } else {
        normalized.to_lowercase()
    };

    let mut chars = Vec::with_capacity(normalized.len());
    for word in normalized.split_whitespace() {
        if !chars.is_empty() {
            chars.push(' ');
        }
        chars.extend(word.chars());
    }
    chars
}

/// Up to 64 pattern characters with their match masks
#[derive(Debug, Clone)]
struct PatternBlock {
    peq: HashMap<char, u64>,
    len: usize,
}

impl PatternBlock {
    fn new(chars: &[char]) -> Self {
        debug_assert!(!chars.is_empty() && chars.len() <= BLOCK_CHARS);

        let mut peq: HashMap<char, u64> = HashMap::new();
        for (i, ch) in chars.iter().enumerate() {
            *peq.entry(*ch).or_insert(0) |= 1u64 << i;
        }

        Self {
            peq,
            len: chars.len(),
        }
    }

    /// Minimum edits between this block and any substring of `text`
    fn min_edits(&self, text: &[char]) -> usize {
        let high = 1u64 << (self.len - 1);
        let mut pv = u64::MAX;
        let mut mv = 0u64;
        let mut score = self.len;
        let mut best = self.len;

        for ch in text {
            let eq = self.peq.get(ch).copied().unwrap_or(0);
            let xv = eq | mv;
            let xh = ((eq & pv).wrapping_add(pv) ^ pv) | eq;
            let mut ph = mv | !(xh | pv);
            let mut mh = pv & xh;

            if ph & high != 0 {
                score += 1;
            } else if mh & high != 0 {
                score -= 1;
            }

            // No carry into the first row: a match may start anywhere.
            ph <<= 1;
            mh <<= 1;
            pv = mh | !(xv | ph);
            mv = ph & xv;

            if score < best {
                best = score;
                if best == 0 {
                    break;
                }
            }
        }

        best
    }
}

/// A compiled needle
#[derive(Debug, Clone)]
pub struct Pattern {
    blocks: Vec<PatternBlock>,
    len: usize,
}

impl Pattern {
    pub fn new(chars: &[char]) -> Self {
        Self {
            blocks: chars.chunks(BLOCK_CHARS).map(PatternBlock::new).collect(),
            len: chars.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Fewest edits that turn the pattern into a substring of `text`.
    /// Each block is placed independently.
    pub fn edit_distance(&self, text: &[char]) -> usize {
        self.blocks.iter().map(|block| block.min_edits(text)).sum()
    }

    /// Edit distance relative to the pattern length, in [0, 1].
    /// An empty pattern never matches and scores 1.0.
    pub fn distance(&self, text: &[char]) -> f64 {
        if self.is_empty() {
            return 1.0;
        }
        self.edit_distance(text) as f64 / self.len as f64
    }
}

/// Fuzzy matcher compiled from one parsed query
#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    whole: Pattern,
    terms: Vec<Pattern>,
}

impl FuzzyMatcher {
    pub fn new(query: &ParsedQuery) -> Self {
        let whole: Vec<char> = query.whole_query.chars().collect();

        // Per-term matching only adds information for multi-term queries.
        let terms = if query.terms.len() > 1 {
            query
                .terms
                .iter()
                .map(|term| Pattern::new(&term.chars().collect::<Vec<_>>()))
                .collect()
        } else {
            Vec::new()
        };

        Self {
            whole: Pattern::new(&whole),
            terms,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.whole.is_empty()
    }

    /// Distance between the query and field text, in [0, 1].
    ///
    /// The smaller of the whole-query distance and the mean per-term
    /// distance, so reordered terms still match closely.
    pub fn field_distance(&self, text: &[char]) -> f64 {
        let whole = self.whole.distance(text);
        if whole == 0.0 || self.terms.is_empty() {
            return whole;
        }

        let term_total: f64 = self.terms.iter().map(|term| term.distance(text)).sum();
        let terms = term_total / self.terms.len() as f64;

        whole.min(terms)
    }
}
