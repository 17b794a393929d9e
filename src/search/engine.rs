//! Search Engine Integration
//!
//! Ties together query parsing, fuzzy matching, and ranking
//! to answer one query against an immutable snapshot.

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use super::document::{truncate_chars, Document, Field, Snapshot};
use super::fuzzy::FuzzyMatcher;
use super::parser::QueryParser;
use super::ranking::MatchScore;
use crate::config::SearchOptions;
use crate::error::Result;

/// Appended to snippets cut at the display bound
pub const ELLIPSIS: &str = "...";

/// One ranked hit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub document_id: String,
    pub display_name: String,
    /// Display excerpt of the content field, not used for ranking
    pub snippet: String,
    /// Relevance in [0, 1], higher is better
    pub score: f64,
}

/// Search engine holding validated options
#[derive(Debug, Clone, Default)]
pub struct SearchEngine {
    options: SearchOptions,
}

impl SearchEngine {
    /// Create a search engine, failing fast on invalid options
    pub fn new(options: SearchOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    /// Rank the snapshot's documents against `query`.
    ///
    /// Results are sorted by score, highest first; equal scores keep snapshot
    /// order. A query that is empty after normalization matches nothing.
    pub fn search(&self, snapshot: &Snapshot, query: &str) -> Vec<MatchResult> {
        let parsed = QueryParser::parse(query, self.options.case_sensitive);
        if parsed.is_empty() || snapshot.is_empty() {
            return Vec::new();
        }

        let matcher = FuzzyMatcher::new(&parsed);

        // Sort on the exposed score; equal scores fall back to snapshot order.
        let mut scored: Vec<(usize, f64)> = snapshot
            .documents()
            .par_iter()
            .enumerate()
            .filter_map(|(idx, doc)| {
                self.score_with(&matcher, doc)
                    .map(|score| (idx, score.display_score()))
            })
            .collect();

        scored.sort_by(|(a_idx, a), (b_idx, b)| b.total_cmp(a).then(a_idx.cmp(b_idx)));

        if let Some(limit) = self.options.limit {
            scored.truncate(limit);
        }

        debug!(
            "Query {:?}: {} of {} documents matched",
            parsed.whole_query,
            scored.len(),
            snapshot.len()
        );

        let documents = snapshot.documents();
        scored
            .into_iter()
            .map(|(idx, score)| self.to_result(&documents[idx], score))
            .collect()
    }

    /// Score a single document, None when it does not match
    pub fn score_document(&self, document: &Document, query: &str) -> Option<MatchScore> {
        let parsed = QueryParser::parse(query, self.options.case_sensitive);
        if parsed.is_empty() {
            return None;
        }
        self.score_with(&FuzzyMatcher::new(&parsed), document)
    }

    fn score_with(&self, matcher: &FuzzyMatcher, document: &Document) -> Option<MatchScore> {
        let field_distances: Vec<(Field, f64)> = self
            .options
            .weights
            .weighted_fields()
            .map(|(field, _)| {
                let distance = document
                    .field_text(field)
                    .map(|text| matcher.field_distance(text.chars(self.options.case_sensitive)))
                    .unwrap_or(1.0);
                (field, distance)
            })
            .collect();

        MatchScore::combine(&field_distances, &self.options.weights, self.options.threshold)
    }

    fn to_result(&self, document: &Document, score: f64) -> MatchResult {
        MatchResult {
            document_id: document.id().to_string(),
            display_name: document.display_name().to_string(),
            snippet: make_snippet(document.field(Field::Content), self.options.snippet_chars),
            score,
        }
    }
}

/// Validate `options` and run one query
pub fn search(
    snapshot: &Snapshot,
    query: &str,
    options: &SearchOptions,
) -> Result<Vec<MatchResult>> {
    let engine = SearchEngine::new(options.clone())?;
    Ok(engine.search(snapshot, query))
}

/// First `max_chars` characters of `content`, with an ellipsis when cut
pub fn make_snippet(content: &str, max_chars: usize) -> String {
    let (prefix, truncated) = truncate_chars(content, max_chars);
    if truncated {
        format!("{}{}", prefix, ELLIPSIS)
    } else {
        prefix.to_string()
    }
}
