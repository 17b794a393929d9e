//! Approximate file search over an immutable snapshot
//!
//! The indexer normalises raw documents into a [`Snapshot`]; the engine scores
//! each document's weighted fields against a query with a location-independent
//! edit distance and returns a stable, descending ranking.

pub mod document;
pub mod engine;
pub mod fuzzy;
pub mod parser;
pub mod ranking;

#[cfg(test)]
mod property_tests;

pub use document::{build_snapshot, Document, Field, IndexStats, Indexer, RawDocument, Snapshot};
pub use engine::{make_snippet, search, MatchResult, SearchEngine};
pub use fuzzy::FuzzyMatcher;
pub use parser::{ParsedQuery, QueryParser};
pub use ranking::{FieldScore, FieldWeights, MatchScore};
