//! contextual-search: typo-tolerant ranking of project files
//!
//! The [`search`] module is the engine: an indexer that turns raw documents
//! into an immutable snapshot, and a matcher that ranks snapshot documents by
//! weighted, location-independent edit distance. The remaining modules are
//! host plumbing used by the `ctxsearch` binary.

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod search;
pub mod session;
pub mod workspace;

pub use config::{AppConfig, CollectorOptions, IndexOptions, SearchOptions};
pub use error::{validate_query, SearchError};
pub use search::{build_snapshot, search, Field, FieldWeights, MatchResult, RawDocument, Snapshot};
pub use session::SearchSession;
