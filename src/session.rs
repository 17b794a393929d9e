//! Search session state
//!
//! A session owns at most one snapshot and reuses it across queries until it
//! is reloaded. "Never indexed" and "indexed but empty" stay distinguishable.

use std::sync::Arc;

use tracing::info;

use crate::config::{IndexOptions, SearchOptions};
use crate::error::{validate_query, Result, SearchError};
use crate::search::{Indexer, MatchResult, RawDocument, SearchEngine, Snapshot};

pub struct SearchSession {
    indexer: Indexer,
    engine: SearchEngine,
    snapshot: Option<Arc<Snapshot>>,
}

impl SearchSession {
    pub fn new(index: IndexOptions, search: SearchOptions) -> Result<Self> {
        Ok(Self {
            indexer: Indexer::new(index)?,
            engine: SearchEngine::new(search)?,
            snapshot: None,
        })
    }

    /// Build a fresh snapshot, replacing any previous one
    pub fn load<I>(&mut self, raw_documents: I) -> Arc<Snapshot>
    where
        I: IntoIterator<Item = RawDocument>,
    {
        let snapshot = Arc::new(self.indexer.build_snapshot(raw_documents));
        info!("Session snapshot ready with {} documents", snapshot.len());
        self.snapshot = Some(Arc::clone(&snapshot));
        snapshot
    }

    pub fn is_indexed(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.snapshot.clone()
    }

    /// Validate the query and run it against the current snapshot
    pub fn search(&self, query: &str) -> Result<Vec<MatchResult>> {
        validate_query(query)?;
        let snapshot = self.snapshot.as_ref().ok_or(SearchError::NotIndexed)?;
        Ok(self.engine.search(snapshot, query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> SearchSession {
        SearchSession::new(IndexOptions::default(), SearchOptions::default()).unwrap()
    }

    #[test]
    fn test_search_before_load_is_not_indexed() {
        let session = session();
        assert!(!session.is_indexed());
        assert_eq!(session.search("anything"), Err(SearchError::NotIndexed));
    }

    #[test]
    fn test_empty_query_rejected_at_boundary() {
        let mut session = session();
        session.load(vec![RawDocument::new("a.md", "a.md", "some useful content")]);
        assert_eq!(session.search(""), Err(SearchError::EmptyQuery));
        assert_eq!(session.search("   "), Err(SearchError::EmptyQuery));
    }

    #[test]
    fn test_empty_snapshot_is_indexed_but_finds_nothing() {
        let mut session = session();
        let snapshot = session.load(Vec::new());

        assert!(session.is_indexed());
        assert!(snapshot.is_empty());
        assert_eq!(session.search("query"), Ok(Vec::new()));
    }

    #[test]
    fn test_reload_replaces_snapshot() {
        let mut session = session();
        session.load(vec![RawDocument::new("old.md", "old.md", "legacy documentation")]);
        let first = session.snapshot().unwrap();

        session.load(vec![RawDocument::new("new.md", "new.md", "fresh documentation")]);
        let second = session.snapshot().unwrap();

        // Earlier handles keep seeing their own snapshot
        assert!(first.get("old.md").is_some());
        assert!(second.get("old.md").is_none());
        assert_eq!(session.search("fresh").unwrap()[0].document_id, "new.md");
    }

    #[test]
    fn test_invalid_options_rejected() {
        let options = SearchOptions::default().with_threshold(-1.0);
        assert!(SearchSession::new(IndexOptions::default(), options).is_err());
    }
}
