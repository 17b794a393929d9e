use proptest::prelude::*;

use super::document::{build_snapshot, Field, RawDocument, Snapshot};
use super::engine::{SearchEngine, ELLIPSIS};
use super::ranking::FieldWeights;
use crate::config::SearchOptions;

fn corpus() -> impl Strategy<Value = Vec<(String, String)>> {
    proptest::collection::vec(("[a-z]{1,10}\\.(md|ts|txt)", "[a-z ]{0,120}"), 0..12)
}

fn snapshot_from(entries: &[(String, String)]) -> Snapshot {
    build_snapshot(
        entries
            .iter()
            .enumerate()
            .map(|(i, (name, text))| {
                RawDocument::new(format!("{}/{}", i, name), name.clone(), text.clone())
            }),
    )
}

// Results are always sorted by descending score and scores stay in [0, 1]
proptest! {
    #[test]
    fn results_sorted_by_score(entries in corpus(), query in "[a-z]{1,6}( [a-z]{1,6})?") {
        let snapshot = snapshot_from(&entries);
        let results = SearchEngine::default().search(&snapshot, &query);

        for pair in results.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
        for result in &results {
            prop_assert!((0.0..=1.0).contains(&result.score));
        }
    }
}

// The same query against the same snapshot yields identical output
proptest! {
    #[test]
    fn search_is_deterministic(entries in corpus(), query in "[a-z ]{1,12}") {
        let snapshot = snapshot_from(&entries);
        let engine = SearchEngine::default();

        prop_assert_eq!(engine.search(&snapshot, &query), engine.search(&snapshot, &query));
    }
}

// A stricter threshold never admits more documents than a looser one
proptest! {
    #[test]
    fn threshold_is_monotonic(
        entries in corpus(),
        query in "[a-z]{1,8}",
        a in 0.0f64..=1.0,
        b in 0.0f64..=1.0,
    ) {
        let (strict, loose) = if a <= b { (a, b) } else { (b, a) };
        let snapshot = snapshot_from(&entries);

        let ids = |threshold: f64| -> Vec<String> {
            let options = SearchOptions::default().with_threshold(threshold);
            SearchEngine::new(options)
                .unwrap()
                .search(&snapshot, &query)
                .into_iter()
                .map(|r| r.document_id)
                .collect()
        };
        let strict_ids = ids(strict);
        let loose_ids = ids(loose);

        prop_assert!(strict_ids.len() <= loose_ids.len());
        for id in &strict_ids {
            prop_assert!(loose_ids.contains(id));
        }
    }
}

// Content that contains the whole query scores exactly 1.0 on the content field,
// whatever whitespace separates the query words
proptest! {
    #[test]
    fn contained_query_scores_one(
        prefix in "[a-z ]{0,40}",
        query in "[a-z]{1,8}(\\s{1,3}[a-z]{1,8}){0,2}",
        suffix in "[a-z ]{0,40}",
    ) {
        let content = format!("{} {} {} padding", prefix, query, suffix);
        let snapshot = build_snapshot(vec![RawDocument::new("doc", "doc.txt", content)]);
        let options = SearchOptions::default().with_weights(FieldWeights::only(Field::Content));
        let results = SearchEngine::new(options).unwrap().search(&snapshot, &query);

        prop_assert_eq!(results.len(), 1);
        prop_assert_eq!(results[0].score, 1.0);
    }
}

// Near-empty documents never show up, whatever the query
proptest! {
    #[test]
    fn short_documents_never_returned(short in "[a-z ]{0,9}", query in "[a-z]{1,6}") {
        let snapshot = build_snapshot(vec![
            RawDocument::new("short", "short.md", short.clone()),
            RawDocument::new("long", "long.md", "a document long enough to be indexed"),
        ]);
        let options = SearchOptions::default().with_threshold(1.0);
        let results = SearchEngine::new(options).unwrap().search(&snapshot, &query);

        prop_assert!(results.iter().all(|r| r.document_id != "short"));
    }
}

// Snippets never exceed the display bound plus the ellipsis
proptest! {
    #[test]
    fn snippet_is_bounded(text in "[a-z ]{10,400}", bound in 1usize..120) {
        let snapshot = build_snapshot(vec![RawDocument::new("doc", "doc.txt", text.clone())]);
        let options = SearchOptions {
            snippet_chars: bound,
            threshold: 1.0,
            ..SearchOptions::default()
        };
        let results = SearchEngine::new(options).unwrap().search(&snapshot, "doc");

        for result in &results {
            prop_assert!(result.snippet.chars().count() <= bound + ELLIPSIS.len());
        }
    }
}
