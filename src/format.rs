//! Presentation of search results for the terminal
//!
//! Mirrors a picker list: a label, the snippet as a description, and the
//! document path with its score as detail.

use nucleo_matcher::pattern::{CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};
use unicode_segmentation::UnicodeSegmentation;

use crate::search::{IndexStats, MatchResult};

/// Format search results as markdown-flavoured text
pub fn format_search_results(results: &[MatchResult], query: &str) -> String {
    if results.is_empty() {
        return format!("No results found for query: {}", query);
    }

    let mut matcher = Matcher::new(Config::DEFAULT);
    let mut output = format!("Found {} results for \"{}\":\n", results.len(), query);

    for (i, result) in results.iter().enumerate() {
        let label = highlight(&result.display_name, query, &mut matcher);
        output.push_str(&format!("\n{}. {}\n", i + 1, label));

        let snippet = single_line(&result.snippet);
        if !snippet.is_empty() {
            output.push_str(&format!("   {}\n", snippet));
        }

        output.push_str(&format!(
            "   {} (Score: {:.3})\n",
            result.document_id, result.score
        ));
    }

    output
}

/// Serialize results as pretty JSON
pub fn format_results_json(results: &[MatchResult]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(results)
}

/// Summary of a snapshot build
pub fn format_index_stats(stats: &IndexStats) -> String {
    format!(
        "Indexed {} of {} files\n  too short: {}\n  malformed: {}\n  duplicate: {}\n  truncated: {}",
        stats.indexed,
        stats.offered,
        stats.skipped_short,
        stats.skipped_malformed,
        stats.skipped_duplicate,
        stats.truncated
    )
}

/// Collapse all whitespace runs so a snippet fits on one line
fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Wrap characters of `text` matched by any query word in **bold**.
///
/// Highlighting is display only; each word is matched independently and
/// words that do not occur leave the label untouched.
fn highlight(text: &str, query: &str, matcher: &mut Matcher) -> String {
    let pattern = Pattern::parse(query, CaseMatching::Ignore, Normalization::Smart);

    let mut buf = Vec::new();
    let mut indices: Vec<u32> = Vec::new();
    for atom in &pattern.atoms {
        let haystack = Utf32Str::new(text, &mut buf);
        let mut atom_indices = Vec::new();
        if atom.indices(haystack, matcher, &mut atom_indices).is_some() {
            indices.extend(atom_indices);
        }
    }

    if indices.is_empty() {
        return text.to_string();
    }
    indices.sort_unstable();
    indices.dedup();

    let mut result = String::new();
    let mut in_match = false;
    for (i, grapheme) in text.graphemes(true).enumerate() {
        let matched = indices.binary_search(&(i as u32)).is_ok();
        if matched != in_match {
            result.push_str("**");
            in_match = matched;
        }
        result.push_str(grapheme);
    }
    if in_match {
        result.push_str("**");
    }

    result
}
