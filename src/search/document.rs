//! Documents, snapshots and the indexer
//!
//! The indexer turns raw `(id, display name, text)` triples handed over by a
//! file-enumeration collaborator into an immutable [`Snapshot`]. Each field is
//! normalised once here so that every query against the snapshot reuses the
//! prepared character buffers.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::fuzzy::normalize_for_matching;
use crate::config::IndexOptions;
use crate::error::Result;

/// Searchable attribute of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    /// Short display name (base filename)
    Name,
    /// Bounded prefix of the document text
    Content,
    /// Document identifier, usually a relative path
    Path,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Name, Field::Content, Field::Path];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Content => "content",
            Field::Path => "path",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input record supplied by the enumeration layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    pub id: String,
    pub display_name: String,
    pub text: String,
}

impl RawDocument {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            text: text.into(),
        }
    }
}

/// Field text kept in its raw form plus the two matching forms
#[derive(Debug, Clone)]
pub struct FieldText {
    raw: String,
    exact: Vec<char>,
    folded: Vec<char>,
}

impl FieldText {
    fn new(raw: String) -> Self {
        let exact = normalize_for_matching(&raw, true);
        let folded = normalize_for_matching(&raw, false);
        Self { raw, exact, folded }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Characters the matcher scans, case-folded unless `case_sensitive`
    pub(crate) fn chars(&self, case_sensitive: bool) -> &[char] {
        if case_sensitive {
            &self.exact
        } else {
            &self.folded
        }
    }
}

/// One corpus entry
#[derive(Debug, Clone)]
pub struct Document {
    id: String,
    display_name: String,
    fields: BTreeMap<Field, FieldText>,
}

impl Document {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Raw text of a field, empty when the field is absent
    pub fn field(&self, field: Field) -> &str {
        self.fields.get(&field).map(FieldText::as_str).unwrap_or("")
    }

    pub(crate) fn field_text(&self, field: Field) -> Option<&FieldText> {
        self.fields.get(&field)
    }
}

/// Counters collected while building a snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    /// Raw documents offered to the indexer
    pub offered: usize,
    /// Documents stored in the snapshot
    pub indexed: usize,
    /// Dropped because the trimmed content was too short
    pub skipped_short: usize,
    /// Dropped because the identifier was empty
    pub skipped_malformed: usize,
    /// Dropped because the identifier was already present
    pub skipped_duplicate: usize,
    /// Stored with content cut to the prefix bound
    pub truncated: usize,
}

/// Immutable, ordered view of an indexed corpus
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    documents: Vec<Document>,
    stats: IndexStats,
}

impl Snapshot {
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|doc| doc.id == id)
    }

    pub fn stats(&self) -> IndexStats {
        self.stats
    }
}

/// Builds snapshots from raw documents
#[derive(Debug, Clone)]
pub struct Indexer {
    options: IndexOptions,
}

impl Indexer {
    /// Create an indexer, rejecting invalid bounds
    pub fn new(options: IndexOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    /// Normalise every raw document into a snapshot entry.
    ///
    /// Documents with an empty id, a repeated id, or trimmed content shorter
    /// than `min_content_chars` are skipped; none of these fail the build.
    pub fn build_snapshot<I>(&self, raw_documents: I) -> Snapshot
    where
        I: IntoIterator<Item = RawDocument>,
    {
        let mut stats = IndexStats::default();
        let mut seen = HashSet::new();
        let mut documents = Vec::new();

        for raw in raw_documents {
            stats.offered += 1;

            if raw.id.trim().is_empty() {
                debug!("Skipping document with empty id");
                stats.skipped_malformed += 1;
                continue;
            }

            if raw.text.trim().chars().count() < self.options.min_content_chars {
                debug!("Skipping near-empty document: {}", raw.id);
                stats.skipped_short += 1;
                continue;
            }

            if !seen.insert(raw.id.clone()) {
                debug!("Skipping duplicate document id: {}", raw.id);
                stats.skipped_duplicate += 1;
                continue;
            }

            let (content, truncated) = truncate_chars(&raw.text, self.options.content_prefix_chars);
            if truncated {
                stats.truncated += 1;
            }

            let display_name = if raw.display_name.trim().is_empty() {
                base_name(&raw.id).to_string()
            } else {
                raw.display_name
            };

            let mut fields = BTreeMap::new();
            fields.insert(Field::Name, FieldText::new(display_name.clone()));
            fields.insert(Field::Content, FieldText::new(content.to_string()));
            fields.insert(Field::Path, FieldText::new(raw.id.clone()));

            documents.push(Document {
                id: raw.id,
                display_name,
                fields,
            });
        }

        stats.indexed = documents.len();
        info!(
            "Indexed {} of {} documents ({} too short, {} malformed, {} duplicate)",
            stats.indexed,
            stats.offered,
            stats.skipped_short,
            stats.skipped_malformed,
            stats.skipped_duplicate
        );

        Snapshot { documents, stats }
    }
}

/// Build a snapshot with the default index options
pub fn build_snapshot<I>(raw_documents: I) -> Snapshot
where
    I: IntoIterator<Item = RawDocument>,
{
    Indexer {
        options: IndexOptions::default(),
    }
    .build_snapshot(raw_documents)
}

/// First `max_chars` characters of `text`, and whether anything was cut
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => (&text[..byte_idx], true),
        None => (text, false),
    }
}

fn base_name(id: &str) -> &str {
    id.rsplit(['/', '\\'])
        .find(|segment| !segment.is_empty())
        .unwrap_or(id)
}
