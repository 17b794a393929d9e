//! Workspace file enumeration
//!
//! Walks a project tree and hands qualifying files to the indexer as raw
//! documents. All disk access for a search lives here.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::CollectorOptions;
use crate::search::RawDocument;

pub struct WorkspaceCollector {
    root: PathBuf,
    options: CollectorOptions,
}

impl WorkspaceCollector {
    pub fn new(root: impl Into<PathBuf>, options: CollectorOptions) -> Self {
        Self {
            root: root.into(),
            options,
        }
    }

    /// Collect up to `max_files` matching files in file-name order.
    ///
    /// Unreadable files are logged and skipped.
    pub fn collect(&self) -> Result<Vec<RawDocument>> {
        if !self.root.is_dir() {
            bail!("Workspace root is not a directory: {}", self.root.display());
        }

        let mut documents = Vec::new();
        let mut seen_files = 0usize;

        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_excluded(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("Skipping unreadable path: {}", err);
                    continue;
                }
            };

            if !entry.file_type().is_file() || !self.has_wanted_extension(entry.path()) {
                continue;
            }

            if seen_files >= self.options.max_files {
                info!("Reached the {} file limit", self.options.max_files);
                break;
            }
            seen_files += 1;

            match self.read_document(entry.path()) {
                Ok(doc) => documents.push(doc),
                Err(err) => warn!("Error reading file {}: {}", entry.path().display(), err),
            }
        }

        debug!(
            "Collected {} documents under {}",
            documents.len(),
            self.root.display()
        );
        Ok(documents)
    }

    fn is_excluded(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| self.options.exclude_dirs.iter().any(|d| d == name))
    }

    fn has_wanted_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.options
                    .extensions
                    .iter()
                    .any(|wanted| wanted.eq_ignore_ascii_case(ext))
            })
    }

    fn read_document(&self, path: &Path) -> Result<RawDocument> {
        let bytes = fs::read(path)?;
        let text = String::from_utf8_lossy(&bytes).into_owned();

        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let id = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let display_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| id.clone());

        Ok(RawDocument {
            id,
            display_name,
            text,
        })
    }
}
