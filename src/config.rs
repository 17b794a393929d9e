//! Configuration for indexing, matching and workspace collection
//!
//! Options are plain serde structures so they can be read from a JSON config
//! file; every section validates itself and nothing is clamped silently.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SearchError;
use crate::search::FieldWeights;

/// Default dissimilarity threshold; loose enough for short informal queries
pub const DEFAULT_THRESHOLD: f64 = 0.95;
pub const DEFAULT_SNIPPET_CHARS: usize = 80;
pub const DEFAULT_CONTENT_PREFIX_CHARS: usize = 1000;
pub const DEFAULT_MIN_CONTENT_CHARS: usize = 10;
pub const DEFAULT_MAX_FILES: usize = 300;

/// Matching and ranking options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    pub weights: FieldWeights,
    /// Maximum tolerated distance in [0, 1]
    pub threshold: f64,
    pub case_sensitive: bool,
    /// Cap on returned results, applied after ranking
    pub limit: Option<usize>,
    /// Characters of content shown in a result snippet
    pub snippet_chars: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            weights: FieldWeights::default(),
            threshold: DEFAULT_THRESHOLD,
            case_sensitive: false,
            limit: None,
            snippet_chars: DEFAULT_SNIPPET_CHARS,
        }
    }
}

impl SearchOptions {
    pub fn with_weights(mut self, weights: FieldWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn validate(&self) -> Result<(), SearchError> {
        self.weights.validate()?;

        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(SearchError::InvalidThreshold(self.threshold));
        }
        if self.limit == Some(0) {
            return Err(SearchError::InvalidOption("limit must be at least 1".to_string()));
        }
        if self.snippet_chars == 0 {
            return Err(SearchError::InvalidOption(
                "snippet_chars must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Bounds applied while building a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexOptions {
    /// Content characters kept per document; later matches are unreachable
    pub content_prefix_chars: usize,
    /// Documents whose trimmed content is shorter are dropped
    pub min_content_chars: usize,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            content_prefix_chars: DEFAULT_CONTENT_PREFIX_CHARS,
            min_content_chars: DEFAULT_MIN_CONTENT_CHARS,
        }
    }
}

impl IndexOptions {
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.content_prefix_chars == 0 {
            return Err(SearchError::InvalidOption(
                "content_prefix_chars must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Which workspace files are offered to the indexer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorOptions {
    /// File extensions to index, without the leading dot
    pub extensions: Vec<String>,
    /// Directory names never descended into
    pub exclude_dirs: Vec<String>,
    pub max_files: usize,
}

impl Default for CollectorOptions {
    fn default() -> Self {
        Self {
            extensions: ["js", "ts", "jsx", "tsx", "md", "txt"]
                .into_iter()
                .map(String::from)
                .collect(),
            exclude_dirs: ["node_modules", ".git", "target"]
                .into_iter()
                .map(String::from)
                .collect(),
            max_files: DEFAULT_MAX_FILES,
        }
    }
}

impl CollectorOptions {
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.extensions.is_empty() {
            return Err(SearchError::InvalidOption(
                "at least one file extension is required".to_string(),
            ));
        }
        if self.max_files == 0 {
            return Err(SearchError::InvalidOption("max_files must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub search: SearchOptions,
    pub index: IndexOptions,
    pub collector: CollectorOptions,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), SearchError> {
        self.search.validate()?;
        self.index.validate()?;
        self.collector.validate()
    }
}

/// Get the path to the default configuration file
pub fn config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().context("Cannot determine config directory")?;

    Ok(config_dir.join("contextual-search").join("config.json"))
}

/// Load configuration from `path`, or from the default location.
///
/// A missing default file yields the defaults; an explicit path must exist.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => load_config_from(path)?,
        None => {
            let path = config_path()?;
            if path.exists() {
                load_config_from(&path)?
            } else {
                debug!("No config file at {}, using defaults", path.display());
                AppConfig::default()
            }
        }
    };

    config.validate()?;
    Ok(config)
}

/// Read and parse a configuration file
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    let config: AppConfig = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;

    debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Save the configuration to disk
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    let data = serde_json::to_string_pretty(config).context("Failed to serialize config")?;
    fs::write(path, data).context("Failed to write config file")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::Field;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.search.threshold, 0.95);
        assert_eq!(config.index.content_prefix_chars, 1000);
        assert_eq!(config.index.min_content_chars, 10);
        assert_eq!(config.collector.max_files, 300);
        assert!(config.collector.extensions.contains(&"tsx".to_string()));
    }

    #[test]
    fn test_threshold_out_of_range() {
        for threshold in [-0.1, 1.01, f64::NAN, f64::INFINITY] {
            let options = SearchOptions::default().with_threshold(threshold);
            assert!(matches!(
                options.validate(),
                Err(SearchError::InvalidThreshold(_))
            ));
        }
        assert!(SearchOptions::default().with_threshold(0.0).validate().is_ok());
        assert!(SearchOptions::default().with_threshold(1.0).validate().is_ok());
    }

    #[test]
    fn test_invalid_limits_rejected() {
        let options = SearchOptions {
            limit: Some(0),
            ..SearchOptions::default()
        };
        assert!(options.validate().is_err());

        let options = SearchOptions {
            snippet_chars: 0,
            ..SearchOptions::default()
        };
        assert!(options.validate().is_err());

        let collector = CollectorOptions {
            extensions: Vec::new(),
            ..CollectorOptions::default()
        };
        assert!(collector.validate().is_err());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "search": { "threshold": 0.4, "weights": { "name": 0.8 } } }"#,
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.search.threshold, 0.4);
        assert_eq!(config.search.weights.get(Field::Name), 0.8);
        assert_eq!(config.search.weights.get(Field::Content), 0.5);
        assert_eq!(config.index, IndexOptions::default());
    }

    #[test]
    fn test_invalid_file_values_fail_fast() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "search": { "weights": { "content": -2.0 } } }"#).unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.downcast_ref::<SearchError>().is_some());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = load_config(Some(&dir.path().join("absent.json")));
        assert!(result.is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let mut config = AppConfig::default();
        config.search.case_sensitive = true;
        config.collector.max_files = 42;

        save_config(&config, &path).unwrap();
        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
