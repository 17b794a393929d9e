//! CLI mode implementation
//!
//! Provides the command-line interface over the search engine

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::SearchOptions;
use crate::search::Field;

/// Contextual file search CLI
#[derive(Parser, Debug)]
#[command(name = "ctxsearch")]
#[command(about = "Typo-tolerant search over the text files of a project", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Project root to index
    #[arg(short = 'r', long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Configuration file (defaults to the user config directory)
    #[arg(short = 'c', long, global = true, env = "CTXSEARCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output (no short flag to avoid conflicts)
    #[arg(long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a single query and print ranked files
    Search(SearchArgs),
    /// Index once, then answer queries read from stdin
    Interactive(InteractiveArgs),
    /// Build the index and report what was included
    Index(IndexArgs),
    /// Print the effective configuration
    Config(ConfigArgs),
}

/// Search command arguments
#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Free-text query, e.g. "index file"
    pub query: String,

    #[command(flatten)]
    pub tuning: TuningArgs,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct InteractiveArgs {
    #[command(flatten)]
    pub tuning: TuningArgs,
}

#[derive(Args, Debug, Clone)]
pub struct IndexArgs {
    /// Print statistics as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Write the effective configuration to the config file
    #[arg(long)]
    pub write: bool,
}

/// Per-invocation overrides of the configured search options
#[derive(Args, Debug, Clone, Default)]
pub struct TuningArgs {
    /// Maximum tolerated dissimilarity, 0 (exact) to 1 (anything)
    #[arg(short = 't', long)]
    pub threshold: Option<f64>,

    /// Maximum number of results
    #[arg(short = 'l', long)]
    pub limit: Option<usize>,

    /// Weight of the file name
    #[arg(long, allow_negative_numbers = true)]
    pub name_weight: Option<f64>,

    /// Weight of the content prefix
    #[arg(long, allow_negative_numbers = true)]
    pub content_weight: Option<f64>,

    /// Weight of the relative path
    #[arg(long, allow_negative_numbers = true)]
    pub path_weight: Option<f64>,

    /// Match case exactly
    #[arg(long)]
    pub case_sensitive: bool,
}

impl TuningArgs {
    /// Apply the overrides on top of `options`; validation happens later
    pub fn apply(&self, mut options: SearchOptions) -> SearchOptions {
        if let Some(threshold) = self.threshold {
            options.threshold = threshold;
        }
        if self.limit.is_some() {
            options.limit = self.limit;
        }
        for (field, weight) in [
            (Field::Name, self.name_weight),
            (Field::Content, self.content_weight),
            (Field::Path, self.path_weight),
        ] {
            if let Some(weight) = weight {
                options.weights = options.weights.with(field, weight);
            }
        }
        if self.case_sensitive {
            options.case_sensitive = true;
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_search_args() {
        let cli = Cli::parse_from(["ctxsearch", "search", "index file", "--limit", "5", "--json"]);
        match cli.command {
            Commands::Search(args) => {
                assert_eq!(args.query, "index file");
                assert_eq!(args.tuning.limit, Some(5));
                assert!(args.json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(cli.root, PathBuf::from("."));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["ctxsearch", "index", "--root", "/tmp/project", "-v"]);
        assert!(cli.verbose);
        assert_eq!(cli.root, PathBuf::from("/tmp/project"));
    }

    #[test]
    fn test_tuning_overrides() {
        let tuning = TuningArgs {
            threshold: Some(0.3),
            name_weight: Some(0.0),
            path_weight: Some(0.25),
            case_sensitive: true,
            ..TuningArgs::default()
        };
        let options = tuning.apply(SearchOptions::default());

        assert_eq!(options.threshold, 0.3);
        assert_eq!(options.weights.get(Field::Name), 0.0);
        assert_eq!(options.weights.get(Field::Content), 0.5);
        assert_eq!(options.weights.get(Field::Path), 0.25);
        assert!(options.case_sensitive);
        assert_eq!(options.limit, None);
    }

    #[test]
    fn test_negative_weight_parses_then_fails_validation() {
        let cli = Cli::parse_from(["ctxsearch", "search", "q", "--name-weight", "-1"]);
        let Commands::Search(args) = cli.command else {
            panic!("expected search command");
        };
        let options = args.tuning.apply(SearchOptions::default());
        assert!(options.validate().is_err());
    }
}
