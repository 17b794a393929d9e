//! ctxsearch CLI
//!
//! Indexes the text files under a project root and answers free-text queries
//! with a ranked list of matching files:
//! - `search <query>` - one-shot query
//! - `interactive` - index once, answer queries from stdin
//! - `index` - report what the index would contain
//! - `config` - show or write the effective configuration

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use contextual_search::cli::{
    Cli, Commands, ConfigArgs, IndexArgs, InteractiveArgs, SearchArgs, TuningArgs,
};
use contextual_search::config::{config_path, load_config, save_config, AppConfig};
use contextual_search::format::{format_index_stats, format_results_json, format_search_results};
use contextual_search::workspace::WorkspaceCollector;
use contextual_search::{SearchError, SearchSession};

fn main() {
    let cli = Cli::parse();

    // Initialize logging based on verbosity flags
    let log_level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr) // Log to stderr to keep stdout clean
        .init();

    match run(cli) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(get_exit_code(&e));
        }
    }
}

fn run(cli: Cli) -> Result<String> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Search(args) => execute_search(&cli.root, config, args),
        Commands::Interactive(args) => execute_interactive(&cli.root, config, args),
        Commands::Index(args) => execute_index(&cli.root, config, args),
        Commands::Config(args) => execute_config(cli.config.as_deref(), config, args),
    }
}

/// Collect the workspace and build a session snapshot
fn open_session(root: &Path, config: AppConfig, tuning: &TuningArgs) -> Result<SearchSession> {
    let options = tuning.apply(config.search);
    let mut session = SearchSession::new(config.index, options)?;

    let collector = WorkspaceCollector::new(root, config.collector);
    let documents = collector
        .collect()
        .with_context(|| format!("Failed to collect files under {}", root.display()))?;

    session.load(documents);
    Ok(session)
}

/// Execute search command in CLI mode
fn execute_search(root: &Path, config: AppConfig, args: SearchArgs) -> Result<String> {
    // Reject an empty query before touching the disk
    contextual_search::validate_query(&args.query)?;

    let session = open_session(root, config, &args.tuning)?;
    let results = session.search(&args.query)?;
    debug!("{} results for {:?}", results.len(), args.query);

    if args.json {
        Ok(format_results_json(&results)?)
    } else {
        Ok(format_search_results(&results, &args.query))
    }
}

/// Execute interactive command: one snapshot, many queries
fn execute_interactive(
    root: &Path,
    config: AppConfig,
    args: InteractiveArgs,
) -> Result<String> {
    let session = open_session(root, config, &args.tuning)?;
    info!("Type a query and press enter; ':q' or Ctrl-D exits");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("Enter your search query (e.g. 'index file'): ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!();
            break;
        };
        let query = line?;
        let query = query.trim();
        if query == ":q" || query == "exit" {
            break;
        }

        match session.search(query) {
            Ok(results) => println!("{}\n", format_search_results(&results, query)),
            Err(SearchError::EmptyQuery) => eprintln!("Search query is required."),
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    Ok(String::new())
}

/// Execute index command: build the snapshot and summarise it
fn execute_index(root: &Path, config: AppConfig, args: IndexArgs) -> Result<String> {
    let session = open_session(root, config, &TuningArgs::default())?;
    let stats = session
        .snapshot()
        .map(|snapshot| snapshot.stats())
        .ok_or(SearchError::NotIndexed)?;

    if args.json {
        Ok(serde_json::to_string_pretty(&stats)?)
    } else {
        Ok(format_index_stats(&stats))
    }
}

/// Execute config command: print, and optionally persist, the configuration
fn execute_config(
    explicit: Option<&Path>,
    config: AppConfig,
    args: ConfigArgs,
) -> Result<String> {
    let rendered = serde_json::to_string_pretty(&config).context("Failed to serialize config")?;

    if args.write {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => config_path()?,
        };
        save_config(&config, &path)?;
        return Ok(format!("{}\nWritten to {}", rendered, path.display()));
    }

    Ok(rendered)
}

/// Map errors to exit codes
fn get_exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<SearchError>() {
        Some(e) if e.is_config_error() => 1,
        Some(SearchError::EmptyQuery) | Some(SearchError::QueryTooLong { .. }) => 1,
        Some(SearchError::NotIndexed) => 3,
        _ => 5,
    }
}
