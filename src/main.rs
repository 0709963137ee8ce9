//! Conformance Explorer CLI
//!
//! A command-line interface for browsing Test262 conformance results.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use conformance_explorer::config::ExplorerConfig;
use conformance_explorer::navigation::{parse_search_params, ConformanceState, FilterOption, SortOption};
use conformance_explorer::repl::Browser;
use conformance_explorer::results::{DefaultFetcher, VersionItem};
use conformance_explorer::session::{render_view, Session};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "conformance-explorer")]
#[command(author, version, about = "Navigate Test262 conformance results", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file (falls back to $CONFORMANCE_EXPLORER_CONFIG)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Use a single result payload instead of the configured versions
    #[arg(short, long, value_name = "FILE_OR_URL", global = true)]
    results: Option<String>,

    /// Verbose output (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// List the configured result versions
    Versions,

    /// Print one suite of a result version
    Show {
        /// Version tag (defaults to the configured default or latest)
        #[arg(long)]
        version: Option<String>,
        /// Suite path below the root, e.g. built-ins/Array
        #[arg(short, long)]
        path: Option<String>,
        /// Shareable query, e.g. "version=v0.19&path=built-ins%2FArray"
        #[arg(short, long, conflicts_with_all = ["version", "path"])]
        query: Option<String>,
        /// ECMAScript edition flag, e.g. es2020
        #[arg(long)]
        flag: Option<String>,
        /// Child suite ordering
        #[arg(long)]
        sort: Option<SortOption>,
        /// Test outcome filter
        #[arg(long)]
        filter: Option<FilterOption>,
        /// Selected test file
        #[arg(long)]
        test: Option<String>,
    },

    /// Browse results interactively
    Browse,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    setup_logging(cli.verbose);

    let mut config = ExplorerConfig::resolve(cli.config.as_deref())?;
    if let Some(results) = cli.results {
        config.versions = vec![VersionItem::new("local", results)];
        config.default_version = None;
    }

    match cli.command.unwrap_or(Commands::Browse) {
        Commands::Versions => list_versions(&config),
        Commands::Show {
            version,
            path,
            query,
            flag,
            sort,
            filter,
            test,
        } => {
            let state = match query {
                Some(query) => {
                    parse_search_params(&query, &config.versions, config.default_sort, config.default_filter)?
                }
                None => state_from_args(&config, version.as_deref(), path.as_deref())?,
            };
            let state = apply_overrides(state, flag, sort, filter, test);
            show(config, state)
        }
        Commands::Browse => {
            if config.versions.is_empty() {
                bail!("no versions configured; pass --config or --results");
            }
            let mut browser = Browser::new(Session::new(config, DefaultFetcher::new()))?;
            browser.run()?;
            Ok(())
        }
    }
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("conformance_explorer={}", level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn list_versions(config: &ExplorerConfig) -> anyhow::Result<()> {
    if config.versions.is_empty() {
        println!("No versions configured.");
        return Ok(());
    }
    let default = config.initial_version().ok().map(|v| v.tag_name.as_str());
    for version in &config.versions {
        let marker = if Some(version.tag_name.as_str()) == default { "*" } else { " " };
        println!("{} {:<16} {}", marker, version.tag_name, version.fetch_url);
    }
    Ok(())
}

fn state_from_args(
    config: &ExplorerConfig,
    version: Option<&str>,
    path: Option<&str>,
) -> anyhow::Result<ConformanceState> {
    let version = match version {
        Some(tag) => config.version(tag)?,
        None => config.initial_version()?,
    };
    let mut state = config.initial_state(version);
    if let Some(path) = path {
        state
            .test_path
            .extend(path.split('/').filter(|s| !s.is_empty()).map(str::to_string));
    }
    Ok(state)
}

fn apply_overrides(
    state: ConformanceState,
    flag: Option<String>,
    sort: Option<SortOption>,
    filter: Option<FilterOption>,
    test: Option<String>,
) -> ConformanceState {
    let mut state = state.with_flag(flag.as_deref().or(state.ecmascript_version.as_deref()));
    if let Some(sort) = sort {
        state = state.with_sort(sort);
    }
    if let Some(filter) = filter {
        state = state.with_filter(filter);
    }
    if test.is_some() {
        state = state.with_selected_test(test.as_deref());
    }
    state
}

fn show(config: ExplorerConfig, state: ConformanceState) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let repo_url = config.test262_repo_url.clone();
    let mut session = Session::new(config, DefaultFetcher::new());
    let view = runtime
        .block_on(session.open(state))
        .context("failed to load conformance results")?;

    match view {
        Some(view) => {
            print!("{}", render_view(&view, &repo_url));
            view.require_suite()?;
            Ok(())
        }
        None => bail!("no results were published"),
    }
}
