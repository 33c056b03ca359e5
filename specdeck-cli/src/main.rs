//! Specdeck CLI, the terminal front end for the comparison engine.
//!
//! Mounts a comparison from a shareable link, lists and searches systems,
//! and manages configuration.

mod commands;
mod render;
mod search;

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Specdeck: side-by-side hardware specification comparison
#[derive(Parser, Debug)]
#[command(name = "specdeck", version, about, long_about = None)]
struct Cli {
    /// Workspace directory
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    /// Extra configuration file, layered above the workspace config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON catalog file (overrides configuration)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Catalog service base URL (overrides configuration)
    #[arg(long)]
    catalog_url: Option<String>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long)]
    quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Compare two systems
    Compare(CompareArgs),
    /// List every system in the catalog
    Systems,
    /// Fuzzy-search systems by name or slug
    Search {
        /// Search text
        query: String,
        /// Maximum number of matches
        #[arg(short, long, default_value = "8")]
        limit: usize,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Args, Debug)]
struct CompareArgs {
    /// Shareable link or query string, e.g. "a=steam-deck&varA=oled&b=rog-ally"
    link: Option<String>,

    /// Left system slug
    #[arg(long = "a")]
    left: Option<String>,

    /// Left variant slug
    #[arg(long = "var-a")]
    left_variant: Option<String>,

    /// Right system slug
    #[arg(long = "b")]
    right: Option<String>,

    /// Right variant slug
    #[arg(long = "var-b")]
    right_variant: Option<String>,

    /// Only show rows that differ
    #[arg(long)]
    diff_only: bool,

    /// Hide category dividers
    #[arg(long)]
    no_headers: bool,

    /// Emit JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(clap::Subcommand, Debug)]
enum ConfigAction {
    /// Write a default configuration file into the workspace
    Init,
    /// Show the effective configuration
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Set up tracing: human-readable stderr + JSON file logging
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(EnvFilter::new(filter));

    let log_dir = directories::ProjectDirs::from("dev", "specdeck", "specdeck")
        .map(|d| d.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("."));
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "specdeck.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let workspace = cli
        .workspace
        .canonicalize()
        .unwrap_or_else(|_| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    let mut config = match &cli.config {
        Some(file) => specdeck_core::config::load_config_file(Some(&workspace), file)?,
        None => specdeck_core::config::load_config(Some(&workspace), None)
            .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?,
    };

    // Apply CLI overrides
    if let Some(path) = cli.catalog {
        config.catalog.path = Some(path);
        config.catalog.base_url = None;
    }
    if let Some(url) = cli.catalog_url {
        config.catalog.base_url = Some(url);
    }

    commands::handle_command(cli.command, config, &workspace).await
}
