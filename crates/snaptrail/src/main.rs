//! Snaptrail - browse a directory against its ZFS snapshots.
//!
//! This is the main entry point for the snaptrail CLI.

mod commands;

use clap::{Parser, Subcommand};
use commands::{browse, init_logging, print_diff, print_snapshots, print_version, Settings};
use snaptrail_core::Config;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "snaptrail")]
#[command(author, version, about = "Compare a directory against its ZFS snapshots", long_about = None)]
struct Cli {
    /// Directory (or file) to open
    path: Option<PathBuf>,

    /// Dataset mountpoint to browse (repeatable)
    #[arg(short, long = "dataset", value_name = "MOUNT")]
    datasets: Vec<PathBuf>,

    /// Snapshot to compare against from the start
    #[arg(short, long, value_name = "NAME")]
    snapshot: Option<String>,

    /// Do not refresh when the directory changes on disk
    #[arg(long)]
    no_watch: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file to load instead of the defaults
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Subcommand
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the snapshots of the dataset containing a path
    ListSnapshots {
        /// Path to inspect (defaults to the current directory)
        path: Option<PathBuf>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a directory compared against a snapshot
    Diff {
        /// Directory to compare (defaults to the current directory)
        path: Option<PathBuf>,
        /// Snapshot to compare against
        #[arg(short, long, value_name = "NAME")]
        snapshot: String,
        /// Only show entries that differ
        #[arg(long)]
        changed: bool,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, sources) = Config::load(cli.config.as_deref()).await?;

    // The browser owns the terminal, so only subcommands log to stderr
    let interactive = cli.command.is_none();
    let log_file = init_logging(cli.verbose, !interactive, config.log_level);
    if let Some(log_file) = &log_file {
        info!(path = %log_file.display(), "Logging to file");
    }
    for source in &sources {
        info!(path = %source.display(), "Loaded configuration");
    }

    let cwd = std::env::current_dir()?;
    let settings = Settings::new(config, cli.datasets, cli.no_watch);

    match cli.command {
        Some(Commands::ListSnapshots { path, json }) => {
            let path = path.unwrap_or_else(|| cwd.clone());
            print_snapshots(&settings, &path, &cwd, json)
        }
        Some(Commands::Diff {
            path,
            snapshot,
            changed,
            json,
        }) => {
            let path = path.unwrap_or_else(|| cwd.clone());
            print_diff(&settings, &path, &cwd, &snapshot, changed, json)
        }
        Some(Commands::Version) => {
            print_version();
            Ok(())
        }
        None => {
            let path = cli.path.unwrap_or_else(|| cwd.clone());
            browse(settings, &path, &cwd, cli.snapshot).await
        }
    }
}
