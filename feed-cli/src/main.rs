//! # feed-cli
//!
//! CLI tool for exercising the offline-feed sync engine against a local
//! cache and a synthetic remote.
//!
//! ## Commands
//!
//! - `refresh`: Reload a stream from the remote
//! - `more`: Fetch the next remote page after the cached data
//! - `show`: Print cached records
//! - `status`: Show cache and cursor status for every stream
//! - `clear`: Drop a stream's cache
//!
//! ## Example
//!
//! ```bash
//! # Load the first page of the feed
//! feed-cli refresh feed
//!
//! # Page forward twice
//! feed-cli more feed
//! feed-cli more feed
//!
//! # Offline: paging stalls, the cache stays readable
//! feed-cli --offline more feed
//! feed-cli show feed --limit 10
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use feed_types::ResourceKind;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod session;

use commands::{clear, more, refresh, show, status};
use session::Session;

/// CLI tool for exercising the offline-feed sync engine.
#[derive(Parser, Debug)]
#[command(name = "feed-cli")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file (default: <data-dir>/feed.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory holding the cache database
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Report the device as offline
    #[arg(long, global = true)]
    offline: bool,

    /// Number of pages the synthetic remote serves per stream
    #[arg(long, global = true, default_value = "5")]
    mock_pages: u32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reload a stream from the remote
    Refresh {
        /// Stream: feed, my_posts or directory
        kind: ResourceKind,
    },

    /// Fetch the next remote page after the cached data
    More {
        /// Stream: feed, my_posts or directory
        kind: ResourceKind,
    },

    /// Print cached records, newest first
    Show {
        /// Stream: feed, my_posts or directory
        kind: ResourceKind,

        /// Maximum number of records to print
        #[arg(long, default_value = "20")]
        limit: u32,
    },

    /// Show cache and cursor status for every stream
    Status,

    /// Drop a stream's cache
    Clear {
        /// Stream: feed, my_posts or directory
        kind: ResourceKind,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // Determine data directory
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };

    // Ensure data directory exists
    tokio::fs::create_dir_all(&data_dir)
        .await
        .context("Failed to create data directory")?;

    let config = config::load(cli.config.as_deref(), &data_dir)?;
    let session = Session::open(&config, !cli.offline, cli.mock_pages).await?;

    match cli.command {
        Commands::Refresh { kind } => refresh::run(&session, kind).await?,
        Commands::More { kind } => more::run(&session, kind).await?,
        Commands::Show { kind, limit } => show::run(&session, kind, limit).await?,
        Commands::Status => status::run(&session).await?,
        Commands::Clear { kind } => clear::run(&session, kind).await?,
    }

    session.close().await;
    Ok(())
}

/// Get the default data directory for feed-cli.
fn default_data_dir() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("io", "ydun", "feed-cli")
        .context("Could not determine home directory")?;
    Ok(dirs.data_dir().to_path_buf())
}
