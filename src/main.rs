// src/main.rs
//! clipkeep: clipboard history manager
//!
//! The CLI is a thin dispatcher: every subcommand maps onto one history
//! store operation (or starts the watch loop) and reports its outcome as a
//! printed message. User-facing failures never produce a non-zero exit;
//! only startup problems (an unreadable state file) do.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use clipkeep::clipboard::SystemClipboard;
use clipkeep::commands::{self, ListOptions};
use clipkeep::core::store::{ClipRecord, HistoryStore};
use clipkeep::core::watcher::{ClipboardWatcher, WatchListener};

#[derive(Debug, Parser)]
#[command(
    name = "clipkeep",
    version,
    about = "Clipboard history manager — grab and hold onto your clips",
    long_about = "Captures clipboard snapshots into a bounded, persistent history and lets you list, search, recall, or clear past entries. Run without a subcommand to list recent clips."
)]
struct Cli {
    /// Verbosity level for logging
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show clipboard history
    #[command(alias = "ls")]
    List {
        /// Number of items to show
        #[arg(short = 'n', long, default_value_t = commands::DEFAULT_LIST_COUNT)]
        number: usize,

        /// Show all items
        #[arg(short, long)]
        all: bool,
    },

    /// Add current clipboard content to history
    #[command(alias = "a")]
    Add,

    /// Copy an item from history back to the clipboard
    #[command(alias = "cp")]
    Copy { index: String },

    /// Show the full content of a clip
    #[command(alias = "s")]
    Show { index: String },

    /// Search clipboard history
    #[command(alias = "find")]
    Search { query: String },

    /// Delete a clip from history
    #[command(alias = "rm")]
    Delete { index: String },

    /// Clear all clipboard history
    Clear {
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// Watch the clipboard for changes until interrupted
    #[command(alias = "w")]
    Watch,

    /// Show or update configuration
    Config {
        /// Set max history size
        #[arg(long)]
        max: Option<String>,
    },
}

/// Set up logging based on verbosity level.
///
/// Quiet by default: command output is the interface, log lines are
/// diagnostics.
fn setup_logging(verbose: u8) {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_target(verbose > 1)
        .init();
}

/// Prints each capture as the watch loop observes it.
struct CaptureLogger;

impl WatchListener for CaptureLogger {
    fn on_watch_started(&mut self) {
        println!("   {}\n", "Watching clipboard... (Ctrl+C to stop)".dimmed());
    }

    fn on_clip_captured(&mut self, clip: &ClipRecord) {
        println!(
            "📌 {} {}",
            commands::format_age(clip.timestamp).dimmed(),
            clip.preview
        );
    }

    fn on_watch_stopped(&mut self) {
        println!("\n   {}\n", "Stopped watching.".dimmed());
    }
}

/// Open the OS clipboard, reporting failure as a message rather than an
/// error so the process still exits zero.
fn open_clipboard() -> Option<SystemClipboard> {
    match SystemClipboard::new() {
        Ok(clipboard) => Some(clipboard),
        Err(err) => {
            println!("{} Clipboard unavailable: {err}", "✗".red());
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    info!(version = env!("CARGO_PKG_VERSION"), "starting clipkeep");

    let mut store = HistoryStore::open_default().context("failed to load clipboard history")?;

    // No subcommand behaves as `list` with default options.
    let command = cli.command.unwrap_or(Command::List {
        number: commands::DEFAULT_LIST_COUNT,
        all: false,
    });

    match command {
        Command::List { number, all } => {
            commands::list(&store, &ListOptions { count: number, all });
        }
        Command::Add => {
            if let Some(mut clipboard) = open_clipboard() {
                commands::add(&mut store, &mut clipboard)?;
            }
        }
        Command::Copy { index } => {
            if let Some(mut clipboard) = open_clipboard() {
                commands::copy(&store, &mut clipboard, &index)?;
            }
        }
        Command::Show { index } => commands::show(&store, &index),
        Command::Search { query } => commands::search(&store, &query),
        Command::Delete { index } => commands::delete(&mut store, &index)?,
        Command::Clear { force } => commands::clear(&mut store, force)?,
        Command::Config { max } => commands::config(&mut store, max.as_deref())?,
        Command::Watch => {
            let Some(clipboard) = open_clipboard() else {
                return Ok(());
            };
            commands::print_banner();
            let mut watcher = ClipboardWatcher::new(store, clipboard);
            watcher.add_listener(CaptureLogger);
            watcher.run().await.context("watch loop failed")?;
        }
    }

    Ok(())
}
