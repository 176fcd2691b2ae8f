//! clipman - clipboard history daemon
//!
//! # Usage
//!
//! ```bash
//! clipman                      # watch the clipboard until Ctrl+C
//! clipman --max-entries 200 watch
//! clipman list --limit 10
//! clipman list --json
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use clipman::clipboard_history::{ClipboardEntry, ClipboardMonitor, HistoryStore, LifetimeToken};
use clipman::config::{default_config_path, load_config, Config};
use clipman::error::ResultExt;
use clipman::logging;

#[derive(Debug, Parser)]
#[command(name = "clipman", version, about = "Clipboard history daemon")]
struct Cli {
    /// Path to a JSON config file (default: ~/.clipman/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding clipboard_history.json
    #[arg(long, global = true)]
    storage_path: Option<PathBuf>,

    /// History capacity; values <= 0 mean the default (1000)
    #[arg(long, global = true, allow_negative_numbers = true)]
    max_entries: Option<i64>,

    /// Clipboard polling cadence in milliseconds
    #[arg(long, global = true)]
    poll_interval_ms: Option<u64>,

    /// Log filter used when RUST_LOG is unset (e.g. "debug")
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Record clipboard changes until interrupted (default)
    Watch,
    /// Print the stored history, newest first
    List {
        /// Show at most this many entries
        #[arg(long)]
        limit: Option<usize>,
        /// Print the entries as JSON instead of one line each
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    fn resolve_config(&self) -> Result<Config> {
        let config_path = self.config.clone().unwrap_or_else(default_config_path);
        let mut config = load_config(&config_path);

        if let Some(storage_path) = &self.storage_path {
            config.storage_path = storage_path.clone();
        }
        if let Some(max_entries) = self.max_entries {
            config.max_entries = max_entries;
        }
        if let Some(poll_interval_ms) = self.poll_interval_ms {
            config.poll_interval_ms = poll_interval_ms;
        }
        if let Some(log_level) = &self.log_level {
            config.log_level = log_level.clone();
        }

        config.expand_paths();
        config.validate().context("Configuration error")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    // Initialize logging - guard must outlive everything that logs
    let _guard = logging::init(&config.log_level);

    match cli.command.unwrap_or(Command::Watch) {
        Command::Watch => watch(&config),
        Command::List { limit, json } => list(&config, limit, json),
    }
}

fn open_store(config: &Config) -> Arc<HistoryStore> {
    let store = Arc::new(HistoryStore::new(&config.storage_path, config.max_entries));

    // An unreadable history is not fatal, start from an empty one
    store.load().log_err();
    store
}

fn watch(config: &Config) -> Result<()> {
    let store = open_store(config);
    info!(
        storage_path = %config.storage_path.display(),
        max_entries = store.capacity(),
        loaded = store.len(),
        "Clipboard history ready"
    );

    let lifetime = LifetimeToken::new();
    let on_signal = lifetime.clone();
    ctrlc::set_handler(move || on_signal.cancel()).context("Failed to install signal handler")?;

    let monitor = ClipboardMonitor::with_system_clipboard(Arc::clone(&store))
        .with_poll_interval(config.poll_interval());
    monitor
        .start(&lifetime)
        .context("Failed to start clipboard listener")?;

    lifetime.wait();
    info!("Received shutdown signal, stopping clipboard manager...");
    monitor.stop();
    monitor.join();

    info!(entry_count = store.len(), "Clipboard manager stopped");
    Ok(())
}

fn list(config: &Config, limit: Option<usize>, json: bool) -> Result<()> {
    let store = open_store(config);
    let limit = limit.unwrap_or(usize::MAX);
    let newest_first: Vec<ClipboardEntry> = store.list().into_iter().rev().take(limit).collect();

    if json {
        let out = serde_json::to_string_pretty(&newest_first)
            .context("Failed to serialize clipboard history")?;
        println!("{}", out);
        return Ok(());
    }

    for entry in &newest_first {
        println!(
            "{}  {:<9}  {}",
            entry
                .timestamp()
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S"),
            entry.content_type(),
            entry.preview(80)
        );
    }
    Ok(())
}
