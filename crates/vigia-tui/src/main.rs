//! `vigia-tui` — terminal dashboard for the vigia status monitor.
//!
//! Polls the backend for the up/down status of monitored systems grouped
//! by server and renders status cards, a downtime chart, aggregate
//! counts, and a live countdown to the next refresh. State survives
//! restarts through a versioned snapshot; a reload inside the refresh
//! interval resumes the countdown instead of re-fetching.
//!
//! Logs are written to a file (default `/tmp/vigia-tui.log`) to avoid
//! corrupting the terminal UI. A background data bridge task streams
//! state snapshots from the monitor into the TUI action loop.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and app
//! launch.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod panels;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use vigia_core::{FileSnapshotStore, Monitor};

use crate::app::App;

/// Terminal dashboard for monitored systems grouped by server.
#[derive(Parser, Debug)]
#[command(name = "vigia-tui", version, about)]
struct Cli {
    /// Backend base URL (e.g. http://monitor.example.com)
    #[arg(short = 'b', long, env = "VIGIA_BACKEND")]
    backend: Option<String>,

    /// Seconds between refresh cycles
    #[arg(long, env = "VIGIA_REFRESH_SECS")]
    refresh_secs: Option<u64>,

    /// Per-request timeout in seconds
    #[arg(long, env = "VIGIA_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Accept invalid TLS certificates
    #[arg(long)]
    insecure: bool,

    /// Config file path (defaults to the platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Snapshot file path (defaults to the platform cache dir)
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Log file path (defaults to /tmp/vigia-tui.log)
    #[arg(long, default_value = "/tmp/vigia-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr — that
/// would corrupt the TUI output. Returns a guard that must be held for
/// the lifetime of the application to ensure logs are flushed.
fn setup_tracing(log_file: &std::path::Path, verbose: u8) -> WorkerGuard {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("vigia_tui={log_level},vigia_core={log_level},vigia_api={log_level}"))
    });

    let log_dir = log_file.parent().unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("vigia-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

/// Merge the config file with CLI overrides and build the monitor.
fn build_monitor(cli: &Cli) -> Result<Monitor> {
    let mut config = match &cli.config {
        Some(path) => vigia_config::load_config_from(path)?,
        None => vigia_config::load_config()?,
    };

    if cli.backend.is_some() {
        config.backend.clone_from(&cli.backend);
    }
    if let Some(secs) = cli.refresh_secs {
        config.refresh_secs = secs;
    }
    if let Some(secs) = cli.timeout_secs {
        config.timeout_secs = secs;
    }
    if cli.insecure {
        config.insecure = true;
    }
    if cli.snapshot.is_some() {
        config.snapshot_path.clone_from(&cli.snapshot);
    }

    let monitor_config = vigia_config::to_monitor_config(&config)?;
    let snapshot_path = config
        .snapshot_path
        .unwrap_or_else(vigia_config::default_snapshot_path);
    let store = Arc::new(FileSnapshotStore::new(snapshot_path));

    Monitor::new(monitor_config, store).map_err(|e| eyre!("failed to build monitor: {e}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Tracing to file — hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli.log_file, cli.verbose);

    info!(
        backend = cli.backend.as_deref().unwrap_or("(from config)"),
        "starting vigia-tui"
    );

    let monitor = build_monitor(&cli)?;

    let runner = monitor.clone();
    tokio::spawn(async move { runner.run().await });

    let mut app = App::new(Some(monitor));
    app.run().await?;

    Ok(())
}
