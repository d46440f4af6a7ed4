//! Structured logging to a file.
//!
//! The terminal belongs to the TUI, so log records only go somewhere when a
//! log file is configured. Records from the `log` facade (the chips engine
//! uses it) are bridged into `tracing` when the subscriber is installed.

use anyhow::{Context, Result};
use std::{fs::OpenOptions, path::Path, sync::Mutex};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging into `log_file`, appending to it.
///
/// Levels come from `RUST_LOG`, defaulting to `info`. Returns `false` and
/// installs nothing when there is no log file.
///
/// # Example
///
/// ```no_run
/// use pc_client::logging;
/// use std::path::Path;
///
/// logging::init(Some(Path::new("pokerchips.log"))).unwrap();
/// tracing::info!("Client starting");
/// ```
pub fn init(log_file: Option<&Path>) -> Result<bool> {
    let Some(path) = log_file else {
        return Ok(false);
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(Mutex::new(file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    tracing::info!(log_file = %path.display(), "Structured logging initialized");
    Ok(true)
}

/// Log a command typed into the client.
///
/// # Example
///
/// ```
/// use pc_client::logging::log_command;
///
/// log_command("betting", "raise", true);
/// log_command("setup", "players 9", false);
/// ```
pub fn log_command(screen: &str, input: &str, accepted: bool) {
    if accepted {
        tracing::debug!(screen = screen, input = input, "Command handled");
    } else {
        tracing::warn!(screen = screen, input = input, "Command refused");
    }
}
