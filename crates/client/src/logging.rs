//! File-based tracing setup.
//!
//! Stdout belongs to the frontend, so logs only go to a per-session file.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Platform-specific log directory.
///
/// - macOS: `~/Library/Caches/letterlanders/logs`
/// - Linux: `~/.cache/letterlanders/logs` (or `$XDG_CACHE_HOME/letterlanders/logs`)
/// - Windows: `%LOCALAPPDATA%\letterlanders\cache\logs`
/// - Fallback: `/tmp/letterlanders/logs`
pub fn log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "letterlanders")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/tmp/letterlanders"))
        .join("logs")
}

/// Installs the global subscriber writing to `<log_dir>/<session>/client.log`.
///
/// `RUST_LOG` refines the filter; `info` is the floor.
pub fn setup_logging(session_id: &Option<String>) -> Result<PathBuf> {
    let session_id = session_id.clone().unwrap_or_else(|| {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();
        format!("session_{}", timestamp)
    });

    let session_log_dir = log_dir().join(&session_id);
    std::fs::create_dir_all(&session_log_dir).with_context(|| {
        format!(
            "Failed to create log directory: {}",
            session_log_dir.display()
        )
    })?;

    let file_appender = tracing_appender::rolling::never(&session_log_dir, "client.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    // Keep the writer alive for the rest of the process.
    std::mem::forget(guard);

    let log_file = session_log_dir.join("client.log");
    tracing::info!("Logging initialized: session={}", session_id);
    tracing::info!("Log file: {}", log_file.display());

    Ok(log_file)
}
