use anyhow::Result;
use chrono::Local;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing with file-based logging
/// Logs are written to ~/.config/photosflix/logs/photosflix-YYYY-MM-DD-HH-MM-SS.log
/// so command output on stdout stays clean.
pub fn init_logging() -> Result<PathBuf> {
    let logs_dir = dirs::config_dir()
        .ok_or(anyhow::anyhow!("Could not find config directory"))?
        .join("photosflix")
        .join("logs");

    init_logging_in(&logs_dir)
}

pub fn init_logging_in(logs_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(logs_dir)?;

    let timestamp = Local::now().format("%Y-%m-%d-%H-%M-%S");
    let log_filename = format!("photosflix-{}.log", timestamp);
    let log_path = logs_dir.join(&log_filename);

    let file_appender = tracing_appender::rolling::never(logs_dir, &log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true);

    // Default to INFO, can be overridden with RUST_LOG
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()?;

    // The writer must outlive every log call; leak the guard
    std::mem::forget(guard);

    Ok(log_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_created_under_logs_dir() {
        let dir = tempfile::tempdir().unwrap();
        let logs_dir = dir.path().join("photosflix").join("logs");

        let log_path = init_logging_in(&logs_dir).unwrap();
        tracing::info!("written to the log file");

        assert!(logs_dir.is_dir());
        assert!(log_path.starts_with(&logs_dir));
        let name = log_path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("photosflix-") && name.ends_with(".log"));

        // Only one global subscriber per process
        assert!(init_logging_in(&logs_dir).is_err());
    }
}
