//! Shared logging utilities for PlantStock binaries.

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_LOG_FILTER: &str = "plantstock=info,plantstock_db=info";
const VERBOSE_LOG_FILTER: &str = "plantstock=debug,plantstock_db=debug";
const HOME_ENV: &str = "PLANTSTOCK_HOME";
const HOME_DIR_NAME: &str = ".plantstock";

/// Logging configuration shared by PlantStock binaries.
pub struct LogConfig<'a> {
    pub app_name: &'a str,
    pub verbose: bool,
}

/// Initialize tracing with a daily rolling file writer and stderr output.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the life of the process. If the logs directory cannot be created, file
/// logging is skipped and `None` is returned.
pub fn init_logging(config: LogConfig<'_>) -> Result<Option<WorkerGuard>> {
    let file_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let console_filter = if config.verbose {
        EnvFilter::new(VERBOSE_LOG_FILTER)
    } else {
        EnvFilter::new("warn")
    };

    let mut guard = None;
    let file_layer = match ensure_logs_dir() {
        Ok(log_dir) => {
            let file_name = format!("{}.log", sanitize_name(config.app_name));
            let file_appender = tracing_appender::rolling::daily(log_dir, file_name);
            let (file_writer, file_guard) = tracing_appender::non_blocking(file_appender);
            guard = Some(file_guard);
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(file_writer)
                    .with_ansi(false)
                    .with_filter(file_filter),
            )
        }
        Err(err) => {
            eprintln!("Warning: {:#}", err);
            None
        }
    };

    tracing_subscriber::registry()
        .with(file_layer)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(console_filter),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

/// Get the PlantStock home directory: `$PLANTSTOCK_HOME` or ~/.plantstock
pub fn plantstock_home() -> PathBuf {
    resolve_home(std::env::var_os(HOME_ENV), dirs::home_dir())
}

/// Get the logs directory: ~/.plantstock/logs
pub fn logs_dir() -> PathBuf {
    plantstock_home().join("logs")
}

/// Ensure the logs directory exists.
pub fn ensure_logs_dir() -> Result<PathBuf> {
    let logs = logs_dir();
    fs::create_dir_all(&logs)
        .with_context(|| format!("Failed to create logs directory: {}", logs.display()))?;
    Ok(logs)
}

fn resolve_home(override_path: Option<OsString>, home: Option<PathBuf>) -> PathBuf {
    match override_path {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        // No home directory: fall back to the working directory.
        _ => home.unwrap_or_default().join(HOME_DIR_NAME),
    }
}

fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|ch| if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' { ch } else { '_' })
        .collect()
}
