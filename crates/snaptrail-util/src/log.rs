//! Logging setup using tracing.
//!
//! The interactive browser owns the terminal, so logs go to a file under the
//! platform log directory. Non-interactive subcommands may log to stderr.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log level configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// Whether to print logs to stderr instead of a file.
    pub print: bool,
    /// Log level.
    pub level: LogLevel,
    /// Whether to include file/line info in logs.
    pub include_location: bool,
    /// Log file path (if any). Ignored when `print` is set.
    pub file: Option<PathBuf>,
}

impl LogConfig {
    /// Build the filter directive for the snaptrail crates.
    pub fn directive(&self) -> String {
        let level = self.level.as_str();
        [
            "snaptrail",
            "snaptrail_util",
            "snaptrail_core",
            "snaptrail_snapshot",
            "snaptrail_tui_core",
            "snaptrail_tui_widgets",
            "snaptrail_tui",
        ]
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
    }
}

/// Initialize logging with the given configuration.
///
/// This should be called once at application startup. Returns the log file
/// that was opened, if any.
pub fn init(config: LogConfig) -> Option<PathBuf> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.directive()));

    if config.print {
        let fmt_layer = fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_writer(std::io::stderr)
            .with_file(config.include_location)
            .with_line_number(config.include_location);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
        return None;
    }

    let log_file = config.file.clone().unwrap_or_else(default_log_path);
    let file = match open_log_file(&log_file) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not open log file {}: {e}", log_file.display());
            tracing_subscriber::registry().with(filter).init();
            return None;
        }
    };

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .with_file(config.include_location)
        .with_line_number(config.include_location);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();

    Some(log_file)
}

fn open_log_file(path: &Path) -> std::io::Result<std::fs::File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
}

/// Get the default log file path.
pub fn default_log_path() -> PathBuf {
    crate::path::logs_dir().join("snaptrail.log")
}
