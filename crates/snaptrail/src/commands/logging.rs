//! Logging initialization for the CLI.

use snaptrail_util::log::{self, LogConfig, LogLevel};
use std::path::PathBuf;

/// Initialize logging based on verbosity and mode.
///
/// Subcommands log warnings to stderr. The browser logs to a file in the
/// standard log directory, since it owns the terminal. Returns the log file
/// path when logging to a file.
pub fn init_logging(verbose: bool, print: bool, configured: Option<LogLevel>) -> Option<PathBuf> {
    log::init(log_config(verbose, print, configured))
}

fn log_config(verbose: bool, print: bool, configured: Option<LogLevel>) -> LogConfig {
    let level = if verbose {
        LogLevel::Debug
    } else if print {
        configured.unwrap_or(LogLevel::Warn)
    } else {
        configured.unwrap_or_default()
    };

    LogConfig {
        print,
        level,
        include_location: verbose,
        file: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_wins() {
        let config = log_config(true, false, Some(LogLevel::Error));
        assert_eq!(config.level, LogLevel::Debug);
        assert!(config.include_location);
        assert!(!config.print);
    }

    #[test]
    fn test_default_levels() {
        assert_eq!(log_config(false, true, None).level, LogLevel::Warn);
        assert_eq!(log_config(false, false, None).level, LogLevel::Info);
        assert_eq!(
            log_config(false, true, Some(LogLevel::Trace)).level,
            LogLevel::Trace
        );
    }
}
