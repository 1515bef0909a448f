//! Configuration loading and management.
//!
//! Configuration is loaded from multiple sources with the following
//! precedence (later sources override earlier ones):
//! 1. Global config: `~/.config/snaptrail/config.json` (or `snaptrail.jsonc`)
//! 2. Environment variable: `SNAPTRAIL_CONFIG_CONTENT`
//! 3. A file passed with `--config`
//!
//! Command line flags are applied on top by the binary.

use crate::entry::BrowserColumn;
use crate::error::{ConfigError, CoreResult};
use serde::{Deserialize, Serialize};
use snaptrail_util::LogLevel;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable holding inline JSONC configuration.
pub const CONFIG_CONTENT_ENV: &str = "SNAPTRAIL_CONFIG_CONTENT";

const GLOBAL_FILE_NAMES: [&str; 2] = ["config.json", "snaptrail.jsonc"];

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Theme name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    /// Log level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<LogLevel>,

    /// Dataset mountpoints to browse. Paths outside these are resolved by
    /// looking for a `.zfs/snapshot` directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datasets: Option<Vec<PathBuf>>,

    /// Refresh the listing when the directory changes on disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watch: Option<bool>,

    /// Show dot files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_hidden: Option<bool>,

    /// File browser defaults.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser: Option<BrowserConfig>,

    /// Keybind overrides, action name to key string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keybinds: Option<HashMap<String, String>>,
}

/// File browser defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_column: Option<BrowserColumn>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_inverted: Option<bool>,
}

impl BrowserConfig {
    pub fn merge(mut self, other: Self) -> Self {
        if other.sort_column.is_some() {
            self.sort_column = other.sort_column;
        }
        if other.sort_inverted.is_some() {
            self.sort_inverted = other.sort_inverted;
        }
        self
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Returns the merged config and the files it was read from.
    pub async fn load(explicit: Option<&Path>) -> CoreResult<(Self, Vec<PathBuf>)> {
        let env_content = std::env::var(CONFIG_CONTENT_ENV).ok();
        Self::load_from(
            Self::global_config_dir().as_deref(),
            env_content.as_deref(),
            explicit,
        )
        .await
    }

    /// Load configuration from explicit sources.
    pub async fn load_from(
        global_dir: Option<&Path>,
        env_content: Option<&str>,
        explicit: Option<&Path>,
    ) -> CoreResult<(Self, Vec<PathBuf>)> {
        let mut config = Config::default();
        let mut sources = Vec::new();

        // 1. Global config
        if let Some(dir) = global_dir {
            for name in GLOBAL_FILE_NAMES {
                let path = dir.join(name);
                if path.exists() {
                    config = config.merge(Self::load_file(&path).await?);
                    sources.push(path);
                    break;
                }
            }
        }

        // 2. Inline content
        if let Some(content) = env_content {
            config = config.merge(Self::parse_jsonc(content, "<env>")?);
        }

        // 3. File given on the command line; must exist
        if let Some(path) = explicit {
            config = config.merge(Self::load_file(path).await?);
            sources.push(path.to_path_buf());
        }

        config.validate()?;
        debug!(sources = ?sources, "Loaded configuration");
        Ok((config, sources))
    }

    /// Get the global config directory.
    pub fn global_config_dir() -> Option<PathBuf> {
        // On Unix, prefer ~/.config/snaptrail (common for CLI tools)
        #[cfg(unix)]
        {
            if let Some(home) = dirs::home_dir() {
                let xdg_config = home.join(".config").join("snaptrail");
                if xdg_config.exists() {
                    return Some(xdg_config);
                }
            }
        }

        snaptrail_util::path::config_dir()
    }

    /// Load a config file.
    pub async fn load_file(path: &Path) -> CoreResult<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::parse_jsonc(&content, &path.display().to_string())
    }

    /// Parse JSONC content.
    pub fn parse_jsonc(content: &str, source: &str) -> CoreResult<Self> {
        let stripped = Self::strip_comments(content);

        serde_json::from_str(&stripped).map_err(|e| {
            ConfigError::InvalidJson {
                path: source.to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Strip `//` and `/* */` comments outside string literals.
    pub fn strip_comments(content: &str) -> String {
        let mut result = String::with_capacity(content.len());
        let mut chars = content.chars().peekable();
        let mut in_string = false;
        let mut escaped = false;

        while let Some(c) = chars.next() {
            if in_string {
                result.push(c);
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == '"' {
                    in_string = false;
                }
                continue;
            }

            let next = chars.peek().copied();
            match (c, next) {
                ('"', _) => {
                    in_string = true;
                    result.push(c);
                }
                ('/', Some('/')) => {
                    for c in chars.by_ref() {
                        if c == '\n' {
                            result.push('\n');
                            break;
                        }
                    }
                }
                ('/', Some('*')) => {
                    chars.next();
                    let mut prev = ' ';
                    for c in chars.by_ref() {
                        if prev == '*' && c == '/' {
                            break;
                        }
                        // Keep line numbers intact for parse errors
                        if c == '\n' {
                            result.push('\n');
                        }
                        prev = c;
                    }
                }
                _ => result.push(c),
            }
        }

        result
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(mut self, other: Self) -> Self {
        if other.theme.is_some() {
            self.theme = other.theme;
        }
        if other.log_level.is_some() {
            self.log_level = other.log_level;
        }
        if other.datasets.is_some() {
            self.datasets = other.datasets;
        }
        if other.watch.is_some() {
            self.watch = other.watch;
        }
        if other.show_hidden.is_some() {
            self.show_hidden = other.show_hidden;
        }
        self.browser = match (self.browser, other.browser) {
            (Some(base), Some(over)) => Some(base.merge(over)),
            (base, over) => over.or(base),
        };
        self.keybinds = match (self.keybinds, other.keybinds) {
            (Some(mut base), Some(over)) => {
                base.extend(over);
                Some(base)
            }
            (base, over) => over.or(base),
        };
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(relative) = self
            .datasets
            .iter()
            .flatten()
            .find(|p| !p.is_absolute())
        {
            return Err(ConfigError::Validation {
                message: format!(
                    "dataset mountpoint must be absolute: {}",
                    relative.display()
                ),
            });
        }
        Ok(())
    }

    pub fn should_watch(&self) -> bool {
        self.watch.unwrap_or(true)
    }

    pub fn should_show_hidden(&self) -> bool {
        self.show_hidden.unwrap_or(true)
    }

    pub fn datasets(&self) -> &[PathBuf] {
        self.datasets.as_deref().unwrap_or(&[])
    }

    pub fn sort_column(&self) -> BrowserColumn {
        self.browser
            .as_ref()
            .and_then(|b| b.sort_column)
            .unwrap_or(BrowserColumn::Name)
    }

    pub fn sort_inverted(&self) -> bool {
        self.browser
            .as_ref()
            .and_then(|b| b.sort_inverted)
            .unwrap_or(false)
    }
}
