//! Interactive browser.

use super::Settings;
use anyhow::Context;
use snaptrail_tui::{App, AppOptions};
use snaptrail_tui_core::{KeybindConfig, Theme};
use snaptrail_util::path::resolve_start;
use std::path::{Path, PathBuf};
use tracing::info;

/// Open the browser at `path` and run it until the operator quits.
pub async fn browse(
    settings: Settings,
    path: &Path,
    cwd: &Path,
    snapshot: Option<String>,
) -> anyhow::Result<()> {
    let start = resolve_start(path, cwd)?;
    let options = app_options(&settings, start, snapshot);
    info!(
        start = %options.start.display(),
        datasets = settings.datasets.len(),
        watch = options.watch,
        "Starting browser"
    );

    let mut app = App::new(options, settings.fs(), settings.store())
        .with_context(|| format!("cannot open {}", path.display()))?;
    app.run().await?;
    Ok(())
}

/// Translate settings into browser options.
pub fn app_options(settings: &Settings, start: PathBuf, snapshot: Option<String>) -> AppOptions {
    let config = &settings.config;
    let theme = Theme::by_name(config.theme.as_deref().unwrap_or("dark"));
    let keybinds = KeybindConfig::new(config.keybinds.clone().unwrap_or_default());

    AppOptions {
        snapshot,
        watch: settings.watch,
        theme,
        keybinds,
        sort_column: config.sort_column(),
        sort_inverted: config.sort_inverted(),
        ..AppOptions::new(start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snaptrail_core::config::BrowserConfig;
    use snaptrail_core::{BrowserColumn, Config};
    use std::collections::HashMap;

    #[test]
    fn test_app_options_from_config() {
        let config = Config {
            theme: Some("nord".to_string()),
            browser: Some(BrowserConfig {
                sort_column: Some(BrowserColumn::Size),
                sort_inverted: Some(true),
            }),
            keybinds: Some(HashMap::from([(
                "refresh".to_string(),
                "ctrl+r".to_string(),
            )])),
            ..Default::default()
        };
        let settings = Settings::new(config, vec![], true);

        let options = app_options(
            &settings,
            PathBuf::from("/tank/home"),
            Some("monday".to_string()),
        );
        assert_eq!(options.start, PathBuf::from("/tank/home"));
        assert_eq!(options.snapshot.as_deref(), Some("monday"));
        assert_eq!(options.theme.name, "nord");
        assert_eq!(options.sort_column, BrowserColumn::Size);
        assert!(options.sort_inverted);
        assert!(!options.watch);
        assert_eq!(
            options.keybinds.bindings.get("refresh").map(String::as_str),
            Some("ctrl+r")
        );
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let config = Config {
            theme: Some("solarized".to_string()),
            ..Default::default()
        };
        let settings = Settings::new(config, vec![], false);
        let options = app_options(&settings, PathBuf::from("/"), None);
        assert_eq!(options.theme.name, "dark");
        assert!(options.watch);
    }
}
