//! Tool configuration.
//!
//! Configuration is read from TOML:
//! - Linux: `~/.config/steamclean/config.toml`
//! - Windows: `%APPDATA%/steamclean/config.toml`
//!
//! The file is optional and never written by the tool.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use steamclean_steam::DEFAULT_KEYWORDS;

use crate::Cli;

/// Tool configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Steam installation directory; registry lookup is skipped when set.
    #[serde(default)]
    pub install_path: Option<PathBuf>,

    /// Library roots scanned in addition to the discovered ones.
    #[serde(default)]
    pub extra_libraries: Vec<PathBuf>,

    /// Path substrings that mark a file as cleanable.
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,

    /// Report only, never delete.
    #[serde(default)]
    pub dry_run: bool,
}

fn default_keywords() -> Vec<String> {
    DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            install_path: None,
            extra_libraries: Vec::new(),
            keywords: default_keywords(),
            dry_run: false,
        }
    }
}

impl Config {
    /// Loads configuration from `path`, or the platform default location.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => config_path(),
        };

        if !path.exists() {
            tracing::debug!(path = %path.display(), "no configuration file, using defaults");
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        tracing::info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Applies command-line overrides.
    pub fn merge_cli(mut self, cli: &Cli) -> Self {
        if let Some(path) = &cli.install_path {
            self.install_path = Some(path.clone());
        }
        self.extra_libraries.extend(cli.libraries.iter().cloned());
        self.dry_run |= cli.dry_run;
        self
    }
}

/// Returns the platform-specific configuration file path.
fn config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        PathBuf::from(appdata).join("steamclean").join("config.toml")
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home)
            .join(".config")
            .join("steamclean")
            .join("config.toml")
    }
}
