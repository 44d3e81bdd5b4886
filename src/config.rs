//! Configuration management for fanlog
//!
//! Settings live in `~/.fanlog/config.toml`. Every field has a default, so a
//! missing file or a partial file both load cleanly.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::logging::rotation::DEFAULT_MAX_SIZE_MB;
use crate::logging::{
    ConsoleSink, FileSink, FileSinkOptions, TextEncoding, DEFAULT_LOGGER_NAME,
};

/// Logger identity and debug mode
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggerSettings {
    /// Registry name of the application logger
    #[serde(default = "default_logger_name")]
    pub name: String,

    /// Dispatch `Debug` records
    #[serde(default)]
    pub debug: bool,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            name: default_logger_name(),
            debug: false,
        }
    }
}

/// File sink settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Active log file; `~` is expanded
    #[serde(default = "default_log_file")]
    pub path: String,

    /// Rotate once the file is larger than this many megabytes (default: 5)
    #[serde(default = "default_max_size_mb")]
    pub max_size_mb: f64,

    /// "utf-8" (default), "utf-16le", "utf-16be" or "ascii"
    #[serde(default)]
    pub encoding: TextEncoding,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_log_file(),
            max_size_mb: default_max_size_mb(),
            encoding: TextEncoding::default(),
        }
    }
}

impl FileSettings {
    /// The log file path with `~` and environment variables expanded
    pub fn resolved_path(&self) -> PathBuf {
        expand_path(&self.path)
    }

    /// Build the file sink these settings describe
    pub fn build_sink(&self) -> Result<FileSink> {
        let path = self.resolved_path();
        let options = FileSinkOptions::new(&path)
            .max_size_mb(self.max_size_mb)
            .encoding(self.encoding);
        FileSink::with_options(options)
            .with_context(|| format!("Failed to open log file {}", path.display()))
    }
}

/// Console sink settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsoleSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_true")]
    pub use_colors: bool,

    /// Text placed before every console message
    #[serde(default)]
    pub prefix: String,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            use_colors: true,
            prefix: String::new(),
        }
    }
}

impl ConsoleSettings {
    pub fn build_sink(&self) -> ConsoleSink {
        ConsoleSink::new()
            .with_colors(self.use_colors)
            .with_prefix(self.prefix.clone())
    }
}

/// Terminal log viewer settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UiSettings {
    /// Maximum entries kept in the viewer (default: 5000)
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Maximum warnings/errors kept for the alert counter (default: 100)
    #[serde(default = "default_max_alerts")]
    pub max_alerts: usize,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            max_alerts: default_max_alerts(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub logger: LoggerSettings,

    #[serde(default)]
    pub file: FileSettings,

    #[serde(default)]
    pub console: ConsoleSettings,

    #[serde(default)]
    pub ui: UiSettings,
}

fn default_logger_name() -> String {
    DEFAULT_LOGGER_NAME.to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_file() -> String {
    "~/.fanlog/logs/app.log".to_string()
}

fn default_max_size_mb() -> f64 {
    DEFAULT_MAX_SIZE_MB
}

fn default_max_entries() -> usize {
    5_000
}

fn default_max_alerts() -> usize {
    100
}

impl Config {
    /// Load configuration from the default location, or defaults if absent
    pub fn load() -> Result<Self> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from `path`, or defaults if the file does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            Self::parse(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config file")?;
        if config.file.max_size_mb < 0.0 || config.file.max_size_mb.is_nan() {
            anyhow::bail!(
                "file.max_size_mb must be zero or positive, got {}",
                config.file.max_size_mb
            );
        }
        Ok(config)
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }
}

/// Expand `~` and `$VARS` in a configured path
///
/// Unknown variables are left as written.
pub fn expand_path(path: &str) -> PathBuf {
    match shellexpand::full(path) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(shellexpand::tilde(path).as_ref()),
    }
}

/// Get the base configuration directory (~/.fanlog)
/// Falls back to ./.fanlog if home directory cannot be determined
pub fn config_dir() -> PathBuf {
    try_config_dir().unwrap_or_else(|| {
        tracing::warn!("Could not determine home directory, using current directory for config");
        PathBuf::from(".fanlog")
    })
}

/// Try to get the base configuration directory, returning None if home dir is unavailable
pub fn try_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".fanlog"))
}

/// Get the path to the config file
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Get the path to the internal diagnostics directory
pub fn diagnostics_dir() -> PathBuf {
    config_dir().join("diagnostics")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.logger.name, "app");
        assert!(!config.logger.debug);
        assert_eq!(config.file.max_size_mb, 5.0);
        assert_eq!(config.file.encoding, TextEncoding::Utf8);
        assert!(config.console.use_colors);
        assert_eq!(config.console.prefix, "");
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        config.file.encoding = TextEncoding::Utf16Le;
        config.console.prefix = "[scraper] ".to_string();

        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::parse(
            r#"
            [logger]
            debug = true

            [file]
            max_size_mb = 0.5
            encoding = "ascii"
            "#,
        )
        .unwrap();

        assert!(config.logger.debug);
        assert_eq!(config.logger.name, "app");
        assert_eq!(config.file.max_size_mb, 0.5);
        assert_eq!(config.file.encoding, TextEncoding::Ascii);
        assert!(config.file.enabled);
        assert_eq!(config.ui.max_entries, 5_000);
    }

    #[test]
    fn test_unknown_encoding_rejected() {
        let result = Config::parse("[file]\nencoding = \"ebcdic\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_size_rejected() {
        let result = Config::parse("[file]\nmax_size_mb = -1.0\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load_from(&temp_dir.path().join("none.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sub/config.toml");
        let mut config = Config::default();
        config.logger.name = "crawler".to_string();

        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.logger.name, "crawler");
    }

    #[test]
    fn test_expand_path_tilde() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_path("~/logs/app.log"), home.join("logs/app.log"));
        }
        assert_eq!(expand_path("/abs/app.log"), PathBuf::from("/abs/app.log"));
    }

    #[test]
    fn test_build_file_sink_from_settings() {
        let temp_dir = TempDir::new().unwrap();
        let settings = FileSettings {
            path: temp_dir.path().join("app.log").to_string_lossy().into_owned(),
            max_size_mb: 1.0,
            ..FileSettings::default()
        };
        let sink = settings.build_sink().unwrap();
        assert_eq!(sink.max_size_mb(), 1.0);
        assert!(sink.path().exists());
    }

    #[test]
    fn test_config_dir_does_not_panic() {
        let dir = config_dir();
        assert!(dir.ends_with(".fanlog"));
    }
}
