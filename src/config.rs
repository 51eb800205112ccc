//! Configuration for the countdown program.
//!
//! Settings come from an optional TOML file, by default
//! `$XDG_CONFIG_HOME/tea-countdown/config.toml`, and can be overridden on the
//! command line. Every field has a default, so a missing file or a partial
//! one is fine:
//!
//! ```toml
//! minutes = 25
//! seconds = 0
//! muted = false
//! notifications = true
//!
//! [log]
//! level = "debug"
//! file = "/tmp/tea-countdown.log"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::time_input::{MAX_MINUTES, MAX_SECONDS};

/// Program configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Initial minutes in the input, clamped to 0–99.
    pub minutes: u32,
    /// Initial seconds in the input, clamped to 0–59.
    pub seconds: u32,
    /// Start with sound alerts muted.
    pub muted: bool,
    /// Allow desktop notifications on completion.
    pub notifications: bool,
    /// Logging.
    pub log: LogConfig,
}

/// Logging configuration. Logs go to a file because the terminal belongs to
/// the UI; without a file nothing is logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing` filter directive, e.g. `"info"` or `"tea_countdown=debug"`.
    pub level: String,
    /// Destination file.
    pub file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            minutes: 5,
            seconds: 0,
            muted: false,
            notifications: true,
            log: LogConfig::default(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Config {
    /// Parses configuration from TOML text. `path` is only used in errors.
    pub fn from_toml(text: &str, path: &Path) -> Result<Self> {
        let config: Config = toml::from_str(text).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config.clamped())
    }

    /// Loads `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            context: format!("failed to read config file {}", path.display()),
            source,
        })?;
        Self::from_toml(&text, path)
    }

    /// Brings the initial duration into the input's range.
    pub fn clamped(mut self) -> Self {
        self.minutes = self.minutes.min(MAX_MINUTES);
        self.seconds = self.seconds.min(MAX_SECONDS);
        self
    }
}

/// Default configuration file location.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(env!("CARGO_PKG_NAME"))
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!((config.minutes, config.seconds), (5, 0));
        assert!(!config.muted);
        assert!(config.notifications);
        assert_eq!(config.log.level, "info");
        assert!(config.log.file.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml("muted = true\n", Path::new("x.toml")).unwrap();
        assert!(config.muted);
        assert_eq!(config.minutes, 5);
        assert!(config.notifications);
    }

    #[test]
    fn test_out_of_range_duration_is_clamped() {
        let config =
            Config::from_toml("minutes = 150\nseconds = 75\n", Path::new("x.toml")).unwrap();
        assert_eq!((config.minutes, config.seconds), (99, 59));
    }

    #[test]
    fn test_invalid_file_names_the_path() {
        let err = Config::from_toml("minutes = \"ten\"", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "minutes = 25\nnotifications = false\n[log]\nlevel = \"debug\"").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.minutes, 25);
        assert!(!config.notifications);
        assert_eq!(config.log.level, "debug");
    }

    #[test]
    fn test_default_path_ends_with_crate_dir() {
        let path = default_path();
        assert!(path.ends_with("tea-countdown/config.toml"));
    }
}
