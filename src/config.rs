//! Configuration management for doclex.
//!
//! Layers, lowest priority first: defaults, the user config file, the
//! project `.doclex.toml`, an explicit `--config` file, `DOCLEX_*`
//! environment variables. Command-line flags are applied last by `main`.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{DoclexError, Result};

/// Name of the per-project config file.
pub const PROJECT_CONFIG: &str = ".doclex.toml";

/// How tokens are written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// One token per line
    #[default]
    Text,
    /// A JSON document per input
    Json,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Format::Text),
            "json" => Ok(Format::Json),
            other => Err(format!("unknown format `{other}`")),
        }
    }
}

/// Configuration for doclex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output format
    pub format: Format,

    /// Colored text output
    pub color: bool,

    /// Only report doc comments
    pub docs_only: bool,

    /// Maximum number of REPL history entries
    pub history_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: Format::Text,
            color: true,
            docs_only: false,
            history_size: 1000,
        }
    }
}

/// A config file as written on disk; absent keys leave lower layers alone.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    format: Option<Format>,
    color: Option<bool>,
    docs_only: Option<bool>,
    history_size: Option<usize>,
}

impl Config {
    /// Load configuration from default locations, plus an optional explicit file.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(path) = user_config_path() {
            if path.exists() {
                config.merge_from_file(&path)?;
            }
        }

        let project = PathBuf::from(PROJECT_CONFIG);
        if project.exists() {
            config.merge_from_file(&project)?;
        }

        if let Some(path) = explicit {
            config.merge_from_file(path)?;
        }

        config.load_from_env(std::env::vars());

        Ok(config)
    }

    /// Merge configuration from a TOML file.
    pub fn merge_from_file(&mut self, path: &Path) -> Result<()> {
        let content =
            std::fs::read_to_string(path).map_err(|e| DoclexError::read(path, e))?;
        let file: ConfigFile = toml::from_str(&content).map_err(|source| DoclexError::Config {
            path: path.to_path_buf(),
            source,
        })?;

        debug!("Merging config from {}", path.display());

        if let Some(format) = file.format {
            self.format = format;
        }
        if let Some(color) = file.color {
            self.color = color;
        }
        if let Some(docs_only) = file.docs_only {
            self.docs_only = docs_only;
        }
        if let Some(history_size) = file.history_size {
            self.history_size = history_size;
        }

        Ok(())
    }

    /// Load configuration from `DOCLEX_*` variables and `NO_COLOR`.
    pub fn load_from_env<I>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            if key == "NO_COLOR" && !value.is_empty() {
                self.color = false;
            } else if key == "DOCLEX_LOG" {
                // Read by the tracing filter, not a config key.
            } else if let Some(config_key) = key.strip_prefix("DOCLEX_") {
                let config_key = config_key.to_lowercase().replace('_', "-");
                self.set(&config_key, &value);
            }
        }
    }

    /// Set a configuration value by its dashed key name.
    pub fn set(&mut self, key: &str, value: &str) {
        match key {
            "format" => match value.parse() {
                Ok(format) => self.format = format,
                Err(e) => warn!("Ignoring {key}: {e}"),
            },
            "color" => match parse_bool(value) {
                Some(color) => self.color = color,
                None => warn!("Ignoring {key}: expected a boolean, got `{value}`"),
            },
            "docs-only" => match parse_bool(value) {
                Some(docs_only) => self.docs_only = docs_only,
                None => warn!("Ignoring {key}: expected a boolean, got `{value}`"),
            },
            "history-size" => match value.parse() {
                Ok(size) => self.history_size = size,
                Err(_) => warn!("Ignoring {key}: expected a number, got `{value}`"),
            },
            _ => debug!("Unknown config key {key}"),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Get the user config path.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("doclex").join("config.toml"))
}

/// Get the REPL history path.
pub fn history_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("doclex")
        .join("history")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn env(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.format, Format::Text);
        assert!(config.color);
        assert!(!config.docs_only);
        assert_eq!(config.history_size, 1000);
    }

    #[test]
    fn test_merge_only_touches_present_keys() {
        let file = write_config("format = \"json\"\ndocs_only = true\n");
        let mut config = Config::default();
        config.merge_from_file(file.path()).unwrap();
        assert_eq!(config.format, Format::Json);
        assert!(config.docs_only);
        assert!(config.color);
        assert_eq!(config.history_size, 1000);
    }

    #[test]
    fn test_later_files_win() {
        let first = write_config("format = \"json\"\nhistory_size = 5\n");
        let second = write_config("format = \"text\"\n");
        let mut config = Config::default();
        config.merge_from_file(first.path()).unwrap();
        config.merge_from_file(second.path()).unwrap();
        assert_eq!(config.format, Format::Text);
        assert_eq!(config.history_size, 5);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let file = write_config("format = 3\n");
        let err = Config::default().merge_from_file(file.path()).unwrap_err();
        assert!(matches!(err, DoclexError::Config { .. }));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::default()
            .merge_from_file(&dir.path().join("absent.toml"))
            .unwrap_err();
        assert!(matches!(err, DoclexError::Read { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.load_from_env(env(&[
            ("DOCLEX_FORMAT", "JSON"),
            ("DOCLEX_DOCS_ONLY", "yes"),
            ("DOCLEX_HISTORY_SIZE", "10"),
            ("DOCLEX_LOG", "trace"),
            ("HOME", "/tmp"),
        ]));
        assert_eq!(config.format, Format::Json);
        assert!(config.docs_only);
        assert_eq!(config.history_size, 10);
    }

    #[test]
    fn test_no_color() {
        let mut config = Config::default();
        config.load_from_env(env(&[("NO_COLOR", "1")]));
        assert!(!config.color);

        let mut config = Config::default();
        config.load_from_env(env(&[("NO_COLOR", "")]));
        assert!(config.color);
    }

    #[test]
    fn test_invalid_values_are_ignored() {
        let mut config = Config::default();
        config.set("format", "yaml");
        config.set("color", "maybe");
        config.set("history-size", "-1");
        config.set("nonsense", "1");
        assert_eq!(config, Config::default());
    }
}
