//! Configuration management
//!
//! Settings are layered: built-in defaults, then `subway-line.toml` (or an
//! explicit file), then `SL_*` environment variables, then validation.

use crate::core::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default configuration file name
pub const CONFIG_FILE: &str = "subway-line.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration
    pub storage: StorageConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Storage configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Line snapshot file
    pub data_file: PathBuf,

    /// Pretty-print the snapshot
    pub pretty: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (pretty, compact)
    pub format: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("lines.json"),
            pretty: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default file (if present) and environment
    pub fn load() -> Result<Self> {
        let path = std::path::Path::new(CONFIG_FILE);
        let config = if path.exists() {
            Self::read_file(path)?
        } else {
            Config::default()
        };
        config.finish()
    }

    /// Load configuration from an explicit TOML file and environment
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Self::read_file(path)?.finish()
    }

    fn read_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read config file {}: {}", path.display(), e)))?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from TOML text without applying overrides
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| Error::config(format!("Failed to parse config file: {}", e)))
    }

    fn finish(mut self) -> Result<Self> {
        self.apply_overrides(|key| std::env::var(key).ok())?;
        self.validate()?;
        Ok(self)
    }

    /// Apply `SL_*` overrides from a variable lookup
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(data_file) = lookup("SL_DATA_FILE") {
            self.storage.data_file = PathBuf::from(data_file);
        }

        if let Some(pretty) = lookup("SL_PRETTY") {
            self.storage.pretty = pretty
                .parse()
                .map_err(|e| Error::config(format!("Invalid SL_PRETTY: {}", e)))?;
        }

        if let Some(level) = lookup("SL_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Some(format) = lookup("SL_LOG_FORMAT") {
            self.logging.format = format;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.storage.data_file.as_os_str().is_empty() {
            return Err(Error::config("Data file path must not be empty"));
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => return Err(Error::config(format!("Invalid log level: {}", other))),
        }

        match self.logging.format.as_str() {
            "pretty" | "compact" => {}
            other => return Err(Error::config(format!("Invalid log format: {}", other))),
        }

        Ok(())
    }
}
