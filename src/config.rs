//! Driver Configuration
//!
//! Options for the interactive driver and the binary. Every field has a
//! default, so a config file only lists what it changes.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dispatch::DEFAULT_DELIMITER;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("delimiter must not be empty or contain whitespace")]
    InvalidDelimiter,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriverConfig {
    /// Text written before every interactive read.
    pub prompt: String,
    /// Split input lines into several commands at `delimiter`.
    pub allow_multiple: bool,
    /// Leave the interactive loop after the first non-success.
    pub break_on_failure: bool,
    pub delimiter: String,
    /// Register the `help` and `exit` commands.
    pub register_defaults: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            prompt: "> ".to_string(),
            allow_multiple: false,
            break_on_failure: false,
            delimiter: DEFAULT_DELIMITER.to_string(),
            register_defaults: true,
        }
    }
}

impl DriverConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: DriverConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.delimiter.is_empty() || self.delimiter.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidDelimiter);
        }
        Ok(())
    }
}
