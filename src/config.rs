//! Configuration for the HBNB console
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{HbnbError, Result};

/// Main configuration for a console session
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// JSON file holding every persisted record.
    /// Rewritten in full on every mutating command.
    pub data_file: PathBuf,

    // -------------------------------------------------------------------------
    // Console Configuration
    // -------------------------------------------------------------------------
    /// Prompt shown in interactive mode
    pub prompt: String,

    /// Where interactive history is kept (None = no history file)
    pub history_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("file.json"),
            prompt: "(hbnb) ".to_string(),
            history_file: None,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject configurations that cannot possibly work
    pub fn validate(&self) -> Result<()> {
        if self.data_file.as_os_str().is_empty() {
            return Err(HbnbError::Config("data file path is empty".to_string()));
        }
        if self.data_file.is_dir() {
            return Err(HbnbError::Config(format!(
                "data file {} is a directory",
                self.data_file.display()
            )));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the backing JSON file
    pub fn data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_file = path.into();
        self
    }

    /// Set the interactive prompt
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.prompt = prompt.into();
        self
    }

    /// Set the interactive history file
    pub fn history_file(mut self, path: Option<PathBuf>) -> Self {
        self.config.history_file = path;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
