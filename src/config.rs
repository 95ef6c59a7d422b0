//! Configuration management for the environment loader
//!
//! Holds the fixed syntax constants and turns the optional parsed options into
//! a concrete, validated run configuration.

use crate::{
    cli::{
        parser::{OptionValue, Options},
        schema::{FILES, NO_OVERRIDE, VERBOSE},
    },
    core::env_file::EnvFileOptions,
    error::{LoaderError, Result},
};
use std::path::PathBuf;

// Environment file syntax
pub const ENV_FILE_COMMENT_PREFIX: &str = "#";
pub const KEY_VALUE_SEPARATOR: char = '=';

// Command-line syntax
pub const CLI_FLAG_LONG_PREFIX: &str = "--";
pub const CLI_FLAG_SHORT_PREFIX: &str = "-";
pub const CLI_FLAG_VALUE_SEPARATOR: char = '=';
pub const CLI_OPTION_VALUES_SEPARATOR: char = ',';

// Defaults
pub const DEFAULT_ENV_FILE_PATH: &str = ".env";
pub const DEFAULT_OVERRIDE: bool = true;
pub const DEFAULT_VERBOSE: bool = false;

/// Name shown in usage output
pub const PROGRAM_NAME: &str = "envloadr";
/// Environment variable that replaces the default log filter
pub const LOG_ENV_VAR: &str = "ENVLOADR_LOG";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Environment files, loaded in order
    pub files: Vec<PathBuf>,
    /// Whether later definitions replace earlier ones
    pub override_existing: bool,
    /// Report every file and variable as it is loaded
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            files: vec![PathBuf::from(DEFAULT_ENV_FILE_PATH)],
            override_existing: DEFAULT_OVERRIDE,
            verbose: DEFAULT_VERBOSE,
        }
    }
}

impl Config {
    /// Create configuration from parsed options, falling back to defaults
    pub fn from_options(options: Option<&Options>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(options) = options {
            if let Some(files) = options.get(FILES).and_then(OptionValue::as_list) {
                config.files = files.iter().map(PathBuf::from).collect();
            }
            if let Some(no_override) = options.get(NO_OVERRIDE).and_then(OptionValue::as_bool) {
                config.override_existing = !no_override;
            }
            if let Some(verbose) = options.get(VERBOSE).and_then(OptionValue::as_bool) {
                config.verbose = verbose;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.files.is_empty() {
            return Err(LoaderError::config("No environment file given"));
        }

        if self.files.iter().any(|path| path.as_os_str().is_empty()) {
            return Err(LoaderError::config("Empty path in environment file list"));
        }

        Ok(())
    }

    /// Options handed to the environment file parser
    pub fn env_file_options(&self) -> EnvFileOptions {
        EnvFileOptions {
            override_existing: self.override_existing,
            verbose: self.verbose,
        }
    }
}
