//! Error types for the environment loader
//!
//! Every failure is a caller or environment misconfiguration, so each variant
//! carries enough context to be printed to the user as-is.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the environment loader
#[derive(Error, Debug)]
pub enum LoaderError {
    /// Errors in the command-line input
    #[error("Error parsing CLI input: {message}")]
    CliParse { message: String },

    /// Options parsed fine but do not form a usable configuration
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The option schema itself is inconsistent
    #[error("Invalid option schema: {message}")]
    Schema { message: String },

    /// An environment file could not be read
    #[error("Error parsing \"{}\": {source}", path.display())]
    EnvFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line of an environment file is malformed
    #[error("Error parsing line {line} of \"{}\": {message}", path.display())]
    EnvFileLine {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// The target command could not be started
    #[error("Command \"{command}\" failed to launch: {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A signal listener could not be installed
    #[error("Failed to listen for {signal}: {source}")]
    Signal {
        signal: String,
        #[source]
        source: std::io::Error,
    },

    /// The lifecycle session received an event it cannot accept
    #[error("Lifecycle error: {message}")]
    Lifecycle { message: String },
}

impl LoaderError {
    /// Create a new command-line parsing error
    pub fn cli_parse(message: impl Into<String>) -> Self {
        Self::CliParse {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new schema error
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    /// Create a new environment file read error
    pub fn env_file_read<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::EnvFileRead {
            path: path.into(),
            source,
        }
    }

    /// Create a new environment file line error
    pub fn env_file_line<P: Into<PathBuf>>(
        path: P,
        line: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::EnvFileLine {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    /// Create a new launch error
    pub fn launch(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::Launch {
            command: command.into(),
            source,
        }
    }

    /// Create a new signal listener error
    pub fn signal(signal: impl Into<String>, source: std::io::Error) -> Self {
        Self::Signal {
            signal: signal.into(),
            source,
        }
    }

    /// Create a new lifecycle error
    pub fn lifecycle(message: impl Into<String>) -> Self {
        Self::Lifecycle {
            message: message.into(),
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, LoaderError>;
