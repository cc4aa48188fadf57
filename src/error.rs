//! Error types for launcher and publisher operations.
//!
//! Failures of the external tools are not errors here: their exit codes pass
//! through untouched. These types cover what the crate itself can get wrong.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for tool operations
pub type Result<T> = std::result::Result<T, ToolsError>;

/// Exit code the shell reports for a command it cannot find
pub const EXIT_NOT_FOUND: i32 = 127;

/// Exit code the shell reports for a command it found but cannot execute
pub const EXIT_NOT_EXECUTABLE: i32 = 126;

/// Main error type for all tool operations
#[derive(Error, Debug)]
pub enum ToolsError {
    /// CLI and process errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Program is not on PATH
    #[error("{program}: command not found")]
    ProgramNotFound {
        /// Program that was looked up
        program: String,
    },

    /// Command could not be started
    #[error("Command execution failed: {command} - {reason}")]
    ExecutionFailed {
        /// Command that failed
        command: String,
        /// Reason for the error
        reason: String,
    },
}

/// Configuration file errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// Config file path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// File is not valid TOML for the expected schema
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        /// Config file path
        path: PathBuf,
        /// Underlying TOML error
        #[source]
        source: toml::de::Error,
    },

    /// A value parsed but makes no sense
    #[error("invalid value for `{key}`: {reason}")]
    Invalid {
        /// Dotted key, e.g. `launcher.image`
        key: String,
        /// Reason for the error
        reason: String,
    },
}

impl ToolsError {
    /// Exit code a shell would have produced for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            ToolsError::Cli(CliError::ProgramNotFound { .. }) => EXIT_NOT_FOUND,
            ToolsError::Cli(CliError::ExecutionFailed { .. }) => EXIT_NOT_EXECUTABLE,
            _ => 1,
        }
    }
}
