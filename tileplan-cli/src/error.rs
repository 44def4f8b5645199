//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and exit codes.

use std::fmt;
use std::process;
use tileplan::config::ConfigFileError;
use tileplan::pyramid::PlanError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration file could not be read or is invalid
    Config(ConfigFileError),
    /// Plan file could not be loaded or built
    Plan { path: String, error: PlanError },
    /// Failed to start the async runtime
    Runtime(std::io::Error),
    /// A command-line value is out of range for the loaded plan
    InvalidArgument(String),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Plan { .. } => {
                eprintln!();
                eprintln!("A plan file needs:");
                eprintln!("  1. A [plan] section with sources = single | per-level | per-tile");
                eprintln!(
                    "  2. One [level.N] section per zoom level (dimension, tile_size, scale)"
                );
                eprintln!("  3. Exactly one level with scale = 1.0");
            }
            CliError::Config(_) => {
                eprintln!();
                eprintln!("Fix the value in config.ini or remove it to use the default.");
            }
            _ => {}
        }

        process::exit(match self {
            CliError::InvalidArgument(_) => 2,
            _ => 1,
        })
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Plan { path, error } => {
                write!(f, "Failed to load plan '{}': {}", path, error)
            }
            CliError::Runtime(e) => write!(f, "Failed to start runtime: {}", e),
            CliError::InvalidArgument(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Plan { error, .. } => Some(error),
            CliError::Runtime(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}
