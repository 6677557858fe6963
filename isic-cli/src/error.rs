//! Error handling for the CLI application

use std::fmt;

/// Custom error type for CLI-specific errors
#[derive(Debug)]
pub enum CliError {
    /// File or directory not found or inaccessible
    FileNotFound(String),
    /// Input has the wrong kind for the task (file vs directory)
    WrongInputKind {
        /// Offending path
        path: String,
        /// What the task expects at this path
        expected: &'static str,
    },
    /// Configuration error
    ConfigError(String),
    /// Scoring failed
    ScoringFailed(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::FileNotFound(path) => write!(f, "File not found: {path}"),
            CliError::WrongInputKind { path, expected } => {
                write!(f, "Expected {expected}: {path}")
            }
            CliError::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
            CliError::ScoringFailed(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CliError {}

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, anyhow::Error>;
