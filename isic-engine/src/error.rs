//! Engine error types

use isic_core::ScoreError;
use thiserror::Error;

/// Errors raised while orchestrating a scoring task
#[derive(Error, Debug)]
pub enum EngineError {
    /// The submission or ground truth violated a scoring invariant
    ///
    /// Displayed exactly as the underlying message, which is user-facing.
    #[error(transparent)]
    Score(#[from] ScoreError),

    /// Configuration error
    #[error("invalid configuration: {0}")]
    ConfigError(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(String),
}

impl EngineError {
    /// The scoring failure, if this error is one
    pub fn as_score_error(&self) -> Option<&ScoreError> {
        match self {
            EngineError::Score(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::IoError(err.to_string())
    }
}

impl From<toml::de::Error> for EngineError {
    fn from(err: toml::de::Error) -> Self {
        EngineError::ConfigError(err.to_string())
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
