//! Error types for orgtract.

use thiserror::Error;

/// Result type for orgtract operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for orgtract operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Invalid input provided (e.g. a record missing the source field).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration problem detected before processing started.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The entity extractor failed for one call.
    #[error("Extractor failure: {0}")]
    Extractor(String),

    /// The operator cancelled an interactive step.
    #[error("Cancelled: {0}")]
    Cancelled(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl Error {
    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an extractor failure.
    #[must_use]
    pub fn extractor(msg: impl Into<String>) -> Self {
        Self::Extractor(msg.into())
    }

    /// Create a cancellation error.
    #[must_use]
    pub fn cancelled(msg: impl Into<String>) -> Self {
        Self::Cancelled(msg.into())
    }

    /// Create a parse error.
    #[must_use]
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// True for errors that must abort a run before any record is processed.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_) | Self::InvalidInput(_))
    }
}
