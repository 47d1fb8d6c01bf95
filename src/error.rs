//! Error type shared by the library.

use thiserror::Error;

/// Errors surfaced to the operator. Per-tick simulation never produces these.
#[derive(Debug, Error)]
pub enum FlapError {
    /// A configuration value is missing or out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization failure: {0}")]
    Serialization(String),

    /// Stored genome failed magic or checksum verification.
    #[error("corrupt genome file: {0}")]
    CorruptGenome(String),

    #[error("terminal failure: {0}")]
    Terminal(std::io::Error),
}

impl From<serde_json::Error> for FlapError {
    fn from(err: serde_json::Error) -> Self {
        FlapError::Serialization(err.to_string())
    }
}

impl From<bincode::Error> for FlapError {
    fn from(err: bincode::Error) -> Self {
        FlapError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FlapError>;
