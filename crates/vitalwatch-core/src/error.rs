//! Error types for VitalWatch
//!
//! Only the surfaces around the alerting core fail: configuration loading and
//! measurement ingestion. Rule evaluation itself is total over validated records.

use thiserror::Error;

/// Result type alias using VitalWatch's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for VitalWatch operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A measurement line could not be parsed
    #[error("Malformed measurement '{line}': {reason}")]
    Parse {
        /// The rejected input
        line: String,
        /// Why it was rejected
        reason: String,
    },

    /// Connection to a measurement producer failed
    #[error("Connection error: {0}")]
    Connection(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a parse error for a rejected input line
    pub fn parse(line: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            line: line.into(),
            reason: reason.into(),
        }
    }

    /// Create a connection error
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
