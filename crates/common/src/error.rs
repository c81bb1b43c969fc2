//! Common error types for Groupcast components.

use std::fmt;

/// A specialized Result type for Groupcast operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for Groupcast operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Address resolution error: {0}")]
    Resolve(String),

    #[error("Socket error: {0}")]
    Socket(String),

    #[error("Interface error: {0}")]
    Interface(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown error: {0}")]
    Other(String),
}

impl Error {
    /// Create a new address resolution error.
    pub fn resolve(msg: impl fmt::Display) -> Self {
        Error::Resolve(msg.to_string())
    }

    /// Create a new socket error.
    pub fn socket(msg: impl fmt::Display) -> Self {
        Error::Socket(msg.to_string())
    }

    /// Create a new interface error.
    pub fn interface(msg: impl fmt::Display) -> Self {
        Error::Interface(msg.to_string())
    }

    /// Create a new configuration error.
    pub fn config(msg: impl fmt::Display) -> Self {
        Error::Config(msg.to_string())
    }

    /// Create a new other error.
    pub fn other(msg: impl fmt::Display) -> Self {
        Error::Other(msg.to_string())
    }
}
