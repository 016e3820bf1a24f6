//! Error types for Service Finder.

use thiserror::Error;

/// Result type alias using Service Finder's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for Service Finder.
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Gateway Errors
    // =========================================================================
    #[error("Gateway error: {0}")]
    Gateway(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // =========================================================================
    // Oracle Errors
    // =========================================================================
    #[error("Oracle transport error: {0}")]
    OracleTransport(String),

    #[error("Oracle format error: {0}")]
    OracleFormat(String),

    #[error("Validation error: {0}")]
    Validation(String),

    // =========================================================================
    // Generic Errors
    // =========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Create a gateway error.
    pub fn gateway(msg: impl Into<String>) -> Self {
        Self::Gateway(msg.into())
    }

    /// Create an invalid request error.
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Create an oracle transport error.
    pub fn oracle_transport(msg: impl Into<String>) -> Self {
        Self::OracleTransport(msg.into())
    }

    /// Create an oracle format error.
    pub fn oracle_format(msg: impl Into<String>) -> Self {
        Self::OracleFormat(msg.into())
    }

    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a timeout error.
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Create an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
