//! Error types
//!
//! One error enum for the whole crate. The pure core only ever produces
//! `InvalidLocator` and `InvalidInput`; the remaining variants belong to the
//! storage, provider and session layers.

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed Maidenhead grid string
    #[error("invalid grid locator: {0}")]
    InvalidLocator(String),

    /// Missing or malformed required value (coordinate, callsign, threshold, record)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Required setting missing (API key, own callsign)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("provider call timed out after {0}s")]
    Timeout(u64),

    #[error("storage error: {0}")]
    Store(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures reported by directory/logbook provider implementations
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Transport failed before a response arrived
    #[error("network error: {0}")]
    Network(String),
    /// Provider answered but refused the request
    #[error("remote service rejected request: {0}")]
    Rejected(String),
    /// Response could not be understood
    #[error("malformed response: {0}")]
    Malformed(String),
}
