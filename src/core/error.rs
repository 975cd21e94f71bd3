//! Error handling - one flat error enum for the whole client

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Gateway client errors.
///
/// Application-level failures reported by the gateway (`"error"` field in the
/// response envelope) are not errors here: they come back as ordinary JSON.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport errors (connect, DNS, timeout, body read)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body was not JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Malformed form-encoded input
    #[error("Decode error: {0}")]
    Decode(String),

    /// Value not representable as an HTTP header
    #[error("Invalid header: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}
