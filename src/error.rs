//! Error types for weeek-sync

use thiserror::Error;

/// Synchronization error type
#[derive(Debug, Error)]
pub enum Error {
    /// Required configuration is missing or malformed
    #[error("configuration error: {0}")]
    Config(String),

    /// Network failure before a response was received
    #[error("network error: {0}")]
    Network(String),

    /// API returned a non-success status
    #[error("api error: {url} returned {status}: {body}")]
    Api {
        /// Request URL
        url: String,
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// API responded 2xx but reported a domain-level failure
    #[error("service error: {url}: {detail}")]
    Service {
        /// Request URL
        url: String,
        /// What was wrong with the response
        detail: String,
    },

    /// Response body could not be deserialized
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
