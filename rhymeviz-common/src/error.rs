//! Common error types for Rhymeviz

use thiserror::Error;

/// Common result type for Rhymeviz operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the Rhymeviz crates
///
/// Every fetch failure is an explicit variant. Widgets surface these through
/// their status instead of silently never appearing.
#[derive(Error, Debug)]
pub enum Error {
    /// Network-level failure (connection refused, DNS, TLS)
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded the configured timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Endpoint answered with a non-success status
    #[error("API error {0}: {1}")]
    Api(u16, String),

    /// Response body could not be decoded into the expected payload
    #[error("Decode error: {0}")]
    Decode(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Widget context is missing or inconsistent
    #[error("Context error: {0}")]
    Context(String),
}
