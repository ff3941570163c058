//! Error types for transport operations.

use thiserror::Error;

/// Error type for transport-level failures.
///
/// Describes what went wrong while moving bytes, never an HTTP status:
/// a non-2xx response is a successful transport outcome.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, connection refused,
    /// and other network-level errors.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request timed out.
    ///
    /// The server did not respond within the configured timeout period.
    #[error("Request timed out")]
    Timeout,

    /// The provided URL is invalid.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The response body stream failed after the head was received.
    #[error("Body error: {0}")]
    Body(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The response bytes could not be parsed as HTTP/1.1.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}
