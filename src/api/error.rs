//! Error types for API client operations.

use http::StatusCode;
use thiserror::Error;

use crate::transport::HttpError;

/// Error returned by the [`ApiClient`](super::ApiClient) verb methods.
///
/// Each variant names the dispatch stage that failed. None of them is
/// retried internally; callers decide what to do.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be built from the client configuration.
    #[error("new request error: {0}")]
    Request(#[source] BuildError),

    /// The transport failed to deliver the request or receive a response.
    #[error("request send error: {0}")]
    Send(#[source] HttpError),

    /// The response body could not be read completely.
    #[error("response body read error: {source}")]
    Read {
        /// Status of the response whose body failed
        status: StatusCode,
        /// Underlying transport error
        #[source]
        source: HttpError,
        /// Bytes received before the failure
        partial: Vec<u8>,
    },

    /// The server answered with a status other than 200.
    ///
    /// The body is kept: failure responses often carry diagnostics.
    #[error("http error [{}]", .status.as_u16())]
    Status {
        /// Response status code
        status: StatusCode,
        /// Response body
        body: Vec<u8>,
    },
}

impl ApiError {
    /// Returns the response status, if a response was received.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } | Self::Read { status, .. } => Some(*status),
            Self::Request(_) | Self::Send(_) => None,
        }
    }

    /// Returns whatever body bytes were received before the error.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        match self {
            Self::Read { partial, .. } => partial,
            Self::Status { body, .. } => body,
            Self::Request(_) | Self::Send(_) => &[],
        }
    }

    /// Consumes the error, returning the received body bytes.
    #[must_use]
    pub fn into_body(self) -> Vec<u8> {
        match self {
            Self::Read { partial, .. } => partial,
            Self::Status { body, .. } => body,
            Self::Request(_) | Self::Send(_) => Vec::new(),
        }
    }
}

/// Reasons a request cannot be constructed.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The base URL joined with the path is not a valid absolute URL.
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        /// The URL that failed to parse
        url: String,
        /// Underlying parse error
        #[source]
        source: url::ParseError,
    },

    /// A configured header name is not a valid HTTP token.
    #[error("invalid header name '{name}': {source}")]
    InvalidHeaderName {
        /// The rejected name
        name: String,
        /// Underlying error
        #[source]
        source: http::header::InvalidHeaderName,
    },

    /// A configured header value contains forbidden bytes.
    #[error("invalid header value for '{name}': {source}")]
    InvalidHeaderValue {
        /// The header name
        name: String,
        /// Underlying error
        #[source]
        source: http::header::InvalidHeaderValue,
    },
}
