//! HTTP request/response types and the transport trait.

use std::fmt;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use tokio_stream::{Stream, StreamExt};

use super::HttpError;

/// An HTTP request to be sent.
///
/// This is a value type that can be constructed and passed to any
/// [`Transport`] implementation. It uses standard `http` crate types
/// for method and headers, ensuring compatibility with the broader ecosystem.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method (GET, POST, PUT, DELETE, etc.)
    pub method: http::Method,
    /// Target URL
    pub url: url::Url,
    /// HTTP headers to send
    pub headers: http::HeaderMap,
    /// Explicit wire host, overriding the URL's host when set
    pub host: Option<String>,
    /// Optional request body
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Creates a new HTTP request with the given method and URL.
    ///
    /// Headers are initialized to an empty map, no host override is set
    /// and body is `None`.
    #[must_use]
    pub fn new(method: http::Method, url: url::Url) -> Self {
        Self {
            method,
            url,
            headers: http::HeaderMap::new(),
            host: None,
            body: None,
        }
    }

    /// Sets the request body.
    #[must_use]
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Returns the host this request is addressed to.
    ///
    /// The explicit override wins over the URL's host.
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref().or_else(|| self.url.host_str())
    }

    /// Returns the request body, or an empty slice when there is none.
    #[must_use]
    pub fn body_bytes(&self) -> &[u8] {
        self.body.as_deref().unwrap_or_default()
    }
}

type ChunkStream = Pin<Box<dyn Stream<Item = Result<Bytes, HttpError>> + Send>>;

/// A response body delivered as a stream of byte chunks.
///
/// Reading can fail part way; bytes received before the failure are kept.
pub struct Body {
    chunks: ChunkStream,
}

impl Body {
    /// Creates an empty body.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_stream(tokio_stream::empty())
    }

    /// Creates a body that yields `bytes` in one chunk.
    #[must_use]
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Self::from_stream(tokio_stream::once(Ok(bytes.into())))
    }

    /// Creates a body from a stream of chunks.
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, HttpError>> + Send + 'static,
    {
        Self {
            chunks: Box::pin(stream),
        }
    }

    /// Reads every remaining chunk into `buf`.
    ///
    /// Returns the number of bytes appended.
    ///
    /// # Errors
    ///
    /// Returns the first chunk error. Bytes read before it remain in `buf`.
    pub async fn read_to_end(mut self, buf: &mut Vec<u8>) -> Result<usize, HttpError> {
        let start = buf.len();
        while let Some(chunk) = self.chunks.next().await {
            buf.extend_from_slice(&chunk?);
        }
        Ok(buf.len() - start)
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Body").finish_non_exhaustive()
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::empty()
    }
}

/// An HTTP response received from a server.
///
/// Contains the status code, headers, and a body that has not been read yet.
#[derive(Debug)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: http::StatusCode,
    /// Response headers
    pub headers: http::HeaderMap,
    /// Response body (unread)
    pub body: Body,
}

impl HttpResponse {
    /// Creates a new HTTP response.
    #[must_use]
    pub const fn new(status: http::StatusCode, headers: http::HeaderMap, body: Body) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }
}

/// Trait for dispatching HTTP requests.
///
/// # Design
///
/// This trait abstracts the HTTP client implementation, enabling:
/// - Dependency injection for testing with an in-process double
/// - Swapping HTTP libraries without changing calling code
///
/// An `Err` is always a transport failure. Responses with any status,
/// including 4xx and 5xx, are returned as `Ok`.
///
/// # Example
///
/// ```ignore
/// use api_client::transport::{Body, HttpError, HttpRequest, HttpResponse, Transport};
///
/// struct Teapot;
///
/// impl Transport for Teapot {
///     async fn request(&self, _req: HttpRequest) -> Result<HttpResponse, HttpError> {
///         Ok(HttpResponse::new(
///             http::StatusCode::IM_A_TEAPOT,
///             http::HeaderMap::new(),
///             Body::from_bytes("short and stout"),
///         ))
///     }
/// }
/// ```
pub trait Transport: Send + Sync {
    /// Sends an HTTP request and returns the response.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] when:
    /// - Network connection fails ([`HttpError::Connection`])
    /// - Request times out ([`HttpError::Timeout`])
    /// - URL is invalid ([`HttpError::InvalidUrl`])
    /// - The response head cannot be parsed ([`HttpError::MalformedResponse`])
    fn request(
        &self,
        req: HttpRequest,
    ) -> impl std::future::Future<Output = Result<HttpResponse, HttpError>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn request(
        &self,
        req: HttpRequest,
    ) -> impl std::future::Future<Output = Result<HttpResponse, HttpError>> + Send {
        (**self).request(req)
    }
}

/// Converts a header name to its canonical form.
///
/// The first letter and any letter following a hyphen are upper-cased,
/// the rest lower-cased: `content-type` becomes `Content-Type`.
/// Names containing characters that are not valid in an HTTP token
/// are returned unchanged.
#[must_use]
pub fn canonical_header_name(name: &str) -> String {
    if name.is_empty() || !name.bytes().all(is_token_byte) {
        return name.to_string();
    }

    let mut upper = true;
    name.chars()
        .map(|c| {
            let out = if upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            };
            upper = c == '-';
            out
        })
        .collect()
}

const fn is_token_byte(b: u8) -> bool {
    matches!(
        b,
        b'!' | b'#'
            | b'$'
            | b'%'
            | b'&'
            | b'\''
            | b'*'
            | b'+'
            | b'-'
            | b'.'
            | b'^'
            | b'_'
            | b'`'
            | b'|'
            | b'~'
    ) || b.is_ascii_alphanumeric()
}
