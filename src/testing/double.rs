//! Handler-driven transport double.

use std::fmt;

use super::{ResponseWriter, parse_response};
use crate::transport::{HttpError, HttpRequest, HttpResponse, Transport};

/// A [`Transport`] that answers requests by running a handler in-process.
///
/// No socket is opened. For each request the handler fills a fresh
/// [`ResponseWriter`]; the result is serialized to raw HTTP/1.1 bytes and
/// parsed back, so the client under test goes through the same response
/// parsing a network reply would. A `Content-Length` set by the handler
/// that disagrees with the body is a parse error.
///
/// A handler that never sets a status produces `500 Internal Server Error`.
///
/// # Example
///
/// ```
/// use api_client::testing::HandlerTransport;
/// use api_client::transport::{HttpRequest, Transport};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let transport = HandlerTransport::new(|w, r| {
///     w.write_status(http::StatusCode::CREATED);
///     w.write(r.method.as_str());
/// });
///
/// let url = url::Url::parse("http://127.0.0.1/").unwrap();
/// let response = transport
///     .request(HttpRequest::new(http::Method::PUT, url))
///     .await
///     .unwrap();
///
/// assert_eq!(response.status, http::StatusCode::CREATED);
/// let mut body = Vec::new();
/// response.body.read_to_end(&mut body).await.unwrap();
/// assert_eq!(body, b"PUT");
/// # }
/// ```
pub struct HandlerTransport<F> {
    handler: F,
}

impl<F> HandlerTransport<F>
where
    F: Fn(&mut ResponseWriter, &HttpRequest) + Send + Sync,
{
    /// Creates a transport that answers every request with `handler`.
    #[must_use]
    pub const fn new(handler: F) -> Self {
        Self { handler }
    }

    /// Runs the handler and returns the raw response bytes it produces.
    #[must_use]
    pub fn render(&self, req: &HttpRequest) -> Vec<u8> {
        let mut writer = ResponseWriter::new();
        (self.handler)(&mut writer, req);
        writer.to_wire()
    }
}

impl<F> Transport for HandlerTransport<F>
where
    F: Fn(&mut ResponseWriter, &HttpRequest) + Send + Sync,
{
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let wire = self.render(&req);
        tracing::trace!(method = %req.method, url = %req.url, bytes = wire.len(), "Handler produced response");
        parse_response(&wire, &req)
    }
}

impl<F> fmt::Debug for HandlerTransport<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerTransport").finish_non_exhaustive()
    }
}
