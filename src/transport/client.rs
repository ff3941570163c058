//! Production transport implementation using reqwest.

use tokio_stream::StreamExt;

use super::{Body, HttpError, HttpRequest, HttpResponse, Transport};

/// Production transport using reqwest.
///
/// This is a thin wrapper around `reqwest::Client` that implements
/// the [`Transport`] trait. It inherits reqwest's default configuration
/// including connection pooling and reasonable timeouts.
///
/// The response body is handed back as a stream, so failures while
/// reading it are reported by [`Body::read_to_end`] rather than here.
///
/// # Example
///
/// ```no_run
/// use api_client::transport::{HttpRequest, ReqwestTransport, Transport};
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = ReqwestTransport::new();
/// let url = Url::parse("https://api.example.com/status")?;
/// let request = HttpRequest::new(http::Method::GET, url);
/// let response = transport.request(request).await?;
/// println!("Status: {}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a new transport with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: reqwest::Client::new(),
        }
    }

    /// Creates a transport from an existing reqwest client.
    ///
    /// Useful when you need custom configuration (timeouts, TLS, etc.).
    #[must_use]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self { inner: client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for ReqwestTransport {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut headers = req.headers;

        // reqwest derives Host from the URL unless one is given explicitly
        if let Some(host) = req.host {
            let value = http::HeaderValue::from_str(&host)
                .map_err(|e| HttpError::InvalidUrl(format!("invalid host {host:?}: {e}")))?;
            headers.insert(http::header::HOST, value);
        }

        let mut builder = self
            .inner
            .request(req.method, req.url.as_str())
            .headers(headers);

        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout
            } else if e.is_builder() {
                HttpError::InvalidUrl(e.to_string())
            } else {
                HttpError::Connection(Box::new(e))
            }
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = Body::from_stream(
            response
                .bytes_stream()
                .map(|chunk| chunk.map_err(|e| HttpError::Body(Box::new(e)))),
        );

        Ok(HttpResponse::new(status, headers, body))
    }
}
