//! The API client: configuration surface, verb methods and dispatch.

use std::collections::BTreeMap;

use http::header::{CONTENT_TYPE, HOST, HeaderName, HeaderValue};
use http::{Method, StatusCode};
use url::Url;

use super::tracer::{TraceEvent, TracerChain};
use super::{ApiError, BuildError, Params};
use crate::transport::{HttpRequest, ReqwestTransport, Transport, canonical_header_name};

/// Content type forced on every request that carries a form body.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

/// HTTP client bound to one base URL.
///
/// Configuration methods consume and return the client so they chain;
/// once configured, the verb methods take `&self` and the client can be
/// shared between tasks.
///
/// # Type Parameters
///
/// - `T`: The transport implementation (defaults to [`ReqwestTransport`])
///
/// # Example
///
/// ```
/// use api_client::api::{ApiClient, Params};
/// use api_client::testing::HandlerTransport;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let client = ApiClient::new("http://127.0.0.1:8000/")
///     .set_header("x-api-key", "secret")
///     .replace(HandlerTransport::new(|w, r| {
///         w.write_status(http::StatusCode::OK);
///         w.write(r.url.path().as_bytes());
///     }));
///
/// let body = client.get("/users", &Params::new()).await.unwrap();
/// assert_eq!(body, b"/users");
/// # }
/// ```
#[derive(Debug)]
pub struct ApiClient<T = ReqwestTransport> {
    base_url: String,
    headers: BTreeMap<String, String>,
    tracers: TracerChain,
    transport: T,
}

impl ApiClient<ReqwestTransport> {
    /// Creates a client for `base_url` using the default reqwest transport.
    ///
    /// Trailing slashes are stripped. The URL is not validated here; an
    /// unusable base URL makes each request fail with [`ApiError::Request`].
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_transport(base_url, ReqwestTransport::new())
    }
}

impl<T> ApiClient<T> {
    /// Creates a client for `base_url` using the given transport.
    #[must_use]
    pub fn with_transport(base_url: impl Into<String>, transport: T) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            headers: BTreeMap::new(),
            tracers: TracerChain::default(),
            transport,
        }
    }

    /// Sets a header sent with every request.
    ///
    /// The name is stored in canonical form, so `content-type` and
    /// `Content-Type` refer to the same header; a later value overwrites
    /// an earlier one. Setting `Host` also overrides the wire host.
    #[must_use]
    pub fn set_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(canonical_header_name(name.as_ref()), value.into());
        self
    }

    /// Registers a tracer, run after every dispatch in registration order.
    ///
    /// A panic inside the tracer is caught and logged.
    #[must_use]
    pub fn trace<F>(mut self, tracer: F) -> Self
    where
        F: Fn(&TraceEvent<'_>) + Send + Sync + 'static,
    {
        self.tracers.push(tracer);
        self
    }

    /// Swaps the transport used for all subsequent requests.
    ///
    /// Headers and tracers are kept.
    #[must_use]
    pub fn replace<T2>(self, transport: T2) -> ApiClient<T2> {
        ApiClient {
            base_url: self.base_url,
            headers: self.headers,
            tracers: self.tracers,
            transport,
        }
    }

    /// Returns the base URL, without trailing slashes.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Iterates over the default headers as `(canonical name, value)`.
    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the number of registered tracers.
    #[must_use]
    pub fn tracer_count(&self) -> usize {
        self.tracers.len()
    }

    /// Returns the active transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: Transport> ApiClient<T> {
    /// Sends a GET request with `params` in the query string.
    ///
    /// # Errors
    ///
    /// See [`ApiError`]. A non-200 response yields [`ApiError::Status`]
    /// carrying the response body.
    pub async fn get(&self, path: &str, params: &Params) -> Result<Vec<u8>, ApiError> {
        self.dispatch(Method::GET, path, params).await
    }

    /// Sends a POST request with `params` as a urlencoded form body.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn post(&self, path: &str, params: &Params) -> Result<Vec<u8>, ApiError> {
        self.dispatch(Method::POST, path, params).await
    }

    /// Sends a PUT request with `params` as a urlencoded form body.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn put(&self, path: &str, params: &Params) -> Result<Vec<u8>, ApiError> {
        self.dispatch(Method::PUT, path, params).await
    }

    /// Sends a DELETE request with `params` as a urlencoded form body.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn delete(&self, path: &str, params: &Params) -> Result<Vec<u8>, ApiError> {
        self.dispatch(Method::DELETE, path, params).await
    }

    /// Builds, sends and classifies one request, then fires the tracers.
    ///
    /// This is the single exit point of every verb, so tracers run
    /// exactly once whichever stage fails.
    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        params: &Params,
    ) -> Result<Vec<u8>, ApiError> {
        let (request, exchange) = match self.build_request(method, path, params) {
            Ok(request) => {
                tracing::debug!(method = %request.method, url = %request.url, "Dispatching request");
                let exchange = self.exchange(request.clone()).await;
                (Some(request), exchange)
            }
            Err(e) => (None, Exchange::unsent(ApiError::Request(e))),
        };

        self.tracers.fire(&TraceEvent {
            request: request.as_ref(),
            body: exchange.body(),
            status: exchange.status,
            error: exchange.outcome.as_ref().err(),
        });

        exchange.outcome
    }

    async fn exchange(&self, request: HttpRequest) -> Exchange {
        let response = match self.transport.request(request).await {
            Ok(response) => response,
            Err(e) => return Exchange::unsent(ApiError::Send(e)),
        };

        let status = response.status;
        let mut body = Vec::new();
        if let Err(source) = response.body.read_to_end(&mut body).await {
            return Exchange {
                status: Some(status),
                outcome: Err(ApiError::Read {
                    status,
                    source,
                    partial: body,
                }),
            };
        }

        let outcome = if status == StatusCode::OK {
            Ok(body)
        } else {
            Err(ApiError::Status { status, body })
        };

        Exchange {
            status: Some(status),
            outcome,
        }
    }

    fn build_request(
        &self,
        method: Method,
        path: &str,
        params: &Params,
    ) -> Result<HttpRequest, BuildError> {
        let mut url = resolve_url(&self.base_url, path)?;
        let has_form_body = method != Method::GET;

        if !has_form_body && !params.is_empty() {
            url.set_query(Some(&params.encode()));
        }

        let mut request = HttpRequest::new(method, url);
        if has_form_body {
            request = request.with_body(params.encode().into_bytes());
        }

        for (name, value) in &self.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|source| {
                BuildError::InvalidHeaderName {
                    name: name.clone(),
                    source,
                }
            })?;
            let header_value =
                HeaderValue::from_str(value).map_err(|source| BuildError::InvalidHeaderValue {
                    name: name.clone(),
                    source,
                })?;

            // Header alone does not change the wire host for every transport
            if header_name == HOST {
                request.host = Some(value.clone());
            }
            request.headers.insert(header_name, header_value);
        }

        // Form encoding implies this content type; user headers cannot override it
        if has_form_body {
            request
                .headers
                .insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
        }

        Ok(request)
    }
}

/// Outcome of one dispatch, before tracers run.
struct Exchange {
    status: Option<StatusCode>,
    outcome: Result<Vec<u8>, ApiError>,
}

impl Exchange {
    const fn unsent(error: ApiError) -> Self {
        Self {
            status: None,
            outcome: Err(error),
        }
    }

    fn body(&self) -> &[u8] {
        match &self.outcome {
            Ok(body) => body,
            Err(error) => error.body(),
        }
    }
}

/// Joins `path` onto `base`, discarding the base's query and fragment.
///
/// Exactly one slash separates the base path from `path`; leading
/// slashes of `path` are dropped, a trailing slash is kept.
fn resolve_url(base: &str, path: &str) -> Result<Url, BuildError> {
    let mut url = Url::parse(base).map_err(|source| BuildError::InvalidUrl {
        url: base.to_string(),
        source,
    })?;

    if url.cannot_be_a_base() {
        return Err(BuildError::InvalidUrl {
            url: base.to_string(),
            source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
        });
    }

    url.set_query(None);
    url.set_fragment(None);

    let joined = format!(
        "{}/{}",
        url.path().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    url.set_path(&joined);

    Ok(url)
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
