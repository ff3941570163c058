//! Tests for HTTP request/response types.

use super::{Body, HttpError, HttpRequest, HttpResponse, Transport, canonical_header_name};

fn example_url() -> url::Url {
    url::Url::parse("https://example.com/api").unwrap()
}

mod http_request {
    use super::*;

    #[test]
    fn new_creates_request_with_method_and_url() {
        let req = HttpRequest::new(http::Method::PUT, example_url());

        assert_eq!(req.method, http::Method::PUT);
        assert_eq!(req.url, example_url());
        assert!(req.headers.is_empty());
        assert!(req.host.is_none());
        assert!(req.body.is_none());
    }

    #[test]
    fn with_body_sets_body() {
        let body = b"a=1".to_vec();
        let req = HttpRequest::new(http::Method::POST, example_url()).with_body(body.clone());

        assert_eq!(req.body, Some(body));
        assert_eq!(req.body_bytes(), b"a=1");
    }

    #[test]
    fn body_bytes_is_empty_without_body() {
        let req = HttpRequest::new(http::Method::GET, example_url());

        assert!(req.body_bytes().is_empty());
    }

    #[test]
    fn host_defaults_to_url_host() {
        let req = HttpRequest::new(http::Method::GET, example_url());

        assert_eq!(req.host(), Some("example.com"));
    }

    #[test]
    fn host_override_wins_over_url_host() {
        let mut req = HttpRequest::new(http::Method::GET, example_url());
        req.host = Some("other.test".to_string());

        assert_eq!(req.host(), Some("other.test"));
    }

    #[test]
    fn debug_format_is_readable() {
        let req = HttpRequest::new(http::Method::GET, example_url());
        let debug = format!("{req:?}");

        assert!(debug.contains("HttpRequest"));
        assert!(debug.contains("GET"));
    }
}

mod body {
    use super::*;

    #[tokio::test]
    async fn empty_body_reads_nothing() {
        let mut buf = Vec::new();
        let read = Body::empty().read_to_end(&mut buf).await.unwrap();

        assert_eq!(read, 0);
        assert!(buf.is_empty());
    }

    #[tokio::test]
    async fn from_bytes_reads_all_bytes() {
        let mut buf = Vec::new();
        let read = Body::from_bytes("hello").read_to_end(&mut buf).await.unwrap();

        assert_eq!(read, 5);
        assert_eq!(buf, b"hello");
    }

    #[tokio::test]
    async fn read_to_end_appends_to_existing_buffer() {
        let mut buf = b"pre-".to_vec();
        let read = Body::from_bytes("fix").read_to_end(&mut buf).await.unwrap();

        assert_eq!(read, 3);
        assert_eq!(buf, b"pre-fix");
    }

    #[tokio::test]
    async fn stream_failure_keeps_partial_bytes() {
        let chunks = vec![
            Ok(bytes::Bytes::from_static(b"par")),
            Ok(bytes::Bytes::from_static(b"tial")),
            Err(HttpError::Body(Box::new(std::io::Error::other("reset")))),
            Ok(bytes::Bytes::from_static(b"never")),
        ];
        let mut buf = Vec::new();

        let result = Body::from_stream(tokio_stream::iter(chunks))
            .read_to_end(&mut buf)
            .await;

        assert!(matches!(result, Err(HttpError::Body(_))));
        assert_eq!(buf, b"partial");
    }

    #[test]
    fn debug_format_does_not_expose_stream() {
        let debug = format!("{:?}", Body::empty());

        assert!(debug.starts_with("Body"));
    }
}

mod http_response {
    use super::*;

    #[tokio::test]
    async fn new_keeps_status_headers_and_body() {
        let mut headers = http::HeaderMap::new();
        headers.insert(http::header::ETAG, http::HeaderValue::from_static("\"v1\""));

        let resp = HttpResponse::new(http::StatusCode::ACCEPTED, headers, Body::from_bytes("done"));
        let mut body = Vec::new();
        resp.body.read_to_end(&mut body).await.unwrap();

        assert_eq!(resp.status, http::StatusCode::ACCEPTED);
        assert_eq!(resp.headers.get(http::header::ETAG).unwrap(), "\"v1\"");
        assert_eq!(body, b"done");
    }
}

mod http_error {
    use super::*;
    use std::error::Error;

    #[test]
    fn connection_error_preserves_source() {
        let source = std::io::Error::other("network unavailable");
        let error = HttpError::Connection(Box::new(source));

        assert!(error.to_string().contains("Connection error"));
        assert!(
            error
                .source()
                .unwrap()
                .to_string()
                .contains("network unavailable")
        );
    }

    #[test]
    fn timeout_displays_message() {
        assert_eq!(HttpError::Timeout.to_string(), "Request timed out");
    }

    #[test]
    fn body_error_preserves_source() {
        let error = HttpError::Body(Box::new(std::io::Error::other("truncated")));

        assert!(error.to_string().contains("Body error"));
        assert!(error.source().is_some());
    }

    #[test]
    fn malformed_response_displays_reason() {
        let error = HttpError::MalformedResponse("bad status line".to_string());

        assert!(error.to_string().contains("bad status line"));
        assert!(error.source().is_none());
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpError>();
    }
}

mod transport_trait {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts calls and answers every request with 204.
    #[derive(Default)]
    struct CountingTransport {
        calls: AtomicUsize,
    }

    impl Transport for CountingTransport {
        async fn request(&self, _req: HttpRequest) -> Result<HttpResponse, HttpError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(HttpResponse::new(
                http::StatusCode::NO_CONTENT,
                http::HeaderMap::new(),
                Body::empty(),
            ))
        }
    }

    #[tokio::test]
    async fn arc_forwards_to_shared_transport() {
        let shared = Arc::new(CountingTransport::default());
        let a = Arc::clone(&shared);
        let b = Arc::clone(&shared);

        let req = HttpRequest::new(http::Method::GET, example_url());
        a.request(req.clone()).await.unwrap();
        b.request(req).await.unwrap();

        assert_eq!(shared.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn trait_is_send_sync() {
        fn assert_transport<T: Transport>() {}
        assert_transport::<CountingTransport>();
        assert_transport::<Arc<CountingTransport>>();
    }
}

mod canonical_names {
    use super::*;

    #[test]
    fn lower_case_is_title_cased() {
        assert_eq!(canonical_header_name("content-type"), "Content-Type");
        assert_eq!(canonical_header_name("host"), "Host");
    }

    #[test]
    fn mixed_case_is_normalized() {
        assert_eq!(canonical_header_name("x-API-key"), "X-Api-Key");
        assert_eq!(canonical_header_name("CONTENT-LENGTH"), "Content-Length");
    }

    #[test]
    fn invalid_names_are_left_alone() {
        assert_eq!(canonical_header_name("bad header"), "bad header");
        assert_eq!(canonical_header_name(""), "");
    }
}
