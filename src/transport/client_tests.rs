//! Tests for `ReqwestTransport`.
//!
//! Construction tests need no network. The wire tests run against a
//! one-shot listener on 127.0.0.1 and inspect the raw request bytes.

use super::{HttpError, HttpRequest, ReqwestTransport, Transport};

mod reqwest_transport {
    use super::*;

    #[test]
    fn default_creates_same_as_new() {
        let transport1 = ReqwestTransport::new();
        let transport2 = ReqwestTransport::default();

        let _ = format!("{transport1:?}");
        let _ = format!("{transport2:?}");
    }

    #[test]
    fn from_client_accepts_custom_client() {
        let custom = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap();
        let transport = ReqwestTransport::from_client(custom);

        assert!(format!("{transport:?}").contains("ReqwestTransport"));
    }

    #[test]
    fn transport_is_send_sync() {
        fn assert_transport<T: Transport + Clone>() {}
        assert_transport::<ReqwestTransport>();
    }

    #[tokio::test]
    async fn request_to_invalid_host_returns_error_or_proxy_response() {
        let transport = ReqwestTransport::new();
        let url = url::Url::parse("http://invalid.invalid.invalid/").unwrap();
        let req = HttpRequest::new(http::Method::GET, url);

        let result = transport.request(req).await;

        // A proxy in the environment may answer with an error status instead
        match result {
            Err(HttpError::Connection(_)) => {}
            Ok(resp) if !resp.status.is_success() => {}
            other => panic!("Expected connection error or proxy error response, got {other:?}"),
        }
    }
}

/// A one-shot HTTP/1.1 server on a loopback port.
mod loopback {
    use std::io::{Read, Write};
    use std::net::{SocketAddr, TcpListener};
    use std::thread::JoinHandle;

    /// Accepts one connection, answers with `response`, then closes it.
    ///
    /// The handle yields the raw request bytes.
    pub fn serve_once(response: &'static [u8]) -> (SocketAddr, JoinHandle<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let raw = read_request(&mut stream);
            stream.write_all(response).unwrap();
            stream.flush().unwrap();
            raw
        });

        (addr, handle)
    }

    fn read_request(stream: &mut impl Read) -> Vec<u8> {
        let mut raw = Vec::new();
        let mut chunk = [0u8; 1024];

        loop {
            let n = stream.read(&mut chunk).unwrap();
            if n == 0 {
                return raw;
            }
            raw.extend_from_slice(&chunk[..n]);

            let mut slots = [httparse::EMPTY_HEADER; 32];
            let mut req = httparse::Request::new(&mut slots);
            if let Ok(httparse::Status::Complete(head_len)) = req.parse(&raw) {
                let body_len = req
                    .headers
                    .iter()
                    .find(|h| h.name.eq_ignore_ascii_case("content-length"))
                    .and_then(|h| std::str::from_utf8(h.value).ok()?.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if raw.len() >= head_len + body_len {
                    return raw;
                }
            }
        }
    }

    /// Splits a raw request into its request line, lowercased headers and body.
    pub fn split(raw: &[u8]) -> (String, Vec<(String, String)>, String) {
        let text = String::from_utf8(raw.to_vec()).unwrap();
        let (head, body) = text.split_once("\r\n\r\n").unwrap();
        let mut lines = head.split("\r\n");
        let request_line = lines.next().unwrap().to_string();
        let headers = lines
            .map(|line| {
                let (name, value) = line.split_once(':').unwrap();
                (name.to_ascii_lowercase(), value.trim().to_string())
            })
            .collect();

        (request_line, headers, body.to_string())
    }

    /// All values sent for `name`, in wire order.
    pub fn values<'a>(headers: &'a [(String, String)], name: &str) -> Vec<&'a str> {
        headers
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

mod wire {
    use super::loopback::{serve_once, split, values};
    use super::*;
    use crate::api::{ApiClient, ApiError, FORM_CONTENT_TYPE, Params};

    const OK_RESPONSE: &[u8] = b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok";

    fn direct() -> ReqwestTransport {
        ReqwestTransport::from_client(reqwest::Client::builder().no_proxy().build().unwrap())
    }

    #[tokio::test]
    async fn get_sends_path_query_and_a_single_host_override() {
        let (addr, server) = serve_once(OK_RESPONSE);
        let client = ApiClient::with_transport(format!("http://{addr}/api"), direct())
            .set_header("host", "example.com")
            .set_header("x-api-key", "k1");

        let body = client
            .get("items/", &Params::from([("b", "2"), ("a", "1")]))
            .await
            .unwrap();
        let (request_line, headers, sent_body) = split(&server.join().unwrap());

        assert_eq!(body, b"ok");
        assert_eq!(request_line, "GET /api/items/?a=1&b=2 HTTP/1.1");
        assert_eq!(values(&headers, "host"), vec!["example.com"]);
        assert_eq!(values(&headers, "x-api-key"), vec!["k1"]);
        assert!(values(&headers, "content-type").is_empty());
        assert!(sent_body.is_empty());
    }

    #[tokio::test]
    async fn host_defaults_to_url_authority() {
        let (addr, server) = serve_once(OK_RESPONSE);
        let client = ApiClient::with_transport(format!("http://{addr}"), direct());

        client.delete("x", &Params::new()).await.unwrap();
        let (request_line, headers, _) = split(&server.join().unwrap());

        assert_eq!(request_line, "DELETE /x HTTP/1.1");
        assert_eq!(values(&headers, "host"), vec![addr.to_string()]);
    }

    #[tokio::test]
    async fn post_sends_form_body_with_forced_content_type() {
        let (addr, server) = serve_once(OK_RESPONSE);
        let client = ApiClient::with_transport(format!("http://{addr}/api/"), direct())
            .set_header("content-type", "application/json");

        client
            .post("/items", &Params::from([("b", "2"), ("a", "1")]))
            .await
            .unwrap();
        let (request_line, headers, sent_body) = split(&server.join().unwrap());

        assert_eq!(request_line, "POST /api/items HTTP/1.1");
        assert_eq!(values(&headers, "content-type"), vec![FORM_CONTENT_TYPE]);
        assert_eq!(values(&headers, "content-length"), vec!["7"]);
        assert_eq!(sent_body, "a=1&b=2");
    }

    #[tokio::test]
    async fn non_200_is_a_status_error_with_body() {
        let (addr, server) = serve_once(
            b"HTTP/1.1 404 Not Found\r\nContent-Length: 4\r\nConnection: close\r\n\r\nnope",
        );
        let client = ApiClient::with_transport(format!("http://{addr}"), direct());

        let err = client.get("missing", &Params::new()).await.unwrap_err();
        server.join().unwrap();

        assert_eq!(err.status(), Some(http::StatusCode::NOT_FOUND));
        assert_eq!(err.body(), b"nope");
    }

    #[tokio::test]
    async fn disconnect_mid_body_is_a_read_error() {
        let (addr, server) =
            serve_once(b"HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\nabc");
        let client = ApiClient::with_transport(format!("http://{addr}"), direct());

        let err = client.get("x", &Params::new()).await.unwrap_err();
        server.join().unwrap();

        assert!(matches!(err, ApiError::Read { .. }), "got {err:?}");
        assert_eq!(err.status(), Some(http::StatusCode::OK));
        assert!(b"abc".starts_with(err.body()));
    }
}
