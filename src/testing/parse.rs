//! HTTP/1.1 response parsing for raw bytes.

use bytes::Bytes;
use http::header::CONTENT_LENGTH;
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};

use crate::transport::{Body, HttpError, HttpRequest, HttpResponse};

/// Parses raw HTTP/1.1 response bytes into an [`HttpResponse`].
///
/// The originating request decides whether a body is expected: responses
/// to `HEAD`, and `1xx`, `204` and `304` responses, carry none. Otherwise
/// the body is `Content-Length` bytes, or everything after the head when
/// the header is absent. A body shorter than its declared length yields
/// the bytes present and then a read error.
///
/// # Errors
///
/// Returns [`HttpError::MalformedResponse`] when the head is incomplete
/// or invalid, a header cannot be represented, or `Content-Length`
/// values are unparseable or conflicting.
pub fn parse_response(raw: &[u8], request: &HttpRequest) -> Result<HttpResponse, HttpError> {
    // One slot per line is enough; the head never has more headers than lines
    let lines = raw.iter().filter(|&&b| b == b'\n').count();
    let mut slots = vec![httparse::EMPTY_HEADER; lines];
    let mut head = httparse::Response::new(&mut slots);

    let head_len = match head.parse(raw) {
        Ok(httparse::Status::Complete(len)) => len,
        Ok(httparse::Status::Partial) => {
            return Err(malformed("incomplete response head"));
        }
        Err(e) => return Err(malformed(e)),
    };

    let code = head.code.ok_or_else(|| malformed("missing status code"))?;
    let status = StatusCode::from_u16(code).map_err(malformed)?;

    let mut headers = HeaderMap::with_capacity(head.headers.len());
    for header in head.headers.iter() {
        let name = HeaderName::from_bytes(header.name.as_bytes()).map_err(malformed)?;
        let value = HeaderValue::from_bytes(header.value).map_err(malformed)?;
        headers.append(name, value);
    }

    let rest = &raw[head_len..];
    let body = if expects_body(&request.method, status) {
        match content_length(&headers)? {
            Some(declared) => sized_body(rest, declared),
            None => Body::from_bytes(Bytes::copy_from_slice(rest)),
        }
    } else {
        Body::empty()
    };

    Ok(HttpResponse::new(status, headers, body))
}

fn expects_body(method: &Method, status: StatusCode) -> bool {
    *method != Method::HEAD
        && !status.is_informational()
        && status != StatusCode::NO_CONTENT
        && status != StatusCode::NOT_MODIFIED
}

/// Reads `Content-Length`; repeated values must all agree.
fn content_length(headers: &HeaderMap) -> Result<Option<usize>, HttpError> {
    let mut declared = None;

    for value in headers.get_all(CONTENT_LENGTH) {
        let length = value
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .ok_or_else(|| malformed(format!("invalid Content-Length {value:?}")))?;

        match declared {
            Some(previous) if previous != length => {
                return Err(malformed(format!(
                    "conflicting Content-Length values {previous} and {length}"
                )));
            }
            _ => declared = Some(length),
        }
    }

    Ok(declared)
}

fn sized_body(rest: &[u8], declared: usize) -> Body {
    if rest.len() >= declared {
        return Body::from_bytes(Bytes::copy_from_slice(&rest[..declared]));
    }

    let partial = Bytes::copy_from_slice(rest);
    let missing = declared - rest.len();
    let truncated = HttpError::Body(Box::new(std::io::Error::new(
        std::io::ErrorKind::UnexpectedEof,
        format!("body ended {missing} bytes short of Content-Length {declared}"),
    )));

    Body::from_stream(tokio_stream::iter([Ok(partial), Err(truncated)]))
}

fn malformed(reason: impl std::fmt::Display) -> HttpError {
    HttpError::MalformedResponse(reason.to_string())
}
