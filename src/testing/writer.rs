//! In-memory response writer and its HTTP/1.1 serialization.

use std::io;

use http::{HeaderMap, StatusCode};

use crate::transport::canonical_header_name;

/// Accumulates what a handler writes: status, headers and body.
///
/// Mirrors a server-side response writer. Nothing is sent anywhere;
/// [`ResponseWriter::to_wire`] turns the accumulated state into raw
/// response bytes.
#[derive(Debug, Default)]
pub struct ResponseWriter {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ResponseWriter {
    /// Creates an empty writer with no status.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the headers written so far.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the headers for modification.
    pub const fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Sets the response status. The last call wins, even after body writes.
    pub const fn write_status(&mut self, status: StatusCode) {
        self.status = Some(status);
    }

    /// Returns the status set by the handler, if any.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Appends bytes to the body.
    pub fn write(&mut self, data: impl AsRef<[u8]>) {
        self.body.extend_from_slice(data.as_ref());
    }

    /// Returns the body written so far.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Serializes the response as HTTP/1.1 bytes.
    ///
    /// A missing status becomes `500 Internal Server Error`. Header names
    /// are written in canonical form, followed by a `Content-Length`
    /// computed from the body. A handler-supplied `Content-Length` is
    /// written as well, so a wrong one surfaces as a parse error.
    #[must_use]
    pub fn to_wire(&self) -> Vec<u8> {
        let status = self.status.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut wire = Vec::with_capacity(64 + self.body.len());

        wire.extend_from_slice(format!("HTTP/1.1 {} X\r\n", status.as_u16()).as_bytes());
        for (name, value) in &self.headers {
            wire.extend_from_slice(canonical_header_name(name.as_str()).as_bytes());
            wire.extend_from_slice(b": ");
            wire.extend_from_slice(value.as_bytes());
            wire.extend_from_slice(b"\r\n");
        }
        wire.extend_from_slice(format!("Content-Length: {}\r\n\r\n", self.body.len()).as_bytes());
        wire.extend_from_slice(&self.body);

        wire
    }
}

impl io::Write for ResponseWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
