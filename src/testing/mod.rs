//! Test harness: an in-process transport double.
//!
//! [`HandlerTransport`] lets tests drive an [`ApiClient`](crate::api::ApiClient)
//! against arbitrary handler logic without a socket, while still pushing
//! every response through byte-level HTTP/1.1 framing:
//!
//! 1. the handler fills a [`ResponseWriter`],
//! 2. [`ResponseWriter::to_wire`] serializes it,
//! 3. [`parse_response`] parses the bytes back for the request that was sent.

mod double;
mod parse;
mod writer;


pub use double::HandlerTransport;
pub use parse::parse_response;
pub use writer::ResponseWriter;
