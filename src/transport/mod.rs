//! Transport layer: the boundary that turns a request into a response.
//!
//! This module provides types and traits for:
//! - Building HTTP requests ([`HttpRequest`])
//! - Handling HTTP responses and their streamed bodies ([`HttpResponse`], [`Body`])
//! - Abstracting HTTP clients ([`Transport`])
//! - Production transport implementation ([`ReqwestTransport`])

mod client;
mod error;
mod http;

#[cfg(test)]
mod client_tests;
#[cfg(test)]
mod http_tests;

pub use client::ReqwestTransport;
pub use error::HttpError;
pub use http::{Body, HttpRequest, HttpResponse, Transport, canonical_header_name};
