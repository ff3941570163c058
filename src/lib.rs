//! api-client: a small fluent HTTP API client
//!
//! A library for calling HTTP APIs with a base URL, default headers and
//! form-encoded params, observing every exchange through tracers, and
//! testing callers against an in-process transport double.

pub mod api;
pub mod config;
pub mod testing;
pub mod transport;
