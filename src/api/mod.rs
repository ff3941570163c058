//! API layer: the client callers talk to.
//!
//! This module provides:
//! - The fluent client and its verb methods ([`ApiClient`])
//! - Form/query parameters ([`Params`])
//! - Post-dispatch observers ([`TraceEvent`], [`log_exchange`])
//! - Errors for each dispatch stage ([`ApiError`], [`BuildError`])
//! - Dot-path access into JSON bodies ([`Values`])
//!
//! # Dispatch
//!
//! Every verb resolves the path against the base URL, applies the
//! default headers, sends through the [`Transport`](crate::transport::Transport),
//! reads the whole body and classifies anything but `200 OK` as
//! [`ApiError::Status`]. Tracers then run once, whatever happened.

mod client;
mod error;
mod params;
mod tracer;
mod values;

pub use client::{ApiClient, FORM_CONTENT_TYPE};
pub use error::{ApiError, BuildError};
pub use params::Params;
pub use tracer::{TraceEvent, log_exchange};
pub use values::Values;
