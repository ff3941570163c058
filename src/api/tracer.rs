//! Post-dispatch observers.
//!
//! Every dispatch ends by handing a [`TraceEvent`] to each registered
//! tracer, in registration order, whatever the outcome. A tracer that
//! panics is contained: the panic is logged, the remaining tracers run
//! and the caller's result is untouched.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use http::StatusCode;

use super::ApiError;
use crate::transport::HttpRequest;

/// Everything known about one request/response cycle.
#[derive(Debug, Clone, Copy)]
pub struct TraceEvent<'a> {
    /// The request as sent; `None` when it could not be built.
    pub request: Option<&'a HttpRequest>,
    /// Body bytes received, possibly partial, possibly empty.
    pub body: &'a [u8],
    /// Response status; `None` when no response was received.
    pub status: Option<StatusCode>,
    /// The error the caller will receive, if any.
    pub error: Option<&'a ApiError>,
}

impl TraceEvent<'_> {
    /// Returns true if the dispatch ended without error.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Returns the status code as a number, `0` when none was received.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.status.map_or(0, |s| s.as_u16())
    }
}

type TraceFn = Box<dyn Fn(&TraceEvent<'_>) + Send + Sync>;

/// A tracer wrapped so that its panics never escape.
struct GuardedTracer {
    position: usize,
    inner: TraceFn,
}

impl GuardedTracer {
    fn call(&self, event: &TraceEvent<'_>) {
        // Tracers only see shared references; a panic cannot leave the
        // event half-modified.
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| (self.inner)(event))) {
            tracing::warn!(
                tracer = self.position,
                panic = panic_message(payload.as_ref()),
                "Tracer panicked; continuing with remaining tracers"
            );
        }
    }
}

/// Ordered list of guarded tracers.
#[derive(Default)]
pub(crate) struct TracerChain {
    tracers: Vec<GuardedTracer>,
}

impl TracerChain {
    pub(crate) fn push<F>(&mut self, tracer: F)
    where
        F: Fn(&TraceEvent<'_>) + Send + Sync + 'static,
    {
        self.tracers.push(GuardedTracer {
            position: self.tracers.len(),
            inner: Box::new(tracer),
        });
    }

    pub(crate) fn fire(&self, event: &TraceEvent<'_>) {
        for tracer in &self.tracers {
            tracer.call(event);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.tracers.len()
    }
}

impl fmt::Debug for TracerChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracerChain")
            .field("len", &self.tracers.len())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}

/// A ready-made tracer that logs each exchange with `tracing`.
///
/// Successful exchanges are logged at debug level, failures at warn
/// level together with the error.
///
/// # Example
///
/// ```
/// use api_client::api::{ApiClient, log_exchange};
///
/// let client = ApiClient::new("https://api.example.com").trace(log_exchange);
/// assert_eq!(client.tracer_count(), 1);
/// ```
pub fn log_exchange(event: &TraceEvent<'_>) {
    let method = event.request.map_or("-", |r| r.method.as_str());
    let url = event.request.map_or("-", |r| r.url.as_str());
    let status = event.status_code();
    let bytes = event.body.len();

    match event.error {
        None => tracing::debug!(method, url, status, bytes, "Request completed"),
        Some(error) => tracing::warn!(method, url, status, bytes, %error, "Request failed"),
    }
}

#[cfg(test)]
#[path = "tracer_tests.rs"]
mod tests;
