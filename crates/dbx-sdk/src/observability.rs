//! Span helpers.
//!
//! The client emits `tracing` events for every HTTP round trip. Installing a
//! subscriber is left to the application.

use reqwest::Method;
use tracing::Span;

/// Creates the span wrapping one HTTP round trip.
#[must_use]
pub fn request_span(method: &Method, host: &str, path: &str) -> Span {
    tracing::debug_span!(
        "api_request",
        method = %method,
        host = host,
        path = path,
        status = tracing::field::Empty,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_span_can_be_entered() {
        let span = request_span(&Method::GET, "example.cloud.databricks.com", "api/2.0/x");
        let _guard = span.enter();
        span.record("status", 200);
        tracing::debug!("inside request span");
    }
}
