//! Throttling retries as a transport decorator.

use async_trait::async_trait;

use crate::config::RetryConfig;
use crate::error::Result;
use crate::transport::{ApiRequest, ApiResponse, Transport};

/// Wraps a transport and retries throttled responses with exponential backoff.
///
/// When retries are exhausted the last response is returned unchanged so the
/// caller's status dispatch decides what a persistent 429 means.
#[derive(Debug, Clone)]
pub struct Retrying<T> {
    inner: T,
    config: RetryConfig,
}

impl<T: Transport> Retrying<T> {
    /// Wraps `inner` with the given retry policy.
    #[must_use]
    pub fn new(inner: T, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    /// Returns the wrapped transport.
    #[must_use]
    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[async_trait]
impl<T: Transport> Transport for Retrying<T> {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let mut attempt: u32 = 0;
        loop {
            let response = self.inner.execute(request.clone()).await?;
            if !self.config.should_retry(response.status) || attempt >= self.config.max_retries {
                if attempt > 0 && self.config.should_retry(response.status) {
                    tracing::warn!(
                        status = response.status,
                        attempts = attempt + 1,
                        url = %response.url,
                        "retries exhausted"
                    );
                }
                return Ok(response);
            }

            attempt += 1;
            let delay = self.config.delay_for(attempt, response.retry_after);
            tracing::warn!(
                status = response.status,
                attempt,
                max_retries = self.config.max_retries,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                url = %response.url,
                "throttled, retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }
}
