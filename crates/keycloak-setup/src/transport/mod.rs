//! Retrying HTTP transport bound to one server base URL.
//!
//! A call is retried only when the server could not be reached. Any HTTP
//! status, including 5xx, is returned to the caller as a response.

pub mod http;
pub mod retry;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use reqwest::Url;

use crate::error::ReconcileError;

pub use http::{HttpBackend, ReqwestBackend};
pub use retry::{RetryPolicy, RetryStep};
pub use types::{ApiRequest, ApiResponse, CallOutcome, Method, RequestBody};

pub struct Transport {
    base_url: Url,
    backend: Arc<dyn HttpBackend>,
    policy: RetryPolicy,
}

impl Transport {
    /// Creates a transport backed by reqwest with the given request timeout.
    pub fn new(
        base_url: Url,
        timeout: Duration,
        policy: RetryPolicy,
    ) -> Result<Self, ReconcileError> {
        let backend = ReqwestBackend::new(timeout)?;
        Self::with_backend(base_url, Arc::new(backend), policy)
    }

    pub fn with_backend(
        base_url: Url,
        backend: Arc<dyn HttpBackend>,
        policy: RetryPolicy,
    ) -> Result<Self, ReconcileError> {
        if base_url.cannot_be_a_base() {
            return Err(ReconcileError::InvalidBaseUrl(base_url.to_string()));
        }

        Ok(Self {
            base_url,
            backend,
            policy,
        })
    }

    /// Appends percent-encoded path segments to the base URL, keeping any
    /// path prefix it already has.
    pub fn url<I>(&self, segments: I) -> Url
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            path.extend(segments);
        }
        url
    }

    /// Performs the call, retrying transient failures with exponential
    /// backoff.
    pub async fn call(&self, request: &ApiRequest<'_>) -> Result<ApiResponse, ReconcileError> {
        let url = self.url(&request.segments);
        let mut attempt = 0;

        loop {
            debug!(
                "{} {} (attempt {}/{})",
                request.method.as_str(),
                url.path(),
                attempt + 1,
                self.policy.max_attempts()
            );
            let outcome = self.backend.execute(&url, request).await;

            match (self.policy.next_step(&outcome, attempt), outcome) {
                (RetryStep::Retry(delay), CallOutcome::TransientFailure(message)) => {
                    warn!(
                        "Request to {} failed (attempt {}/{}): {}; retrying in {:?}",
                        url,
                        attempt + 1,
                        self.policy.max_attempts(),
                        message,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                (_, CallOutcome::Success(response)) => return Ok(response),
                (_, CallOutcome::PermanentFailure(message)) => {
                    return Err(ReconcileError::Transport {
                        url: url.to_string(),
                        message,
                    })
                }
                (_, CallOutcome::TransientFailure(message)) => {
                    return Err(ReconcileError::RetriesExhausted {
                        url: url.to_string(),
                        attempts: attempt + 1,
                        message,
                    })
                }
            }
        }
    }
}
