use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use secrecy::ExposeSecret;

use super::types::{ApiRequest, ApiResponse, CallOutcome, Method, RequestBody};
use crate::error::ReconcileError;

/// Upper bound for establishing a connection, independent of the request
/// timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Performs a single attempt of an HTTP call.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    async fn execute(&self, url: &Url, request: &ApiRequest<'_>) -> CallOutcome;
}

/// Production backend on top of a shared `reqwest::Client`.
pub struct ReqwestBackend {
    client: Client,
}

impl ReqwestBackend {
    pub fn new(timeout: Duration) -> Result<Self, ReconcileError> {
        let client = Client::builder()
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT.min(timeout))
            .timeout(timeout)
            .build()
            .map_err(|e| ReconcileError::ClientBuild(e.to_string()))?;

        Ok(Self { client })
    }
}

/// Connection problems and timeouts are worth retrying; anything else
/// reqwest reports (bad builder input, redirect loops, ...) is not.
fn classify(err: reqwest::Error) -> CallOutcome {
    if err.is_connect() || err.is_timeout() || err.is_request() || err.is_body() {
        CallOutcome::TransientFailure(err.to_string())
    } else {
        CallOutcome::PermanentFailure(err.to_string())
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn execute(&self, url: &Url, request: &ApiRequest<'_>) -> CallOutcome {
        let mut builder = match request.method {
            Method::Get => self.client.get(url.clone()),
            Method::Post => self.client.post(url.clone()),
            Method::Put => self.client.put(url.clone()),
        };

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = request.bearer {
            builder = builder.bearer_auth(token.expose_secret());
        }
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(body),
            RequestBody::Form(fields) => builder.form(fields),
        };

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => return classify(e),
        };

        let status = response.status().as_u16();
        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        match response.text().await {
            Ok(body) => CallOutcome::Success(ApiResponse {
                status,
                location,
                body,
            }),
            Err(e) => classify(e),
        }
    }
}
