use serde_json::Value;

use crate::auth::AdminToken;
use crate::error::ReconcileError;
use crate::transport::{ApiRequest, ApiResponse, Transport};

/// Everything a reconciler needs to talk to the admin API: the shared
/// transport and the bearer token obtained at the start of the run.
pub struct ReconcileContext<'a> {
    transport: &'a Transport,
    token: AdminToken,
}

impl<'a> ReconcileContext<'a> {
    pub fn new(transport: &'a Transport, token: AdminToken) -> Self {
        Self { transport, token }
    }

    /// Full URL of an admin resource, for error messages.
    pub fn url(&self, segments: &[&str]) -> String {
        self.transport.url(segments).to_string()
    }

    pub async fn get(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<ApiResponse, ReconcileError> {
        let request = query
            .iter()
            .fold(ApiRequest::get(segments), |request, (key, value)| {
                request.query(key, value)
            })
            .bearer(self.token.secret());
        self.transport.call(&request).await
    }

    pub async fn post_json(
        &self,
        segments: &[&str],
        body: Value,
    ) -> Result<ApiResponse, ReconcileError> {
        let request = ApiRequest::post(segments)
            .json(body)
            .bearer(self.token.secret());
        self.transport.call(&request).await
    }

    pub async fn put_json(
        &self,
        segments: &[&str],
        body: Value,
    ) -> Result<ApiResponse, ReconcileError> {
        let request = ApiRequest::put(segments)
            .json(body)
            .bearer(self.token.secret());
        self.transport.call(&request).await
    }

    pub async fn put_empty(&self, segments: &[&str]) -> Result<ApiResponse, ReconcileError> {
        let request = ApiRequest::put(segments).bearer(self.token.secret());
        self.transport.call(&request).await
    }
}
