//! Request execution
//!
//! One request, one response: build the target, send it, decode any body
//! into the caller's slot, then classify the status. Nothing is retried.

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::{DeserializeOwned, IgnoredAny};

use crate::ChronosClient;
use crate::error::{ClientError, Result};
use crate::request::{RequestTarget, build_request, encode_body};

impl ChronosClient {
    /// Performs a single round trip against the scheduler
    ///
    /// A non-empty response body is decoded into `result` before the status
    /// is looked at, so an error body from a failing call still lands in the
    /// slot. An empty body leaves `result` untouched.
    ///
    /// # Arguments
    /// * `method` - HTTP verb
    /// * `path` - Resource path, joined under the configured API prefix
    /// * `params` - Query parameters, appended in order
    /// * `body` - Optional value sent as the JSON request body
    /// * `result` - Slot the response body is decoded into
    ///
    /// # Returns
    /// The response status when it is in 2xx. Failures carry the status in
    /// [`ClientError::status`] whenever a response was received.
    pub async fn execute<B, T>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
        body: Option<&B>,
        result: &mut T,
    ) -> Result<StatusCode>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = body.map(encode_body).transpose()?;
        let target = RequestTarget::new(&self.config, path, params);

        tracing::debug!("{} {}", method, target.url());

        let response = build_request(&self.http, &self.config, method, target, body)
            .send()
            .await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        tracing::debug!("Received {} with {} byte body", status, bytes.len());

        if !bytes.is_empty() {
            *result = serde_json::from_slice(&bytes).map_err(|source| ClientError::Decode {
                status: status.as_u16(),
                source,
            })?;
        }

        if !status.is_success() {
            tracing::warn!("Scheduler responded with {}", status);
            return Err(ClientError::service(status.as_u16(), status_line(status)));
        }

        Ok(status)
    }

    // =============================================================================
    // Verb helpers
    // =============================================================================

    pub(crate) async fn api_get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
        result: &mut T,
    ) -> Result<StatusCode> {
        self.execute(Method::GET, path, params, None::<&()>, result).await
    }

    pub(crate) async fn api_delete(&self, path: &str) -> Result<StatusCode> {
        self.execute(Method::DELETE, path, &[], None::<&()>, &mut IgnoredAny).await
    }

    pub(crate) async fn api_put(&self, path: &str, params: &[(&str, &str)]) -> Result<StatusCode> {
        self.execute(Method::PUT, path, params, None::<&()>, &mut IgnoredAny).await
    }

    pub(crate) async fn api_post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<StatusCode> {
        self.execute(Method::POST, path, &[], Some(body), &mut IgnoredAny).await
    }
}

/// Status line as a server would print it, e.g. "404 Not Found"
fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}
