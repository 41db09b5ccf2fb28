//! Client for the content-generation service.
//!
//! The service takes `{ "text": ..., "options": {...} }` as a JSON POST and
//! answers with a flowchart document. Error responses carry their reason in
//! an `error` or `message` field.

use std::time::Duration;

use log::{debug, info, warn};
use reqwest::blocking::Client;
use serde::Serialize;
use thiserror::Error;

/// Errors talking to the content-generation service
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("No generator endpoint configured; pass --endpoint or set [generator] endpoint")]
    MissingEndpoint,

    #[error("Request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Generator returned {status}: {message}")]
    Status { status: u16, message: String },
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    text: &'a str,
    options: &'a serde_json::Value,
}

/// Blocking HTTP client for one generator endpoint.
#[derive(Debug)]
pub struct GeneratorClient {
    client: Client,
    endpoint: String,
    options: serde_json::Value,
}

impl GeneratorClient {
    /// Create a client posting to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Request`] if the HTTP client cannot be built.
    pub fn new(
        endpoint: impl Into<String>,
        options: serde_json::Value,
        timeout: Duration,
    ) -> Result<Self, GenerateError> {
        let endpoint = endpoint.into();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| GenerateError::Request {
                endpoint: endpoint.clone(),
                source,
            })?;

        Ok(Self {
            client,
            endpoint,
            options,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Ask the service for a flowchart describing `text`.
    ///
    /// Returns the raw response body; parsing it is left to the caller so
    /// diagnostics can point into it.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Request`] for transport failures and
    /// [`GenerateError::Status`] for non-success responses.
    pub fn generate(&self, text: &str) -> Result<String, GenerateError> {
        info!(endpoint = self.endpoint, text_len = text.len(); "Requesting flowchart from generator");

        let request = GenerateRequest {
            text,
            options: &self.options,
        };
        let request_error = |source| GenerateError::Request {
            endpoint: self.endpoint.clone(),
            source,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .map_err(request_error)?;

        let status = response.status();
        let body = response.text().map_err(request_error)?;
        debug!(status = status.as_u16(), body_len = body.len(); "Generator responded");

        if !status.is_success() {
            let message = error_message(&body);
            warn!(status = status.as_u16(), message; "Generator request failed");
            return Err(GenerateError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }
}

/// Reason carried by an error response body: its `error` or `message`
/// string field, else the body itself.
pub fn error_message(body: &str) -> String {
    let reason = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["error", "message"]
                .iter()
                .find_map(|key| value.get(key).and_then(|v| v.as_str()).map(str::to_string))
        });

    reason.unwrap_or_else(|| body.trim().to_string())
}
