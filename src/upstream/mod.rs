//! Upstream backend abstraction
//!
//! Defines the trait interface for the upstream responses service and the
//! HTTP implementation used in production. Exactly one outbound call is
//! made per exchange, bounded by the client's configured timeout; there is
//! no retry.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::responses::{ResponsesRequest, ResponsesResult};

/// Fallback message when an upstream error body yields nothing usable
const GENERIC_UPSTREAM_ERROR: &str = "upstream request failed";

/// Trait defining the interface to the upstream responses service
///
/// Implementations handle the single outbound call of an exchange while
/// keeping the rest of the application independent of the transport.
#[async_trait]
pub trait ResponsesBackend: Send + Sync {
    /// Backend name for logging
    fn name(&self) -> &'static str;

    /// Execute one responses-protocol request and return the completed
    /// result
    async fn execute(&self, request: &ResponsesRequest) -> AppResult<ResponsesResult>;
}

/// HTTP backend talking to the configured responses endpoint
pub struct HttpResponsesBackend {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpResponsesBackend {
    /// Create a new HTTP backend
    ///
    /// The client is expected to carry the upstream timeout; this proxy
    /// configures it once in `AppState`.
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            endpoint: config.upstream_url.clone(),
            api_key: config.upstream_api_key.clone(),
        }
    }
}

#[async_trait]
impl ResponsesBackend for HttpResponsesBackend {
    fn name(&self) -> &'static str {
        "responses"
    }

    async fn execute(&self, request: &ResponsesRequest) -> AppResult<ResponsesResult> {
        debug!(
            endpoint = %self.endpoint,
            model = %request.model,
            input_items = request.input.len(),
            "Sending upstream request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = extract_error_message(&body);
            warn!(
                status = %status,
                message = %message,
                "Upstream returned an error"
            );
            return Err(AppError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| AppError::Upstream {
            status: 502,
            message: format!("invalid upstream response body: {e}"),
        })
    }
}

/// Best-effort extraction of an error message from an upstream body
///
/// Tries, in order: the body as a JSON string, `error.message`, a
/// top-level `message`, the raw body text, and finally a generic fallback.
pub fn extract_error_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::String(message)) => message,
        Ok(value) => value
            .get("error")
            .and_then(|error| error.get("message"))
            .and_then(Value::as_str)
            .or_else(|| value.get("message").and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| GENERIC_UPSTREAM_ERROR.to_string()),
        Err(_) => {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                GENERIC_UPSTREAM_ERROR.to_string()
            } else {
                trimmed.to_string()
            }
        }
    }
}
