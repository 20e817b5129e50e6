//! Chat completion client for a hosted model deployment.
//!
//! Sends the whole conversation to the configured deployment URL with a
//! bearer token and returns the reply text. One request per call, no
//! retries and no fallback.

use std::time::Duration;

use reqwest::{Client as HttpClient, StatusCode};

use super::errors::InferenceError;
use super::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::config::HttpConfig;

// ─── InferenceClient ─────────────────────────────────────────────────────────

/// Client for the deployment endpoint.
///
/// Holds no endpoint of its own: the deployment URL comes from the session's
/// credentials on every call, so a saved configuration takes effect at once.
pub struct InferenceClient {
    http: HttpClient,
    request_timeout: Duration,
}

impl InferenceClient {
    pub fn new(http_config: HttpConfig) -> Result<Self, InferenceError> {
        let http = HttpClient::builder()
            .connect_timeout(http_config.connect_timeout())
            .timeout(http_config.request_timeout())
            .build()
            .map_err(|e| InferenceError::ConnectionFailed {
                endpoint: String::new(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            request_timeout: http_config.request_timeout(),
        })
    }

    /// Send `messages` to `deployment_url` and return the reply text.
    pub async fn complete(
        &self,
        messages: &[ChatMessage],
        token: &str,
        deployment_url: &str,
    ) -> Result<String, InferenceError> {
        let url = reqwest::Url::parse(deployment_url).map_err(|e| {
            InferenceError::InvalidEndpoint {
                url: deployment_url.to_string(),
                reason: e.to_string(),
            }
        })?;

        tracing::info!(
            url = %url,
            message_count = messages.len(),
            "=== LLM REQUEST ==="
        );

        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(&ChatCompletionRequest { messages })
            .send()
            .await
            .map_err(|e| {
                self.timeout_or(&e, || InferenceError::ConnectionFailed {
                    endpoint: deployment_url.to_string(),
                    reason: e.to_string(),
                })
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let body_text = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "model call failed");
            return Err(InferenceError::HttpError {
                status: status.as_u16(),
                body: body_text,
            });
        }

        // The request timeout also covers reading the body.
        let body_text = response.text().await.map_err(|e| {
            self.timeout_or(&e, || InferenceError::MalformedResponse {
                reason: format!("failed to read response body: {e}"),
            })
        })?;

        let reply = parse_completion_response(&body_text)?;
        tracing::info!(reply_chars = reply.chars().count(), "=== LLM RESPONSE ===");
        Ok(reply)
    }

    fn timeout_or(
        &self,
        e: &reqwest::Error,
        otherwise: impl FnOnce() -> InferenceError,
    ) -> InferenceError {
        if e.is_timeout() {
            InferenceError::Timeout {
                duration_secs: self.request_timeout.as_secs(),
            }
        } else {
            otherwise()
        }
    }
}

/// Extract `choices[0].message.content` from a completion body.
pub fn parse_completion_response(body: &str) -> Result<String, InferenceError> {
    let resp: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| InferenceError::MalformedResponse {
            reason: format!("failed to parse response: {e}"),
        })?;

    resp.reply_text()
        .ok_or_else(|| InferenceError::MalformedResponse {
            reason: "missing choices[0].message.content".into(),
        })
}

// ─── Tests ───────────────────────────────────────────────────────────────────
