//! API key → bearer token exchange.
//!
//! One form-encoded POST per call. Tokens are short-lived and are fetched fresh
//! before every completion; nothing here caches or refreshes them.

use reqwest::{Client as HttpClient, StatusCode};
use sha2::{Digest, Sha256};

use super::errors::AuthError;
use super::types::{TokenRequest, TokenResponse};
use crate::config::HttpConfig;

/// Client for the identity endpoint.
pub struct TokenClient {
    http: HttpClient,
    token_url: String,
}

impl TokenClient {
    /// Create a client for the given identity endpoint.
    pub fn new(token_url: impl Into<String>, http_config: HttpConfig) -> Result<Self, AuthError> {
        let http = HttpClient::builder()
            .connect_timeout(http_config.connect_timeout())
            .timeout(http_config.request_timeout())
            .build()
            .map_err(|e| AuthError::ConnectionFailed {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            token_url: token_url.into(),
        })
    }

    /// Exchange `api_key` for a bearer token.
    pub async fn fetch_token(&self, api_key: &str) -> Result<String, AuthError> {
        tracing::info!(
            url = %self.token_url,
            key = %key_fingerprint(api_key),
            "requesting bearer token"
        );

        let response = self
            .http
            .post(&self.token_url)
            .header("Accept", "application/json")
            .form(&TokenRequest::new(api_key))
            .send()
            .await
            .map_err(|e| AuthError::ConnectionFailed {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!(status = status.as_u16(), "token exchange rejected");
            return Err(AuthError::TokenRejected {
                status: status.as_u16(),
            });
        }

        let body: TokenResponse =
            response
                .json()
                .await
                .map_err(|e| AuthError::MalformedResponse {
                    reason: e.to_string(),
                })?;

        tracing::debug!(expires_in = ?body.expires_in, "bearer token issued");

        body.access_token
            .ok_or_else(|| AuthError::MalformedResponse {
                reason: "missing access_token".into(),
            })
    }
}

/// Short SHA-256 fingerprint of an API key, safe to log or display.
pub fn key_fingerprint(api_key: &str) -> String {
    let digest = Sha256::digest(api_key.as_bytes());
    digest[..4].iter().map(|b| format!("{b:02x}")).collect()
}
