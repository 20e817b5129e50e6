//! Inference error types.
//!
//! All errors implement `std::error::Error` via `thiserror`. Structured logging
//! is the caller's responsibility. These types carry the context needed to
//! build meaningful log entries and the text shown to the user.

use thiserror::Error;

/// Errors from exchanging an API key for a bearer token.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The identity endpoint answered with a non-200 status.
    ///
    /// The status is kept for logs only; the user sees one generic message.
    #[error("failed to retrieve token, check your API key")]
    TokenRejected { status: u16 },

    /// The identity endpoint could not be reached.
    #[error("token request failed: {reason}")]
    ConnectionFailed { reason: String },

    /// HTTP 200 but no `access_token` in the body.
    #[error("token response malformed: {reason}")]
    MalformedResponse { reason: String },
}

/// Errors from the chat completion call.
#[derive(Debug, Error)]
pub enum InferenceError {
    /// TCP/HTTP connection to the deployment failed.
    #[error("connection failed to {endpoint}: {reason}")]
    ConnectionFailed { endpoint: String, reason: String },

    /// The deployment did not respond within the configured timeout.
    #[error("inference timeout after {duration_secs}s")]
    Timeout { duration_secs: u64 },

    /// Non-200 HTTP response from the deployment.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The reply was not JSON, or `choices[0].message.content` was absent.
    #[error("model response malformed: {reason}")]
    MalformedResponse { reason: String },

    /// The configured deployment URL could not be used to build a request.
    #[error("invalid deployment URL '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },
}

impl InferenceError {
    /// The HTTP status, if this is an `HttpError`.
    pub fn status(&self) -> Option<u16> {
        match self {
            InferenceError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Extract the error body text, if this is an `HttpError`.
    pub fn error_body(&self) -> Option<&str> {
        match self {
            InferenceError::HttpError { body, .. } => Some(body),
            _ => None,
        }
    }
}
