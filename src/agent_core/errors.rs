//! Agent Core error types.

use thiserror::Error;

use crate::documents::DocumentError;
use crate::inference::{AuthError, InferenceError};

/// Errors that can occur during agent core operations.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Credential database operation failed.
    #[error("database error: {reason}")]
    DatabaseError { reason: String },

    /// Token exchange failed; inference was not attempted.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The completion call failed; no assistant turn was recorded.
    #[error("model call failed: {0}")]
    Inference(#[from] InferenceError),

    /// Upload rejected or unreadable.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// "Analyze" requested before any document was loaded.
    #[error("no document loaded, upload a PDF or DOCX first")]
    NoDocumentLoaded,
}

impl From<rusqlite::Error> for AgentError {
    fn from(e: rusqlite::Error) -> Self {
        AgentError::DatabaseError {
            reason: e.to_string(),
        }
    }
}

impl AgentError {
    /// HTTP status and body when the deployment rejected the completion call.
    pub fn http_failure(&self) -> Option<(u16, &str)> {
        match self {
            AgentError::Inference(e) => e.status().zip(e.error_body()),
            _ => None,
        }
    }
}
