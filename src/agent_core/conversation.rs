//! ChatSession: the per-session conversation context.
//!
//! Owns everything one user's conversation needs: the ordered history, the
//! credential copy used for every call, and the currently loaded document.
//! Nothing here is persisted; the session is gone when it is dropped.
//! Concurrent sessions each get their own `ChatSession`.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::types::Credentials;
use crate::documents::LoadedDocument;
use crate::inference::types::ChatMessage;

/// Conversation state for a single session.
#[derive(Debug, Clone)]
pub struct ChatSession {
    id: String,
    started_at: DateTime<Utc>,
    history: Vec<ChatMessage>,
    credentials: Credentials,
    document: Option<LoadedDocument>,
}

impl ChatSession {
    /// Start an empty session with the given credentials.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            history: Vec::new(),
            credentials,
            document: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// The full conversation so far, oldest first.
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Replace this session's credentials. Other sessions are unaffected.
    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.credentials = credentials;
    }

    pub fn document(&self) -> Option<&LoadedDocument> {
        self.document.as_ref()
    }

    pub fn set_document(&mut self, document: LoadedDocument) {
        self.document = Some(document);
    }

    /// Append a user turn. Returns the history length before the append,
    /// usable with [`ChatSession::rollback_to`].
    pub fn push_user(&mut self, content: impl Into<String>) -> usize {
        let checkpoint = self.history.len();
        self.history.push(ChatMessage::user(content));
        checkpoint
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.history.push(ChatMessage::assistant(content));
    }

    /// Drop every turn after `len`.
    pub fn rollback_to(&mut self, len: usize) {
        self.history.truncate(len);
    }
}
