//! Orchestrator: drives token exchange and inference for a session.
//!
//! Two triggers share one pipeline:
//!
//! 1. A user message: append the user turn, fetch a token, complete, append
//!    the assistant turn.
//! 2. "Analyze document": extract text, build the review prompt, then run
//!    the same pipeline with the prompt as the user turn.
//!
//! Each step runs only if the previous one succeeded. A failure after the
//! user turn is appended leaves that turn in history unless
//! `history.rollback_failed_turns` is set. The assistant turn is appended
//! only on success.

use super::conversation::ChatSession;
use super::errors::AgentError;
use super::prompts::build_review_prompt;
use crate::config::{AppConfig, HistoryConfig, ReviewConfig};
use crate::documents::{load_document, LoadedDocument};
use crate::inference::{InferenceClient, TokenClient};

/// Stateless driver; all conversation state lives in the `ChatSession`
/// passed to each call.
pub struct Orchestrator {
    tokens: TokenClient,
    inference: InferenceClient,
    review: ReviewConfig,
    history_policy: HistoryConfig,
}

impl Orchestrator {
    pub fn new(
        tokens: TokenClient,
        inference: InferenceClient,
        review: ReviewConfig,
        history_policy: HistoryConfig,
    ) -> Self {
        Self {
            tokens,
            inference,
            review,
            history_policy,
        }
    }

    /// Build both HTTP clients from the application config.
    pub fn from_config(config: &AppConfig) -> Result<Self, AgentError> {
        let tokens = TokenClient::new(config.token_url.clone(), config.http)?;
        let inference = InferenceClient::new(config.http)?;
        Ok(Self::new(
            tokens,
            inference,
            config.review.clone(),
            config.history,
        ))
    }

    pub fn review_config(&self) -> &ReviewConfig {
        &self.review
    }

    /// Send `text` as a user turn and return the assistant's reply.
    pub async fn handle_user_message(
        &self,
        session: &mut ChatSession,
        text: &str,
    ) -> Result<String, AgentError> {
        tracing::info!(session_id = %session.id(), chars = text.chars().count(), "user message");
        self.run_turn(session, text.to_string()).await
    }

    /// Extract an uploaded file and submit it for review.
    ///
    /// An unsupported suffix or unreadable body stops here: no turn is
    /// appended and no request is made. On success the document is kept in
    /// the session.
    pub async fn handle_analyze_document(
        &self,
        session: &mut ChatSession,
        filename: &str,
        bytes: &[u8],
    ) -> Result<String, AgentError> {
        let document = load_document(filename, bytes)?;
        session.set_document(document.clone());
        self.analyze_document(session, &document).await
    }

    /// Submit the session's loaded document for review.
    pub async fn analyze_loaded_document(
        &self,
        session: &mut ChatSession,
    ) -> Result<String, AgentError> {
        let document = session
            .document()
            .cloned()
            .ok_or(AgentError::NoDocumentLoaded)?;
        self.analyze_document(session, &document).await
    }

    /// Submit an already extracted document for review.
    pub async fn analyze_document(
        &self,
        session: &mut ChatSession,
        document: &LoadedDocument,
    ) -> Result<String, AgentError> {
        let prompt = build_review_prompt(&self.review, document);
        tracing::info!(
            session_id = %session.id(),
            filename = %document.filename,
            document_chars = document.char_count(),
            prompt_chars = prompt.chars().count(),
            "analyzing document"
        );
        self.run_turn(session, prompt).await
    }

    /// append-user → fetch token → complete → append-assistant.
    async fn run_turn(
        &self,
        session: &mut ChatSession,
        content: String,
    ) -> Result<String, AgentError> {
        let checkpoint = session.push_user(content);

        match self.exchange(session).await {
            Ok(reply) => {
                session.push_assistant(reply.clone());
                Ok(reply)
            }
            Err(e) => {
                match e.http_failure() {
                    Some((status, body)) => tracing::warn!(
                        session_id = %session.id(),
                        status,
                        body,
                        "turn failed: deployment rejected the request"
                    ),
                    None => tracing::warn!(session_id = %session.id(), error = %e, "turn failed"),
                }
                if self.history_policy.rollback_failed_turns {
                    session.rollback_to(checkpoint);
                }
                Err(e)
            }
        }
    }

    async fn exchange(&self, session: &ChatSession) -> Result<String, AgentError> {
        let credentials = session.credentials();
        let token = self.tokens.fetch_token(&credentials.api_key).await?;
        let reply = self
            .inference
            .complete(session.history(), &token, &credentials.deployment_url)
            .await?;
        Ok(reply)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
