//! Commands for the chat area.

use serde::Serialize;

use super::AppState;
use crate::agent_core::ChatSession;
use crate::inference::Role;

/// A history entry for display.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryItem {
    pub role: String,
    pub content: String,
}

/// Send a user message and return the assistant's reply.
///
/// On failure the user turn stays in history unless rollback is configured.
pub async fn send_message(
    state: &AppState,
    session: &mut ChatSession,
    content: &str,
) -> Result<String, String> {
    state
        .orchestrator
        .handle_user_message(session, content)
        .await
        .map_err(|e| format!("{e}"))
}

/// The conversation so far, oldest first.
pub fn get_history(session: &ChatSession) -> Vec<HistoryItem> {
    session
        .history()
        .iter()
        .map(|m| HistoryItem {
            role: match m.role {
                Role::User => "user".to_string(),
                Role::Assistant => "assistant".to_string(),
            },
            content: m.content.clone(),
        })
        .collect()
}
