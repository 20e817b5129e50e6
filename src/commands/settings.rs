//! Commands for the configuration panel.
//!
//! Credentials are read from the store once when a session starts. Saving
//! appends a row and updates the calling session's copy in place; other
//! sessions keep theirs until they start over.

use serde::Serialize;

use super::AppState;
use crate::agent_core::{ChatSession, CredentialSummary, Credentials};
use crate::inference::key_fingerprint;

/// Current configuration as shown to the user. Never carries the raw key.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationInfo {
    pub deployment_url: String,
    pub masked_key: String,
    pub key_fingerprint: String,
    pub configured: bool,
}

/// Start a session seeded with the most recently saved credentials.
///
/// An empty store yields empty credentials; the first call will then fail
/// at token exchange.
pub fn start_session(state: &AppState) -> Result<ChatSession, String> {
    let db = state.db.lock().map_err(|e| format!("Lock error: {e}"))?;
    let credentials = db
        .get_latest()
        .map_err(|e| format!("Failed to load configuration: {e}"))?
        .unwrap_or_default();

    let session = ChatSession::new(credentials);
    tracing::info!(
        session_id = %session.id(),
        configured = !session.credentials().api_key.is_empty(),
        "session started"
    );
    Ok(session)
}

/// The configuration the session will use for its next call.
pub fn get_configuration(session: &ChatSession) -> ConfigurationInfo {
    let credentials = session.credentials();
    ConfigurationInfo {
        deployment_url: credentials.deployment_url.clone(),
        masked_key: credentials.masked_key(),
        key_fingerprint: key_fingerprint(&credentials.api_key),
        configured: !credentials.api_key.is_empty() && !credentials.deployment_url.is_empty(),
    }
}

/// Save a configuration and apply it to `session`. Returns the new row id.
pub fn save_configuration(
    state: &AppState,
    session: &mut ChatSession,
    api_key: String,
    deployment_url: String,
) -> Result<i64, String> {
    let credentials = Credentials::new(api_key, deployment_url);
    let id = {
        let db = state.db.lock().map_err(|e| format!("Lock error: {e}"))?;
        db.save(&credentials)
            .map_err(|e| format!("Failed to save configuration: {e}"))?
    };
    session.set_credentials(credentials);
    Ok(id)
}

/// Saved configurations, newest first.
pub fn list_configuration_history(
    state: &AppState,
    limit: usize,
) -> Result<Vec<CredentialSummary>, String> {
    let db = state.db.lock().map_err(|e| format!("Lock error: {e}"))?;
    let records = db.history(limit).map_err(|e| format!("{e}"))?;
    Ok(records.iter().map(CredentialSummary::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::state_for;

    #[test]
    fn test_start_session_empty_store() {
        let state = state_for("http://127.0.0.1:9");
        let session = start_session(&state).unwrap();
        assert_eq!(session.credentials(), &Credentials::default());
        assert!(!get_configuration(&session).configured);
    }

    #[test]
    fn test_save_updates_session_and_store() {
        let state = state_for("http://127.0.0.1:9");
        let mut session = start_session(&state).unwrap();
        save_configuration(
            &state,
            &mut session,
            "key-123456".into(),
            "https://example.test/chat".into(),
        )
        .unwrap();

        let info = get_configuration(&session);
        assert!(info.configured);
        assert_eq!(info.masked_key, "******3456");
        assert_eq!(info.deployment_url, "https://example.test/chat");

        // A new session picks up the saved row.
        let next = start_session(&state).unwrap();
        assert_eq!(next.credentials().api_key, "key-123456");
    }

    #[test]
    fn test_save_does_not_touch_other_sessions() {
        let state = state_for("http://127.0.0.1:9");
        let mut a = start_session(&state).unwrap();
        let b = start_session(&state).unwrap();
        save_configuration(&state, &mut a, "k".into(), "u".into()).unwrap();
        assert_eq!(b.credentials(), &Credentials::default());
    }

    #[test]
    fn test_history_newest_first() {
        let state = state_for("http://127.0.0.1:9");
        let mut session = start_session(&state).unwrap();
        save_configuration(&state, &mut session, "k1".into(), "u1".into()).unwrap();
        save_configuration(&state, &mut session, "k2".into(), "u2".into()).unwrap();

        let history = list_configuration_history(&state, 10).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].deployment_url, "u2");
        assert_eq!(history[1].deployment_url, "u1");
    }
}
