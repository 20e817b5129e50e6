//! Commands exposed to the interactive surface.
//!
//! Each command takes the shared [`AppState`] and, where it touches the
//! conversation, the caller's [`ChatSession`]. Errors come back as
//! user-facing strings, ready to print.

use std::sync::Mutex;

use crate::agent_core::{CredentialDatabase, Orchestrator};

pub mod chat;
pub mod document;
pub mod settings;

/// Process-wide state shared by every session.
///
/// The credential table is global; conversation state is not, and lives in
/// each caller's `ChatSession`.
pub struct AppState {
    pub db: Mutex<CredentialDatabase>,
    pub orchestrator: Orchestrator,
}

impl AppState {
    pub fn new(db: CredentialDatabase, orchestrator: Orchestrator) -> Self {
        Self {
            db: Mutex::new(db),
            orchestrator,
        }
    }
}
