//! Agent Core: conversation orchestration for the ethics assistant.
//!
//! Submodules:
//! - `conversation`: per-session history, credentials and loaded document
//! - `database`: SQLite credential log (append-only, latest wins)
//! - `orchestrator`: user-message and analyze-document pipelines
//! - `prompts`: review prompt construction
//! - `types`: shared types across the agent core
//! - `errors`: agent-level error types

pub mod conversation;
pub mod database;
pub mod errors;
pub mod orchestrator;
pub mod prompts;
pub mod types;

// Re-exports for convenience
pub use conversation::ChatSession;
pub use database::CredentialDatabase;
pub use errors::AgentError;
pub use orchestrator::Orchestrator;
pub use types::{CredentialRecord, CredentialSummary, Credentials};
