//! Inference: token exchange and chat completion against a hosted deployment.
//!
//! - `auth`: API key → bearer token exchange
//! - `client`: chat completion with the full conversation history
//! - `types`: wire types for both endpoints
//! - `errors`: `AuthError` and `InferenceError`

pub mod auth;
pub mod client;
pub mod errors;
pub mod types;

// Re-exports for convenience
pub use auth::{key_fingerprint, TokenClient};
pub use client::InferenceClient;
pub use errors::{AuthError, InferenceError};
pub use types::{ChatMessage, Role};
