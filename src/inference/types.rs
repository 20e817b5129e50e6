//! Wire types for the token exchange and the chat completion endpoint.
//!
//! Request types serialize exactly the fields the deployment expects. Response
//! types make every field on the reply path optional so a missing
//! `choices[0].message.content` surfaces as a typed error, not a panic.

use serde::{Deserialize, Serialize};

// ─── Request Types ───────────────────────────────────────────────────────────

/// A single turn in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Request body for `POST <deployment_url>`.
///
/// The deployment holds the model and sampling parameters, so only the
/// history travels with the request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub messages: &'a [ChatMessage],
}

/// Grant type sent with every API key exchange.
pub const APIKEY_GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";

/// Form body for the token endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct TokenRequest<'a> {
    pub apikey: &'a str,
    pub grant_type: &'static str,
}

impl<'a> TokenRequest<'a> {
    pub fn new(apikey: &'a str) -> Self {
        Self {
            apikey,
            grant_type: APIKEY_GRANT_TYPE,
        }
    }
}

// ─── Response Types ──────────────────────────────────────────────────────────

/// Token endpoint response. Only `access_token` is read.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    /// Seconds until expiry. Deserialized for logging; tokens are never cached.
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Non-streaming chat completion response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

/// A single choice in the completion response.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionChoice {
    #[serde(default)]
    pub message: Option<CompletionMessage>,
}

/// The assistant message inside a choice.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// The reply text at `choices[0].message.content`, if present.
    pub fn reply_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_only_messages() {
        let history = vec![ChatMessage::user("Hello"), ChatMessage::assistant("Hi")];
        let req = ChatCompletionRequest {
            messages: &history,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "messages": [
                    {"role": "user", "content": "Hello"},
                    {"role": "assistant", "content": "Hi"}
                ]
            })
        );
    }

    #[test]
    fn test_reply_text_present() {
        let body = r#"{"choices":[{"message":{"content":"Hi there"}}]}"#;
        let resp: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.reply_text().as_deref(), Some("Hi there"));
    }

    #[test]
    fn test_reply_text_ignores_unread_fields() {
        let body = r#"{"id":"chat-1","model_id":"ibm/granite","choices":[{"index":0,"message":{"role":"assistant","content":"Yes."},"finish_reason":"stop"}],"usage":{"total_tokens":12}}"#;
        let resp: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.reply_text().as_deref(), Some("Yes."));
    }

    #[test]
    fn test_reply_text_missing_choices() {
        let resp: ChatCompletionResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.reply_text().is_none());
    }

    #[test]
    fn test_reply_text_missing_content() {
        let body = r#"{"choices":[{"message":{"role":"assistant"}}]}"#;
        let resp: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert!(resp.reply_text().is_none());
    }

    #[test]
    fn test_token_request_grant_type() {
        let req = TokenRequest::new("secret");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["grant_type"], APIKEY_GRANT_TYPE);
        assert_eq!(json["apikey"], "secret");
    }
}
