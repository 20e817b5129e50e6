//! Shared types for the agent core.

use serde::Serialize;

use crate::inference::key_fingerprint;

/// An API key and the deployment it unlocks.
///
/// Neither field is validated; empty strings are stored and used as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub deployment_url: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, deployment_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            deployment_url: deployment_url.into(),
        }
    }

    /// Key with all but the last four characters hidden.
    pub fn masked_key(&self) -> String {
        mask_key(&self.api_key)
    }
}

/// A row of the `credentials` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub id: i64,
    pub credentials: Credentials,
}

/// A credential row as shown to the user. Never carries the raw key.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSummary {
    pub id: i64,
    pub key_fingerprint: String,
    pub masked_key: String,
    pub deployment_url: String,
}

impl From<&CredentialRecord> for CredentialSummary {
    fn from(record: &CredentialRecord) -> Self {
        Self {
            id: record.id,
            key_fingerprint: key_fingerprint(&record.credentials.api_key),
            masked_key: record.credentials.masked_key(),
            deployment_url: record.credentials.deployment_url.clone(),
        }
    }
}

fn mask_key(key: &str) -> String {
    let count = key.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = key.chars().skip(count - 4).collect();
    format!("{}{tail}", "*".repeat(count - 4))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked_key() {
        assert_eq!(Credentials::new("abcdefgh", "u").masked_key(), "****efgh");
        assert_eq!(Credentials::new("abc", "u").masked_key(), "***");
        assert_eq!(Credentials::new("", "u").masked_key(), "");
    }

    #[test]
    fn test_summary_never_contains_key() {
        let record = CredentialRecord {
            id: 7,
            credentials: Credentials::new("super-secret-key", "https://example.test/chat"),
        };
        let summary = CredentialSummary::from(&record);
        let json = serde_json::to_string(&summary).unwrap();
        assert!(!json.contains("super-secret-key"));
        assert!(json.contains("keyFingerprint"));
        assert_eq!(summary.id, 7);
    }
}
