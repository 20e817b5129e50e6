//! Application configuration loading.
//!
//! Reads `ethics-assistant.yaml` and resolves environment variables. Every
//! field has a default, so a missing file yields a working configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// File name searched for when no explicit path is given.
pub const CONFIG_FILE_NAME: &str = "ethics-assistant.yaml";

/// Environment variable that points at a config file.
pub const CONFIG_ENV_VAR: &str = "ETHICS_ASSISTANT_CONFIG";

/// Identity endpoint that exchanges an API key for a bearer token.
pub const DEFAULT_TOKEN_URL: &str = "https://iam.cloud.ibm.com/identity/token";

/// Review instruction prepended to the uploaded document.
pub const DEFAULT_REVIEW_TEMPLATE: &str = "As an ethics reviewer, please assess whether the \
following research application complies with NEAC and UAHPEC guidelines:\n\n{document}";

/// Errors while locating or parsing the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("failed to parse config: {reason}")]
    Parse { reason: String },

    #[error("invalid config: {reason}")]
    Invalid { reason: String },
}

// ─── Public Types ────────────────────────────────────────────────────────────

/// Top-level configuration (mirrors `ethics-assistant.yaml`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub token_url: String,
    /// SQLite file for the credential log. `None` → `<data_dir>/api_data.db`.
    pub database_path: Option<String>,
    pub http: HttpConfig,
    pub review: ReviewConfig,
    pub history: HistoryConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            token_url: DEFAULT_TOKEN_URL.to_string(),
            database_path: None,
            http: HttpConfig::default(),
            review: ReviewConfig::default(),
            history: HistoryConfig::default(),
        }
    }
}

/// Timeouts shared by the token and inference clients.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 5,
            request_timeout_secs: 120,
        }
    }
}

impl HttpConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Document review settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Must contain `{document}`.
    pub prompt_template: String,
    /// Characters of extracted text placed in the review prompt.
    pub analysis_chars: usize,
    /// Characters of extracted text shown as a preview.
    pub preview_chars: usize,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            prompt_template: DEFAULT_REVIEW_TEMPLATE.to_string(),
            analysis_chars: 3000,
            preview_chars: 1500,
        }
    }
}

/// Conversation history policy.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Drop the user turn when the pipeline fails after appending it.
    pub rollback_failed_turns: bool,
}

// ─── Loading ─────────────────────────────────────────────────────────────────

/// Locate the config file.
///
/// Checks the `ETHICS_ASSISTANT_CONFIG` env var, then walks upward from
/// `start` looking for `ethics-assistant.yaml`. Returns `None` when neither
/// finds a file; the caller then uses defaults.
pub fn find_config_path(start: &Path) -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        let candidate = PathBuf::from(&path);
        if candidate.exists() {
            return Some(candidate);
        }
        tracing::warn!(path = %path, "{CONFIG_ENV_VAR} points at a missing file, ignoring");
    }

    let mut dir = start.to_path_buf();
    loop {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.exists() {
            return Some(candidate);
        }
        if !dir.pop() {
            return None;
        }
    }
}

/// Load and parse a config file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    parse_config(&raw)
}

/// Parse config text and validate it.
///
/// `${VAR_NAME}` and `${VAR_NAME:-default}` are resolved in `token_url` and
/// `database_path` only. The review template is used verbatim.
pub fn parse_config(raw: &str) -> Result<AppConfig, ConfigError> {
    // An empty or comment-only file deserializes to `null`.
    let config: Option<AppConfig> = serde_yaml::from_str(raw).map_err(|e| ConfigError::Parse {
        reason: e.to_string(),
    })?;
    let mut config = config.unwrap_or_default();

    config.token_url = interpolate_env_vars(&config.token_url);
    config.database_path = config.database_path.as_deref().map(interpolate_env_vars);

    if !config.review.prompt_template.contains("{document}") {
        return Err(ConfigError::Invalid {
            reason: "review.prompt_template must contain {document}".into(),
        });
    }
    Ok(config)
}

/// Resolve the configuration from an explicit path, the environment, or defaults.
pub fn resolve_config(explicit: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let path = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => {
            let cwd = std::env::current_dir().unwrap_or_default();
            find_config_path(&cwd)
        }
    };

    match path {
        Some(p) => {
            let config = load_config(&p)?;
            tracing::info!(path = %p.display(), "loaded config");
            Ok(config)
        }
        None => {
            tracing::info!("no config file found, using defaults");
            Ok(AppConfig::default())
        }
    }
}

// ─── Env-var interpolation ───────────────────────────────────────────────────

/// Replace `${VAR}` and `${VAR:-default}` in a string.
fn interpolate_env_vars(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next();
            let mut var_expr = String::new();
            for c in chars.by_ref() {
                if c == '}' {
                    break;
                }
                var_expr.push(c);
            }
            result.push_str(&resolve_var_expr(&var_expr));
        } else {
            result.push(ch);
        }
    }

    result
}

/// Resolve a variable expression like `VAR` or `VAR:-default`.
fn resolve_var_expr(expr: &str) -> String {
    if let Some(idx) = expr.find(":-") {
        let var_name = &expr[..idx];
        let default = &expr[idx + 2..];
        std::env::var(var_name).unwrap_or_else(|_| expand_tilde(default))
    } else {
        std::env::var(expr).unwrap_or_default()
    }
}

/// Expand a leading `~` to the user's home directory.
pub(crate) fn expand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return format!("{}{rest}", home.display());
        }
    }
    path.to_string()
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.token_url, DEFAULT_TOKEN_URL);
        assert_eq!(config.review.analysis_chars, 3000);
        assert_eq!(config.review.preview_chars, 1500);
        assert!(!config.history.rollback_failed_turns);
        assert!(config.review.prompt_template.starts_with("As an ethics reviewer"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
            review:
              analysis_chars: 500
            history:
              rollback_failed_turns: true
        "#;
        let config = parse_config(yaml).unwrap();
        assert_eq!(config.review.analysis_chars, 500);
        assert_eq!(config.review.preview_chars, 1500);
        assert!(config.history.rollback_failed_turns);
        assert_eq!(config.token_url, DEFAULT_TOKEN_URL);
        assert_eq!(config.http.connect_timeout_secs, 5);
    }

    #[test]
    fn test_empty_file_is_default() {
        let config = parse_config("# nothing here\n").unwrap();
        assert_eq!(config.token_url, DEFAULT_TOKEN_URL);
    }

    #[test]
    fn test_template_without_placeholder_rejected() {
        let yaml = "review:\n  prompt_template: \"review this\"\n";
        let err = parse_config(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_interpolate_env_vars_with_default() {
        std::env::remove_var("__ETHICS_TEST_UNSET_VAR__");
        let result = interpolate_env_vars("${__ETHICS_TEST_UNSET_VAR__:-/fallback/path}");
        assert_eq!(result, "/fallback/path");
    }

    #[test]
    fn test_interpolate_env_vars_with_value() {
        std::env::set_var("__ETHICS_TEST_TOKEN_URL__", "http://localhost:9999/token");
        let config = parse_config("token_url: ${__ETHICS_TEST_TOKEN_URL__}\n").unwrap();
        assert_eq!(config.token_url, "http://localhost:9999/token");
        std::env::remove_var("__ETHICS_TEST_TOKEN_URL__");
    }

    #[test]
    fn test_prompt_template_is_not_interpolated() {
        std::env::remove_var("__ETHICS_TEST_TEMPLATE_VAR__");
        let yaml = "review:\n  prompt_template: \"Check ${__ETHICS_TEST_TEMPLATE_VAR__:-x} then {document}\"\n";
        let config = parse_config(yaml).unwrap();
        assert_eq!(
            config.review.prompt_template,
            "Check ${__ETHICS_TEST_TEMPLATE_VAR__:-x} then {document}"
        );
    }

    #[test]
    fn test_database_path_is_interpolated() {
        std::env::remove_var("__ETHICS_TEST_DB_DIR__");
        let config =
            parse_config("database_path: ${__ETHICS_TEST_DB_DIR__:-/var/lib/ethics}/api.db\n")
                .unwrap();
        assert_eq!(config.database_path.as_deref(), Some("/var/lib/ethics/api.db"));
    }

    #[test]
    fn test_interpolate_no_vars() {
        let input = "plain text with no variables";
        assert_eq!(interpolate_env_vars(input), input);
    }

    #[test]
    fn test_expand_tilde() {
        let result = expand_tilde("~/Documents");
        assert!(!result.starts_with('~'), "tilde should be expanded");
        assert!(result.ends_with("/Documents"));
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "http:\n  request_timeout_secs: 10\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.http.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_find_config_path_walks_upward() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "").unwrap();

        let found = find_config_path(&nested).unwrap();
        assert_eq!(found, dir.path().join(CONFIG_FILE_NAME));
    }
}
