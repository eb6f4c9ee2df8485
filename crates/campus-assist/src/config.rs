//! Completion-service configuration.

use campus_core::defaults::{
    DEFAULT_COMPLETION_MAX_TOKENS, DEFAULT_COMPLETION_MODEL, DEFAULT_COMPLETION_TEMPERATURE,
};

/// Default OpenAI-compatible API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the completion-service client.
#[derive(Debug, Clone)]
pub struct AssistConfig {
    /// Base URL for the API endpoint.
    pub base_url: String,
    /// API credential. When absent the assistant answers from the
    /// canned-response fallback instead of calling out.
    pub api_key: Option<String>,
    /// Model identifier sent with each request.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Token budget for the response.
    pub max_tokens: u32,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_COMPLETION_MODEL.to_string(),
            temperature: DEFAULT_COMPLETION_TEMPERATURE,
            max_tokens: DEFAULT_COMPLETION_MAX_TOKENS,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl AssistConfig {
    /// Build from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            api_key: std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            model: std::env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| DEFAULT_COMPLETION_MODEL.to_string()),
            temperature: std::env::var("OPENAI_TEMPERATURE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_COMPLETION_TEMPERATURE),
            max_tokens: std::env::var("OPENAI_MAX_TOKENS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_COMPLETION_MAX_TOKENS),
            timeout_seconds: std::env::var("OPENAI_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Copy of this config with a different credential.
    pub fn with_api_key(&self, api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..self.clone()
        }
    }
}
