//! OpenAI-compatible chat-completion client.
//!
//! One outbound request per user message; no retry, no backoff, no
//! streaming. Callers treat every failure as a single mode and
//! substitute the fixed apology reply.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use campus_core::{CompletionBackend, Error, Result};

use crate::config::AssistConfig;

/// Request body for the chat completions endpoint.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

/// A single chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Response from the chat completions endpoint.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

/// Single chat completion choice.
#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Error response from the service.
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Client for an OpenAI-compatible completion endpoint.
pub struct OpenAiClient {
    client: Client,
    config: AssistConfig,
}

impl OpenAiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: AssistConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Assistant(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Get the current configuration.
    pub fn config(&self) -> &AssistConfig {
        &self.config
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl CompletionBackend for OpenAiClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        debug!(
            subsystem = "assist",
            component = "completion",
            model = %self.config.model,
            prompt_len = prompt.len(),
            "Sending completion request"
        );

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let mut req = self.client.post(self.completions_url()).json(&request);
        if let Some(ref api_key) = self.config.api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = req
            .send()
            .await
            .map_err(|e| Error::Assistant(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .json::<ApiErrorResponse>()
                .await
                .map(|b| b.error.message)
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::Assistant(format!(
                "Completion service returned {}: {}",
                status, message
            )));
        }

        let result: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Assistant(format!("Failed to parse response: {}", e)))?;

        let content = result
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .unwrap_or_default();

        debug!(
            subsystem = "assist",
            component = "completion",
            response_len = content.len(),
            "Completion received"
        );
        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
