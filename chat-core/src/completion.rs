use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::fmt::Debug;

use crate::error::UpstreamError;

pub const OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const COMPLETION_MODEL: &str = "gpt-3.5-turbo";

/// Reply used whenever the completion provider fails for any reason.
pub const FALLBACK_REPLY: &str = "Sorry, I couldn't process your request at the moment.";

/// Reply returned in mock mode, where no live completion provider is wired up.
pub const MOCK_REPLY: &str = "Hi! Your request went through the whole pipeline and the \
     weather lookup is wired up correctly. Configure a live completion provider to get \
     real weather-aware replies.";

/// Turns a composed prompt into reply text.
///
/// Total: implementations never fail outward. Provider failures become a fixed
/// apology string.
#[async_trait]
pub trait CompletionClient: Send + Sync + Debug {
    async fn complete(&self, prompt: &str) -> String;
}

/// Chat completions via the OpenAI API, one user-role message per request.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(http: Client, api_key: String) -> Self {
        Self { http, base_url: OPENAI_BASE_URL.to_string(), api_key }
    }

    /// Point the client at a different endpoint. Used by tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn request_completion(&self, prompt: &str) -> Result<String, UpstreamError> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let payload = json!({
            "model": COMPLETION_MODEL,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let res = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| UpstreamError::transport("openai", e))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| UpstreamError::transport("openai", e))?;

        if !status.is_success() {
            return Err(UpstreamError::status("openai", status, &body));
        }

        let parsed: ChatCompletionResponse =
            serde_json::from_str(&body).map_err(|e| UpstreamError::decode("openai", e))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(UpstreamError::MissingField { provider: "openai", what: "choices" })
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, prompt: &str) -> String {
        match self.request_completion(prompt).await {
            Ok(text) => text,
            Err(e) => {
                error!("Error getting completion: {e}");
                FALLBACK_REPLY.to_string()
            }
        }
    }
}

/// Placeholder client for deployments without completion credentials.
#[derive(Debug, Clone, Default)]
pub struct MockCompletionClient;

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(&self, prompt: &str) -> String {
        info!("MOCK: would send this prompt to the completion provider: {}", prefix(prompt));
        debug!("Full prompt: {prompt}");
        MOCK_REPLY.to_string()
    }
}

fn prefix(prompt: &str) -> String {
    const MAX: usize = 100;
    if prompt.chars().count() > MAX {
        let truncated: String = prompt.chars().take(MAX).collect();
        format!("{truncated}...")
    } else {
        prompt.to_string()
    }
}
