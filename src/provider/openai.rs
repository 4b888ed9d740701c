use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{success_body, Provider};
use crate::wire::{GenerationRequest, OutputFormat};

pub const DEFAULT_API_BASE: &str = "https://api.openai.com";

/// OpenAI chat completions. The prompt is sent as a single user message,
/// with no extra system messages.
pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    api_base: String,
}

impl OpenAIProvider {
    pub fn new(client: Client, api_key: String, api_base: Option<String>) -> Self {
        Self {
            client,
            api_key,
            api_base: api_base.unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        }
    }
}

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[async_trait]
impl Provider for OpenAIProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn complete(&self, req: &GenerationRequest) -> Result<String> {
        let url = format!("{}/v1/chat/completions", self.api_base.trim_end_matches('/'));
        let response_format = match req.format {
            OutputFormat::Json => json!({ "type": "json_object" }),
        };
        let body = json!({
            "model": req.model,
            "messages": [
                { "role": "user", "content": req.prompt }
            ],
            "temperature": req.temperature,
            "response_format": response_format
        });

        tracing::debug!(%url, "openai: POST");
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("openai request failed")?;
        let text = success_body(resp, "openai").await?;

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse OpenAI response: {e}"))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| anyhow!("openai: response had no message content"))
    }
}
