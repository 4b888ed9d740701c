use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{success_body, Provider};
use crate::wire::{GenerationRequest, OutputFormat};

pub const DEFAULT_URL: &str = "http://localhost:11434";

pub struct Ollama {
    client: Client,
    url: String,
}

impl Ollama {
    pub fn new(client: Client, url: Option<String>) -> Self {
        Self { client, url: url.unwrap_or_else(|| DEFAULT_URL.to_string()) }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'static str>,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: MsgOut,
}

#[derive(Deserialize)]
struct MsgOut {
    content: String,
}

#[async_trait]
impl Provider for Ollama {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn complete(&self, req: &GenerationRequest) -> Result<String> {
        let url = format!("{}/api/chat", self.url.trim_end_matches('/'));
        let body = ChatRequest {
            model: &req.model,
            messages: vec![Msg { role: "user", content: &req.prompt }],
            stream: false,
            format: match req.format {
                OutputFormat::Json => Some("json"),
            },
            options: OllamaOptions { temperature: req.temperature },
        };

        tracing::debug!(%url, "ollama: POST");
        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("ollama request failed")?;
        let text = success_body(resp, "ollama").await?;

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("ollama response parse error: {e}"))?;
        Ok(parsed.message.content)
    }
}
