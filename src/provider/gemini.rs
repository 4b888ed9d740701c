use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{success_body, Provider};
use crate::wire::{GenerationRequest, OutputFormat};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

pub struct Gemini {
    client: Client,
    api_key: String,
    api_base: String,
}

impl Gemini {
    pub fn new(client: Client, api_key: String, api_base: Option<String>) -> Self {
        Self {
            client,
            api_key,
            api_base: api_base.unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<PartIn<'a>>,
}

#[derive(Serialize)]
struct PartIn<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentOut>,
}

#[derive(Deserialize)]
struct ContentOut {
    #[serde(default)]
    parts: Vec<PartOut>,
}

#[derive(Deserialize)]
struct PartOut {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl Provider for Gemini {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn complete(&self, req: &GenerationRequest) -> Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            req.model
        );
        let body = GenerateRequest {
            contents: vec![Content { role: "user", parts: vec![PartIn { text: &req.prompt }] }],
            generation_config: GenerationConfig {
                response_mime_type: match req.format {
                    OutputFormat::Json => Some("application/json"),
                },
                temperature: req.temperature,
            },
        };

        tracing::debug!(%url, "gemini: POST");
        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .context("gemini request failed")?;
        let text = success_body(resp, "gemini").await?;

        let parsed: GenerateResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("gemini response parse error: {e}"))?;

        let content = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect::<String>())
            .ok_or_else(|| anyhow!("gemini: response had no candidates"))?;
        Ok(content)
    }
}
