use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{success_body, Provider};
use crate::wire::GenerationRequest;

pub const DEFAULT_API_BASE: &str = "https://api.anthropic.com";
pub const API_VERSION: &str = "2023-06-01";

/// Anthropic has no JSON response mode; the prompt itself demands a bare
/// JSON object.
pub struct Anthropic {
    client: Client,
    api_key: String,
    api_base: String,
    pub max_tokens: u32,
}

impl Anthropic {
    pub fn new(client: Client, api_key: String, api_base: Option<String>) -> Self {
        Self {
            client,
            api_key,
            api_base: api_base.unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            max_tokens: 16_384,
        }
    }
}

#[derive(Serialize)]
struct MsgRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Msg<'a>>,
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MsgResponse {
    content: Vec<Block>,
}

#[derive(Deserialize)]
struct Block {
    #[serde(default)]
    text: String,
    #[serde(default)]
    r#type: String,
}

#[async_trait]
impl Provider for Anthropic {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn complete(&self, req: &GenerationRequest) -> Result<String> {
        let url = format!("{}/v1/messages", self.api_base.trim_end_matches('/'));
        let body = MsgRequest {
            model: &req.model,
            max_tokens: self.max_tokens,
            temperature: req.temperature,
            messages: vec![Msg { role: "user", content: &req.prompt }],
        };

        tracing::debug!(%url, "anthropic: POST");
        let resp = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .context("anthropic request failed")?;
        let text = success_body(resp, "anthropic").await?;

        let parsed: MsgResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("anthropic response parse error: {e}"))?;

        parsed
            .content
            .into_iter()
            .find(|b| b.r#type == "text")
            .map(|b| b.text)
            .ok_or_else(|| anyhow!("anthropic: empty content"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::testing::request;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn returns_first_text_block() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "ak"))
            .and(header("anthropic-version", API_VERSION))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [
                    { "type": "thinking", "thinking": "..." },
                    { "type": "text", "text": "{\"r/x.yml\":\"\"}" }
                ]
            })))
            .mount(&server)
            .await;

        let p = Anthropic::new(Client::new(), "ak".into(), Some(server.uri()));
        assert_eq!(p.complete(&request("p")).await.unwrap(), r#"{"r/x.yml":""}"#);
    }
}
