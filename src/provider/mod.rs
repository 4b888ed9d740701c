use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};

use crate::cli::ProviderKind;
use crate::wire::GenerationRequest;

pub mod anthropic;
pub mod gemini;
pub mod ollama;
pub mod openai;

/// The external generation boundary: one prompt in, the model's raw text out.
#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &'static str;
    async fn complete(&self, req: &GenerationRequest) -> Result<String>;
}

pub type DynProvider = Box<dyn Provider + Send + Sync>;

pub fn make_provider(kind: ProviderKind, api_base: Option<String>) -> Result<DynProvider> {
    make_provider_with(kind, api_base, |var| std::env::var(var).ok())
}

/// Like `make_provider`, with API keys looked up through `env`.
pub fn make_provider_with<F>(kind: ProviderKind, api_base: Option<String>, env: F) -> Result<DynProvider>
where
    F: Fn(&str) -> Option<String>,
{
    let key = |var: &str| api_key(var, env(var));
    let client = http_client()?;
    match kind {
        ProviderKind::Gemini => Ok(Box::new(gemini::Gemini::new(
            client,
            key("GEMINI_API_KEY")?,
            api_base,
        ))),
        ProviderKind::OpenAI => Ok(Box::new(openai::OpenAIProvider::new(
            client,
            key("OPENAI_API_KEY")?,
            api_base,
        ))),
        ProviderKind::Anthropic => Ok(Box::new(anthropic::Anthropic::new(
            client,
            key("ANTHROPIC_API_KEY")?,
            api_base,
        ))),
        ProviderKind::Ollama => Ok(Box::new(ollama::Ollama::new(client, api_base))),
    }
}

fn api_key(var: &str, value: Option<String>) -> Result<String> {
    value
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| anyhow!("{var} env var is not set"))
}

/// No request timeout: a generation runs until the transport settles.
pub(crate) fn http_client() -> Result<Client> {
    Client::builder().build().context("failed to build HTTP client")
}

/// Read the body, turning a non-2xx status into an error that carries it.
pub(crate) async fn success_body(resp: Response, label: &str) -> Result<String> {
    let status = resp.status();
    let text = resp
        .text()
        .await
        .with_context(|| format!("{label}: failed to read response body"))?;
    tracing::debug!(provider = label, %status, bytes = text.len(), "response received");
    if !status.is_success() {
        return Err(anyhow!("{label} API error ({status}): {text}"));
    }
    Ok(text)
}
