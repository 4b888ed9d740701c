use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[value(alias = "google")]
    Gemini,
    #[value(name = "openai", alias = "open-ai")]
    OpenAI,
    Anthropic,
    Ollama,
}

impl ProviderKind {
    /// Model used when neither the command line nor the config file names one.
    pub fn default_model(self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini-2.5-pro",
            ProviderKind::OpenAI => "gpt-4.1-mini",
            ProviderKind::Anthropic => "claude-sonnet-4-5",
            ProviderKind::Ollama => "llama3.1",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "rolegen", version, about = "Generate an Ansible role from a description and pack it as a ZIP")]
pub struct Args {
    /// What the role should do. Read from stdin when omitted.
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    #[arg(long, value_enum)]
    pub provider: Option<ProviderKind>,

    #[arg(long)]
    pub model: Option<String>,

    /// Override the provider's API base URL.
    #[arg(long)]
    pub api_base: Option<String>,

    /// Directory the ZIP archive is written to.
    #[arg(long)]
    pub out: Option<String>,

    /// Also write the generated files under this directory.
    #[arg(long)]
    pub extract: Option<String>,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Overwrite existing output without asking.
    #[arg(long, short = 'y', default_value_t = false)]
    pub yes: bool,

    /// File to print after generation (defaults to tasks/main.yml).
    #[arg(long)]
    pub select: Option<String>,

    #[arg(long, default_value_t = false)]
    pub no_archive: bool,

    /// Keep prompt and raw response for each generation on disk.
    #[arg(long, default_value_t = false)]
    pub save_artifacts: bool,

    #[arg(long)]
    pub artifacts_dir: Option<String>,

    #[arg(long, default_value_t = false)]
    pub debug: bool,

    #[arg(long)]
    pub config: Option<String>,
}
