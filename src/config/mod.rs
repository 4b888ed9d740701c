use anyhow::{Context, Result};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::cli::{Args, ProviderKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderKind,
    /// Unset means the provider's own default model.
    pub model: Option<String>,
    pub api_base: Option<String>,
    pub out_dir: String,
    pub save_artifacts: bool,
    pub artifacts_dir: String,
    pub fallback_archive_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Gemini,
            model: None,
            api_base: None,
            out_dir: ".".into(),
            save_artifacts: false,
            artifacts_dir: ".rolegen".into(),
            fallback_archive_name: "ansible_role".into(),
        }
    }
}

impl Config {
    /// Defaults, overlaid by the TOML file at `path` if given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            None => Ok(Self::default()),
            Some(p) => {
                let text = fs::read_to_string(p)?;
                toml::from_str(&text).with_context(|| format!("parsing config {}", p.display()))
            }
        }
    }

    /// Command-line flags win over the file.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(p) = args.provider {
            self.provider = p;
        }
        if let Some(m) = &args.model {
            self.model = Some(m.clone());
        }
        if let Some(b) = &args.api_base {
            self.api_base = Some(b.clone());
        }
        if let Some(o) = &args.out {
            self.out_dir = o.clone();
        }
        if args.save_artifacts {
            self.save_artifacts = true;
        }
        if let Some(d) = &args.artifacts_dir {
            self.artifacts_dir = d.clone();
        }
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or_else(|| self.provider.default_model())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "provider = \"openai\"\nmodel = \"gpt-4.1-mini\"").unwrap();

        let cfg = Config::load(Some(f.path())).unwrap();
        assert_eq!(cfg.provider, ProviderKind::OpenAI);
        assert_eq!(cfg.model(), "gpt-4.1-mini");
        assert_eq!(cfg.out_dir, ".");
        assert_eq!(cfg.fallback_archive_name, "ansible_role");
    }

    #[test]
    fn bad_file_is_error() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "provider = 3").unwrap();
        assert!(Config::load(Some(f.path())).is_err());
        assert!(Config::load(Some(Path::new("/definitely/not/here.toml"))).is_err());
    }

    #[test]
    fn args_override_file() {
        let mut cfg = Config { model: Some("from-file".into()), ..Config::default() };
        let args = Args::try_parse_from([
            "rolegen", "--provider", "ollama", "--model", "llama3.1", "--out", "dist",
            "--save-artifacts",
        ])
        .unwrap();
        cfg.apply_args(&args);
        assert_eq!(cfg.provider, ProviderKind::Ollama);
        assert_eq!(cfg.model(), "llama3.1");
        assert_eq!(cfg.out_dir, "dist");
        assert!(cfg.save_artifacts);
        assert_eq!(cfg.artifacts_dir, ".rolegen");
    }

    #[test]
    fn provider_switch_picks_its_default_model() {
        let mut cfg = Config::default();
        assert_eq!(cfg.model(), "gemini-2.5-pro");

        cfg.apply_args(&Args::try_parse_from(["rolegen", "--provider", "openai"]).unwrap());
        assert_eq!(cfg.provider, ProviderKind::OpenAI);
        assert_eq!(cfg.model(), "gpt-4.1-mini");

        for (flag, kind) in [("anthropic", ProviderKind::Anthropic), ("ollama", ProviderKind::Ollama)] {
            let mut cfg = Config::default();
            cfg.apply_args(&Args::try_parse_from(["rolegen", "--provider", flag]).unwrap());
            assert_eq!(cfg.model(), kind.default_model());
            assert_ne!(cfg.model(), "gemini-2.5-pro");
        }
    }

    #[test]
    fn file_provider_without_model_uses_provider_default() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "provider = \"anthropic\"").unwrap();

        let mut cfg = Config::load(Some(f.path())).unwrap();
        assert_eq!(cfg.model(), "claude-sonnet-4-5");

        cfg.apply_args(&Args::try_parse_from(["rolegen", "--model", "claude-opus-4-1"]).unwrap());
        assert_eq!(cfg.provider, ProviderKind::Anthropic);
        assert_eq!(cfg.model(), "claude-opus-4-1");
    }
}
