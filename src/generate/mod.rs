use tracing::{debug, info, warn};

use crate::errors::GenError;
use crate::log::{Journal, TxDir};
use crate::parse;
use crate::prompt;
use crate::provider::DynProvider;
use crate::tree;
use crate::wire::{FileSet, GenerationRequest, OutputFormat};

/// Low and fixed, so equal descriptions tend to give equal roles.
pub const TEMPERATURE: f32 = 0.2;

/// Runs one description through prompt → provider → parser → tree check.
/// Every failure comes back as a `GenError`; there are no partial results.
pub struct Generator {
    provider: DynProvider,
    model: String,
    journal: Option<Journal>,
}

impl Generator {
    pub fn new(provider: DynProvider, model: impl Into<String>) -> Self {
        Self { provider, model: model.into(), journal: None }
    }

    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn request_for(&self, description: &str) -> GenerationRequest {
        GenerationRequest {
            model: self.model.clone(),
            prompt: prompt::build(description),
            format: OutputFormat::Json,
            temperature: TEMPERATURE,
        }
    }

    /// `description` must be trimmed and non-empty; `Session::begin` does that.
    pub async fn generate(&self, description: &str) -> Result<FileSet, GenError> {
        let req = self.request_for(description);
        let tx = self.open_tx(&req);

        info!(provider = self.provider.name(), model = %req.model, "requesting generation");
        let raw = self.provider.complete(&req).await.map_err(|e| {
            warn!(provider = self.provider.name(), error = %format!("{e:#}"), "generation request failed");
            GenError::transport(&e)
        })?;
        debug!(bytes = raw.len(), "raw response received");
        if let Some(tx) = &tx {
            if let Err(e) = tx.save_response(&raw) {
                warn!(error = %e, "could not journal raw response");
            }
        }

        let files = parse::parse(&raw).map_err(|e| {
            if let GenError::Parse { reason, raw } = &e {
                warn!(%reason, "failed to parse model response as a file map");
                debug!(%raw, "raw model response");
            }
            e
        })?;

        let root = tree::build(&files)?;
        info!(
            files = files.len(),
            unique = root.file_count(),
            dirs = root.dir_count(),
            "generation parsed"
        );

        if let Some(tx) = &tx {
            if let Err(e) = tx.save_files(&files) {
                warn!(error = %e, "could not journal parsed files");
            }
        }
        Ok(files)
    }

    fn open_tx(&self, req: &GenerationRequest) -> Option<TxDir> {
        let journal = self.journal.as_ref()?;
        match journal.begin(req) {
            Ok(tx) => {
                debug!(tx = %tx.id, dir = %tx.path().display(), "journaling generation");
                Some(tx)
            }
            Err(e) => {
                warn!(error = %e, "could not open journal entry");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Provider;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// Provider that replays a fixed reply and remembers what it was asked.
    struct Canned {
        reply: Result<String, String>,
        seen: Arc<Mutex<Vec<GenerationRequest>>>,
    }

    impl Canned {
        fn ok(text: &str) -> Self {
            Self { reply: Ok(text.to_string()), seen: Arc::default() }
        }

        fn err(msg: &str) -> Self {
            Self { reply: Err(msg.to_string()), seen: Arc::default() }
        }
    }

    #[async_trait]
    impl Provider for Canned {
        fn name(&self) -> &'static str {
            "canned"
        }

        async fn complete(&self, req: &GenerationRequest) -> anyhow::Result<String> {
            self.seen.lock().unwrap().push(req.clone());
            self.reply.clone().map_err(|m| anyhow!(m))
        }
    }

    fn generator(p: Canned) -> Generator {
        Generator::new(Box::new(p), "gemini-2.5-pro")
    }

    #[tokio::test]
    async fn install_nginx_end_to_end() {
        let provider = Canned::ok(r#"{"nginx/tasks/main.yml": "- name: install\n"}"#);
        let seen = provider.seen.clone();
        let files = generator(provider).generate("install nginx").await.unwrap();

        assert_eq!(files.len(), 1);
        let f = files.first().unwrap();
        assert_eq!(f.path, "nginx/tasks/main.yml");
        assert_eq!(f.content, "- name: install\n");

        let root = tree::build(&files).unwrap();
        assert_eq!(tree::render_plain(&root), "nginx/\n  tasks/\n    main.yml\n");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].model, "gemini-2.5-pro");
        assert_eq!(seen[0].format, OutputFormat::Json);
        assert_eq!(seen[0].temperature, TEMPERATURE);
        assert!(seen[0].prompt.contains("install nginx"));
    }

    #[tokio::test]
    async fn transport_error_passes_message_through() {
        let err = generator(Canned::err("quota exceeded for project"))
            .generate("x")
            .await
            .unwrap_err();
        match err {
            GenError::Transport(msg) => assert_eq!(msg, "quota exceeded for project"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn bad_reply_is_parse_error() {
        let err = generator(Canned::ok("Sure! Here is your role:")).generate("x").await.unwrap_err();
        assert!(matches!(err, GenError::Parse { .. }));
        assert!(!err.to_string().contains("Sure!"));
    }

    #[tokio::test]
    async fn empty_object_is_empty_result() {
        let err = generator(Canned::ok("{}")).generate("x").await.unwrap_err();
        assert!(matches!(err, GenError::EmptyResult));
        assert!(err.to_string().contains("different description"));
    }

    #[tokio::test]
    async fn conflicting_paths_are_rejected() {
        let err = generator(Canned::ok(r#"{"r/tasks": "x", "r/tasks/main.yml": "y"}"#))
            .generate("x")
            .await
            .unwrap_err();
        assert!(matches!(err, GenError::PathConflict { .. }));
    }

    #[tokio::test]
    async fn journal_keeps_raw_reply_on_parse_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let g = generator(Canned::ok("not json at all")).with_journal(Journal::new(tmp.path()));
        assert!(g.generate("x").await.is_err());

        let tx_root = tmp.path().join("tx");
        let entries: Vec<_> = std::fs::read_dir(&tx_root).unwrap().collect();
        assert_eq!(entries.len(), 1);
        let dir = entries.into_iter().next().unwrap().unwrap().path();
        assert_eq!(std::fs::read_to_string(dir.join("response.txt")).unwrap(), "not json at all");
        assert!(!dir.join("files.json").exists());
    }
}
