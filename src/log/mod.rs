use anyhow::Result;
use chrono::{DateTime, Utc};
use fs_err as fs;
use serde::Serialize;
use serde_json::to_string_pretty;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::wire::{FileSet, GenerationRequest};

/// Operator-facing record of one generation: the prompt sent and the raw
/// text that came back, under `<root>/tx/<uuid>/`.
#[derive(Debug, Clone)]
pub struct Journal {
    root: PathBuf,
}

#[derive(Debug, Clone)]
pub struct TxDir {
    pub id: Uuid,
    pub dir: PathBuf,
}

#[derive(Serialize)]
struct TxMeta<'a> {
    id: Uuid,
    started_at: DateTime<Utc>,
    request: &'a GenerationRequest,
}

impl Journal {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn tx_dir(&self, tx: Uuid) -> PathBuf {
        self.root.join("tx").join(tx.to_string())
    }

    pub fn begin(&self, req: &GenerationRequest) -> Result<TxDir> {
        let id = Uuid::new_v4();
        let dir = self.tx_dir(id);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join("prompt.txt"), &req.prompt)?;
        let meta = TxMeta { id, started_at: Utc::now(), request: req };
        fs::write(dir.join("request.json"), to_string_pretty(&meta)?)?;
        Ok(TxDir { id, dir })
    }
}

impl TxDir {
    pub fn save_response(&self, raw: &str) -> Result<PathBuf> {
        let p = self.dir.join("response.txt");
        fs::write(&p, raw)?;
        Ok(p)
    }

    pub fn save_files(&self, files: &FileSet) -> Result<PathBuf> {
        let p = self.dir.join("files.json");
        fs::write(&p, to_string_pretty(files)?)?;
        Ok(p)
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }
}
