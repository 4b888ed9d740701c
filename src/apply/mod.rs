use anyhow::{anyhow, Result};
use fs_err as fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::safety::validate_output_path;
use crate::wire::FileSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind { Created, Overwritten, Unchanged }

#[derive(Debug, Clone)]
pub struct FileResult {
    pub kind: WriteKind,
    pub path: PathBuf,
    pub bytes_after: u64,
}

#[derive(Debug, Clone, Default)]
pub struct WriteSummary {
    pub created: usize,
    pub overwritten: usize,
    pub unchanged: usize,
    pub bytes_written: u64,
    pub details: Vec<FileResult>,
}

impl WriteSummary {
    fn record(&mut self, r: FileResult) {
        match r.kind {
            WriteKind::Created => self.created += 1,
            WriteKind::Overwritten => self.overwritten += 1,
            WriteKind::Unchanged => self.unchanged += 1,
        }
        if r.kind != WriteKind::Unchanged {
            self.bytes_written += r.bytes_after;
        }
        self.details.push(r);
    }
}

/// Paths under `root` that already exist and would be replaced.
pub fn existing(root: &Path, files: &FileSet) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = files
        .iter()
        .map(|f| root.join(&f.path))
        .filter(|p| p.exists())
        .collect();
    out.sort();
    out.dedup();
    out
}

/// Write every file under `root`. Later duplicates overwrite earlier ones,
/// so the result on disk is last-write-wins. With `dry` nothing is written
/// but the summary still says what would have happened.
pub fn write_files(root: &Path, files: &FileSet, dry: bool) -> Result<WriteSummary> {
    let mut sum = WriteSummary::default();

    for f in files {
        validate_output_path(&f.path).map_err(|v| anyhow!("refusing to write {}: {v}", f.path))?;
        let abs = root.join(&f.path);
        let after = f.content.len() as u64;

        let kind = if abs.is_file() {
            let old = fs::read(&abs)?;
            if old == f.content.as_bytes() { WriteKind::Unchanged } else { WriteKind::Overwritten }
        } else if abs.exists() {
            return Err(anyhow!("{} exists and is not a file", abs.display()));
        } else {
            WriteKind::Created
        };

        if !dry && kind != WriteKind::Unchanged {
            let parent = abs.parent().unwrap_or(root);
            fs::create_dir_all(parent)?;
            let mut tmp = NamedTempFile::new_in(parent)?;
            tmp.write_all(f.content.as_bytes())?;
            tmp.persist(&abs)?;
        }
        tracing::debug!(path = %abs.display(), ?kind, dry, "materialized");

        sum.record(FileResult { kind, path: abs, bytes_after: after });
    }

    Ok(sum)
}
