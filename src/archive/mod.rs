use anyhow::{Context, Result};
use bytes::Bytes;
use fs_err as fs;
use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::errors::GenError;
use crate::wire::FileSet;

/// `<role>.zip`, where the role is the first path's top-level directory.
pub fn archive_name(files: &FileSet, fallback: &str) -> String {
    format!("{}.zip", files.root_name().unwrap_or(fallback))
}

/// One entry per path, in first-seen order, carrying the last content seen.
fn unique_entries(files: &FileSet) -> Vec<(&str, &str)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<(&str, &str)> = Vec::with_capacity(files.len());
    for f in files {
        match index.get(f.path.as_str()) {
            Some(&i) => out[i].1 = f.content.as_str(),
            None => {
                index.insert(f.path.as_str(), out.len());
                out.push((f.path.as_str(), f.content.as_str()));
            }
        }
    }
    out
}

/// Deflated ZIP of the FileSet, laid out exactly as the paths say.
pub fn build_zip(files: &FileSet) -> Result<Vec<u8>, GenError> {
    let zip_err = |e: zip::result::ZipError| GenError::Archive(e.to_string());
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);
    let dir_options = FileOptions::default().unix_permissions(0o755);

    let mut dirs: HashSet<&str> = HashSet::new();
    for (path, content) in unique_entries(files) {
        for (i, _) in path.match_indices('/') {
            let dir = &path[..=i];
            if dirs.insert(dir) {
                zip.add_directory(dir, dir_options).map_err(zip_err)?;
            }
        }
        zip.start_file(path, options).map_err(zip_err)?;
        zip.write_all(content.as_bytes())
            .map_err(|e| GenError::Archive(e.to_string()))?;
    }

    let cursor = zip.finish().map_err(zip_err)?;
    Ok(cursor.into_inner())
}

/// Build the archive off the async runtime.
pub async fn export(files: &FileSet) -> Result<Bytes, GenError> {
    let files = files.clone();
    let blob = tokio::task::spawn_blocking(move || build_zip(&files))
        .await
        .map_err(|e| GenError::Archive(e.to_string()))??;
    tracing::debug!(bytes = blob.len(), "archive built");
    Ok(Bytes::from(blob))
}

/// Write the archive into `dir` through a temp file, so a failed write never
/// leaves a truncated ZIP behind.
pub fn save(dir: &Path, name: &str, blob: &[u8]) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let dest = dir.join(name);
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temp file in {}", dir.display()))?;
    tmp.write_all(blob)?;
    tmp.persist(&dest)
        .with_context(|| format!("writing {}", dest.display()))?;
    Ok(dest)
}
