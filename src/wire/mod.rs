use serde::{Deserialize, Serialize};

/// ========================================
/// Generation request / generated files
/// ========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
}

/// What a provider is asked to do. The model id and sampling settings
/// travel with the request so providers stay stateless.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    pub format: OutputFormat,
    pub temperature: f32,
}

/// One generated file: a relative `/`-separated path and its full content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

impl GeneratedFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self { path: path.into(), content: content.into() }
    }

    pub fn segments(&self) -> std::str::Split<'_, char> {
        self.path.split('/')
    }

    /// Last path segment.
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// Files in first-seen order. Duplicate paths are kept here; consumers that
/// need one entry per path let the later one win.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileSet {
    files: Vec<GeneratedFile>,
}

impl FileSet {
    pub fn new(files: Vec<GeneratedFile>) -> Self {
        Self { files }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GeneratedFile> {
        self.files.iter()
    }

    pub fn first(&self) -> Option<&GeneratedFile> {
        self.files.first()
    }

    /// Latest entry for `path`, matching last-write-wins.
    pub fn get(&self, path: &str) -> Option<&GeneratedFile> {
        self.files.iter().rev().find(|f| f.path == path)
    }

    /// Top-level segment of the first path, used to name the role.
    pub fn root_name(&self) -> Option<&str> {
        self.first()
            .and_then(|f| f.path.split('/').next())
            .filter(|s| !s.is_empty())
    }

    /// File shown first: the role's `tasks/main.yml` if present, else the
    /// first file.
    pub fn default_selection(&self) -> Option<&GeneratedFile> {
        self.files
            .iter()
            .find(|f| f.path.ends_with("tasks/main.yml"))
            .or_else(|| self.first())
    }

    pub fn total_bytes(&self) -> usize {
        self.files.iter().map(|f| f.content.len()).sum()
    }
}

impl<'a> IntoIterator for &'a FileSet {
    type Item = &'a GeneratedFile;
    type IntoIter = std::slice::Iter<'a, GeneratedFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

impl FromIterator<GeneratedFile> for FileSet {
    fn from_iter<I: IntoIterator<Item = GeneratedFile>>(iter: I) -> Self {
        Self { files: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(paths: &[(&str, &str)]) -> FileSet {
        paths.iter().map(|(p, c)| GeneratedFile::new(*p, *c)).collect()
    }

    #[test]
    fn default_selection_prefers_tasks_main() {
        let files = set(&[
            ("nginx/defaults/main.yml", "a"),
            ("nginx/tasks/main.yml", "b"),
        ]);
        assert_eq!(files.default_selection().unwrap().path, "nginx/tasks/main.yml");

        let files = set(&[("nginx/meta/main.yml", "a"), ("nginx/handlers/main.yml", "b")]);
        assert_eq!(files.default_selection().unwrap().path, "nginx/meta/main.yml");
    }

    #[test]
    fn get_returns_last_duplicate() {
        let files = set(&[("r/a.yml", "1"), ("r/b.yml", "x"), ("r/a.yml", "2")]);
        assert_eq!(files.len(), 3);
        assert_eq!(files.get("r/a.yml").unwrap().content, "2");
    }

    #[test]
    fn root_name_from_first_path() {
        assert_eq!(set(&[("docker/tasks/main.yml", "")]).root_name(), Some("docker"));
        assert_eq!(FileSet::default().root_name(), None);
    }

    #[test]
    fn name_is_last_segment() {
        assert_eq!(GeneratedFile::new("a/b/c.j2", "").name(), "c.j2");
        assert_eq!(GeneratedFile::new("README.md", "").name(), "README.md");
    }
}
