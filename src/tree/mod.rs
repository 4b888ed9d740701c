use std::collections::btree_map::{BTreeMap, Entry};

use crate::errors::GenError;
use crate::wire::{FileSet, GeneratedFile};

pub const ROOT_NAME: &str = "root";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode<'a> {
    Directory(DirectoryNode<'a>),
    File(FileNode<'a>),
}

/// Children are keyed by segment name. `BTreeMap` keeps them in byte order,
/// which is the case-sensitive ordering the walk relies on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryNode<'a> {
    pub name: String,
    pub children: BTreeMap<String, TreeNode<'a>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode<'a> {
    pub name: String,
    pub file: &'a GeneratedFile,
}

impl<'a> TreeNode<'a> {
    pub fn name(&self) -> &str {
        match self {
            TreeNode::Directory(d) => &d.name,
            TreeNode::File(f) => &f.name,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, TreeNode::Directory(_))
    }

    pub fn as_file(&self) -> Option<&'a GeneratedFile> {
        match self {
            TreeNode::File(f) => Some(f.file),
            TreeNode::Directory(_) => None,
        }
    }
}

impl<'a> DirectoryNode<'a> {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), children: BTreeMap::new() }
    }

    /// Pre-order walk over everything below this directory. Direct children
    /// are at depth 0. Each call starts a fresh walk.
    pub fn walk(&self) -> Walk<'_, 'a> {
        Walk { stack: self.children.values().rev().map(|n| (0, n)).collect() }
    }

    pub fn file_count(&self) -> usize {
        self.walk().filter(|(_, n)| !n.is_dir()).count()
    }

    pub fn dir_count(&self) -> usize {
        self.walk().filter(|(_, n)| n.is_dir()).count()
    }
}

pub struct Walk<'t, 'a> {
    stack: Vec<(usize, &'t TreeNode<'a>)>,
}

impl<'t, 'a> Iterator for Walk<'t, 'a> {
    type Item = (usize, &'t TreeNode<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        if let TreeNode::Directory(dir) = node {
            self.stack
                .extend(dir.children.values().rev().map(|child| (depth + 1, child)));
        }
        Some((depth, node))
    }
}

/// Build the directory tree for a FileSet.
///
/// Intermediate segments become directories. The last segment becomes a file
/// node; a later file at the same path replaces the earlier one. A path that
/// needs a directory where a file already sits, or a file where a directory
/// already sits, fails with `PathConflict`.
pub fn build(files: &FileSet) -> Result<DirectoryNode<'_>, GenError> {
    let mut root = DirectoryNode::new(ROOT_NAME);

    for file in files {
        let segments: Vec<&str> = file.segments().collect();
        let (last, parents) = match segments.split_last() {
            Some(split) => split,
            None => continue,
        };

        let mut dir = &mut root;
        for seg in parents {
            let child = dir
                .children
                .entry((*seg).to_string())
                .or_insert_with(|| TreeNode::Directory(DirectoryNode::new(*seg)));
            dir = match child {
                TreeNode::Directory(d) => d,
                TreeNode::File(_) => return Err(conflict(file, seg)),
            };
        }

        let leaf = TreeNode::File(FileNode { name: file.name().to_string(), file });
        match dir.children.entry((*last).to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(leaf);
            }
            Entry::Occupied(mut slot) => {
                if slot.get().is_dir() {
                    return Err(conflict(file, last));
                }
                tracing::debug!(path = %file.path, "duplicate path, keeping later content");
                slot.insert(leaf);
            }
        }
    }

    Ok(root)
}

fn conflict(file: &GeneratedFile, segment: &str) -> GenError {
    GenError::PathConflict { path: file.path.clone(), segment: segment.to_string() }
}

/// Indented plain-text listing, two spaces per level, directories end in `/`.
pub fn render_plain(root: &DirectoryNode<'_>) -> String {
    let mut out = String::new();
    for (depth, node) in root.walk() {
        out.push_str(&"  ".repeat(depth));
        out.push_str(node.name());
        if node.is_dir() {
            out.push('/');
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn set(entries: &[(&str, &str)]) -> FileSet {
        entries.iter().map(|(p, c)| GeneratedFile::new(*p, *c)).collect()
    }

    fn dir<'t, 'a>(node: &'t TreeNode<'a>) -> &'t DirectoryNode<'a> {
        match node {
            TreeNode::Directory(d) => d,
            TreeNode::File(f) => panic!("expected directory, got file {}", f.name),
        }
    }

    fn names(root: &DirectoryNode<'_>) -> Vec<(usize, String, bool)> {
        root.walk().map(|(d, n)| (d, n.name().to_string(), n.is_dir())).collect()
    }

    #[test]
    fn nested_directories() {
        let files = set(&[("a/b/c.txt", "x"), ("a/b/d.txt", "y")]);
        let root = build(&files).unwrap();

        assert_eq!(root.name, ROOT_NAME);
        assert_eq!(root.children.len(), 1);
        let a = dir(&root.children["a"]);
        assert_eq!(a.children.len(), 1);
        let b = dir(&a.children["b"]);
        assert_eq!(b.children.len(), 2);
        assert_eq!(b.children["c.txt"].as_file().unwrap().content, "x");
        assert_eq!(b.children["d.txt"].as_file().unwrap().content, "y");
    }

    #[test]
    fn duplicate_path_last_write_wins() {
        let files = set(&[("role/tasks/main.yml", "1"), ("role/tasks/main.yml", "2")]);
        let root = build(&files).unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(root.file_count(), 1);
        let tasks = dir(&dir(&root.children["role"]).children["tasks"]);
        assert_eq!(tasks.children["main.yml"].as_file().unwrap().content, "2");
    }

    #[test]
    fn file_then_directory_conflicts() {
        let files = set(&[("a", "x"), ("a/b", "y")]);
        match build(&files) {
            Err(GenError::PathConflict { path, segment }) => {
                assert_eq!(path, "a/b");
                assert_eq!(segment, "a");
            }
            other => panic!("expected PathConflict, got {other:?}"),
        }
    }

    #[test]
    fn directory_then_file_conflicts() {
        let files = set(&[("a/b", "y"), ("a", "x")]);
        assert!(matches!(build(&files), Err(GenError::PathConflict { .. })));
    }

    #[test]
    fn walk_is_preorder_and_sorted_by_name() {
        let files = set(&[
            ("nginx/tasks/main.yml", ""),
            ("nginx/README.md", ""),
            ("nginx/defaults/main.yml", ""),
            ("nginx/tasks/install.yml", ""),
            ("nginx/handlers.yml", ""),
        ]);
        let root = build(&files).unwrap();

        assert_eq!(
            names(&root),
            vec![
                (0, "nginx".to_string(), true),
                (1, "README.md".to_string(), false),
                (1, "defaults".to_string(), true),
                (2, "main.yml".to_string(), false),
                (1, "handlers.yml".to_string(), false),
                (1, "tasks".to_string(), true),
                (2, "install.yml".to_string(), false),
                (2, "main.yml".to_string(), false),
            ]
        );
    }

    #[test]
    fn walk_restarts() {
        let files = set(&[("r/a", ""), ("r/b", "")]);
        let root = build(&files).unwrap();
        let mut first = root.walk();
        first.next();
        assert_eq!(root.walk().count(), 3);
        assert_eq!(first.count(), 2);
    }

    #[test]
    fn build_is_idempotent() {
        let files = set(&[
            ("docker/tasks/main.yml", "1"),
            ("docker/vars/main.yml", "2"),
            ("docker/templates/daemon.json.j2", "3"),
            ("docker/tasks/main.yml", "4"),
        ]);
        let first = build(&files).unwrap();
        let second = build(&files).unwrap();
        assert_eq!(first, second);
        assert_eq!(names(&first), names(&second));
        assert_eq!(render_plain(&first), render_plain(&second));
    }

    #[test]
    fn render_plain_indents() {
        let files = set(&[("nginx/tasks/main.yml", "- name: install\n")]);
        let root = build(&files).unwrap();
        assert_eq!(render_plain(&root), "nginx/\n  tasks/\n    main.yml\n");
    }

    #[test]
    fn file_nodes_point_at_their_entry() {
        let files = set(&[("a/b.txt", "x")]);
        let root = build(&files).unwrap();
        let a = &root.children["a"];
        assert_eq!(a.name(), "a");
        assert!(a.as_file().is_none());
        let b = &dir(a).children["b.txt"];
        assert_eq!(b.name(), "b.txt");
        assert_eq!(b.as_file().unwrap().path, "a/b.txt");
    }
}
