use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::bootstrap::bootstrap_files;
use crate::types::ProjectFile;

/// Error types for VFS assembly
#[derive(Debug, thiserror::Error)]
pub enum VfsError {
    #[error("Empty file path")]
    EmptyPath,

    #[error("Malformed path '{path}': empty segment")]
    EmptySegment { path: String },

    #[error("Path conflict at '{path}': a file already exists where a directory is needed")]
    FileDirectoryConflict { path: String },

    #[error("Path conflict at '{path}': a directory already exists where a file is needed")]
    DirectoryFileConflict { path: String },
}

/// Result type for VFS operations
pub type VfsResult<T> = Result<T, VfsError>;

/// Node in the nested map-of-maps structure a single sandbox mount call
/// consumes. Built once at mount time; afterwards the mounted filesystem is
/// mutated exclusively through per-file writes, never remounted wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VfsNode {
    File {
        contents: String,
    },
    Directory {
        children: HashMap<String, VfsNode>,
    },
}

impl VfsNode {
    /// Create an empty directory node
    pub fn empty_directory() -> Self {
        VfsNode::Directory {
            children: HashMap::new(),
        }
    }

    pub fn file(contents: impl Into<String>) -> Self {
        VfsNode::File {
            contents: contents.into(),
        }
    }
}

/// Build the mount tree from the project file list plus the fixed bootstrap
/// set.
///
/// Bootstrap files are inserted first so a project file at the same path
/// replaces the stub; on any other duplicate path the later entry wins (map
/// semantics). Malformed paths are rejected here so the lifecycle controller
/// can surface them as a mount failure before touching the engine.
pub fn build_vfs(files: &[ProjectFile]) -> VfsResult<VfsNode> {
    let mut root = VfsNode::empty_directory();

    for file in bootstrap_files().iter().chain(files.iter()) {
        insert_file(&mut root, &file.path, &file.content)?;
    }

    Ok(root)
}

/// Insert a single file into the tree, creating intermediate directories.
pub fn insert_file(root: &mut VfsNode, path: &str, content: &str) -> VfsResult<()> {
    if path.is_empty() {
        return Err(VfsError::EmptyPath);
    }

    let segments: Vec<&str> = path.split('/').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(VfsError::EmptySegment {
            path: path.to_string(),
        });
    }

    let mut current = root;
    let mut walked = String::new();

    for (i, segment) in segments.iter().enumerate() {
        if !walked.is_empty() {
            walked.push('/');
        }
        walked.push_str(segment);

        let children = match current {
            VfsNode::Directory { children } => children,
            VfsNode::File { .. } => {
                return Err(VfsError::FileDirectoryConflict { path: walked })
            }
        };

        let is_leaf = i == segments.len() - 1;
        if is_leaf {
            if let Some(VfsNode::Directory { .. }) = children.get(*segment) {
                return Err(VfsError::DirectoryFileConflict { path: walked });
            }
            children.insert(segment.to_string(), VfsNode::file(content));
            return Ok(());
        }

        current = children
            .entry(segment.to_string())
            .or_insert_with(VfsNode::empty_directory);
        if let VfsNode::File { .. } = current {
            return Err(VfsError::FileDirectoryConflict { path: walked });
        }
    }

    Ok(())
}

/// Flatten a mount tree back into (path, content) pairs, sorted by path.
///
/// Inverse of `build_vfs` modulo the injected bootstrap set; used for the
/// round-trip property and the download export.
pub fn flatten_vfs(root: &VfsNode) -> Vec<ProjectFile> {
    let mut out = Vec::new();
    flatten_into(root, String::new(), &mut out);
    out.sort_by(|a, b| a.path.cmp(&b.path));
    out
}

fn flatten_into(node: &VfsNode, prefix: String, out: &mut Vec<ProjectFile>) {
    match node {
        VfsNode::File { contents } => {
            out.push(ProjectFile::new(prefix, contents.clone()));
        }
        VfsNode::Directory { children } => {
            for (name, child) in children {
                let path = if prefix.is_empty() {
                    name.clone()
                } else {
                    format!("{}/{}", prefix, name)
                };
                flatten_into(child, path, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_round_trip_reproduces_input_plus_bootstrap() {
        let files = vec![
            ProjectFile::new("src/app/page.tsx", "export default function Page() {}"),
            ProjectFile::new("src/app/layout.tsx", "export default function Layout() {}"),
            ProjectFile::new("styles/globals.css", "body {}"),
        ];

        let vfs = build_vfs(&files).unwrap();
        let flattened = flatten_vfs(&vfs);

        let mut expected: Vec<ProjectFile> = bootstrap_files();
        expected.extend(files);
        expected.sort_by(|a, b| a.path.cmp(&b.path));

        assert_eq!(flattened, expected);
    }

    #[test]
    fn test_project_file_replaces_bootstrap_stub() {
        let manifest = ProjectFile::new("package.json", r#"{"name":"custom"}"#);
        let vfs = build_vfs(std::slice::from_ref(&manifest)).unwrap();

        let flattened = flatten_vfs(&vfs);
        let found = flattened
            .iter()
            .find(|f| f.path == "package.json")
            .unwrap();
        assert_eq!(found.content, manifest.content);
    }

    #[test]
    fn test_duplicate_path_last_write_wins() {
        let mut root = VfsNode::empty_directory();
        insert_file(&mut root, "a.txt", "first").unwrap();
        insert_file(&mut root, "a.txt", "second").unwrap();

        let flattened = flatten_vfs(&root);
        assert_eq!(flattened.len(), 1);
        assert_eq!(flattened[0].content, "second");
    }

    #[test]
    fn test_empty_path_rejected() {
        let mut root = VfsNode::empty_directory();
        assert!(matches!(
            insert_file(&mut root, "", "x"),
            Err(VfsError::EmptyPath)
        ));
    }

    #[test]
    fn test_empty_segment_rejected() {
        let mut root = VfsNode::empty_directory();
        assert!(matches!(
            insert_file(&mut root, "src//page.tsx", "x"),
            Err(VfsError::EmptySegment { .. })
        ));
    }

    #[test]
    fn test_file_directory_conflict_rejected() {
        let mut root = VfsNode::empty_directory();
        insert_file(&mut root, "src", "i am a file").unwrap();
        assert!(matches!(
            insert_file(&mut root, "src/page.tsx", "x"),
            Err(VfsError::FileDirectoryConflict { .. })
        ));
    }

    #[test]
    fn test_serializes_to_nested_map_shape() {
        let mut root = VfsNode::empty_directory();
        insert_file(&mut root, "src/index.js", "console.log(1)").unwrap();

        let value = serde_json::to_value(&root).unwrap();
        assert_eq!(
            value["directory"]["children"]["src"]["directory"]["children"]["index.js"]["file"]
                ["contents"],
            "console.log(1)"
        );
    }
}
