use serde::{Deserialize, Serialize};

/// A single generated project file: a unique posix-style relative path plus
/// its full text content. This is the unit the AI generation service emits
/// and the unit every other component consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFile {
    pub path: String,
    pub content: String,
}

impl ProjectFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Kind of a node in the UI file tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileTreeNodeType {
    File,
    Directory,
}

impl FileTreeNodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileTreeNodeType::File => "file",
            FileTreeNodeType::Directory => "directory",
        }
    }
}

/// Node in the hierarchical tree the UI renders.
///
/// Directory nodes always own a (possibly empty) children list; file nodes
/// never do. The tree is rebuilt fresh from the ProjectFile list on every
/// change, which is cheap at the tens-of-files scale these projects have.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTreeNode {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub node_type: FileTreeNodeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FileTreeNode>>,
}

impl FileTreeNode {
    /// Create a file leaf node
    pub fn file(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            node_type: FileTreeNodeType::File,
            children: None,
        }
    }

    /// Create an empty directory node
    pub fn directory(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            node_type: FileTreeNodeType::Directory,
            children: Some(Vec::new()),
        }
    }

    pub fn is_directory(&self) -> bool {
        self.node_type == FileTreeNodeType::Directory
    }
}
