use crate::types::{FileTreeNode, ProjectFile};

/// Assemble the flat project file list into the hierarchical tree the UI
/// renders.
///
/// For each file the path is split into segments; intermediate directory
/// nodes are walked or created by exact name match at each level, reusing an
/// existing sibling when present, and the final segment is inserted as a file
/// leaf. Deterministic and idempotent for a fixed input order.
///
/// Duplicate paths in the input are not deduplicated here; both leaves end up
/// in the tree in input order.
pub fn build_file_tree(files: &[ProjectFile]) -> Vec<FileTreeNode> {
    let mut roots: Vec<FileTreeNode> = Vec::new();

    for file in files {
        insert_path(&mut roots, &file.path);
    }

    roots
}

fn insert_path(roots: &mut Vec<FileTreeNode>, path: &str) {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return;
    }

    let mut current = roots;
    let mut walked = String::new();

    for (i, segment) in segments.iter().enumerate() {
        if !walked.is_empty() {
            walked.push('/');
        }
        walked.push_str(segment);

        let is_leaf = i == segments.len() - 1;
        if is_leaf {
            current.push(FileTreeNode::file(*segment, walked.clone()));
            return;
        }

        // Reuse an existing directory sibling with this exact name, otherwise
        // create one.
        let pos = current
            .iter()
            .position(|node| node.is_directory() && node.name == *segment);
        let idx = match pos {
            Some(idx) => idx,
            None => {
                current.push(FileTreeNode::directory(*segment, walked.clone()));
                current.len() - 1
            }
        };

        current = current[idx]
            .children
            .as_mut()
            .expect("directory nodes always own a children list");
    }
}
