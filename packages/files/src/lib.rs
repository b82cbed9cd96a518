//! Sitewright Files - Project file tree and virtual filesystem assembly
//!
//! This crate owns the pure, I/O-free half of the build-and-preview pipeline:
//! turning the flat list of generated project files into the hierarchical tree
//! the UI renders, and into the nested mount structure the sandbox engine
//! consumes.

pub mod bootstrap;
pub mod export;
pub mod tree;
pub mod types;
pub mod vfs;

// Re-export key types and functions for easier use
pub use bootstrap::bootstrap_files;
pub use export::export_project;
pub use tree::build_file_tree;
pub use types::{FileTreeNode, FileTreeNodeType, ProjectFile};
pub use vfs::{build_vfs, flatten_vfs, VfsError, VfsNode, VfsResult};

/// Version information for the files crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
