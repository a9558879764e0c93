//! Tree node types shared by the builder, the selector and the layout engine

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of a flat listing entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Dir,
    File,
}

/// One row of a flat, recursive tree listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub path: String,
    pub kind: EntryKind,
    pub size: u64,
    pub mode: String,
}

impl TreeEntry {
    pub fn file(path: impl Into<String>, size: u64) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::File,
            size,
            mode: "100644".to_string(),
        }
    }

    pub fn dir(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Dir,
            size: 0,
            mode: "040000".to_string(),
        }
    }
}

/// A file or directory in the built tree.
///
/// Directory sizes are the sum of every file below them and are fixed at
/// build time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TreeNode {
    File {
        name: String,
        path: String,
        size: u64,
        mode: String,
    },
    Dir {
        name: String,
        path: String,
        size: u64,
        mode: String,
        children: Vec<TreeNode>,
    },
}

impl TreeNode {
    pub fn name(&self) -> &str {
        match self {
            TreeNode::File { name, .. } => name,
            TreeNode::Dir { name, .. } => name,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            TreeNode::File { path, .. } => path,
            TreeNode::Dir { path, .. } => path,
        }
    }

    pub fn size(&self) -> u64 {
        match self {
            TreeNode::File { size, .. } => *size,
            TreeNode::Dir { size, .. } => *size,
        }
    }

    pub fn mode(&self) -> &str {
        match self {
            TreeNode::File { mode, .. } => mode,
            TreeNode::Dir { mode, .. } => mode,
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            TreeNode::File { .. } => EntryKind::File,
            TreeNode::Dir { .. } => EntryKind::Dir,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, TreeNode::Dir { .. })
    }

    /// Children of a directory; empty for files.
    pub fn children(&self) -> &[TreeNode] {
        match self {
            TreeNode::File { .. } => &[],
            TreeNode::Dir { children, .. } => children,
        }
    }

    /// Find a node by its full path. The empty path is the root.
    pub fn find(&self, path: &str) -> Option<&TreeNode> {
        if path.is_empty() {
            return Some(self);
        }
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            for child in node.children() {
                if child.path() == path {
                    return Some(child);
                }
                if child.is_dir() && is_ancestor_path(child.path(), path) {
                    stack.push(child);
                }
            }
        }
        None
    }
}

fn is_ancestor_path(dir: &str, path: &str) -> bool {
    dir.is_empty() || path.strip_prefix(dir).is_some_and(|rest| rest.starts_with('/'))
}

/// Identifier of a node in state maps and layouts.
///
/// The root has its own variant, so a real top-level entry named `root`
/// never aliases it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeId {
    Root,
    Path(String),
}

impl NodeId {
    pub fn path(path: impl Into<String>) -> Self {
        NodeId::Path(path.into())
    }

    /// Identifier for a node at `level`; only level 0 is the root.
    pub fn for_node(node: &TreeNode, level: usize) -> Self {
        if level == 0 {
            NodeId::Root
        } else {
            NodeId::Path(node.path().to_string())
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self, NodeId::Root)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Root => f.write_str("root"),
            NodeId::Path(path) => f.write_str(path),
        }
    }
}

/// The root serializes as `null` and every other node as its path, so an
/// entry named `root` stays distinct in JSON too.
impl Serialize for NodeId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            NodeId::Root => serializer.serialize_none(),
            NodeId::Path(path) => serializer.serialize_str(path),
        }
    }
}
