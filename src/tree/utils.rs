//! Shared helpers for describing tree nodes

use super::node::TreeNode;

/// Number of accent colors cycled through by directory depth.
pub const ACCENT_COUNT: usize = 5;

/// Format a size in bytes to human-readable format.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Count the files under a node. A file counts as one.
pub fn count_files(node: &TreeNode) -> usize {
    let mut count = 0;
    let mut stack = vec![node];
    while let Some(node) = stack.pop() {
        match node {
            TreeNode::File { .. } => count += 1,
            TreeNode::Dir { children, .. } => stack.extend(children.iter()),
        }
    }
    count
}

/// Accent slot for a directory at `level`. The root has its own accent
/// (`None`); deeper directories cycle through `ACCENT_COUNT` slots.
pub fn accent_index(level: usize) -> Option<usize> {
    if level == 0 {
        None
    } else {
        Some((level - 1) % ACCENT_COUNT)
    }
}
