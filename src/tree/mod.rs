//! Repository tree model
//!
//! This module turns a flat, recursive listing into a rooted tree:
//!
//! - `build_tree`: infers intermediate directories, sums directory sizes and
//!   orders siblings (directories first, then by path)
//! - `EntryFilter`: drops entries matching ignore patterns before building

mod builder;
mod filter;
mod node;
mod utils;

pub use builder::build_tree;
pub use filter::EntryFilter;
pub use node::{EntryKind, NodeId, TreeEntry, TreeNode};
pub use utils::{ACCENT_COUNT, accent_index, count_files, format_size};
