//! Flat listing to hierarchical tree conversion
//!
//! Entries are sorted (directories first, then by path) before insertion so
//! that sibling lists come out in display order. Missing parent directories
//! are created once per distinct prefix, and directory sizes are summed in a
//! single post-order pass at the end.

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::debug;

use super::node::{EntryKind, TreeEntry, TreeNode};

const ROOT: usize = 0;
const DIR_MODE: &str = "040000";

/// Build a tree from a flat listing.
///
/// `root_label` becomes the root's name; the root's path is always empty.
/// Malformed paths are tolerated: empty segments become empty-named
/// directory levels. Duplicate paths collapse into one node whose metadata
/// comes from the last occurrence.
pub fn build_tree(entries: &[TreeEntry], root_label: &str) -> TreeNode {
    let mut sorted: Vec<(usize, &TreeEntry)> = entries.iter().enumerate().collect();
    sorted.sort_by(|(_, a), (_, b)| entry_order(a.kind, &a.path, b.kind, &b.path));

    let mut builder = PathTreeBuilder::new(root_label);
    for (position, entry) in sorted {
        builder.insert(position, entry);
    }
    debug!(
        entries = entries.len(),
        nodes = builder.slots.len(),
        "built tree from listing"
    );
    builder.finish()
}

/// Directories before files, then lexicographic by full path.
fn entry_order(a_kind: EntryKind, a_path: &str, b_kind: EntryKind, b_path: &str) -> Ordering {
    kind_rank(a_kind)
        .cmp(&kind_rank(b_kind))
        .then_with(|| a_path.cmp(b_path))
}

fn kind_rank(kind: EntryKind) -> u8 {
    match kind {
        EntryKind::Dir => 0,
        EntryKind::File => 1,
    }
}

/// Arena slot used while the tree is being assembled.
struct Slot {
    name: String,
    path: String,
    kind: EntryKind,
    size: u64,
    mode: String,
    /// Input position of the entry that last set the metadata; `None` for
    /// inferred directories.
    position: Option<usize>,
    children: Vec<usize>,
}

impl Slot {
    fn dir(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            kind: EntryKind::Dir,
            size: 0,
            mode: DIR_MODE.to_string(),
            position: None,
            children: Vec::new(),
        }
    }
}

struct PathTreeBuilder {
    slots: Vec<Slot>,
    /// Path -> slot, for everything except the root.
    index: HashMap<String, usize>,
}

impl PathTreeBuilder {
    fn new(root_label: &str) -> Self {
        Self {
            slots: vec![Slot::dir(root_label, "")],
            index: HashMap::new(),
        }
    }

    fn insert(&mut self, position: usize, entry: &TreeEntry) {
        if let Some(&existing) = self.index.get(&entry.path) {
            // Insertion runs in sorted order, so only a later input row may
            // replace what is already there.
            let slot = &mut self.slots[existing];
            if slot.position.is_none_or(|seen| seen < position) {
                slot.kind = entry.kind;
                slot.size = entry.size;
                slot.mode = entry.mode.clone();
                slot.position = Some(position);
            }
            return;
        }

        let (parent, name) = match entry.path.rsplit_once('/') {
            Some((dir, name)) => (self.ensure_dir(dir), name),
            None => (ROOT, entry.path.as_str()),
        };

        let id = self.slots.len();
        self.slots.push(Slot {
            name: name.to_string(),
            path: entry.path.clone(),
            kind: entry.kind,
            size: entry.size,
            mode: entry.mode.clone(),
            position: Some(position),
            children: Vec::new(),
        });
        self.slots[parent].children.push(id);
        self.index.insert(entry.path.clone(), id);
    }

    /// Return the slot for `dir_path`, creating every missing level on the way.
    fn ensure_dir(&mut self, dir_path: &str) -> usize {
        if let Some(&id) = self.index.get(dir_path) {
            return id;
        }

        let mut parent = ROOT;
        let mut current = String::with_capacity(dir_path.len());
        for (i, segment) in dir_path.split('/').enumerate() {
            if i > 0 {
                current.push('/');
            }
            current.push_str(segment);

            parent = match self.index.get(&current) {
                Some(&id) => id,
                None => {
                    let id = self.slots.len();
                    self.slots.push(Slot::dir(segment, &current));
                    self.slots[parent].children.push(id);
                    self.index.insert(current.clone(), id);
                    id
                }
            };
        }
        parent
    }

    fn finish(mut self) -> TreeNode {
        self.take_node(ROOT)
    }

    /// Post-order: children are materialized and sorted before the parent's
    /// size is summed from them.
    fn take_node(&mut self, id: usize) -> TreeNode {
        let child_ids = std::mem::take(&mut self.slots[id].children);
        let slot = &mut self.slots[id];
        let name = std::mem::take(&mut slot.name);
        let path = std::mem::take(&mut slot.path);
        let mode = std::mem::take(&mut slot.mode);

        // Anything that received children is a directory, whatever the
        // listing claimed for it.
        if child_ids.is_empty() && slot.kind == EntryKind::File && id != ROOT {
            return TreeNode::File {
                name,
                path,
                size: slot.size,
                mode,
            };
        }

        let mut children: Vec<TreeNode> = child_ids
            .into_iter()
            .map(|child| self.take_node(child))
            .collect();
        children.sort_by(|a, b| entry_order(a.kind(), a.path(), b.kind(), b.path()));
        let size = children.iter().map(TreeNode::size).sum();

        TreeNode::Dir {
            name,
            path,
            size,
            mode,
            children,
        }
    }
}
