//! Which nodes take part in a render pass
//!
//! A node is reached when every ancestor is expanded and sits above the
//! depth limit. Without a search, exactly the reached nodes are shown. With
//! a search, every name match anywhere in the tree is shown, plus the
//! expanded skeleton leading to the current view.

use std::collections::HashMap;

use crate::state::DiagramState;
use crate::tree::{NodeId, TreeNode};

#[derive(Debug, Clone, PartialEq)]
pub struct VisibleNode<'a> {
    pub id: NodeId,
    pub node: &'a TreeNode,
    /// Parent in the tree, which may itself be hidden.
    pub parent_id: Option<NodeId>,
    pub level: usize,
    /// Position among the node's siblings in the tree.
    pub sibling_index: usize,
    /// True when the name matched an active search.
    pub matched: bool,
}

/// Visible nodes in tree pre-order, also grouped by level.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VisibleSet<'a> {
    nodes: Vec<VisibleNode<'a>>,
    /// `levels[l]` holds indexes into `nodes`, left to right.
    levels: Vec<Vec<usize>>,
    by_id: HashMap<NodeId, usize>,
}

impl<'a> VisibleSet<'a> {
    fn push(&mut self, node: VisibleNode<'a>) {
        let index = self.nodes.len();
        if self.levels.len() <= node.level {
            self.levels.resize_with(node.level + 1, Vec::new);
        }
        self.levels[node.level].push(index);
        self.by_id.insert(node.id.clone(), index);
        self.nodes.push(node);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in tree pre-order.
    pub fn iter(&self) -> impl Iterator<Item = &VisibleNode<'a>> {
        self.nodes.iter()
    }

    pub fn get(&self, id: &NodeId) -> Option<&VisibleNode<'a>> {
        self.by_id.get(id).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.by_id.contains_key(id)
    }

    /// Non-empty levels in ascending order, each left to right.
    pub fn levels(&self) -> impl Iterator<Item = (usize, Vec<&VisibleNode<'a>>)> {
        self.levels
            .iter()
            .enumerate()
            .filter(|(_, group)| !group.is_empty())
            .map(|(level, group)| (level, group.iter().map(|&i| &self.nodes[i]).collect()))
    }

    /// Deepest level with a visible node.
    pub fn max_level(&self) -> Option<usize> {
        self.levels.iter().rposition(|group| !group.is_empty())
    }
}

struct Frame<'a> {
    node: &'a TreeNode,
    level: usize,
    parent_id: Option<NodeId>,
    sibling_index: usize,
    reached: bool,
}

/// Select the nodes of `root` visible under `state`.
///
/// Pure: the same tree and state always give the same set.
pub fn compute_visible<'a>(root: &'a TreeNode, state: &DiagramState) -> VisibleSet<'a> {
    let query = state.search_query.to_lowercase();
    let searching = !query.is_empty();

    let mut visible = VisibleSet::default();
    let mut stack = vec![Frame {
        node: root,
        level: 0,
        parent_id: None,
        sibling_index: 0,
        reached: true,
    }];

    while let Some(frame) = stack.pop() {
        let id = NodeId::for_node(frame.node, frame.level);
        let within_depth = i64::try_from(frame.level).map_or(false, |l| l < state.max_depth);
        let opens = frame.reached && state.is_expanded(&id) && within_depth;
        let matched = searching && frame.node.name().to_lowercase().contains(&query);

        let shown = if searching {
            matched || opens
        } else {
            frame.reached
        };

        // Searching walks the whole tree; otherwise only open nodes are entered.
        let children = frame.node.children();
        if !children.is_empty() && (opens || searching) {
            for (index, child) in children.iter().enumerate().rev() {
                stack.push(Frame {
                    node: child,
                    level: frame.level + 1,
                    parent_id: Some(id.clone()),
                    sibling_index: index,
                    reached: opens,
                });
            }
        }

        if shown {
            visible.push(VisibleNode {
                id,
                node: frame.node,
                parent_id: frame.parent_id,
                level: frame.level,
                sibling_index: frame.sibling_index,
                matched,
            });
        }
    }

    visible
}
