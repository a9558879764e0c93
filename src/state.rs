//! Per-render diagram state
//!
//! `DiagramState` is a plain value: every user action produces a new state
//! that the next render pass consumes whole. Nothing here caches layout.

use std::collections::BTreeSet;

use clap::ValueEnum;
use serde::Serialize;

use crate::tree::{NodeId, TreeNode};

/// Depth limit used when nothing else is configured.
pub const DEFAULT_MAX_DEPTH: i64 = 2;

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 5.0;

/// Coordinate assignment strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Levels are rows, root on top
    #[default]
    Tree,
    /// Levels are columns, root on the left
    Horizontal,
    /// Levels are concentric rings around the root
    Radial,
}

/// Zoom and pan of the view. Does not affect layout coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagramState {
    pub expanded: BTreeSet<NodeId>,
    /// Levels below this are not descended into. Values below 1 leave only
    /// the root (and search matches) on screen.
    pub max_depth: i64,
    /// Case-insensitive substring; empty means no search.
    pub search_query: String,
    pub layout_mode: LayoutMode,
    pub viewport: Viewport,
}

impl Default for DiagramState {
    fn default() -> Self {
        Self {
            expanded: BTreeSet::from([NodeId::Root]),
            max_depth: DEFAULT_MAX_DEPTH,
            search_query: String::new(),
            layout_mode: LayoutMode::default(),
            viewport: Viewport::default(),
        }
    }
}

impl DiagramState {
    pub fn is_expanded(&self, id: &NodeId) -> bool {
        self.expanded.contains(id)
    }

    pub fn is_searching(&self) -> bool {
        !self.search_query.is_empty()
    }

    /// State for a freshly loaded tree: only the root is expanded. Search,
    /// depth, mode and viewport carry over.
    pub fn reset_for_new_tree(&self) -> Self {
        Self {
            expanded: BTreeSet::from([NodeId::Root]),
            ..self.clone()
        }
    }

    pub fn toggled(&self, id: NodeId) -> Self {
        let mut expanded = self.expanded.clone();
        if !expanded.remove(&id) {
            expanded.insert(id);
        }
        Self {
            expanded,
            ..self.clone()
        }
    }

    pub fn with_expanded(&self, id: NodeId) -> Self {
        let mut expanded = self.expanded.clone();
        expanded.insert(id);
        Self {
            expanded,
            ..self.clone()
        }
    }

    /// Expand the root and every directory below it.
    pub fn expanded_all(&self, root: &TreeNode) -> Self {
        let mut expanded = self.expanded.clone();
        expanded.insert(NodeId::Root);
        let mut stack: Vec<&TreeNode> = root.children().iter().collect();
        while let Some(node) = stack.pop() {
            if node.is_dir() {
                expanded.insert(NodeId::path(node.path()));
                stack.extend(node.children());
            }
        }
        Self {
            expanded,
            ..self.clone()
        }
    }

    /// Clear every expansion, the root's included.
    pub fn collapsed_all(&self) -> Self {
        Self {
            expanded: BTreeSet::new(),
            ..self.clone()
        }
    }

    pub fn with_search(&self, query: impl Into<String>) -> Self {
        Self {
            search_query: query.into(),
            ..self.clone()
        }
    }

    pub fn with_max_depth(&self, max_depth: i64) -> Self {
        Self {
            max_depth,
            ..self.clone()
        }
    }

    pub fn with_layout_mode(&self, layout_mode: LayoutMode) -> Self {
        Self {
            layout_mode,
            ..self.clone()
        }
    }

    pub fn with_zoom(&self, zoom: f64) -> Self {
        let zoom = if zoom.is_finite() {
            zoom.clamp(MIN_ZOOM, MAX_ZOOM)
        } else {
            self.viewport.zoom
        };
        Self {
            viewport: Viewport {
                zoom,
                ..self.viewport
            },
            ..self.clone()
        }
    }

    pub fn panned_by(&self, dx: f64, dy: f64) -> Self {
        Self {
            viewport: Viewport {
                pan_x: self.viewport.pan_x + dx,
                pan_y: self.viewport.pan_y + dy,
                ..self.viewport
            },
            ..self.clone()
        }
    }

    /// Whether going from `self` to `next` changes what is visible or where
    /// it is placed. Viewport changes never do.
    pub fn needs_relayout(&self, next: &DiagramState) -> bool {
        self.expanded != next.expanded
            || self.max_depth != next.max_depth
            || self.search_query != next.search_query
            || self.layout_mode != next.layout_mode
    }
}
