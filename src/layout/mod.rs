//! Coordinate assignment for visible nodes
//!
//! Three interchangeable strategies place the visible set:
//!
//! - Tree: one centered row per level, root on top
//! - Horizontal: one centered column per level, root on the left
//! - Radial: one ring per level around the container center
//!
//! Coordinates are the top-left corner of each node's rectangle. A layout is
//! always computed from scratch for the current visible set.

mod bounds;
mod linear;
mod radial;

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

pub use bounds::Bounds;

use crate::state::LayoutMode;
use crate::tree::{NodeId, TreeNode};
use crate::visibility::VisibleSet;

/// Geometry inputs shared by every strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    pub container_width: f64,
    pub container_height: f64,
    pub node_width: f64,
    pub node_height: f64,
    /// Gap between siblings.
    pub h_spacing: f64,
    /// Distance between consecutive rows in the tree layout.
    pub v_spacing: f64,
    /// Offset of the first level from the container edge; also the ring
    /// inset for the radial layout.
    pub margin: f64,
    /// Space added around the nodes when computing bounds.
    pub padding: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            container_width: 1200.0,
            container_height: 800.0,
            node_width: 180.0,
            node_height: 80.0,
            h_spacing: 40.0,
            v_spacing: 120.0,
            margin: 50.0,
            padding: 40.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedNode<'a> {
    pub id: NodeId,
    pub node: &'a TreeNode,
    pub parent_id: Option<NodeId>,
    pub level: usize,
    pub x: f64,
    pub y: f64,
}

/// Straight connector from a parent's anchor to a child's anchor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub parent: NodeId,
    pub child: NodeId,
    pub from: Point,
    pub to: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResult<'a> {
    mode: LayoutMode,
    params: LayoutParams,
    nodes: Vec<PlacedNode<'a>>,
    by_id: HashMap<NodeId, usize>,
}

impl<'a> LayoutResult<'a> {
    fn new(mode: LayoutMode, params: LayoutParams) -> Self {
        Self {
            mode,
            params,
            nodes: Vec::new(),
            by_id: HashMap::new(),
        }
    }

    fn place(&mut self, visible: &crate::visibility::VisibleNode<'a>, x: f64, y: f64) {
        self.by_id.insert(visible.id.clone(), self.nodes.len());
        self.nodes.push(PlacedNode {
            id: visible.id.clone(),
            node: visible.node,
            parent_id: visible.parent_id.clone(),
            level: visible.level,
            x,
            y,
        });
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn params(&self) -> &LayoutParams {
        &self.params
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Placed nodes, level by level, left to right within a level.
    pub fn iter(&self) -> impl Iterator<Item = &PlacedNode<'a>> {
        self.nodes.iter()
    }

    pub fn get(&self, id: &NodeId) -> Option<&PlacedNode<'a>> {
        self.by_id.get(id).map(|&i| &self.nodes[i])
    }

    /// Point where edges from this node's children end.
    pub fn parent_anchor(&self, node: &PlacedNode<'_>) -> Point {
        let (w, h) = (self.params.node_width, self.params.node_height);
        match self.mode {
            LayoutMode::Tree => Point {
                x: node.x + w / 2.0,
                y: node.y + h,
            },
            LayoutMode::Horizontal => Point {
                x: node.x + w,
                y: node.y + h / 2.0,
            },
            LayoutMode::Radial => center_of(node, w, h),
        }
    }

    /// Point where the edge to this node's parent starts.
    pub fn child_anchor(&self, node: &PlacedNode<'_>) -> Point {
        let (w, h) = (self.params.node_width, self.params.node_height);
        match self.mode {
            LayoutMode::Tree => Point {
                x: node.x + w / 2.0,
                y: node.y,
            },
            LayoutMode::Horizontal => Point {
                x: node.x,
                y: node.y + h / 2.0,
            },
            LayoutMode::Radial => center_of(node, w, h),
        }
    }

    /// Connectors for every node whose parent is also placed.
    pub fn edges(&self) -> Vec<Edge> {
        self.nodes
            .iter()
            .filter_map(|child| {
                let parent = self.get(child.parent_id.as_ref()?)?;
                Some(Edge {
                    parent: parent.id.clone(),
                    child: child.id.clone(),
                    from: self.parent_anchor(parent),
                    to: self.child_anchor(child),
                })
            })
            .collect()
    }

    /// Box around every node rectangle plus padding, computed from the
    /// current placement on each call. `None` when nothing is placed.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::enclosing(
            self.nodes.iter().map(|n| (n.x, n.y)),
            self.params.node_width,
            self.params.node_height,
            self.params.padding,
        )
    }
}

fn center_of(node: &PlacedNode<'_>, width: f64, height: f64) -> Point {
    Point {
        x: node.x + width / 2.0,
        y: node.y + height / 2.0,
    }
}

/// Place every node of `visible` using `mode`.
pub fn compute_layout<'a>(
    visible: &VisibleSet<'a>,
    mode: LayoutMode,
    params: &LayoutParams,
) -> LayoutResult<'a> {
    let mut result = LayoutResult::new(mode, *params);
    match mode {
        LayoutMode::Tree => linear::place_rows(visible, params, &mut result),
        LayoutMode::Horizontal => linear::place_columns(visible, params, &mut result),
        LayoutMode::Radial => radial::place_rings(visible, params, &mut result),
    }
    debug!(?mode, nodes = result.len(), "computed layout");
    result
}
