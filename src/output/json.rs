//! JSON output formatting

use std::io;

use serde::Serialize;

use crate::layout::{Bounds, Edge};
use crate::session::Render;
use crate::state::DiagramState;
use crate::tree::{EntryKind, NodeId};

/// Everything needed to redraw one render pass elsewhere.
#[derive(Debug, Serialize)]
pub struct DiagramSnapshot<'a> {
    pub repo: String,
    pub branch: String,
    pub state: &'a DiagramState,
    pub nodes: Vec<NodeSnapshot<'a>>,
    pub edges: Vec<Edge>,
    pub bounds: Option<Bounds>,
}

#[derive(Debug, Serialize)]
pub struct NodeSnapshot<'a> {
    pub id: &'a NodeId,
    pub name: &'a str,
    pub path: &'a str,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub size: u64,
    pub mode: &'a str,
    pub level: usize,
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub matched: bool,
}

impl<'a> DiagramSnapshot<'a> {
    /// Snapshot of `render`, nodes in layout order.
    pub fn new(
        repo: impl Into<String>,
        branch: impl Into<String>,
        state: &'a DiagramState,
        render: &'a Render<'a>,
    ) -> Self {
        let nodes = render
            .layout
            .iter()
            .map(|placed| NodeSnapshot {
                id: &placed.id,
                name: placed.node.name(),
                path: placed.node.path(),
                kind: placed.node.kind(),
                size: placed.node.size(),
                mode: placed.node.mode(),
                level: placed.level,
                x: placed.x,
                y: placed.y,
                matched: render.visible.get(&placed.id).is_some_and(|v| v.matched),
            })
            .collect();

        Self {
            repo: repo.into(),
            branch: branch.into(),
            state,
            nodes,
            edges: render.layout.edges(),
            bounds: render.layout.bounds(),
        }
    }
}

/// Print any serializable value as pretty-printed JSON to stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutParams;
    use crate::repo_ref::RepoRef;
    use crate::session::DiagramSession;
    use crate::tree::{TreeEntry, build_tree};
    use serde_json::Value;
    use std::sync::Arc;

    fn session() -> DiagramSession {
        let mut session = DiagramSession::new();
        let ticket = session.begin_load(RepoRef::new("o", "r"), "main").unwrap();
        let tree = build_tree(
            &[TreeEntry::file("src/lib.rs", 10), TreeEntry::file("a.txt", 5)],
            "r",
        );
        session.finish_load(ticket, Ok(Arc::new(tree))).unwrap();
        session
    }

    #[test]
    fn test_snapshot_shape() {
        let session = session();
        let render = session.render(&LayoutParams::default()).unwrap();
        let snapshot = DiagramSnapshot::new("o/r", "main", session.state(), &render);
        let value: Value = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(value["repo"], "o/r");
        assert_eq!(value["branch"], "main");
        assert_eq!(value["state"]["max_depth"], 2);
        assert_eq!(value["state"]["layout_mode"], "tree");
        assert_eq!(value["state"]["expanded"], serde_json::json!([null]));

        let nodes = value["nodes"].as_array().unwrap();
        assert_eq!(nodes.len(), 3);
        assert!(nodes[0]["id"].is_null());
        assert_eq!(nodes[0]["type"], "dir");
        assert_eq!(nodes[0]["size"], 15);
        assert_eq!(nodes[1]["id"], "src");
        assert_eq!(nodes[2]["id"], "a.txt");
        assert_eq!(nodes[2]["type"], "file");
        assert_eq!(nodes[2]["mode"], "100644");
        assert_eq!(nodes[1]["mode"], "040000");
        assert!(nodes[2].get("matched").is_none());

        assert_eq!(value["edges"].as_array().unwrap().len(), 2);
        assert!(value["bounds"]["width"].as_f64().unwrap() > 0.0);
    }

    #[test]
    fn test_snapshot_marks_matches() {
        let mut session = session();
        session.apply(|s| s.with_search("lib"));
        let render = session.render(&LayoutParams::default()).unwrap();
        let snapshot = DiagramSnapshot::new("o/r", "main", session.state(), &render);
        let matched: Vec<_> = snapshot
            .nodes
            .iter()
            .filter(|n| n.matched)
            .map(|n| n.path)
            .collect();
        assert_eq!(matched, vec!["src/lib.rs"]);
    }
}
