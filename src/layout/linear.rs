//! Row and column placement.

use super::{LayoutParams, LayoutResult};
use crate::visibility::VisibleSet;

/// Offsets of `count` items of size `extent`, `gap` apart, centered in
/// `container`. The first offset goes negative when the row overflows.
fn centered_offsets(count: usize, extent: f64, gap: f64, container: f64) -> impl Iterator<Item = f64> {
    let pitch = extent + gap;
    let span = count as f64 * pitch - gap;
    let start = (container - span) / 2.0;
    (0..count).map(move |i| start + i as f64 * pitch)
}

/// One row per level, root on top.
pub(super) fn place_rows<'a>(
    visible: &VisibleSet<'a>,
    params: &LayoutParams,
    result: &mut LayoutResult<'a>,
) {
    for (level, row) in visible.levels() {
        let y = level as f64 * params.v_spacing + params.margin;
        let xs = centered_offsets(
            row.len(),
            params.node_width,
            params.h_spacing,
            params.container_width,
        );
        for (node, x) in row.into_iter().zip(xs) {
            result.place(node, x, y);
        }
    }
}

/// One column per level, root on the left.
pub(super) fn place_columns<'a>(
    visible: &VisibleSet<'a>,
    params: &LayoutParams,
    result: &mut LayoutResult<'a>,
) {
    for (level, column) in visible.levels() {
        let x = level as f64 * (params.node_width + params.h_spacing) + params.margin;
        let ys = centered_offsets(
            column.len(),
            params.node_height,
            params.h_spacing,
            params.container_height,
        );
        for (node, y) in column.into_iter().zip(ys) {
            result.place(node, x, y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::compute_layout;
    use super::*;
    use crate::state::{DiagramState, LayoutMode};
    use crate::tree::{NodeId, TreeEntry, TreeNode, build_tree};
    use crate::visibility::compute_visible;

    fn three_children() -> TreeNode {
        build_tree(
            &[
                TreeEntry::file("a.txt", 1),
                TreeEntry::file("b.txt", 1),
                TreeEntry::file("c.txt", 1),
            ],
            "repo",
        )
    }

    fn narrow() -> LayoutParams {
        LayoutParams {
            container_width: 1000.0,
            ..LayoutParams::default()
        }
    }

    #[test]
    fn test_tree_row_of_three() {
        let tree = three_children();
        let visible = compute_visible(&tree, &DiagramState::default());
        // Row width 3 * 220 - 40 = 620, start (1000 - 620) / 2 = 190.
        let layout = compute_layout(&visible, LayoutMode::Tree, &narrow());

        let root = layout.get(&NodeId::Root).unwrap();
        assert_eq!((root.x, root.y), (410.0, 50.0));

        for (i, name) in ["a.txt", "b.txt", "c.txt"].iter().enumerate() {
            let node = layout.get(&NodeId::path(*name)).unwrap();
            assert_eq!(node.x, 190.0 + i as f64 * 220.0);
            assert_eq!(node.y, 170.0);
        }
    }

    #[test]
    fn test_tree_rows_do_not_overlap() {
        let entries: Vec<_> = (0..12)
            .map(|i| TreeEntry::file(format!("f{i:02}.txt"), 1))
            .collect();
        let tree = build_tree(&entries, "repo");
        let params = LayoutParams::default();
        let visible = compute_visible(&tree, &DiagramState::default());
        let layout = compute_layout(&visible, LayoutMode::Tree, &params);

        let mut xs: Vec<f64> = layout.iter().filter(|n| n.level == 1).map(|n| n.x).collect();
        xs.sort_by(f64::total_cmp);
        for pair in xs.windows(2) {
            assert!(pair[1] - pair[0] >= params.node_width + params.h_spacing);
        }
        // A row wider than the container starts left of it.
        assert!(xs[0] < 0.0);
    }

    #[test]
    fn test_horizontal_columns() {
        let tree = three_children();
        let params = LayoutParams::default();
        let visible = compute_visible(&tree, &DiagramState::default());
        let layout = compute_layout(&visible, LayoutMode::Horizontal, &params);

        let root = layout.get(&NodeId::Root).unwrap();
        assert_eq!((root.x, root.y), (50.0, 360.0));

        // Column of three: span 3*120 - 40 = 320, start (800 - 320) / 2 = 240.
        let ys: Vec<f64> = ["a.txt", "b.txt", "c.txt"]
            .iter()
            .map(|name| layout.get(&NodeId::path(*name)).unwrap().y)
            .collect();
        assert_eq!(ys, vec![240.0, 360.0, 480.0]);
        for name in ["a.txt", "b.txt", "c.txt"] {
            assert_eq!(layout.get(&NodeId::path(name)).unwrap().x, 270.0);
        }
    }

    #[test]
    fn test_tree_bounds_cover_all_nodes() {
        let tree = three_children();
        let params = narrow();
        let visible = compute_visible(&tree, &DiagramState::default());
        let layout = compute_layout(&visible, LayoutMode::Tree, &params);
        let bounds = layout.bounds().unwrap();

        assert_eq!(bounds.x, 190.0 - 40.0);
        assert_eq!(bounds.y, 50.0 - 40.0);
        assert_eq!(bounds.right(), 190.0 + 2.0 * 220.0 + 180.0 + 40.0);
        assert_eq!(bounds.bottom(), 170.0 + 80.0 + 40.0);
        for node in layout.iter() {
            assert!(node.x >= bounds.x && node.x + params.node_width <= bounds.right());
            assert!(node.y >= bounds.y && node.y + params.node_height <= bounds.bottom());
        }
    }
}
