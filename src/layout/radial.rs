//! Concentric ring placement.

use std::f64::consts::{FRAC_PI_2, TAU};

use super::{LayoutParams, LayoutResult};
use crate::visibility::VisibleSet;

/// One ring per level around the container center. Ring radii are spread
/// evenly between the center and the largest radius that fits the margin.
pub(super) fn place_rings<'a>(
    visible: &VisibleSet<'a>,
    params: &LayoutParams,
    result: &mut LayoutResult<'a>,
) {
    let Some(max_level) = visible.max_level() else {
        return;
    };

    let center_x = params.container_width / 2.0;
    let center_y = params.container_height / 2.0;
    let max_radius =
        (params.container_width.min(params.container_height) / 2.0 - params.margin).max(0.0);

    for (level, ring) in visible.levels() {
        let radius = if max_level == 0 {
            0.0
        } else {
            level as f64 / max_level as f64 * max_radius
        };
        let step = TAU / ring.len() as f64;
        for (i, node) in ring.into_iter().enumerate() {
            let angle = -FRAC_PI_2 + i as f64 * step;
            let x = center_x + radius * angle.cos() - params.node_width / 2.0;
            let y = center_y + radius * angle.sin() - params.node_height / 2.0;
            result.place(node, x, y);
        }
    }
}
