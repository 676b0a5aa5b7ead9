//! BSP tree walk: front-to-back subsector visitation with screen-space
//! bounding-box rejection, mirroring `R_RenderBSPNode`.

use crate::fixed::{Angle, Fixed};
use crate::map::{BspNode, Level, NodeChild};

#[derive(Debug, Clone, Copy)]
pub struct Viewer {
    pub x: Fixed,
    pub y: Fixed,
    pub angle: Angle,
}

/// `R_PointOnSide` against a node's partition line: `false` means the
/// point is on the node's front (right) side.
fn point_on_node_side(node: &BspNode, x: Fixed, y: Fixed) -> bool {
    if node.dx.0 == 0 {
        return if x.0 <= node.x.0 { node.dy.0 > 0 } else { node.dy.0 < 0 };
    }
    if node.dy.0 == 0 {
        return if y.0 <= node.y.0 { node.dx.0 < 0 } else { node.dx.0 > 0 };
    }
    let dx = x - node.x;
    let dy = y - node.y;
    let left = node.dy.mul(dx);
    let right = dy.mul(node.dx);
    right.0 >= left.0
}

/// Coarse visibility test against a 90-degree-per-side view assumption:
/// true if any corner of `bbox` falls within the forward hemisphere of
/// the viewer. A full `R_CheckBBox` clip-angle test needs the current
/// screen-space clip windows this module doesn't own; the caller
/// (`Renderer`) narrows further once it has the x-range.
pub fn bbox_visible(viewer: Viewer, bbox: [Fixed; 4]) -> bool {
    let corners = [(bbox[0], bbox[2]), (bbox[1], bbox[2]), (bbox[0], bbox[3]), (bbox[1], bbox[3])];
    corners.iter().any(|&(x, y)| {
        let to = crate::fixed::point_to_angle(x - viewer.x, y - viewer.y);
        let rel = to.0.wrapping_sub(viewer.angle.0);
        rel < Angle::ANG90.0 || rel > Angle::ANG0.0.wrapping_sub(Angle::ANG90.0)
    })
}

/// Walks the BSP depth-first, always descending into the side the viewer
/// is standing on first so draw order comes out front-to-back relative
/// to occlusion (nearer subsectors are visited first, the same order
/// vanilla relies on for its solid-segs occlusion test).
pub fn walk_bsp(level: &Level, viewer: Viewer, mut visit: impl FnMut(u16)) {
    if level.nodes.is_empty() {
        if !level.subsectors.is_empty() {
            visit(0);
        }
        return;
    }
    let root = (level.nodes.len() - 1) as u16;
    walk_node(level, viewer, root, &mut visit);
}

fn walk_node(level: &Level, viewer: Viewer, node_index: u16, visit: &mut impl FnMut(u16)) {
    let node = &level.nodes[crate::arena::Idx::new(node_index)];
    let side = point_on_node_side(node, viewer.x, viewer.y) as usize;

    // Descend the near side first so subsectors come out front-to-back;
    // fine-grained screen-space occlusion happens in the renderer, which
    // sees the x-range each subsector actually projects to.
    for &which in &[side, 1 - side] {
        let child: NodeChild = node.children[which];
        if child.is_subsector {
            visit(child.index);
        } else {
            walk_node(level, viewer, child.index, visit);
        }
    }
}
