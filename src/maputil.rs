//! Map utility primitives: side tests, line openings, blockmap-driven
//! path traversal and intercept collection.

use alloc::vec::Vec;

use crate::arena::Idx;
use crate::fixed::Fixed;
use crate::map::{BspNode, Level, Linedef, Sector, SlopeType};

/// `P_PointOnLineSide` — 0 = front, 1 = back.
pub fn point_on_line_side(x: Fixed, y: Fixed, line: &Linedef, v1: (Fixed, Fixed)) -> i32 {
    let (x1, y1) = v1;
    if line.dx.0 == 0 {
        return if x.0 <= x1.0 { (line.dy.0 > 0) as i32 } else { (line.dy.0 < 0) as i32 };
    }
    if line.dy.0 == 0 {
        return if y.0 <= y1.0 { (line.dx.0 < 0) as i32 } else { (line.dx.0 > 0) as i32 };
    }
    let dx = x - x1;
    let dy = y - y1;
    let left = line.dy.mul(dx);
    let right = dy.mul(line.dx);
    (right.0 >= left.0) as i32
}

/// `P_BoxOnLineSide` — returns `-1` if the box straddles the line (both
/// corners land on different sides), else 0 or 1 for "entirely in front"
/// / "entirely behind".
pub fn box_on_line_side(bbox: [Fixed; 4], line: &Linedef, v1: (Fixed, Fixed)) -> i32 {
    let (bottom, top, left, right) = (bbox[2], bbox[3], bbox[0], bbox[1]);
    let (p1, p2) = match line.slope_type {
        SlopeType::Horizontal => {
            let s = if line.dy.0 > 0 { (0, 1) } else { (1, 0) };
            ((if s.0 == 0 { left } else { right }, bottom), (if s.1 == 0 { left } else { right }, top))
        }
        SlopeType::Vertical => {
            let s = if line.dx.0 > 0 { (0, 1) } else { (1, 0) };
            ((left, if s.0 == 0 { bottom } else { top }), (right, if s.1 == 0 { bottom } else { top }))
        }
        SlopeType::Positive => ((left, top), (right, bottom)),
        SlopeType::Negative => ((left, bottom), (right, top)),
    };
    let side1 = point_on_line_side(p1.0, p1.1, line, v1);
    let side2 = point_on_line_side(p2.0, p2.1, line, v1);
    if side1 == side2 { side1 } else { -1 }
}

/// The vertical gap a moving thing sees when crossing a two-sided line:
/// `floor = max(front.floor, back.floor)`, `ceiling = min(front.ceiling,
/// back.ceiling)`, plus the lowest floor of the two sides for step-down
/// detection (`lowfloor` in the original).
#[derive(Debug, Clone, Copy)]
pub struct LineOpening {
    pub open_top: Fixed,
    pub open_bottom: Fixed,
    pub low_floor: Fixed,
    pub range: Fixed,
}

pub fn line_opening(level: &Level, line: &Linedef) -> Option<LineOpening> {
    let back_side = line.side_back?;
    let front_sector = &level.sectors[level.sidedefs[line.side_front].sector];
    let back_sector = &level.sectors[level.sidedefs[back_side].sector];

    let open_top = front_sector.ceiling_height().min(back_sector.ceiling_height());
    let open_bottom = front_sector.floor_height().max(back_sector.floor_height());
    let low_floor = front_sector.floor_height().min(back_sector.floor_height());
    Some(LineOpening { open_top, open_bottom, low_floor, range: open_top - open_bottom })
}

/// `R_PointOnSide` against a node's partition line, duplicated from
/// `renderer::bsp` rather than exposed from there since the renderer's
/// copy is private to its own walk and this is the only other caller.
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

/// `R_PointInSubsector` narrowed to the sector it belongs to: descends the
/// BSP from the root, picking the side `(x, y)` falls on at each node,
/// until a leaf (subsector) is reached. Levels with no BSP built (the
/// synthetic single-sector fixtures most unit tests use) fall back to
/// subsector 0's sector.
pub fn sector_at(level: &Level, x: Fixed, y: Fixed) -> Option<Idx<Sector>> {
    if level.nodes.is_empty() {
        return level.subsectors.get(Idx::new(0)).map(|ss| ss.sector);
    }
    let mut node_index = (level.nodes.len() - 1) as u16;
    loop {
        let node = &level.nodes[Idx::new(node_index)];
        let side = point_on_node_side(node, x, y) as usize;
        let child = node.children[side];
        if child.is_subsector {
            return level.subsectors.get(Idx::new(child.index)).map(|ss| ss.sector);
        }
        node_index = child.index;
    }
}

#[derive(Debug, Clone, Copy)]
pub enum InterceptKind {
    Line(Idx<Linedef>),
    Mobj(u32),
}

#[derive(Debug, Clone, Copy)]
pub struct Intercept {
    pub frac: Fixed,
    pub kind: InterceptKind,
}

/// `P_PathTraverse`'s line-collection half: walks every blockmap cell the
/// segment from `(x1,y1)` to `(x2,y2)` passes through (Bresenham-style
/// stepping on block-sized cells) and gathers every linedef referenced by
/// those cells into `intercepts`, each tagged with how far along the path
/// it crosses. Thing collection is the caller's job (it needs a live
/// mobj arena, which this pure geometry module doesn't have).
pub fn collect_line_intercepts(level: &Level, x1: Fixed, y1: Fixed, x2: Fixed, y2: Fixed) -> Vec<Intercept> {
    let mut out = Vec::new();
    let bm = &level.blockmap;
    let block_size = Fixed::from_int(128);

    let start_col = ((x1 - bm.origin_x).to_int()) >> 7;
    let start_row = ((y1 - bm.origin_y).to_int()) >> 7;
    let end_col = ((x2 - bm.origin_x).to_int()) >> 7;
    let end_row = ((y2 - bm.origin_y).to_int()) >> 7;

    let col_step = (end_col - start_col).signum().max(-1).min(1);
    let row_step = (end_row - start_row).signum().max(-1).min(1);

    let steps = (end_col - start_col).unsigned_abs().max((end_row - start_row).unsigned_abs()) + 1;
    let dx = x2 - x1;
    let dy = y2 - y1;

    let mut seen_lines = Vec::new();
    let mut col = start_col;
    let mut row = start_row;
    for _ in 0..=steps {
        if col >= 0 && row >= 0 && (col as u16) < bm.columns && (row as u16) < bm.rows {
            let block = row as usize * bm.columns as usize + col as usize;
            for &line_num in bm.lines_in_block(block) {
                if seen_lines.contains(&line_num) {
                    continue;
                }
                seen_lines.push(line_num);
                let line_idx: Idx<Linedef> = Idx::new(line_num);
                if let Some(line) = level.linedefs.get(line_idx) {
                    if let Some(frac) = intercept_fraction(level, line, x1, y1, dx, dy) {
                        out.push(Intercept { frac, kind: InterceptKind::Line(line_idx) });
                    }
                }
            }
        }
        if col == end_col && row == end_row {
            break;
        }
        col += col_step;
        row += row_step;
    }
    let _ = block_size;

    out.sort_by(|a, b| a.frac.0.cmp(&b.frac.0));
    out
}

fn intercept_fraction(level: &Level, line: &Linedef, x1: Fixed, y1: Fixed, dx: Fixed, dy: Fixed) -> Option<Fixed> {
    let lv1 = level.vertices[line.v1];
    let (lx1, ly1) = (lv1.x, lv1.y);
    let (ldx, ldy) = (line.dx, line.dy);

    let denom = dy.mul(ldx) - dx.mul(ldy);
    if denom.0 == 0 {
        return None;
    }
    let num = (lx1 - x1).mul(dy) - (ly1 - y1).mul(dx);
    let frac = num.div(denom);
    if frac.0 < 0 || frac.0 > Fixed::ONE.0 {
        return None;
    }
    Some(frac)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::Angle;
    use crate::map::{LineFlags, Sector, SectorConst, SectorMut, Sidedef, Vertex};
    use crate::arena::Arena;

    fn make_line(dx: Fixed, dy: Fixed) -> (Linedef, (Fixed, Fixed)) {
        let slope_type = if dx.0 == 0 {
            SlopeType::Vertical
        } else if dy.0 == 0 {
            SlopeType::Horizontal
        } else if (dx.0 > 0) == (dy.0 > 0) {
            SlopeType::Positive
        } else {
            SlopeType::Negative
        };
        (
            Linedef {
                v1: Idx::new(0),
                v2: Idx::new(1),
                flags: LineFlags::empty(),
                special: 0,
                tag: 0,
                side_front: Idx::new(0),
                side_back: None,
                dx,
                dy,
                bbox: [Fixed::ZERO, dx, Fixed::ZERO, dy],
                slope_type,
            },
            (Fixed::ZERO, Fixed::ZERO),
        )
    }

    #[test]
    fn point_on_line_side_horizontal() {
        let (line, v1) = make_line(Fixed::from_int(64), Fixed::ZERO);
        let front = point_on_line_side(Fixed::from_int(10), Fixed::from_int(-5), &line, v1);
        let back = point_on_line_side(Fixed::from_int(10), Fixed::from_int(5), &line, v1);
        assert_ne!(front, back);
    }

    #[test]
    fn box_straddling_line_is_minus_one() {
        let (line, v1) = make_line(Fixed::from_int(64), Fixed::ZERO);
        let bbox = [Fixed::from_int(-10), Fixed::from_int(10), Fixed::from_int(-10), Fixed::from_int(10)];
        assert_eq!(box_on_line_side(bbox, &line, v1), -1);
    }

    fn simple_level_with_two_sectors() -> Level {
        let mut vertices: Arena<Vertex> = Arena::new();
        vertices.push(Vertex { x: Fixed::ZERO, y: Fixed::ZERO });
        vertices.push(Vertex { x: Fixed::from_int(64), y: Fixed::ZERO });

        let mut sectors: Arena<Sector> = Arena::new();
        let front = sectors.push(Sector {
            konst: SectorConst { floor_pic: 0, ceiling_pic: 0, tag: 0, special: 0 },
            mutable: SectorMut { floor_height: Fixed::ZERO, ceiling_height: Fixed::from_int(128), light_level: 200, active_mover: None },
        });
        let back = sectors.push(Sector {
            konst: SectorConst { floor_pic: 0, ceiling_pic: 0, tag: 0, special: 0 },
            mutable: SectorMut { floor_height: Fixed::from_int(16), ceiling_height: Fixed::from_int(120), light_level: 200, active_mover: None },
        });

        let mut sidedefs: Arena<Sidedef> = Arena::new();
        let side_front = sidedefs.push(Sidedef { tex_offset_x: Fixed::ZERO, tex_offset_y: Fixed::ZERO, top_texture: 0, bottom_texture: 0, mid_texture: 0, sector: front });
        let side_back = sidedefs.push(Sidedef { tex_offset_x: Fixed::ZERO, tex_offset_y: Fixed::ZERO, top_texture: 0, bottom_texture: 0, mid_texture: 0, sector: back });

        let mut linedefs: Arena<Linedef> = Arena::new();
        linedefs.push(Linedef {
            v1: Idx::new(0),
            v2: Idx::new(1),
            flags: LineFlags::TWO_SIDED,
            special: 0,
            tag: 0,
            side_front,
            side_back: Some(side_back),
            dx: Fixed::from_int(64),
            dy: Fixed::ZERO,
            bbox: [Fixed::ZERO, Fixed::from_int(64), Fixed::ZERO, Fixed::ZERO],
            slope_type: SlopeType::Horizontal,
        });

        Level {
            name: "TEST".into(),
            vertices,
            sectors,
            sidedefs,
            linedefs,
            segs: Arena::new(),
            subsectors: Arena::new(),
            nodes: Arena::new(),
            blockmap: crate::map::Blockmap {
                origin_x: Fixed::ZERO,
                origin_y: Fixed::ZERO,
                columns: 1,
                rows: 1,
                block_offsets: alloc::vec![0],
                blocklist: alloc::vec![0, 0xFFFF],
            },
            reject: crate::map::Reject::new(alloc::vec![0], 2),
            things: Vec::new(),
        }
    }

    #[test]
    fn line_opening_takes_max_floor_min_ceiling() {
        let level = simple_level_with_two_sectors();
        let line = &level.linedefs[Idx::new(0)];
        let opening = line_opening(&level, line).unwrap();
        assert_eq!(opening.open_bottom.to_int(), 16);
        assert_eq!(opening.open_top.to_int(), 120);
        assert_eq!(opening.low_floor.to_int(), 0);
    }

    #[test]
    fn one_sided_line_has_no_opening() {
        let mut level = simple_level_with_two_sectors();
        level.linedefs[Idx::new(0)].side_back = None;
        let line = &level.linedefs[Idx::new(0)];
        assert!(line_opening(&level, line).is_none());
    }

    #[test]
    fn collect_intercepts_finds_crossing_line() {
        let level = simple_level_with_two_sectors();
        let hits = collect_line_intercepts(
            &level,
            Fixed::from_int(32),
            Fixed::from_int(-32),
            Fixed::from_int(32),
            Fixed::from_int(32),
        );
        assert!(!hits.is_empty());
    }

    #[test]
    fn angle_unused_import_guard() {
        let _ = Angle::ANG0;
    }

    fn two_leaf_level() -> Level {
        use crate::map::{BspNode, NodeChild, Subsector};
        let mut nodes: Arena<BspNode> = Arena::new();
        nodes.push(BspNode {
            x: Fixed::ZERO,
            y: Fixed::ZERO,
            dx: Fixed::from_int(64),
            dy: Fixed::ZERO,
            bbox: [[Fixed::from_int(-64), Fixed::ZERO, Fixed::from_int(-64), Fixed::from_int(64)], [Fixed::ZERO, Fixed::from_int(64), Fixed::from_int(-64), Fixed::from_int(64)]],
            children: [NodeChild { is_subsector: true, index: 0 }, NodeChild { is_subsector: true, index: 1 }],
        });
        let mut subsectors: Arena<Subsector> = Arena::new();
        subsectors.push(Subsector { sector: Idx::new(0), first_seg: 0, num_segs: 0 });
        subsectors.push(Subsector { sector: Idx::new(1), first_seg: 0, num_segs: 0 });

        let mut sectors: Arena<Sector> = Arena::new();
        for _ in 0..2 {
            sectors.push(Sector {
                konst: crate::map::SectorConst { floor_pic: 0, ceiling_pic: 0, tag: 0, special: 0 },
                mutable: crate::map::SectorMut { floor_height: Fixed::ZERO, ceiling_height: Fixed::from_int(128), light_level: 200, active_mover: None },
            });
        }

        Level {
            name: "BSPU".into(),
            vertices: Arena::new(),
            sectors,
            sidedefs: Arena::new(),
            linedefs: Arena::new(),
            segs: Arena::new(),
            subsectors,
            nodes,
            blockmap: crate::map::Blockmap { origin_x: Fixed::ZERO, origin_y: Fixed::ZERO, columns: 1, rows: 1, block_offsets: alloc::vec![0], blocklist: alloc::vec![0xFFFF] },
            reject: crate::map::Reject::new(alloc::vec![0], 2),
            things: Vec::new(),
        }
    }

    #[test]
    fn sector_at_descends_to_correct_leaf() {
        let level = two_leaf_level();
        assert_eq!(sector_at(&level, Fixed::from_int(-32), Fixed::ZERO), Some(Idx::new(0)));
        assert_eq!(sector_at(&level, Fixed::from_int(32), Fixed::ZERO), Some(Idx::new(1)));
    }

    #[test]
    fn sector_at_falls_back_to_subsector_zero_with_no_nodes() {
        let level = simple_level_with_two_sectors();
        assert_eq!(sector_at(&level, Fixed::ZERO, Fixed::ZERO), None);
    }
}
