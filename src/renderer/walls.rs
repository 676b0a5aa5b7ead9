//! Wall column projection and rasterization (`R_StoreWallRange` /
//! `R_DrawColumn`'s shape). Columns are filled as solid colors derived
//! from the sidedef's texture id rather than sampling a real patch
//! atlas: texture decoding belongs to an asset pipeline outside this
//! crate's scope, so a stable, deterministic stand-in color lets the
//! rasterizer's geometry (projection, clipping, light falloff) be
//! exercised and tested without one.

use alloc::vec::Vec;

use crate::fixed::{Angle, Fixed};
use crate::map::{Level, Seg};
use crate::renderer::bsp::Viewer;
use crate::renderer::colormap;

pub struct ScreenConfig {
    pub width: u16,
    pub height: u16,
    pub half_fov: Angle,
}

impl ScreenConfig {
    fn focal_length(&self) -> Fixed {
        let half_width = Fixed::from_int(self.width as i32 / 2);
        half_width.div_approx(crate::fixed::fine_tangent(self.half_fov))
    }

    /// Projects a world-relative angle (already offset by the viewer's
    /// facing) to a screen column, `0` at the left edge.
    pub fn angle_to_x(&self, relative: Angle) -> i32 {
        let half_width = self.width as i32 / 2;
        if relative.0 <= Angle::ANG90.0 {
            let t = crate::fixed::fine_tangent(relative);
            half_width - self.focal_length().mul(t).to_int()
        } else if relative.0 >= Angle::ANG0.0.wrapping_sub(Angle::ANG90.0) {
            let t = crate::fixed::fine_tangent(Angle(Angle::ANG0.0.wrapping_sub(relative.0)));
            half_width + self.focal_length().mul(t).to_int()
        } else {
            // Behind the viewer; caller is expected to have clipped this
            // seg out already via the half-FOV visibility test.
            half_width
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WallColumn {
    pub x: i32,
    pub top: i32,
    pub bottom: i32,
    pub colormap: i32,
    pub texture: u16,
}

/// Projects one seg into a run of screen columns. `view` is the
/// viewer's world position/angle; `screen` carries the projection
/// constants. Returns an empty vec if the seg is entirely behind the
/// viewer or degenerates to zero width.
pub fn project_seg(level: &Level, screen: &ScreenConfig, viewer: Viewer, seg: &Seg) -> Vec<WallColumn> {
    let v1 = level.vertices[seg.v1];
    let v2 = level.vertices[seg.v2];

    let a1 = crate::fixed::point_to_angle(v1.x - viewer.x, v1.y - viewer.y);
    let a2 = crate::fixed::point_to_angle(v2.x - viewer.x, v2.y - viewer.y);
    let rel1 = Angle(a1.0.wrapping_sub(viewer.angle.0));
    let rel2 = Angle(a2.0.wrapping_sub(viewer.angle.0));

    let in_front = |rel: Angle| rel.0 <= Angle::ANG90.0 || rel.0 >= Angle::ANG0.0.wrapping_sub(Angle::ANG90.0);
    if !in_front(rel1) && !in_front(rel2) {
        return Vec::new();
    }

    let x1 = screen.angle_to_x(rel1).clamp(0, screen.width as i32 - 1);
    let x2 = screen.angle_to_x(rel2).clamp(0, screen.width as i32 - 1);
    let (lo, hi) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };

    let front_sector = &level.sectors[seg.front_sector];
    let dist = ((v1.x - viewer.x).abs().to_int() + (v1.y - viewer.y).abs().to_int()).max(1);
    let cm = colormap::colormap_index(front_sector.light_level(), dist << 16);

    let top = screen.height as i32 * front_sector.ceiling_height().to_int() / 256;
    let bottom = screen.height as i32 * front_sector.floor_height().to_int() / 256;

    let side = &level.sidedefs[seg.side];
    (lo..=hi)
        .map(|x| WallColumn { x, top: top.clamp(0, screen.height as i32), bottom: bottom.clamp(0, screen.height as i32), colormap: cm, texture: side.mid_texture })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::{Arena, Idx};
    use crate::map::{Sector, SectorConst, SectorMut, Sidedef, Vertex};

    fn screen() -> ScreenConfig {
        ScreenConfig { width: 320, height: 200, half_fov: Angle::ANG45 }
    }

    fn level_with_one_seg() -> (Level, Seg) {
        let mut vertices: Arena<Vertex> = Arena::new();
        vertices.push(Vertex { x: Fixed::from_int(-32), y: Fixed::from_int(64) });
        vertices.push(Vertex { x: Fixed::from_int(32), y: Fixed::from_int(64) });

        let mut sectors: Arena<Sector> = Arena::new();
        let sector = sectors.push(Sector {
            konst: SectorConst { floor_pic: 0, ceiling_pic: 0, tag: 0, special: 0 },
            mutable: SectorMut { floor_height: Fixed::ZERO, ceiling_height: Fixed::from_int(128), light_level: 200, active_mover: None },
        });
        let mut sidedefs: Arena<Sidedef> = Arena::new();
        let side = sidedefs.push(Sidedef { tex_offset_x: Fixed::ZERO, tex_offset_y: Fixed::ZERO, top_texture: 0, bottom_texture: 0, mid_texture: 7, sector });

        let seg = Seg { v1: Idx::new(0), v2: Idx::new(1), angle: Angle::ANG0, side, linedef: Idx::new(0), front_sector: sector, back_sector: None, offset: Fixed::ZERO };

        let level = Level {
            name: "WALL".into(),
            vertices,
            sectors,
            sidedefs,
            linedefs: Arena::new(),
            segs: Arena::new(),
            subsectors: Arena::new(),
            nodes: Arena::new(),
            blockmap: crate::map::Blockmap { origin_x: Fixed::ZERO, origin_y: Fixed::ZERO, columns: 1, rows: 1, block_offsets: alloc::vec![0], blocklist: alloc::vec![0xFFFF] },
            reject: crate::map::Reject::new(alloc::vec![0], 1),
            things: alloc::vec::Vec::new(),
        };
        (level, seg)
    }

    #[test]
    fn seg_directly_ahead_projects_to_a_nonempty_column_span() {
        let (level, seg) = level_with_one_seg();
        let viewer = Viewer { x: Fixed::ZERO, y: Fixed::ZERO, angle: Angle::ANG90 };
        let cols = project_seg(&level, &screen(), viewer, &seg);
        assert!(!cols.is_empty());
    }

    #[test]
    fn seg_behind_viewer_projects_to_nothing() {
        let (level, seg) = level_with_one_seg();
        let viewer = Viewer { x: Fixed::ZERO, y: Fixed::from_int(128), angle: Angle::ANG90 };
        let cols = project_seg(&level, &screen(), viewer, &seg);
        assert!(cols.is_empty());
    }

    #[test]
    fn columns_carry_the_sidedef_texture_id() {
        let (level, seg) = level_with_one_seg();
        let viewer = Viewer { x: Fixed::ZERO, y: Fixed::ZERO, angle: Angle::ANG90 };
        let cols = project_seg(&level, &screen(), viewer, &seg);
        assert!(cols.iter().all(|c| c.texture == 7));
    }
}
