//! The software renderer: BSP walk, wall columns, visplane floor/ceiling
//! fills, and vissprite overlay, composited into a palette-index
//! framebuffer via the platform's [`crate::platform::FrameSink`].

pub mod bsp;
pub mod colormap;
pub mod planes;
pub mod sprites;
pub mod walls;

use alloc::vec::Vec;

use crate::arena::{Arena, Idx};
use crate::fixed::{Angle, Fixed};
use crate::map::{Level, Sector};
use crate::mobj::Mobj;
use crate::platform::FrameSink;

pub use bsp::Viewer;
pub use walls::ScreenConfig;

/// Per-frame scratch: column clip extents (`ceilingclip`/`floorclip`)
/// plus the accumulated visplane list, all reset at the start of
/// [`Renderer::render_frame`].
pub struct Renderer {
    screen: ScreenConfig,
    ceiling_clip: Vec<i32>,
    floor_clip: Vec<i32>,
    planes: planes::PlaneList,
    framebuffer: Vec<u8>,
}

impl Renderer {
    pub fn new(width: u16, height: u16) -> Self {
        Renderer {
            screen: ScreenConfig { width, height, half_fov: Angle::ANG45 },
            ceiling_clip: alloc::vec![0; width as usize],
            floor_clip: alloc::vec![height as i32; width as usize],
            planes: planes::PlaneList::new(width as usize),
            framebuffer: alloc::vec![0u8; width as usize * height as usize],
        }
    }

    fn reset(&mut self) {
        self.ceiling_clip.iter_mut().for_each(|c| *c = 0);
        self.floor_clip.iter_mut().for_each(|c| *c = self.screen.height as i32);
        self.planes.reset();
        self.framebuffer.iter_mut().for_each(|p| *p = 0);
    }

    /// `R_RenderPlayerView` — walk the BSP, rasterize every visible wall
    /// column and visplane span, overlay sprites, then hand the finished
    /// rows to `sink`.
    pub fn render_frame(&mut self, level: &Level, viewer: Viewer, mobjs: &Arena<Mobj>, sink: &mut impl FrameSink) {
        self.reset();

        let mut subsectors = Vec::new();
        bsp::walk_bsp(level, viewer, |idx| subsectors.push(idx));

        for &ss_idx in &subsectors {
            let Some(subsector) = level.subsectors.get(Idx::new(ss_idx)) else { continue };
            let sector = &level.sectors[subsector.sector];
            for seg_offset in 0..subsector.num_segs {
                let seg_idx = Idx::new(subsector.first_seg + seg_offset);
                let Some(seg) = level.segs.get(seg_idx) else { continue };
                let columns = walls::project_seg(level, &self.screen, viewer, seg);
                self.draw_wall_columns(&columns, sector);
            }
        }

        self.fill_planes();

        let mut sprites = Vec::new();
        for (i, mobj) in mobjs.iter().enumerate() {
            if mobj.removed {
                continue;
            }
            if let Some(vis) = sprites::project_mobj(&self.screen, viewer, i as u32, mobj) {
                sprites.push(vis);
            }
        }
        sprites::sort_far_to_near(&mut sprites);
        for sprite in &sprites {
            self.draw_sprite(sprite);
        }

        self.present(sink);
    }

    fn draw_wall_columns(&mut self, columns: &[walls::WallColumn], sector: &Sector) {
        for col in columns {
            let x = col.x as usize;
            if x >= self.screen.width as usize {
                continue;
            }
            let top = col.top.max(self.ceiling_clip[x]);
            let bottom = col.bottom.min(self.floor_clip[x]);
            if top >= bottom {
                continue;
            }
            let shade = texture_shade(col.texture, col.colormap);
            for y in top..bottom {
                self.put_pixel(x, y as u16, shade);
            }

            self.planes.add_span(
                planes::PlaneKey { height: sector.ceiling_height().to_int(), pic: sector.konst.ceiling_pic, light_level: sector.light_level() },
                x,
                self.ceiling_clip[x],
                top,
            );
            self.planes.add_span(
                planes::PlaneKey { height: sector.floor_height().to_int(), pic: sector.konst.floor_pic, light_level: sector.light_level() },
                x,
                bottom,
                self.floor_clip[x],
            );

            self.ceiling_clip[x] = top;
            self.floor_clip[x] = bottom;
        }
    }

    fn fill_planes(&mut self) {
        for plane in self.planes.planes().to_vec() {
            let shade = flat_shade(plane.key.pic, plane.key.light_level);
            for (x, span) in plane.columns.iter().enumerate() {
                let Some((top, bottom)) = span else { continue };
                for y in *top..*bottom {
                    if y >= 0 && (y as usize) < self.screen.height as usize {
                        self.put_pixel(x, y as u16, shade);
                    }
                }
            }
        }
    }

    fn draw_sprite(&mut self, sprite: &sprites::VisSprite) {
        let shade = texture_shade(sprite.mobj_index as u16, sprite.colormap);
        let top = self.screen.height as i32 / 3;
        let bottom = self.screen.height as i32 * 2 / 3;
        for x in sprite.x1..=sprite.x2 {
            if x < 0 || x as usize >= self.screen.width as usize {
                continue;
            }
            let clipped_top = top.max(self.ceiling_clip[x as usize]);
            let clipped_bottom = bottom.min(self.floor_clip[x as usize]);
            for y in clipped_top..clipped_bottom {
                self.put_pixel(x as usize, y as u16, shade);
            }
        }
    }

    fn put_pixel(&mut self, x: usize, y: u16, color: u8) {
        if (y as usize) >= self.screen.height as usize {
            return;
        }
        let idx = y as usize * self.screen.width as usize + x;
        self.framebuffer[idx] = color;
    }

    fn present(&mut self, sink: &mut impl FrameSink) {
        for y in 0..self.screen.height {
            let start = y as usize * self.screen.width as usize;
            let end = start + self.screen.width as usize;
            sink.write_row(y, &self.framebuffer[start..end]);
        }
        sink.present();
    }
}

fn texture_shade(texture_id: u16, colormap_index: i32) -> u8 {
    let base = (texture_id as u32).wrapping_mul(37).wrapping_add(1) as u8;
    base.saturating_sub((colormap_index as u8).saturating_mul(4))
}

fn flat_shade(pic: u16, light_level: u8) -> u8 {
    let base = (pic as u32).wrapping_mul(23).wrapping_add(2) as u8;
    base.saturating_sub(255 - light_level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{Blockmap, BspNode, NodeChild, Reject, SectorConst, SectorMut, Seg, Sidedef, Subsector, Vertex};
    use alloc::string::ToString;

    struct RecordingSink {
        width: u16,
        height: u16,
        rows_written: u16,
        presented: bool,
    }

    impl FrameSink for RecordingSink {
        fn width(&self) -> u16 {
            self.width
        }
        fn height(&self) -> u16 {
            self.height
        }
        fn write_row(&mut self, _y: u16, pixels: &[u8]) {
            assert_eq!(pixels.len(), self.width as usize);
            self.rows_written += 1;
        }
        fn present(&mut self) {
            self.presented = true;
        }
    }

    fn tiny_level() -> Level {
        let mut vertices: Arena<Vertex> = Arena::new();
        vertices.push(Vertex { x: Fixed::from_int(-64), y: Fixed::from_int(64) });
        vertices.push(Vertex { x: Fixed::from_int(64), y: Fixed::from_int(64) });

        let mut sectors: Arena<Sector> = Arena::new();
        let sector = sectors.push(Sector {
            konst: SectorConst { floor_pic: 1, ceiling_pic: 2, tag: 0, special: 0 },
            mutable: SectorMut { floor_height: Fixed::ZERO, ceiling_height: Fixed::from_int(128), light_level: 200, active_mover: None },
        });

        let mut sidedefs: Arena<Sidedef> = Arena::new();
        let side = sidedefs.push(Sidedef { tex_offset_x: Fixed::ZERO, tex_offset_y: Fixed::ZERO, top_texture: 0, bottom_texture: 0, mid_texture: 5, sector });

        let mut segs: Arena<Seg> = Arena::new();
        segs.push(Seg { v1: Idx::new(0), v2: Idx::new(1), angle: Angle::ANG0, side, linedef: Idx::new(0), front_sector: sector, back_sector: None, offset: Fixed::ZERO });

        let mut subsectors: Arena<Subsector> = Arena::new();
        subsectors.push(Subsector { sector, first_seg: 0, num_segs: 1 });

        Level {
            name: "RENDER".to_string(),
            vertices,
            sectors,
            sidedefs,
            linedefs: Arena::new(),
            segs,
            subsectors,
            nodes: Arena::<BspNode>::new(),
            blockmap: Blockmap { origin_x: Fixed::ZERO, origin_y: Fixed::ZERO, columns: 1, rows: 1, block_offsets: alloc::vec![0], blocklist: alloc::vec![0xFFFF] },
            reject: Reject::new(alloc::vec![0], 1),
            things: alloc::vec::Vec::new(),
        }
    }

    #[test]
    fn render_frame_presents_every_row_once() {
        let level = tiny_level();
        let mobjs: Arena<Mobj> = Arena::new();
        let mut renderer = Renderer::new(64, 48);
        let mut sink = RecordingSink { width: 64, height: 48, rows_written: 0, presented: false };
        let viewer = Viewer { x: Fixed::ZERO, y: Fixed::ZERO, angle: Angle::ANG90 };
        renderer.render_frame(&level, viewer, &mobjs, &mut sink);
        assert_eq!(sink.rows_written, 48);
        assert!(sink.presented);
    }

    #[test]
    fn empty_node_list_with_no_subsectors_does_not_panic() {
        let mut level = tiny_level();
        level.subsectors = Arena::new();
        let mobjs: Arena<Mobj> = Arena::new();
        let mut renderer = Renderer::new(32, 24);
        let mut sink = RecordingSink { width: 32, height: 24, rows_written: 0, presented: false };
        let viewer = Viewer { x: Fixed::ZERO, y: Fixed::ZERO, angle: Angle::ANG0 };
        renderer.render_frame(&level, viewer, &mobjs, &mut sink);
        assert_eq!(sink.rows_written, 24);
    }
}
