//! Vissprite collection and distance sort (`R_AddSprites` /
//! `R_SortVisSprites`): every mobj in a visited subsector becomes a
//! billboard column run, drawn back-to-front so nearer sprites paint
//! over farther ones.

use alloc::vec::Vec;

use crate::fixed::{Angle, Fixed};
use crate::mobj::Mobj;
use crate::renderer::bsp::Viewer;
use crate::renderer::colormap;
use crate::renderer::walls::ScreenConfig;

#[derive(Debug, Clone, Copy)]
pub struct VisSprite {
    pub mobj_index: u32,
    pub distance: Fixed,
    pub x1: i32,
    pub x2: i32,
    pub colormap: i32,
}

/// Projects one mobj into a screen-space billboard. Returns `None` if
/// it's behind the viewer or the radius projects to zero width.
pub fn project_mobj(screen: &ScreenConfig, viewer: Viewer, mobj_index: u32, mobj: &Mobj) -> Option<VisSprite> {
    let dx = mobj.x - viewer.x;
    let dy = mobj.y - viewer.y;
    let to = crate::fixed::point_to_angle(dx, dy);
    let rel = Angle(to.0.wrapping_sub(viewer.angle.0));
    let in_front = rel.0 <= Angle::ANG90.0 || rel.0 >= Angle::ANG0.0.wrapping_sub(Angle::ANG90.0);
    if !in_front {
        return None;
    }

    let distance = (dx.abs() + dy.abs()).max(Fixed::ONE);
    let center_x = screen.angle_to_x(rel);
    let half_width_px = (Fixed::from_int(screen.width as i32).mul(mobj.radius).div_approx(distance)).to_int().max(1);

    let light = 200u8; // sector light is the caller's to supply once per-sector is threaded through; flat default keeps this a pure projection helper.
    let cm = colormap::colormap_index(light, distance.to_int() << 16);

    Some(VisSprite {
        mobj_index,
        distance,
        x1: (center_x - half_width_px).max(0),
        x2: (center_x + half_width_px).min(screen.width as i32 - 1),
        colormap: cm,
    })
}

/// `R_SortVisSprites` — farthest first so nearer sprites paint last.
pub fn sort_far_to_near(sprites: &mut Vec<VisSprite>) {
    sprites.sort_by(|a, b| b.distance.0.cmp(&a.distance.0));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::fixed::Angle;
    use crate::map::Sector;
    use crate::mobj::{spawn_mobj, MobjKind, MobjSpawnArgs, MobjType};

    fn screen() -> ScreenConfig {
        ScreenConfig { width: 320, height: 200, half_fov: Angle::ANG45 }
    }

    fn spawn_at(x: i32, y: i32) -> Mobj {
        let mut sectors: Arena<Sector> = Arena::new();
        let sector = sectors.push(crate::map::Sector {
            konst: crate::map::SectorConst { floor_pic: 0, ceiling_pic: 0, tag: 0, special: 0 },
            mutable: crate::map::SectorMut { floor_height: Fixed::ZERO, ceiling_height: Fixed::from_int(128), light_level: 200, active_mover: None },
        });
        let mut mobjs = Arena::new();
        let idx = spawn_mobj(
            &mut mobjs,
            MobjSpawnArgs {
                mobj_type: MobjType::Imp,
                x: Fixed::from_int(x),
                y: Fixed::from_int(y),
                z: Fixed::ZERO,
                angle: Angle::ANG0,
                sector,
                floor_z: Fixed::ZERO,
                ceiling_z: Fixed::from_int(128),
                kind: MobjKind::Full,
            },
        );
        mobjs[idx].clone()
    }

    #[test]
    fn mobj_ahead_projects_to_a_sprite() {
        let mobj = spawn_at(0, 64);
        let viewer = Viewer { x: Fixed::ZERO, y: Fixed::ZERO, angle: Angle::ANG90 };
        let sprite = project_mobj(&screen(), viewer, 0, &mobj);
        assert!(sprite.is_some());
    }

    #[test]
    fn mobj_behind_viewer_is_not_projected() {
        let mobj = spawn_at(0, -64);
        let viewer = Viewer { x: Fixed::ZERO, y: Fixed::ZERO, angle: Angle::ANG90 };
        let sprite = project_mobj(&screen(), viewer, 0, &mobj);
        assert!(sprite.is_none());
    }

    #[test]
    fn sort_orders_farthest_first() {
        let mut sprites = alloc::vec![
            VisSprite { mobj_index: 0, distance: Fixed::from_int(10), x1: 0, x2: 1, colormap: 0 },
            VisSprite { mobj_index: 1, distance: Fixed::from_int(100), x1: 0, x2: 1, colormap: 0 },
        ];
        sort_far_to_near(&mut sprites);
        assert_eq!(sprites[0].mobj_index, 1);
    }
}
