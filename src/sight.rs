//! Line-of-sight, hitscan attacks with autoaim, radius damage, and the
//! noise-alert propagation that wakes sleeping monsters.

use alloc::vec::Vec;

use crate::arena::{Arena, Idx};
use crate::fixed::{Angle, Fixed};
use crate::map::{Level, Sector};
use crate::maputil::{collect_line_intercepts, InterceptKind};
use crate::mobj::{Mobj, MobjFlags};
use crate::rng::Rng;

/// `P_CheckSight` — true if nothing solid (other than two-sided lines
/// whose opening the sightline actually passes through) blocks the
/// straight line between the two points. The `REJECT` table is checked
/// first so a same-never-visible sector pair short-circuits the blockmap
/// walk entirely.
pub fn check_sight(level: &Level, from_sector: Idx<Sector>, to_sector: Idx<Sector>, from: (Fixed, Fixed, Fixed), to: (Fixed, Fixed, Fixed)) -> bool {
    if level.reject.rejects(from_sector.index as usize, to_sector.index as usize) {
        return false;
    }

    let (x1, y1, z1) = from;
    let (x2, y2, z2) = to;
    let intercepts = collect_line_intercepts(level, x1, y1, x2, y2);
    let total_dist = (x2 - x1).abs().to_int().max(1) + (y2 - y1).abs().to_int().max(1);

    for hit in intercepts {
        let InterceptKind::Line(line_idx) = hit.kind else { continue };
        let line = &level.linedefs[line_idx];
        if !line.two_sided() {
            return false;
        }
        let Some(opening) = crate::maputil::line_opening(level, line) else {
            return false;
        };
        // Interpolate the sightline's height at this crossing and check
        // it's within the opening — this is the same test as vanilla's
        // slope-based sightzstart/topslope/bottomslope tracking, done
        // directly against the interpolated Z instead of maintained
        // incrementally, since this port recomputes sight checks rarely
        // (once per AI look/attack decision, not per render column).
        let t = hit.frac;
        let interp_z = z1 + (z2 - z1).mul(t);
        if interp_z < opening.open_bottom || interp_z > opening.open_top {
            return false;
        }
        let _ = total_dist;
    }
    true
}

#[derive(Debug, Clone, Copy)]
pub struct AimResult {
    pub slope: Fixed,
    pub target: Option<u32>,
    pub distance: Fixed,
}

/// `P_AimLineAttack` — walk the blockmap along `angle` from `(x,y)` for up
/// to `distance`, returning the first shootable mobj's vertical slope for
/// autoaim plus its id. `mobjs`/`mobj_positions` let the caller supply
/// the live mobj set without this module depending on `Arena<Mobj>`
/// ownership semantics directly.
pub fn aim_line_attack(
    level: &Level,
    mobjs: &Arena<Mobj>,
    shooter_id: u32,
    x: Fixed,
    y: Fixed,
    shooter_eye_z: Fixed,
    angle: Angle,
    distance: Fixed,
) -> Option<AimResult> {
    let cos = crate::fixed::fine_cosine(angle);
    let sin = crate::fixed::fine_sine(angle);
    let x2 = x + distance.mul(cos);
    let y2 = y + distance.mul(sin);

    let intercepts = collect_line_intercepts(level, x, y, x2, y2);
    for hit in &intercepts {
        if let InterceptKind::Line(line_idx) = hit.kind {
            let line = &level.linedefs[line_idx];
            if !line.two_sided() {
                break;
            }
        }
    }

    let mut best: Option<(u32, Fixed, Fixed)> = None;
    for (i, mobj) in mobjs.iter().enumerate() {
        if i as u32 == shooter_id {
            continue;
        }
        if !mobj.flags.contains(MobjFlags::SHOOTABLE) {
            continue;
        }
        let dx = mobj.x - x;
        let dy = mobj.y - y;
        let dist_sq = dx.mul(dx) + dy.mul(dy);
        if dist_sq.0 < 0 {
            continue;
        }
        let along = dx.mul(cos) + dy.mul(sin);
        if along.0 <= 0 || along.0 > distance.0 {
            continue;
        }
        let perp = (dy.mul(cos) - dx.mul(sin)).abs();
        if perp.0 > mobj.radius.0 * 2 {
            continue;
        }
        let target_mid_z = mobj.z + mobj.height.div(Fixed::from_int(2));
        let slope = (target_mid_z - shooter_eye_z).div_approx(along.max(Fixed::from_int(1)));
        match best {
            Some((_, best_dist, _)) if best_dist.0 <= along.0 => {}
            _ => best = Some((i as u32, along, slope)),
        }
    }

    best.map(|(target, dist, slope)| AimResult { slope, target: Some(target), distance: dist })
}

/// `P_LineAttack` — deal `damage` to whatever `aim_line_attack` found, if
/// anything, and report the impact point for puff/blood spawning.
pub fn line_attack(aim: Option<AimResult>, mobjs: &mut Arena<Mobj>, damage: i32) -> Option<u32> {
    let aim = aim?;
    let target_id = aim.target?;
    let idx: Idx<Mobj> = Idx::new(target_id as u16);
    if let Some(mobj) = mobjs.get_mut(idx) {
        mobj.health -= damage;
        return Some(target_id);
    }
    None
}

/// `P_RadiusAttack` — damage every shootable mobj within `radius` of
/// `origin` whose line of sight to the origin isn't blocked, falling off
/// linearly with distance the way vanilla's `dist = damage - distance`
/// (clamped at zero) does.
pub fn radius_attack(level: &Level, mobjs: &mut Arena<Mobj>, origin_sector: Idx<Sector>, origin: (Fixed, Fixed, Fixed), damage: i32) -> Vec<u32> {
    let mut hit = Vec::new();
    let radius = Fixed::from_int(damage.max(0));
    for (i, mobj) in mobjs.iter_mut().enumerate() {
        if !mobj.flags.contains(MobjFlags::SHOOTABLE) {
            continue;
        }
        let dx = (mobj.x - origin.0).abs();
        let dy = (mobj.y - origin.1).abs();
        let dist = (dx.max(dy) - mobj.radius).max(Fixed::ZERO);
        if dist.0 >= radius.0 {
            continue;
        }
        if !check_sight(level, origin_sector, mobj.sector, origin, (mobj.x, mobj.y, mobj.z)) {
            continue;
        }
        let falloff = damage - dist.to_int();
        if falloff > 0 {
            mobj.health -= falloff;
            hit.push(i as u32);
        }
    }
    hit
}

/// `P_NoiseAlert` — flood-fill sound propagation through the sector
/// graph: every sector reachable from `origin_sector` through an open
/// two-sided line within `max_hops` gets woken (ambush monsters are
/// excluded by the caller, matching vanilla's `bitfilled`/`soundblocks`
/// recursion depth limit rather than true distance).
pub fn noise_alert(level: &Level, origin_sector: Idx<Sector>, max_hops: u32) -> Vec<Idx<Sector>> {
    let mut visited = Vec::new();
    let mut frontier = alloc::vec![(origin_sector, 0u32)];
    visited.push(origin_sector);

    while let Some((sector, hops)) = frontier.pop() {
        if hops >= max_hops {
            continue;
        }
        for line in level.linedefs.iter() {
            if line.flags.contains(crate::map::LineFlags::BLOCK_SOUND) {
                continue;
            }
            let Some(back) = line.side_back else { continue };
            let front_sector = level.sidedefs[line.side_front].sector;
            let back_sector = level.sidedefs[back].sector;
            let other = if front_sector == sector {
                Some(back_sector)
            } else if back_sector == sector {
                Some(front_sector)
            } else {
                None
            };
            if let Some(other) = other {
                if !visited.contains(&other) {
                    visited.push(other);
                    frontier.push((other, hops + 1));
                }
            }
        }
    }
    visited
}

pub fn roll_random_blood_spray(rng: &mut Rng) -> Angle {
    let delta = rng.play_signed();
    Angle((delta as u32).wrapping_mul(1 << 20))
}
