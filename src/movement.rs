//! Collision and movement: `P_TryMove`, slide-move, teleport, and the
//! sector floor/ceiling transition that happens when a thing changes
//! sector as a side effect of moving.

use alloc::vec::Vec;

use crate::arena::{Arena, Idx};
use crate::fixed::Fixed;
use crate::map::{Level, Linedef, Sector};
use crate::maputil::{box_on_line_side, line_opening};
use crate::mobj::{Mobj, MobjFlags};

/// Mirrors vanilla's `tmfloorz`/`tmceilingz`/`tmdropoffz` accumulation:
/// as `PIT_CheckLine` walks every line the thing's new bounding box
/// touches, the tightest floor/ceiling and the lowest dropoff seen so far
/// are kept. `spechit` mirrors the global `spechit[]` array: every
/// special-carrying line the box straddles, regardless of whether the
/// move itself is blocked, for the caller to run through
/// `specials::cross_special_line` once the move actually succeeds.
#[derive(Debug, Clone)]
pub struct CheckPositionResult {
    pub floor_z: Fixed,
    pub ceiling_z: Fixed,
    pub dropoff_z: Fixed,
    pub blocked: bool,
    pub spechit: Vec<Idx<Linedef>>,
}

/// `P_CheckPosition` — determine whether `mobj` can occupy `(x, y)` and,
/// if so, what floor/ceiling height it would end up standing between.
/// Thing-vs-thing collision (`PIT_CheckThing`) is the caller's
/// responsibility since it needs the live mobj arena with interior
/// mutability this pure geometry pass doesn't have; this covers the
/// line-vs-box half (`PIT_CheckLine`).
pub fn check_position(level: &Level, mobj: &Mobj, x: Fixed, y: Fixed) -> CheckPositionResult {
    let radius = mobj.radius;
    let bbox = [x - radius, x + radius, y - radius, y + radius];

    let mut floor_z = mobj.floor_z;
    let mut ceiling_z = mobj.ceiling_z;
    let mut dropoff_z = mobj.floor_z;
    let mut blocked = false;
    let mut spechit = Vec::new();

    for (i, line) in level.linedefs.iter().enumerate() {
        if !touches_box(line, bbox) {
            continue;
        }
        let v1 = level.vertices[line.v1];
        if box_on_line_side(bbox, line, (v1.x, v1.y)) != -1 {
            continue;
        }

        if line.special != 0 {
            spechit.push(Idx::new(i as u16));
        }

        if !line.two_sided() || line.flags.contains(crate::map::LineFlags::BLOCKING) {
            blocked = true;
            continue;
        }

        if let Some(opening) = line_opening(level, line) {
            if opening.open_top < ceiling_z {
                ceiling_z = opening.open_top;
            }
            if opening.open_bottom > floor_z {
                floor_z = opening.open_bottom;
            }
            if opening.low_floor < dropoff_z {
                dropoff_z = opening.low_floor;
            }
            if opening.range.0 < mobj.height.0 {
                blocked = true;
            }
        } else {
            blocked = true;
        }
    }

    CheckPositionResult { floor_z, ceiling_z, dropoff_z, blocked, spechit }
}

fn touches_box(line: &Linedef, bbox: [Fixed; 4]) -> bool {
    !(line.bbox[1].0 < bbox[0].0
        || line.bbox[0].0 > bbox[1].0
        || line.bbox[3].0 < bbox[2].0
        || line.bbox[2].0 > bbox[3].0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TryMoveOutcome {
    Moved,
    Blocked,
}

/// `P_TryMove` — attempt to relocate `mobj` to `(x, y)`, updating its
/// floor/ceiling cache on success. Step-height and drop-off rules match
/// `p_map.c`: a move is rejected if it would require climbing more than
/// `MAX_STEP_HEIGHT`, squeeze through less than the mobj's height, or
/// (for ground-bound things) step off a drop taller than the step limit.
/// On success, every special line the move's bounding box crossed is
/// appended to `spechit` for the caller to run through
/// `specials::cross_special_line` (`P_TryMove`'s own spechit loop).
pub fn try_move(level: &Level, mobj: &mut Mobj, x: Fixed, y: Fixed, spechit: &mut Vec<Idx<Linedef>>) -> TryMoveOutcome {
    let result = check_position(level, mobj, x, y);
    if result.blocked {
        return TryMoveOutcome::Blocked;
    }

    if result.ceiling_z - result.floor_z < mobj.height {
        return TryMoveOutcome::Blocked;
    }
    if result.ceiling_z - mobj.z < mobj.height && !mobj.flags.contains(MobjFlags::TELEPORT) {
        return TryMoveOutcome::Blocked;
    }
    if result.floor_z - mobj.floor_z > crate::mobj::constants::MAX_STEP_HEIGHT
        && !mobj.flags.contains(MobjFlags::TELEPORT)
    {
        return TryMoveOutcome::Blocked;
    }
    if !mobj.flags.contains(MobjFlags::DROPOFF)
        && !mobj.flags.contains(MobjFlags::FLOAT)
        && mobj.floor_z - result.dropoff_z > crate::mobj::constants::MAX_STEP_HEIGHT
    {
        return TryMoveOutcome::Blocked;
    }

    mobj.x = x;
    mobj.y = y;
    mobj.floor_z = result.floor_z;
    mobj.ceiling_z = result.ceiling_z;
    spechit.extend(result.spechit);
    TryMoveOutcome::Moved
}

/// `P_SlideMove` — when a diagonal move is blocked, retry moving along
/// just the X or just the Y component so the thing slides along the
/// wall instead of stopping dead.
pub fn slide_move(level: &Level, mobj: &mut Mobj, dx: Fixed, dy: Fixed, spechit: &mut Vec<Idx<Linedef>>) -> TryMoveOutcome {
    let (ox, oy) = (mobj.x, mobj.y);
    if try_move(level, mobj, ox + dx, oy + dy, spechit) == TryMoveOutcome::Moved {
        return TryMoveOutcome::Moved;
    }
    if try_move(level, mobj, ox + dx, oy, spechit) == TryMoveOutcome::Moved {
        mobj.set_mom(mobj.mom().0, Fixed::ZERO, mobj.mom().2);
        return TryMoveOutcome::Moved;
    }
    if try_move(level, mobj, ox, oy + dy, spechit) == TryMoveOutcome::Moved {
        mobj.set_mom(Fixed::ZERO, mobj.mom().1, mobj.mom().2);
        return TryMoveOutcome::Moved;
    }
    mobj.set_mom(Fixed::ZERO, Fixed::ZERO, mobj.mom().2);
    TryMoveOutcome::Blocked
}

/// `P_XYMovement` — apply momentum for one tic: slide-move by the
/// current momentum, then apply ground friction once the thing is
/// standing on its floor.
pub fn xy_movement(level: &Level, mobj: &mut Mobj, spechit: &mut Vec<Idx<Linedef>>) {
    let (momx, momy, _momz) = mobj.mom();
    if momx.0 == 0 && momy.0 == 0 {
        return;
    }
    let max = crate::mobj::constants::MAXMOVE;
    let clamped_x = momx.clamp(-max, max);
    let clamped_y = momy.clamp(-max, max);
    slide_move(level, mobj, clamped_x, clamped_y, spechit);

    if mobj.flags.contains(MobjFlags::MISSILE) || mobj.flags.contains(MobjFlags::SKULLFLY) {
        return;
    }
    if mobj.z.0 > mobj.floor_z.0 {
        return; // still airborne, no ground friction
    }
    let (mx, my, mz) = mobj.mom();
    let friction = crate::mobj::constants::ORIG_FRICTION;
    mobj.set_mom(mx.mul(friction), my.mul(friction), mz);
}

/// `EV_Teleport`'s movement half: relocate a mobj to a destination spot
/// ignoring intervening geometry (the caller has already validated the
/// destination sector), clearing momentum the way vanilla resets it
/// after a teleport.
pub fn teleport_move(mobj: &mut Mobj, dest_x: Fixed, dest_y: Fixed, dest_z: Fixed, floor_z: Fixed, ceiling_z: Fixed) {
    mobj.x = dest_x;
    mobj.y = dest_y;
    mobj.z = dest_z;
    mobj.floor_z = floor_z;
    mobj.ceiling_z = ceiling_z;
    mobj.set_mom(Fixed::ZERO, Fixed::ZERO, Fixed::ZERO);
}

/// Applies gravity and vertical movement (`P_ZMovement`): things above
/// their floor fall, things below it are pushed back up (a floor mover
/// or teleport can leave a thing momentarily interpenetrating).
pub fn z_movement(mobj: &mut Mobj) {
    let (momx, momy, momz) = mobj.mom();
    let new_z = mobj.z + momz;
    mobj.z = new_z;

    if !mobj.flags.contains(MobjFlags::NOGRAVITY) {
        let gravity = crate::mobj::constants::GRAVITY;
        let new_momz = momz - gravity;
        mobj.set_mom(momx, momy, new_momz);
    }

    if mobj.z < mobj.floor_z {
        mobj.z = mobj.floor_z;
        if (mobj.mom().2).0 < 0 {
            mobj.set_mom(momx, momy, Fixed::ZERO);
        }
    } else if mobj.z + mobj.height > mobj.ceiling_z {
        mobj.z = mobj.ceiling_z - mobj.height;
        if (mobj.mom().2).0 > 0 {
            mobj.set_mom(momx, momy, Fixed::ZERO);
        }
    }
}
